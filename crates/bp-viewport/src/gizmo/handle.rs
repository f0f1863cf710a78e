//! Gizmo handles
//!
//! Arrows translate along one axis, plane sliders translate within the plane
//! normal to their axis, rings rotate about their axis and spheres scale along
//! their axis. All shapes are laid out in gizmo units inside a
//! [`GizmoFrame`].

use bp_core::{Axis, TransformMode};
use glam::{Quat, Vec3};

use super::collision::{
    ray_cylinder_intersection, ray_quad_intersection, ray_ring_intersection,
    ray_sphere_intersection,
};
use crate::config::GizmoConfig;
use crate::constants::gizmo as constants;
use crate::ray::Ray;

/// One interactive part of the gizmo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoHandle {
    /// Translation arrow along an axis
    Arrow(Axis),
    /// Translation in the plane normal to an axis
    Slider(Axis),
    /// Rotation ring about an axis
    Rotator(Axis),
    /// Scaling sphere along an axis
    Sphere(Axis),
}

impl GizmoHandle {
    /// The axis this handle is attached to
    pub fn axis(&self) -> Axis {
        match self {
            GizmoHandle::Arrow(axis)
            | GizmoHandle::Slider(axis)
            | GizmoHandle::Rotator(axis)
            | GizmoHandle::Sphere(axis) => *axis,
        }
    }

    /// Whether dragging this handle only moves the object
    pub fn is_translation(&self) -> bool {
        matches!(self, GizmoHandle::Arrow(_) | GizmoHandle::Slider(_))
    }

    /// Stable numeric id for shaders: kind * 3 + axis
    pub fn to_index(&self) -> i32 {
        let kind = match self {
            GizmoHandle::Arrow(_) => 0,
            GizmoHandle::Slider(_) => 1,
            GizmoHandle::Rotator(_) => 2,
            GizmoHandle::Sphere(_) => 3,
        };
        kind * 3 + self.axis().index() as i32
    }

    /// Ray parameter of a hit on this handle's pick shape
    pub fn hit(&self, ray: &Ray, frame: &GizmoFrame) -> Option<f32> {
        let unit = frame.unit;
        let origin = frame.origin;
        match *self {
            GizmoHandle::Arrow(axis) => {
                let end = origin + frame.direction(axis) * constants::ARROW_LENGTH * unit;
                ray_cylinder_intersection(ray, origin, end, constants::ARROW_PICK_RADIUS * unit)
            }
            GizmoHandle::Sphere(axis) => {
                let center = origin + frame.direction(axis) * constants::SPHERE_DISTANCE * unit;
                ray_sphere_intersection(ray, center, constants::SPHERE_RADIUS * unit)
            }
            GizmoHandle::Slider(axis) => {
                let (dir1, dir2) = frame.plane_directions(axis);
                let corner = origin + (dir1 + dir2) * constants::SLIDER_OFFSET * unit;
                let size = constants::SLIDER_SIZE * unit;
                ray_quad_intersection(ray, corner, dir1 * size, dir2 * size)
            }
            GizmoHandle::Rotator(axis) => {
                let (dir1, dir2) = frame.plane_directions(axis);
                let t = ray_ring_intersection(
                    ray,
                    origin,
                    frame.direction(axis),
                    constants::RING_RADIUS * unit,
                    constants::RING_PICK_THICKNESS * unit,
                )?;
                // Only the quarter arc between the two plane axes is drawn
                let offset = ray.at(t) - origin;
                (offset.dot(dir1) >= 0.0 && offset.dot(dir2) >= 0.0).then_some(t)
            }
        }
    }
}

/// The two in-plane axes for a slider or ring normal to `axis`, ordered so
/// that `first × second` points along `axis`.
pub fn plane_axes(axis: Axis) -> (Axis, Axis) {
    match axis {
        Axis::X => (Axis::Y, Axis::Z),
        Axis::Y => (Axis::Z, Axis::X),
        Axis::Z => (Axis::X, Axis::Y),
    }
}

/// World placement of the gizmo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoFrame {
    /// Gizmo centre in world space
    pub origin: Vec3,
    /// Handle orientation
    pub rotation: Quat,
    /// World length of one gizmo unit
    pub unit: f32,
}

impl GizmoFrame {
    /// World direction of an axis handle
    pub fn direction(&self, axis: Axis) -> Vec3 {
        self.rotation * axis.unit()
    }

    /// World directions spanning the plane normal to `axis`
    pub fn plane_directions(&self, axis: Axis) -> (Vec3, Vec3) {
        let (first, second) = plane_axes(axis);
        (self.direction(first), self.direction(second))
    }
}

/// Handles shown for an object in `mode`, honouring the disable flags and
/// active axes of `config`.
pub fn visible_handles(mode: TransformMode, config: &GizmoConfig) -> Vec<GizmoHandle> {
    let active = |axis: Axis| config.active_axes[axis.index()];
    let plane_active = |axis: Axis| {
        let (a, b) = plane_axes(axis);
        active(a) && active(b)
    };

    let mut handles = Vec::new();
    for axis in Axis::ALL {
        match mode {
            TransformMode::Translate => {
                if !config.disable_axes && active(axis) {
                    handles.push(GizmoHandle::Arrow(axis));
                }
                if !config.disable_sliders && plane_active(axis) {
                    handles.push(GizmoHandle::Slider(axis));
                }
            }
            TransformMode::Rotate => {
                if !config.disable_rotations && plane_active(axis) {
                    handles.push(GizmoHandle::Rotator(axis));
                }
            }
            TransformMode::Scale => {
                if !config.disable_scaling && active(axis) {
                    handles.push(GizmoHandle::Sphere(axis));
                }
            }
        }
    }
    handles
}
