//! Per-gesture handle drag state
//!
//! A [`HandleSession`] is created when a handle is grabbed and dropped when
//! the gesture ends. It captures the gizmo frame and the pre-drag matrices,
//! then turns each pointer ray into a world-space delta matrix.

use std::f32::consts::{PI, TAU};

use bp_core::Axis;
use glam::{Mat4, Quat, Vec3};
use uuid::Uuid;

use super::handle::{GizmoFrame, GizmoHandle};
use crate::constants::gizmo as constants;
use crate::ray::{Plane, Ray};

/// Drag state for one grabbed handle
#[derive(Debug, Clone)]
pub struct HandleSession {
    /// Handle being dragged
    pub handle: GizmoHandle,
    /// Object under control
    pub object_id: Uuid,
    /// Gizmo placement when the drag began
    pub frame: GizmoFrame,
    /// Pre-drag local matrix of the object
    pub local_start: Mat4,
    /// Pre-drag world matrix of the object
    pub world_start: Mat4,
    /// Object world rotation when the drag began
    object_rotation: Quat,
    /// Point where the pointer grabbed the handle
    click_point: Vec3,
    /// Ring angle of the previous frame
    last_angle: f32,
    /// Total ring rotation since the drag began
    accumulated_angle: f32,
}

impl HandleSession {
    /// Begin a drag on `handle`. Returns `None` if the pointer ray cannot
    /// grab the handle (ray parallel to its drag line or plane).
    pub fn start(
        handle: GizmoHandle,
        object_id: Uuid,
        frame: GizmoFrame,
        ray: &Ray,
        local_start: Mat4,
        world_start: Mat4,
    ) -> Option<Self> {
        let (_, object_rotation, _) = world_start.to_scale_rotation_translation();
        let mut session = Self {
            handle,
            object_id,
            frame,
            local_start,
            world_start,
            object_rotation,
            click_point: frame.origin,
            last_angle: 0.0,
            accumulated_angle: 0.0,
        };

        match handle {
            GizmoHandle::Arrow(axis) | GizmoHandle::Sphere(axis) => {
                let dir = frame.direction(axis);
                let s = ray.closest_param_on_line(frame.origin, dir)?;
                session.click_point = frame.origin + dir * s;
            }
            GizmoHandle::Slider(axis) => {
                let plane = Plane::from_point_normal(frame.origin, frame.direction(axis));
                session.click_point = ray.intersect_plane(&plane)?;
            }
            GizmoHandle::Rotator(axis) => {
                let hit = session.ring_point(ray, axis)?;
                session.click_point = hit;
                session.last_angle = session.ring_angle(hit, axis);
            }
        }
        Some(session)
    }

    /// World-space delta matrix for the current pointer ray.
    ///
    /// Returns `None` for a degenerate frame (ray parallel to the drag line
    /// or plane); the caller keeps the previous result.
    pub fn delta_world(
        &mut self,
        ray: &Ray,
        snap_degrees: Option<f32>,
        uniform_scaling: bool,
    ) -> Option<Mat4> {
        let origin = self.frame.origin;
        match self.handle {
            GizmoHandle::Arrow(axis) => {
                let dir = self.frame.direction(axis);
                let offset = ray.closest_param_on_line(self.click_point, dir)?;
                Some(Mat4::from_translation(dir * offset))
            }
            GizmoHandle::Slider(axis) => {
                let plane = Plane::from_point_normal(self.click_point, self.frame.direction(axis));
                let delta = ray.intersect_plane(&plane)? - self.click_point;
                let (dir1, dir2) = self.frame.plane_directions(axis);
                let offset = dir1 * delta.dot(dir1) + dir2 * delta.dot(dir2);
                Some(Mat4::from_translation(offset))
            }
            GizmoHandle::Rotator(axis) => {
                let hit = self.ring_point(ray, axis)?;
                let angle = self.ring_angle(hit, axis);
                self.accumulated_angle += wrap_angle(angle - self.last_angle);
                self.last_angle = angle;

                let applied = match snap_degrees {
                    Some(step) if step > 0.0 => {
                        let step = step.to_radians();
                        (self.accumulated_angle / step).round() * step
                    }
                    _ => self.accumulated_angle,
                };
                let rotation = Quat::from_axis_angle(self.frame.direction(axis), applied);
                Some(about_point(origin, Mat4::from_quat(rotation)))
            }
            GizmoHandle::Sphere(axis) => {
                let dir = self.frame.direction(axis);
                let offset = ray.closest_param_on_line(self.click_point, dir)?;
                let units = offset / self.frame.unit.max(f32::EPSILON);
                let factor = 2.0_f32
                    .powf(units / constants::SCALE_DOUBLING_DISTANCE)
                    .max(constants::MIN_SCALE_FACTOR);

                let scale = if uniform_scaling {
                    Vec3::splat(factor)
                } else {
                    let mut scale = Vec3::ONE;
                    scale[axis.index()] = factor;
                    scale
                };
                // Scale along the object's own axes
                let q = self.object_rotation;
                let scaling =
                    Mat4::from_quat(q) * Mat4::from_scale(scale) * Mat4::from_quat(q.inverse());
                Some(about_point(origin, scaling))
            }
        }
    }

    /// Intersection of the ray with the ring plane, away from the centre
    fn ring_point(&self, ray: &Ray, axis: Axis) -> Option<Vec3> {
        let plane = Plane::from_point_normal(self.frame.origin, self.frame.direction(axis));
        let hit = ray.intersect_plane(&plane)?;
        ((hit - self.frame.origin).length_squared() > f32::EPSILON).then_some(hit)
    }

    /// Angle of `point` around the ring, measured from the first plane axis
    fn ring_angle(&self, point: Vec3, axis: Axis) -> f32 {
        let (dir1, dir2) = self.frame.plane_directions(axis);
        let v = point - self.frame.origin;
        v.dot(dir2).atan2(v.dot(dir1))
    }
}

/// Apply `transform` around `pivot` instead of the world origin
fn about_point(pivot: Vec3, transform: Mat4) -> Mat4 {
    Mat4::from_translation(pivot) * transform * Mat4::from_translation(-pivot)
}

/// Wrap an angle difference into `(-PI, PI]`
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn frame() -> GizmoFrame {
        GizmoFrame {
            origin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            unit: 10.0,
        }
    }

    fn down(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 100.0, z), Vec3::NEG_Y)
    }

    fn start(handle: GizmoHandle, ray: &Ray) -> HandleSession {
        let id = Uuid::new_v4();
        HandleSession::start(handle, id, frame(), ray, Mat4::IDENTITY, Mat4::IDENTITY).unwrap()
    }

    #[test]
    fn test_arrow_translates_along_axis() {
        let mut session = start(GizmoHandle::Arrow(Axis::X), &down(5.0, 0.0));
        let delta = session.delta_world(&down(12.0, 3.0), None, false).unwrap();
        let moved = delta.transform_point3(Vec3::ZERO);
        assert!(moved.abs_diff_eq(Vec3::new(7.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn test_slider_translates_in_plane() {
        let mut session = start(GizmoHandle::Slider(Axis::Y), &down(4.0, 4.0));
        let delta = session.delta_world(&down(6.0, 1.0), None, false).unwrap();
        let moved = delta.transform_point3(Vec3::ZERO);
        assert!(moved.abs_diff_eq(Vec3::new(2.0, 0.0, -3.0), 1e-4));
    }

    #[test]
    fn test_rotator_accumulates_angle() {
        // Ring about Y: angle measured from +Z toward +X
        let mut session = start(GizmoHandle::Rotator(Axis::Y), &down(0.0, 6.0));
        let delta = session.delta_world(&down(6.0, 0.0), None, false).unwrap();
        let rotated = delta.transform_vector3(Vec3::Z);
        assert!(rotated.abs_diff_eq(Vec3::X, 1e-4));

        // Keep going past 180 degrees without a jump
        session.delta_world(&down(0.0, -6.0), None, false).unwrap();
        let delta = session.delta_world(&down(-6.0, 0.0), None, false).unwrap();
        assert_relative_eq!(session.accumulated_angle, 3.0 * FRAC_PI_2, epsilon = 1e-4);
        assert!(delta.transform_vector3(Vec3::Z).abs_diff_eq(Vec3::NEG_X, 1e-4));
    }

    #[test]
    fn test_rotator_snaps() {
        let mut session = start(GizmoHandle::Rotator(Axis::Y), &down(0.0, 6.0));
        let angle = 20.0_f32.to_radians();
        let ray = down(6.0 * angle.sin(), 6.0 * angle.cos());
        let delta = session.delta_world(&ray, Some(15.0), false).unwrap();
        let (_, rotation, _) = delta.to_scale_rotation_translation();
        let angle = rotation.angle_between(Quat::IDENTITY);
        assert_relative_eq!(angle, 15.0_f32.to_radians(), epsilon = 1e-4);
    }

    #[test]
    fn test_sphere_scales_along_axis() {
        let mut session = start(GizmoHandle::Sphere(Axis::X), &down(12.0, 0.0));
        // One gizmo unit outward doubles the scale
        let delta = session.delta_world(&down(22.0, 0.0), None, false).unwrap();
        let (scale, _, _) = delta.to_scale_rotation_translation();
        assert!(scale.abs_diff_eq(Vec3::new(2.0, 1.0, 1.0), 1e-4));

        let delta = session.delta_world(&down(2.0, 0.0), None, true).unwrap();
        let (scale, _, _) = delta.to_scale_rotation_translation();
        assert!(scale.abs_diff_eq(Vec3::splat(0.5), 1e-4));
    }

    #[test]
    fn test_parallel_ray_is_skipped() {
        let mut session = start(GizmoHandle::Slider(Axis::Y), &down(4.0, 4.0));
        let parallel = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        assert!(session.delta_world(&parallel, None, false).is_none());
    }

    #[test]
    fn test_wrap_angle() {
        assert_relative_eq!(wrap_angle(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-5);
        assert_relative_eq!(wrap_angle(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-5);
        assert_relative_eq!(wrap_angle(0.25), 0.25);
    }
}
