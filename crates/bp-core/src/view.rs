//! External axis convention
//!
//! Internally the scene is Y-up. Callers outside the viewer work with
//! (X, depth, up), so positions map as `(x, -z, y)` and rotation, scale and
//! size map as `(x, z, y)`.

use std::sync::Arc;

use glam::Vec3;
use serde::Serialize;
use uuid::Uuid;

use crate::geometry::MeshFormat;
use crate::object::{Axis, PlacedObject, TransformMode};

/// Internal position to external (X, depth, up)
pub fn position_to_external(position: Vec3) -> Vec3 {
    Vec3::new(position.x, -position.z, position.y)
}

/// External (X, depth, up) position to internal
pub fn position_from_external(position: Vec3) -> Vec3 {
    Vec3::new(position.x, position.z, -position.y)
}

/// Swap the Y and Z components (rotation, scale, size)
pub fn swap_yz(value: Vec3) -> Vec3 {
    Vec3::new(value.x, value.z, value.y)
}

/// Internal axis and sign for an external position axis
pub fn position_axis_from_external(axis: Axis) -> (Axis, f32) {
    match axis {
        Axis::X => (Axis::X, 1.0),
        Axis::Y => (Axis::Z, -1.0),
        Axis::Z => (Axis::Y, 1.0),
    }
}

/// Internal axis for an external rotation or scale axis
pub fn component_axis_from_external(axis: Axis) -> Axis {
    match axis {
        Axis::X => Axis::X,
        Axis::Y => Axis::Z,
        Axis::Z => Axis::Y,
    }
}

/// A placed object as seen from outside the viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectView {
    pub id: Uuid,
    pub name: String,
    pub format: MeshFormat,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub size: Vec3,
    pub transform_mode: TransformMode,
}

impl From<&PlacedObject> for ObjectView {
    fn from(object: &PlacedObject) -> Self {
        Self {
            id: object.id,
            name: object.name.clone(),
            format: object.format,
            position: position_to_external(object.position),
            rotation: swap_yz(object.rotation),
            scale: swap_yz(object.scale),
            size: swap_yz(object.size),
            transform_mode: object.transform_mode,
        }
    }
}

impl From<&Arc<PlacedObject>> for ObjectView {
    fn from(object: &Arc<PlacedObject>) -> Self {
        Self::from(object.as_ref())
    }
}
