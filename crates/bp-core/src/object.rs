//! Placed objects and their transforms

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bounds::BoundingBox;
use crate::geometry::{Geometry, MeshFormat};

/// Which gizmo handle set is active for an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// A coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in component order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (0, 1, 2)
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis
    pub fn unit(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(format!("unknown axis '{other}'")),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// Euler rotation `(x, y, z)` in radians to a quaternion.
///
/// Angles compose in the fixed intrinsic order Y, X, Z: the matrix is
/// `Ry(y) * Rx(x) * Rz(z)`.
pub fn euler_to_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z)
}

/// Inverse of [`euler_to_quat`]
pub fn quat_to_euler(rotation: Quat) -> Vec3 {
    let (y, x, z) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(x, y, z)
}

/// Compose position/rotation/scale into a local matrix
pub fn compose_matrix(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, euler_to_quat(rotation), position)
}

/// Decompose a local matrix into position, Euler rotation and scale
pub fn decompose_matrix(matrix: &Mat4) -> (Vec3, Vec3, Vec3) {
    let (scale, rotation, position) = matrix.to_scale_rotation_translation();
    (position, quat_to_euler(rotation), scale)
}

/// Bounds of `geometry` under `rotation`/`scale`, relative to the object's
/// position
pub fn oriented_bounds(geometry: &Geometry, rotation: Vec3, scale: Vec3) -> BoundingBox {
    geometry.transformed_bounds(&compose_matrix(Vec3::ZERO, rotation, scale))
}

/// An object placed on the build plate
#[derive(Debug, Clone)]
pub struct PlacedObject {
    pub id: Uuid,
    /// Display name (usually the file stem)
    pub name: String,
    /// Source file format
    pub format: MeshFormat,
    /// Shared, immutable geometry
    pub geometry: Arc<Geometry>,
    /// World position
    pub position: Vec3,
    /// Euler angles in radians, see [`euler_to_quat`]
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Axis-aligned extents after rotation and scale
    pub size: Vec3,
    pub transform_mode: TransformMode,
    /// Bounds after rotation and scale, relative to `position`
    extent: BoundingBox,
}

impl PartialEq for PlacedObject {
    /// Field-wise comparison; geometry compares by identity.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.format == other.format
            && Arc::ptr_eq(&self.geometry, &other.geometry)
            && self.position == other.position
            && self.rotation == other.rotation
            && self.scale == other.scale
            && self.size == other.size
            && self.transform_mode == other.transform_mode
    }
}

impl PlacedObject {
    /// Create an object at identity transform, resting on the plate.
    pub fn new(name: impl Into<String>, format: MeshFormat, geometry: Arc<Geometry>) -> Self {
        NewObject::new(name, format, geometry).build()
    }

    /// Local (and world, objects are not parented) transform matrix
    pub fn matrix(&self) -> Mat4 {
        compose_matrix(self.position, self.rotation, self.scale)
    }

    /// Rotation as a quaternion
    pub fn quat(&self) -> Quat {
        euler_to_quat(self.rotation)
    }

    /// World-space bounds of the transformed geometry.
    ///
    /// Uses the extent computed by the last rotation or scale change, so
    /// this is cheap enough for per-event picking.
    pub fn world_bounds(&self) -> BoundingBox {
        self.extent.translate(self.position)
    }

    /// Recompute `size` from the current rotation and scale and drop the
    /// object onto the plate.
    pub(crate) fn refit(&mut self) {
        self.resize();
        if self.extent.is_valid() {
            self.position.y = -self.extent.min.y;
        }
    }

    /// Recompute `size` only, keeping the explicit position.
    pub(crate) fn resize(&mut self) {
        self.extent = oriented_bounds(&self.geometry, self.rotation, self.scale);
        self.size = if self.extent.is_valid() {
            self.extent.size()
        } else {
            Vec3::ZERO
        };
    }
}

/// Parameters for adding an object to the store
#[derive(Debug, Clone)]
pub struct NewObject {
    pub name: String,
    pub format: MeshFormat,
    pub geometry: Arc<Geometry>,
    /// Explicit position; `None` rests the object on the plate at the origin
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
}

impl NewObject {
    /// Describe an object with default placement
    pub fn new(name: impl Into<String>, format: MeshFormat, geometry: Arc<Geometry>) -> Self {
        Self {
            name: name.into(),
            format,
            geometry,
            position: None,
            rotation: None,
            scale: None,
        }
    }

    /// Override the position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    /// Override the rotation
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Override the scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Build the object with a fresh id.
    pub(crate) fn build(self) -> PlacedObject {
        let rotation = self.rotation.unwrap_or(Vec3::ZERO);
        let scale = self.scale.unwrap_or(Vec3::ONE);
        let explicit_position = self.position;
        let position = explicit_position.unwrap_or(Vec3::ZERO);

        let mut object = PlacedObject {
            id: Uuid::new_v4(),
            name: self.name,
            format: self.format,
            geometry: self.geometry,
            position,
            rotation,
            scale,
            size: Vec3::ZERO,
            transform_mode: TransformMode::default(),
            extent: BoundingBox::empty(),
        };

        if explicit_position.is_some() {
            object.resize();
        } else {
            object.refit();
        }
        object
    }
}
