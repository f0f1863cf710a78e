//! Viewer configuration
//!
//! Configuration structs are plain serde types persisted as RON. The generic
//! [`to_ron_bytes`] / [`from_ron_bytes`] helpers are shared with the other
//! crates of the workspace so every config file reads the same way.

use std::path::Path;

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BUILD_PLATE_SIZE, DEFAULT_HISTORY_LIMIT};
use crate::object::Axis;

/// Error type for configuration files
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Serialize any config value to pretty RON bytes
pub fn to_ron_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, ConfigError> {
    let content = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .map_err(|e| ConfigError::Serialize(e.to_string()))?;
    Ok(content.into_bytes())
}

/// Deserialize any config value from RON bytes
pub fn from_ron_bytes<T: DeserializeOwned>(data: &[u8]) -> Result<T, ConfigError> {
    let content =
        std::str::from_utf8(data).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
    ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
}

/// Write a config value to a RON file
pub fn save_ron<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let content = to_ron_bytes(value)?;
    std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))
}

/// Read a config value from a RON file
pub fn load_ron<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let data = std::fs::read(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
    from_ron_bytes(&data)
}

/// Optional inclusive `(min, max)` range per axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisLimits {
    pub x: Option<(f32, f32)>,
    pub y: Option<(f32, f32)>,
    pub z: Option<(f32, f32)>,
}

impl AxisLimits {
    /// No limit on any axis
    pub const UNBOUNDED: Self = Self {
        x: None,
        y: None,
        z: None,
    };

    /// Same range on all three axes
    pub fn uniform(min: f32, max: f32) -> Self {
        Self {
            x: Some((min, max)),
            y: Some((min, max)),
            z: Some((min, max)),
        }
    }

    /// Range for one axis
    pub fn get(&self, axis: Axis) -> Option<(f32, f32)> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Clamp a single component
    pub fn clamp_axis(&self, axis: Axis, value: f32) -> f32 {
        match self.get(axis) {
            Some((min, max)) if min <= max => value.clamp(min, max),
            _ => value,
        }
    }

    /// Clamp every component
    pub fn clamp(&self, value: Vec3) -> Vec3 {
        Vec3::new(
            self.clamp_axis(Axis::X, value.x),
            self.clamp_axis(Axis::Y, value.y),
            self.clamp_axis(Axis::Z, value.z),
        )
    }

    pub fn is_unbounded(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }
}

/// Permitted ranges for object transforms, in internal (Y-up) axes.
///
/// Applied by the store to every mutation, and by the gizmo to its live
/// preview, so a value outside the range is never committed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformLimits {
    pub translation: AxisLimits,
    /// Radians
    pub rotation: AxisLimits,
    pub scale: AxisLimits,
}

impl TransformLimits {
    pub fn clamp_position(&self, position: Vec3) -> Vec3 {
        self.translation.clamp(position)
    }

    pub fn clamp_rotation(&self, rotation: Vec3) -> Vec3 {
        self.rotation.clamp(rotation)
    }

    pub fn clamp_scale(&self, scale: Vec3) -> Vec3 {
        self.scale.clamp(scale)
    }
}

/// Top-level viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Width, depth and maximum height of the build volume
    pub build_plate_size: [f32; 3],
    /// Maximum undo snapshots kept (0 = unlimited)
    pub history_limit: usize,
    /// Merge multi-mesh files into one object
    pub combine_meshes: bool,
    pub limits: TransformLimits,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            build_plate_size: DEFAULT_BUILD_PLATE_SIZE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            combine_meshes: true,
            limits: TransformLimits::default(),
        }
    }
}

impl ViewerConfig {
    /// Plate size as a vector
    pub fn plate_size(&self) -> Vec3 {
        Vec3::from(self.build_plate_size)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        save_ron(self, path)
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_ron(path)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        to_ron_bytes(self)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ConfigError> {
        from_ron_bytes(data)
    }
}
