//! Tool configuration file

use std::path::Path;

use bp_core::ViewerConfig;
use bp_core::config::{ConfigError, load_ron, save_ron};
use bp_viewport::{DragConfig, GizmoConfig};
use serde::{Deserialize, Serialize};

/// Everything a `--config` file can set
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Plate, history and limits
    pub viewer: ViewerConfig,
    /// Gizmo appearance and behaviour
    pub gizmo: GizmoConfig,
    /// Object drag gesture
    pub drag: DragConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_ron(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        save_ron(self, path)
    }
}
