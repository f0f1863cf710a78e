//! GPU-facing gizmo data

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use super::handle::GizmoHandle;
use crate::config::GizmoConfig;

/// Gizmo style uniform data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GizmoStyleUniform {
    /// X, Y, Z handle colors
    pub axis_colors: [[f32; 4]; 3],
    /// Hovered or dragged handle color
    pub hovered_color: [f32; 4],
}

impl From<&GizmoConfig> for GizmoStyleUniform {
    fn from(config: &GizmoConfig) -> Self {
        Self {
            axis_colors: config.axis_colors,
            hovered_color: config.hovered_color,
        }
    }
}

/// Gizmo instance data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GizmoInstance {
    /// Origin, orientation and world size of one gizmo unit
    pub transform: [[f32; 4]; 4],
    /// [`GizmoHandle::to_index`] of the highlighted handle, -1 for none
    pub highlighted_handle: f32,
    /// 0 = translate, 1 = rotate, 2 = scale
    pub mode: f32,
    /// Handle opacity
    pub opacity: f32,
    /// Line width in pixels
    pub line_width: f32,
}

impl Default for GizmoInstance {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY.to_cols_array_2d(),
            highlighted_handle: -1.0,
            mode: 0.0,
            opacity: 1.0,
            line_width: 1.0,
        }
    }
}

impl GizmoInstance {
    /// Encode the highlighted handle
    pub fn with_highlight(mut self, handle: Option<GizmoHandle>) -> Self {
        self.highlighted_handle = handle.map_or(-1.0, |h| h.to_index() as f32);
        self
    }
}
