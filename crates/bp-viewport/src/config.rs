//! Interaction configuration structures
//!
//! Serializable settings for the gizmo and the object drag gesture. They are
//! persisted with the same RON helpers as the viewer configuration.

use serde::{Deserialize, Serialize};

use crate::constants::gizmo as constants;

/// Transform gizmo configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GizmoConfig {
    /// Handle size: pixels when `fixed`, world units otherwise
    pub scale: f32,
    /// Keep a constant on-screen size regardless of camera distance
    pub fixed: bool,
    /// Bounding box anchor, each component in -1..=1 (0 = centre)
    pub anchor: [f32; 3],
    /// Line width in pixels
    pub line_width: f32,
    /// Handle opacity
    pub opacity: f32,
    /// Draw on top of scene geometry
    pub depth_test: bool,
    /// Per-axis handle colors (RGBA)
    pub axis_colors: [[f32; 4]; 3],
    /// Color of the hovered or dragged handle (RGBA)
    pub hovered_color: [f32; 4],
    /// Hide translation arrows
    pub disable_axes: bool,
    /// Hide plane sliders
    pub disable_sliders: bool,
    /// Hide rotation rings
    pub disable_rotations: bool,
    /// Hide scaling spheres
    pub disable_scaling: bool,
    /// Switch individual axes off
    pub active_axes: [bool; 3],
    /// Scaling spheres scale all axes together
    pub uniform_scaling: bool,
    /// Ring drags snap to this many degrees
    pub rotation_snap_degrees: Option<f32>,
    /// Handles follow the object's rotation
    pub local_space: bool,
    /// Apply drag deltas to the previewed matrix directly
    pub auto_transform: bool,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            scale: 125.0,
            fixed: true,
            anchor: [0.0, 0.0, 0.0],
            line_width: 5.0,
            opacity: 0.8,
            depth_test: false,
            axis_colors: constants::AXIS_COLORS,
            hovered_color: constants::HOVERED_COLOR,
            disable_axes: false,
            disable_sliders: true,
            disable_rotations: false,
            disable_scaling: false,
            active_axes: [true, true, true],
            uniform_scaling: false,
            rotation_snap_degrees: None,
            local_space: true,
            auto_transform: true,
        }
    }
}

/// Object drag gesture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DragConfig {
    /// Pointer travel in pixels before a press becomes a drag
    pub threshold_px: f32,
    /// Allow dragging objects that are not selected
    pub drag_unselected: bool,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            threshold_px: 3.0,
            drag_unselected: true,
        }
    }
}
