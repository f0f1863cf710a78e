//! Build plate viewport
//!
//! Interaction layer of the viewer: orbit camera, pointer rays, the pivot
//! transform gizmo, the drag-on-plate gesture and the scene description
//! handed to a renderer backend.
//!
//! # Module Structure
//!
//! ```text
//! bp-viewport/
//! ├── camera.rs    # Orbit camera, viewport, orbit controls and their lease
//! ├── ray.rs       # Ray and plane primitives
//! ├── gizmo/       # Pivot gizmo: handles, picking, sizing, drag sessions
//! ├── drag.rs      # Drag-on-plate gesture
//! ├── viewport.rs  # Pointer routing, hover and selection
//! ├── renderer.rs  # Scene description and renderer trait
//! ├── config.rs    # Gizmo and drag configuration
//! └── constants.rs # Handle dimensions and camera defaults
//! ```

pub mod camera;
pub mod config;
pub mod constants;
pub mod drag;
pub mod gizmo;
pub mod ray;
pub mod renderer;
pub mod viewport;

pub use camera::{Camera, ControlsLease, OrbitControls, Viewport};
pub use config::{DragConfig, GizmoConfig};
pub use drag::{DragController, DragOutcome};
pub use gizmo::{GizmoCommit, GizmoDragUpdate, GizmoHandle, PivotGizmo};
pub use ray::{Plane, Ray};
pub use renderer::{SceneDescription, SceneRenderer, describe_scene};
pub use viewport::{SharedViewportState, ViewportState};
