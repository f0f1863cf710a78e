//! Pivot transform gizmo
//!
//! The gizmo attaches to one placed object and offers translation arrows,
//! plane sliders, rotation rings and scaling spheres depending on the
//! object's transform mode. Dragging a handle produces a world delta matrix
//! `dW`; the new world matrix is `dW * W0` and the new local matrix is
//! `P⁻¹ * W` for parent matrix `P`. The result is clamped to the store's
//! transform limits before it is previewed or reported.
//!
//! With `fixed` sizing the handle scale is recomputed from the camera every
//! frame so the gizmo keeps a constant size on screen.

mod collision;
mod handle;
mod instance;
mod session;
mod sizing;

pub use collision::{
    ray_cylinder_intersection, ray_quad_intersection, ray_ring_intersection,
    ray_sphere_intersection,
};
pub use handle::{GizmoFrame, GizmoHandle, plane_axes, visible_handles};
pub use instance::{GizmoInstance, GizmoStyleUniform};
pub use session::HandleSession;
pub use sizing::calculate_scale_factor;

use std::sync::Arc;

use bp_core::object::{compose_matrix, decompose_matrix};
use bp_core::{BoundingBox, Geometry, PlacedObject, TransformLimits, TransformMode};
use glam::{Mat4, Quat, Vec3};
use uuid::Uuid;

use crate::camera::{Camera, Viewport};
use crate::config::GizmoConfig;
use crate::ray::Ray;

/// Object currently controlled by the gizmo
#[derive(Debug, Clone)]
struct GizmoTarget {
    id: Uuid,
    geometry: Arc<Geometry>,
    local: Mat4,
    parent: Mat4,
    /// World bounds at `local`
    bounds: BoundingBox,
    mode: TransformMode,
}

/// Matrices reported on every drag frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoDragUpdate {
    /// Object under control
    pub object_id: Uuid,
    /// New local matrix
    pub local: Mat4,
    /// `local * local_start⁻¹`
    pub delta_local: Mat4,
    /// New world matrix
    pub world: Mat4,
    /// `world * world_start⁻¹`
    pub delta_world: Mat4,
}

/// Final transform of a finished drag, ready for the store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoCommit {
    /// Object under control
    pub object_id: Uuid,
    /// Decomposed position
    pub position: Vec3,
    /// Decomposed Euler rotation (radians)
    pub rotation: Vec3,
    /// Decomposed scale
    pub scale: Vec3,
    /// The drag used a translation handle; rotation and scale are the
    /// stored values up to decomposition error
    pub translate_only: bool,
}

/// Transform gizmo attached to at most one object
#[derive(Debug, Clone)]
pub struct PivotGizmo {
    config: GizmoConfig,
    target: Option<GizmoTarget>,
    /// World length of one gizmo unit
    unit: f32,
    hovered: Option<GizmoHandle>,
    session: Option<HandleSession>,
    /// Local matrix and world bounds shown while dragging with
    /// `auto_transform`
    preview: Option<(Mat4, BoundingBox)>,
    last_local: Option<Mat4>,
}

impl Default for PivotGizmo {
    fn default() -> Self {
        Self::new(GizmoConfig::default())
    }
}

impl PivotGizmo {
    /// Create a detached gizmo
    pub fn new(config: GizmoConfig) -> Self {
        let unit = if config.fixed { 1.0 } else { config.scale };
        Self {
            config,
            target: None,
            unit,
            hovered: None,
            session: None,
            preview: None,
            last_local: None,
        }
    }

    /// Current configuration
    pub fn config(&self) -> &GizmoConfig {
        &self.config
    }

    /// Replace the configuration; cancels an active drag
    pub fn set_config(&mut self, config: GizmoConfig) {
        self.cancel();
        if !config.fixed {
            self.unit = config.scale;
        }
        self.config = config;
    }

    /// Attach to (or refresh) the controlled object. Attaching a different
    /// object cancels an active drag.
    pub fn attach(&mut self, object: &PlacedObject) {
        self.attach_with_parent(object, Mat4::IDENTITY);
    }

    /// Attach to an object nested under `parent`
    pub fn attach_with_parent(&mut self, object: &PlacedObject, parent: Mat4) {
        if self.target_id() != Some(object.id) {
            self.cancel();
            self.hovered = None;
        }
        let local = object.matrix();
        let bounds = if parent == Mat4::IDENTITY {
            object.world_bounds()
        } else {
            object.geometry.transformed_bounds(&(parent * local))
        };
        self.target = Some(GizmoTarget {
            id: object.id,
            geometry: Arc::clone(&object.geometry),
            local,
            parent,
            bounds,
            mode: object.transform_mode,
        });
    }

    /// Hide the gizmo; cancels an active drag
    pub fn detach(&mut self) {
        self.cancel();
        self.target = None;
        self.hovered = None;
    }

    /// Id of the controlled object
    pub fn target_id(&self) -> Option<Uuid> {
        self.target.as_ref().map(|t| t.id)
    }

    /// Whether the gizmo is attached
    pub fn is_visible(&self) -> bool {
        self.target.is_some()
    }

    /// Local matrix to draw the object with: the drag preview if any
    pub fn display_matrix(&self) -> Option<Mat4> {
        let target = self.target.as_ref()?;
        Some(self.preview.map_or(target.local, |(local, _)| local))
    }

    fn world_matrix(&self) -> Option<Mat4> {
        let target = self.target.as_ref()?;
        Some(target.parent * self.display_matrix()?)
    }

    /// World position of the gizmo: the anchor point of the object's world
    /// bounding box.
    pub fn anchor_position(&self) -> Option<Vec3> {
        let target = self.target.as_ref()?;
        let bounds = self.preview.map_or(target.bounds, |(_, bounds)| bounds);
        if !bounds.is_valid() {
            return Some(self.world_matrix()?.w_axis.truncate());
        }
        Some(bounds.anchor_point(Vec3::from(self.config.anchor)))
    }

    /// Recompute the screen-constant size. Call whenever the camera or the
    /// gizmo position changes.
    pub fn update_scale(&mut self, camera: &Camera, viewport: &Viewport) {
        if !self.config.fixed {
            self.unit = self.config.scale;
            return;
        }
        if let Some(origin) = self.anchor_position() {
            let unit = calculate_scale_factor(origin, self.config.scale, camera, viewport);
            if unit.is_finite() && unit > 0.0 {
                self.unit = unit;
            }
        }
    }

    /// World length of one gizmo unit
    pub fn unit(&self) -> f32 {
        self.unit
    }

    /// Current placement of the handles
    pub fn frame(&self) -> Option<GizmoFrame> {
        let target = self.target.as_ref()?;
        let rotation = if self.config.local_space || target.mode == TransformMode::Scale {
            let (_, rotation, _) = self.world_matrix()?.to_scale_rotation_translation();
            rotation
        } else {
            Quat::IDENTITY
        };
        Some(GizmoFrame {
            origin: self.anchor_position()?,
            rotation,
            unit: self.unit,
        })
    }

    /// Handles shown for the controlled object
    pub fn handles(&self) -> Vec<GizmoHandle> {
        match &self.target {
            Some(target) => visible_handles(target.mode, &self.config),
            None => Vec::new(),
        }
    }

    /// Nearest handle under the pointer ray
    pub fn hit_test(&self, ray: &Ray) -> Option<GizmoHandle> {
        let frame = self.frame()?;
        self.handles()
            .into_iter()
            .filter_map(|handle| handle.hit(ray, &frame).map(|t| (handle, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }

    /// Highlight a handle under the pointer
    pub fn set_hovered(&mut self, handle: Option<GizmoHandle>) {
        self.hovered = handle;
    }

    /// Hovered handle, or the dragged one during a drag
    pub fn highlighted(&self) -> Option<GizmoHandle> {
        self.session.as_ref().map(|s| s.handle).or(self.hovered)
    }

    /// Whether a handle drag is active
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Grab `handle` with the pointer ray. Captures the pre-drag local and
    /// world matrices.
    pub fn drag_start(&mut self, handle: GizmoHandle, ray: &Ray) -> bool {
        let (Some(frame), Some(world)) = (self.frame(), self.world_matrix()) else {
            return false;
        };
        let Some(target) = self.target.as_ref() else {
            return false;
        };
        if !self.handles().contains(&handle) {
            return false;
        }

        match HandleSession::start(handle, target.id, frame, ray, target.local, world) {
            Some(session) => {
                tracing::debug!("Gizmo drag started on {:?} for {}", handle, target.id);
                self.session = Some(session);
                self.last_local = None;
                true
            }
            None => false,
        }
    }

    /// Advance the drag with a new pointer ray.
    ///
    /// Returns `None` when no drag is active or the ray is degenerate for
    /// this handle; the previous preview is kept in that case.
    pub fn drag(&mut self, ray: &Ray, limits: &TransformLimits) -> Option<GizmoDragUpdate> {
        let target = self.target.as_ref()?;
        let session = self.session.as_mut()?;

        let Some(delta) = session.delta_world(
            ray,
            self.config.rotation_snap_degrees,
            self.config.uniform_scaling,
        ) else {
            tracing::debug!("Skipped degenerate gizmo drag frame");
            return None;
        };

        let world = delta * session.world_start;
        let local = target.parent.inverse() * world;
        let (position, rotation, scale) = decompose_matrix(&local);
        let local = compose_matrix(
            limits.clamp_position(position),
            limits.clamp_rotation(rotation),
            limits.clamp_scale(scale),
        );
        let world = target.parent * local;

        let update = GizmoDragUpdate {
            object_id: target.id,
            local,
            delta_local: local * session.local_start.inverse(),
            world,
            delta_world: world * session.world_start.inverse(),
        };

        if self.config.auto_transform {
            self.preview = Some((local, target.geometry.transformed_bounds(&world)));
        }
        self.last_local = Some(local);
        Some(update)
    }

    /// Finish the drag. Returns the decomposed final transform if the object
    /// moved; the caller commits it to the store as one history entry.
    pub fn drag_end(&mut self) -> Option<GizmoCommit> {
        let session = self.session.take()?;
        self.preview = None;
        let local = self.last_local.take()?;

        let (position, rotation, scale) = decompose_matrix(&local);
        tracing::debug!("Gizmo drag ended on {:?}", session.handle);
        Some(GizmoCommit {
            object_id: session.object_id,
            position,
            rotation,
            scale,
            translate_only: session.handle.is_translation(),
        })
    }

    /// Abandon an active drag without committing
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!("Gizmo drag cancelled on {:?}", session.handle);
        }
        self.preview = None;
        self.last_local = None;
    }

    /// Instance data for the renderer
    pub fn instance(&self) -> Option<GizmoInstance> {
        let target = self.target.as_ref()?;
        let frame = self.frame()?;
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::splat(frame.unit),
            frame.rotation,
            frame.origin,
        );
        let mode = match target.mode {
            TransformMode::Translate => 0.0,
            TransformMode::Rotate => 1.0,
            TransformMode::Scale => 2.0,
        };
        Some(
            GizmoInstance {
                transform: transform.to_cols_array_2d(),
                highlighted_handle: -1.0,
                mode,
                opacity: self.config.opacity,
                line_width: self.config.line_width,
            }
            .with_highlight(self.highlighted()),
        )
    }
}
