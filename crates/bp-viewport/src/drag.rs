//! Object drag gesture
//!
//! Pressing on an object arms a drag; once the pointer travels past the
//! intentionality threshold the object follows the pointer across a
//! horizontal plane through the grab point. Orbit controls stay disabled for
//! the whole gesture. The store only sees the final position, committed as a
//! single history entry on release.

use bp_core::{PlacedObject, VisualizerStore};
use glam::{Vec2, Vec3};
use uuid::Uuid;

use crate::camera::{Camera, ControlsLease, OrbitControls};
use crate::config::DragConfig;
use crate::ray::{Plane, Ray};

/// What a finished pointer gesture did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// No gesture was active
    None,
    /// Pointer was released before the threshold
    Click(Uuid),
    /// Object was moved and committed to the store
    Moved(Uuid),
}

#[derive(Debug)]
struct DragSession {
    object_id: Uuid,
    plane: Plane,
    offset: Vec3,
    start: Vec3,
    current: Vec3,
    _controls: ControlsLease,
}

#[derive(Debug, Default)]
enum DragState {
    #[default]
    Idle,
    Pending {
        object_id: Uuid,
        press: Vec2,
        hit: Vec3,
    },
    Dragging(DragSession),
}

/// Drives the translate-on-plate gesture for one pointer
#[derive(Debug, Default)]
pub struct DragController {
    config: DragConfig,
    state: DragState,
}

impl DragController {
    /// Create an idle controller
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
        }
    }

    /// Current configuration
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Replace the configuration; cancels an active gesture
    pub fn set_config(&mut self, config: DragConfig) {
        self.cancel();
        self.config = config;
    }

    /// Press on `object` at screen position `press`, with `hit` the world
    /// point under the pointer. Returns whether a gesture was armed.
    pub fn pointer_down(
        &mut self,
        object: &PlacedObject,
        selected: Option<Uuid>,
        press: Vec2,
        hit: Vec3,
    ) -> bool {
        if !self.config.drag_unselected && selected != Some(object.id) {
            return false;
        }
        if !hit.is_finite() {
            return false;
        }
        self.cancel();
        self.state = DragState::Pending {
            object_id: object.id,
            press,
            hit,
        };
        true
    }

    /// Feed a pointer move. Returns the previewed object position while
    /// dragging.
    ///
    /// A ray parallel to the drag plane skips the frame and keeps the last
    /// preview.
    pub fn pointer_move(
        &mut self,
        screen: Vec2,
        ray: &Ray,
        camera: &Camera,
        controls: &OrbitControls,
        store: &VisualizerStore,
    ) -> Option<Vec3> {
        if let DragState::Pending {
            object_id,
            press,
            hit,
        } = self.state
        {
            if screen.distance(press) < self.config.threshold_px {
                return None;
            }
            let Some(object) = store.get(object_id) else {
                tracing::debug!("Drag target {} no longer exists", object_id);
                self.state = DragState::Idle;
                return None;
            };
            let start = object.matrix().w_axis.truncate();
            tracing::debug!("Drag started for {}", object_id);
            self.state = DragState::Dragging(DragSession {
                object_id,
                plane: Plane::from_point_normal(hit, camera.up),
                offset: hit - start,
                start,
                current: start,
                _controls: controls.lease(),
            });
        }

        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        match ray.intersect_plane(&session.plane) {
            Some(point) => {
                let mut position = point - session.offset;
                position.y = session.start.y;
                if position.is_finite() {
                    session.current = position;
                }
            }
            None => tracing::debug!("Skipped drag frame: ray parallel to drag plane"),
        }
        Some(session.current)
    }

    /// Release the pointer. A finished drag is committed through
    /// [`VisualizerStore::translate`].
    pub fn pointer_up(&mut self, store: &mut VisualizerStore) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DragOutcome::None,
            DragState::Pending { object_id, .. } => DragOutcome::Click(object_id),
            DragState::Dragging(session) => {
                // Re-enable orbit controls before the store notifies observers
                let DragSession {
                    object_id,
                    current,
                    _controls: lease,
                    ..
                } = session;
                drop(lease);
                store.translate(object_id, current);
                tracing::debug!("Drag ended for {}", object_id);
                DragOutcome::Moved(object_id)
            }
        }
    }

    /// Abandon the gesture without touching the store
    pub fn cancel(&mut self) {
        if let DragState::Dragging(session) = std::mem::take(&mut self.state) {
            tracing::debug!("Drag cancelled for {}", session.object_id);
        }
    }

    /// Object and position shown while dragging
    pub fn preview(&self) -> Option<(Uuid, Vec3)> {
        match &self.state {
            DragState::Dragging(session) => Some((session.object_id, session.current)),
            _ => None,
        }
    }

    /// Whether the threshold was passed and the object follows the pointer
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Whether a press or drag is in progress
    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// Object the current gesture acts on
    pub fn object_id(&self) -> Option<Uuid> {
        match &self.state {
            DragState::Idle => None,
            DragState::Pending { object_id, .. } => Some(*object_id),
            DragState::Dragging(session) => Some(session.object_id),
        }
    }
}
