//! Viewport interaction state
//!
//! Routes pointer input to the gizmo, the object drag gesture, hover and
//! selection, and builds the scene description for the renderer. The store
//! is passed in by the caller on every event so it can stay behind its own
//! lock.

use std::sync::Arc;

use bp_core::object::compose_matrix;
use bp_core::{ViolationCache, VisualizerStore};
use glam::{Mat4, Vec2, Vec3};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::camera::{Camera, ControlsLease, OrbitControls, Viewport};
use crate::config::{DragConfig, GizmoConfig};
use crate::drag::{DragController, DragOutcome};
use crate::gizmo::{GizmoStyleUniform, PivotGizmo};
use crate::ray::Ray;
use crate::renderer::{RedrawFlag, SceneDescription, SceneRenderer, describe_scene};

/// Pointer button state the viewport reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Press {
    /// Pressed on a gizmo handle
    Gizmo,
    /// Pressed on an object or empty space
    Scene,
}

/// Camera, gizmo and gesture state of one viewport
#[derive(Debug)]
pub struct ViewportState {
    /// Orbit camera
    pub camera: Camera,
    /// Viewport size in pixels
    pub viewport: Viewport,
    /// Camera controls, disabled while a gesture owns the pointer
    pub controls: OrbitControls,
    /// Transform gizmo for the selected object
    pub gizmo: PivotGizmo,
    drag: DragController,
    violations: ViolationCache,
    redraw: RedrawFlag,
    press: Option<Press>,
    gizmo_lease: Option<ControlsLease>,
}

/// Viewport state shared between the input and render paths
pub type SharedViewportState = Arc<Mutex<ViewportState>>;

impl ViewportState {
    /// Create a viewport framing a plate of `plate_size`
    pub fn new(
        plate_size: Vec3,
        width: f32,
        height: f32,
        gizmo: GizmoConfig,
        drag: DragConfig,
    ) -> Self {
        let viewport = Viewport::new(width, height);
        Self {
            camera: Camera::for_plate(plate_size, viewport.aspect()),
            viewport,
            controls: OrbitControls::new(),
            gizmo: PivotGizmo::new(gizmo),
            drag: DragController::new(drag),
            violations: ViolationCache::new(),
            redraw: RedrawFlag::new(),
            press: None,
            gizmo_lease: None,
        }
    }

    /// Redraw flag; connect it to the store to redraw on every change
    pub fn redraw(&self) -> &RedrawFlag {
        &self.redraw
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.camera.update_aspect(self.viewport.aspect());
        self.redraw.request();
    }

    /// Pointer ray through a screen position
    pub fn ray_at(&self, screen: Vec2) -> Ray {
        self.camera.screen_to_ray(screen, &self.viewport)
    }

    /// Nearest object under the ray and the distance to it
    pub fn pick_object(&self, store: &VisualizerStore, ray: &Ray) -> Option<(Uuid, f32)> {
        store
            .objects()
            .iter()
            .filter_map(|object| {
                object
                    .world_bounds()
                    .intersect_ray(ray.origin, ray.direction)
                    .map(|t| (object.id, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Keep the gizmo on the selected object. A selection change cancels a
    /// running gizmo drag.
    pub fn sync(&mut self, store: &VisualizerStore) {
        match store.selected() {
            Some(object) => {
                if self.gizmo.target_id() != Some(object.id) {
                    self.end_gizmo_gesture();
                }
                self.gizmo.attach(object);
            }
            None => {
                if self.gizmo.is_visible() {
                    self.end_gizmo_gesture();
                    self.gizmo.detach();
                }
            }
        }
        self.gizmo.update_scale(&self.camera, &self.viewport);
    }

    /// Handle a pointer move. Returns whether anything visible changed.
    pub fn pointer_move(&mut self, store: &mut VisualizerStore, screen: Vec2) -> bool {
        self.sync(store);
        let ray = self.ray_at(screen);

        if self.gizmo.is_dragging() {
            let moved = self.gizmo.drag(&ray, store.limits()).is_some();
            if moved {
                self.redraw.request();
            }
            return moved;
        }

        if self.drag.is_active() {
            let preview = self
                .drag
                .pointer_move(screen, &ray, &self.camera, &self.controls, store);
            if preview.is_some() {
                self.redraw.request();
            }
            return preview.is_some();
        }

        let handle = self.gizmo.hit_test(&ray);
        let handle_changed = handle != self.gizmo.highlighted();
        self.gizmo.set_hovered(handle);

        let hovered = match handle {
            Some(_) => None,
            None => self.pick_object(store, &ray).map(|(id, _)| id),
        };
        let hover_changed = store.hovered_id() != hovered;
        store.set_hovered(hovered);

        if handle_changed {
            self.redraw.request();
        }
        handle_changed || hover_changed
    }

    /// Handle a primary button press. Returns whether a gesture started.
    pub fn pointer_down(&mut self, store: &mut VisualizerStore, screen: Vec2) -> bool {
        self.sync(store);
        let ray = self.ray_at(screen);

        if let Some(handle) = self.gizmo.hit_test(&ray)
            && self.gizmo.drag_start(handle, &ray)
        {
            self.gizmo_lease = Some(self.controls.lease());
            self.press = Some(Press::Gizmo);
            return true;
        }

        self.press = Some(Press::Scene);
        let Some((id, t)) = self.pick_object(store, &ray) else {
            return false;
        };
        let Some(object) = store.get(id) else {
            return false;
        };
        self.drag
            .pointer_down(object, store.selected_id(), screen, ray.at(t))
    }

    /// Handle a primary button release.
    ///
    /// A translation handle drag and an object drag are committed with
    /// `translate`, other gizmo drags with `apply_transform`. A click on an
    /// object selects it and a click on empty space keeps the current
    /// selection.
    pub fn pointer_up(&mut self, store: &mut VisualizerStore) {
        match self.press.take() {
            Some(Press::Gizmo) => {
                let commit = self.gizmo.drag_end();
                self.gizmo_lease = None;
                match commit {
                    Some(commit) if commit.translate_only => {
                        store.translate(commit.object_id, commit.position);
                    }
                    Some(commit) => store.apply_transform(
                        commit.object_id,
                        commit.position,
                        commit.rotation,
                        commit.scale,
                    ),
                    None => {}
                }
            }
            Some(Press::Scene) => match self.drag.pointer_up(store) {
                DragOutcome::Click(id) => store.set_selected(Some(id)),
                DragOutcome::Moved(_) | DragOutcome::None => {}
            },
            None => {}
        }
        self.sync(store);
        self.redraw.request();
    }

    /// Abort any gesture without committing it
    pub fn cancel_gesture(&mut self) {
        self.end_gizmo_gesture();
        self.drag.cancel();
        self.press = None;
        self.redraw.request();
    }

    fn end_gizmo_gesture(&mut self) {
        if self.gizmo.is_dragging() {
            self.gizmo.cancel();
        }
        self.gizmo_lease = None;
        if self.press == Some(Press::Gizmo) {
            self.press = None;
        }
    }

    /// Whether a gizmo or object drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.gizmo.is_dragging() || self.drag.is_dragging()
    }

    /// Orbit by a pointer delta; ignored while a gesture owns the pointer
    pub fn orbit(&mut self, delta: Vec2) -> bool {
        let moved = self.controls.orbit(&mut self.camera, delta);
        self.after_camera_move(moved)
    }

    /// Pan by a pointer delta
    pub fn pan(&mut self, delta: Vec2) -> bool {
        let moved = self.controls.pan(&mut self.camera, delta);
        self.after_camera_move(moved)
    }

    /// Zoom by wheel notches
    pub fn zoom(&mut self, notches: f32) -> bool {
        let moved = self.controls.zoom(&mut self.camera, notches);
        self.after_camera_move(moved)
    }

    fn after_camera_move(&mut self, moved: bool) -> bool {
        if moved {
            self.gizmo.update_scale(&self.camera, &self.viewport);
            self.redraw.request();
        }
        moved
    }

    /// Matrices of objects shown at an uncommitted position
    fn previews(&self, store: &VisualizerStore) -> Vec<(Uuid, Mat4)> {
        let mut previews = Vec::new();
        if self.gizmo.is_dragging()
            && let (Some(id), Some(matrix)) = (self.gizmo.target_id(), self.gizmo.display_matrix())
        {
            previews.push((id, matrix));
        }
        if let Some((id, position)) = self.drag.preview()
            && let Some(object) = store.get(id)
        {
            previews.push((id, compose_matrix(position, object.rotation, object.scale)));
        }
        previews
    }

    /// Describe the current frame for the renderer
    pub fn scene(&mut self, store: &VisualizerStore) -> SceneDescription {
        self.sync(store);
        let previews = self.previews(store);
        let violations = self.violations.violations(store).to_vec();
        let gizmo = self.gizmo.instance();
        let style = gizmo.map(|_| GizmoStyleUniform::from(self.gizmo.config()));
        describe_scene(store, &violations, &previews, gizmo, style)
    }

    /// Hand a frame to `renderer` if a redraw was requested since the last
    /// call. Returns whether a frame was drawn.
    pub fn render_if_needed<R: SceneRenderer>(
        &mut self,
        store: &VisualizerStore,
        renderer: &mut R,
    ) -> bool {
        if !self.redraw.take() {
            return false;
        }
        let scene = self.scene(store);
        renderer.render(&scene);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ObjectHighlight;
    use approx::assert_relative_eq;
    use crate::gizmo::GizmoHandle;
    use bp_core::{Axis, Geometry, MeshFormat, NewObject, PlacedObject, TransformMode};

    fn setup() -> (ViewportState, VisualizerStore, Uuid) {
        let mut store = VisualizerStore::default();
        let geometry = Arc::new(Geometry::cuboid(Vec3::splat(20.0)));
        let id = store.add_object(NewObject::new("cube", MeshFormat::Stl, geometry));
        let state = ViewportState::new(
            store.build_plate_size(),
            800.0,
            600.0,
            GizmoConfig::default(),
            DragConfig::default(),
        );
        (state, store, id)
    }

    fn screen_of(state: &ViewportState, world: Vec3) -> Vec2 {
        state.camera.project(world, &state.viewport).truncate()
    }

    fn click(state: &mut ViewportState, store: &mut VisualizerStore, screen: Vec2) {
        state.pointer_down(store, screen);
        state.pointer_up(store);
    }

    #[test]
    fn test_click_selects_object() {
        let (mut state, mut store, id) = setup();
        let center = screen_of(&state, Vec3::new(0.0, 10.0, 0.0));
        click(&mut state, &mut store, center);

        assert_eq!(store.selected_id(), Some(id));
        assert_eq!(state.gizmo.target_id(), Some(id));
        assert!(state.controls.is_enabled());
    }

    #[test]
    fn test_click_on_empty_space_keeps_selection() {
        let (mut state, mut store, id) = setup();
        store.set_selected(Some(id));
        click(&mut state, &mut store, Vec2::new(5.0, 5.0));
        assert_eq!(store.selected_id(), Some(id));
    }

    #[test]
    fn test_hover_follows_pointer() {
        let (mut state, mut store, id) = setup();
        let center = screen_of(&state, Vec3::new(0.0, 10.0, 0.0));

        assert!(state.pointer_move(&mut store, center));
        assert_eq!(store.hovered_id(), Some(id));

        state.pointer_move(&mut store, Vec2::new(5.0, 5.0));
        assert_eq!(store.hovered_id(), None);
    }

    #[test]
    fn test_object_drag_commits_once() {
        let (mut state, mut store, id) = setup();
        let entries = store.history().len();
        let center = screen_of(&state, Vec3::new(0.0, 10.0, 0.0));

        assert!(state.pointer_down(&mut store, center));
        state.pointer_move(&mut store, center + Vec2::new(20.0, 0.0));
        state.pointer_move(&mut store, center + Vec2::new(60.0, 0.0));
        assert!(state.is_dragging());
        assert!(!state.controls.is_enabled());

        let scene = state.scene(&store);
        let preview_x = scene.object(id).unwrap().instance.model[3][0];
        assert!(preview_x > 1.0);
        assert_eq!(store.get(id).unwrap().position.x, 0.0);

        state.pointer_up(&mut store);
        let object = store.get(id).unwrap();
        assert_relative_eq!(object.position.x, preview_x, epsilon = 1e-3);
        assert_relative_eq!(object.position.y, 10.0, epsilon = 1e-4);
        assert_eq!(store.history().len(), entries + 1);
        assert!(state.controls.is_enabled());
        // A drag is not a click
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_gizmo_translate_drag() {
        let (mut state, mut store, id) = setup();
        store.set_selected(Some(id));
        state.sync(&store);

        let unit = state.gizmo.unit();
        let origin = Vec3::new(0.0, 10.0, 0.0);
        let grab = screen_of(&state, origin + Vec3::X * unit * 0.5);
        assert!(state.pointer_down(&mut store, grab));
        assert!(!state.controls.is_enabled());

        let target = screen_of(&state, origin + Vec3::X * (unit * 0.5 + 15.0));
        assert!(state.pointer_move(&mut store, target));
        state.pointer_up(&mut store);

        let object = store.get(id).unwrap();
        assert_relative_eq!(object.position.x, 15.0, epsilon = 0.5);
        assert_relative_eq!(object.position.z, 0.0, epsilon = 1e-3);
        assert!(state.controls.is_enabled());
        assert_eq!(store.selected_id(), Some(id));
    }

    #[test]
    fn test_gizmo_lift_keeps_rotated_object_height() {
        let (mut state, mut store, id) = setup();
        store.rotate(id, Vec3::new(0.3, 0.7, 0.1));
        store.scale(id, Vec3::new(1.3, 0.7, 2.1));
        store.set_selected(Some(id));
        state.gizmo.set_config(GizmoConfig {
            local_space: false,
            ..Default::default()
        });
        state.sync(&store);
        let before = PlacedObject::clone(store.get(id).unwrap());

        let unit = state.gizmo.unit();
        let origin = state.gizmo.anchor_position().unwrap();
        let grab = screen_of(&state, origin + Vec3::Y * unit * 0.5);
        assert!(state.pointer_down(&mut store, grab));
        assert_eq!(state.gizmo.highlighted(), Some(GizmoHandle::Arrow(Axis::Y)));

        let target = screen_of(&state, origin + Vec3::Y * (unit * 0.5 + 15.0));
        assert!(state.pointer_move(&mut store, target));
        state.pointer_up(&mut store);

        let object = store.get(id).unwrap();
        assert_relative_eq!(object.position.y, before.position.y + 15.0, epsilon = 0.5);
        assert_eq!(object.rotation, before.rotation);
        assert_eq!(object.scale, before.scale);
    }

    #[test]
    fn test_selection_change_cancels_gizmo_drag() {
        let (mut state, mut store, id) = setup();
        store.set_selected(Some(id));
        state.sync(&store);

        let unit = state.gizmo.unit();
        let grab = screen_of(&state, Vec3::new(unit * 0.5, 10.0, 0.0));
        assert!(state.pointer_down(&mut store, grab));
        assert!(state.gizmo.is_dragging());

        store.set_selected(None);
        state.pointer_move(&mut store, grab + Vec2::new(30.0, 0.0));
        assert!(!state.gizmo.is_dragging());
        assert!(!state.gizmo.is_visible());
        assert!(state.controls.is_enabled());

        state.pointer_up(&mut store);
        assert_eq!(store.get(id).unwrap().position.x, 0.0);
    }

    #[test]
    fn test_camera_locked_during_gesture() {
        let (mut state, mut store, _) = setup();
        let center = screen_of(&state, Vec3::new(0.0, 10.0, 0.0));
        state.pointer_down(&mut store, center);
        state.pointer_move(&mut store, center + Vec2::new(30.0, 0.0));
        assert!(!state.orbit(Vec2::new(10.0, 0.0)));

        state.cancel_gesture();
        assert!(state.orbit(Vec2::new(10.0, 0.0)));
    }

    #[derive(Default)]
    struct FrameCounter {
        frames: usize,
        objects: usize,
    }

    impl SceneRenderer for FrameCounter {
        fn render(&mut self, scene: &SceneDescription) {
            self.frames += 1;
            self.objects = scene.objects.len();
        }
    }

    #[test]
    fn test_store_changes_schedule_one_frame() {
        let (mut state, mut store, id) = setup();
        let mut renderer = FrameCounter::default();
        state.redraw().connect(&mut store);
        assert!(!state.render_if_needed(&store, &mut renderer));

        store.translate(id, Vec3::new(5.0, 10.0, 0.0));
        store.set_selected(Some(id));
        assert!(state.render_if_needed(&store, &mut renderer));
        assert!(!state.render_if_needed(&store, &mut renderer));
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.objects, 1);

        state.resize(1024.0, 768.0);
        assert!(state.render_if_needed(&store, &mut renderer));
        assert_eq!(renderer.frames, 2);
    }

    #[test]
    fn test_scene_marks_out_of_plate_objects() {
        let (mut state, mut store, id) = setup();
        store.translate(id, Vec3::new(200.0, 10.0, 0.0));
        store.set_transform_mode(id, TransformMode::Rotate);
        store.set_selected(Some(id));

        let scene = state.scene(&store);
        assert_eq!(scene.object(id).unwrap().highlight, ObjectHighlight::OutOfPlate);
        assert!(scene.gizmo.is_some());
        assert_eq!(scene.gizmo.unwrap().mode, 1.0);
        assert_eq!(scene.corner_markers.len(), 24);
    }
}
