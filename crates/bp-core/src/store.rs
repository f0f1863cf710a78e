//! Transform store
//!
//! Holds the placed objects, the selected and hovered ids and the plate size.
//! Every committed change to the object list records one history snapshot;
//! selection, hover and plate size are UI state and are never recorded.
//!
//! Objects are stored as `Arc<PlacedObject>`. A mutation replaces the one
//! affected `Arc` and leaves the rest shared, so a snapshot is a cheap clone
//! of the vector.
//!
//! Mutations on an unknown id are silent no-ops.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use uuid::Uuid;

use crate::config::{TransformLimits, ViewerConfig};
use crate::constants::{DEFAULT_BUILD_PLATE_SIZE, MIN_SCALE, ORIENTATION_EPSILON};
use crate::history::History;
use crate::object::{Axis, NewObject, PlacedObject, TransformMode};

/// Immutable view of the object list, as stored in history
pub type ObjectsSnapshot = Vec<Arc<PlacedObject>>;

/// Change notifications delivered to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The object list changed (edit, undo or redo)
    ObjectsChanged,
    SelectionChanged(Option<Uuid>),
    HoverChanged(Option<Uuid>),
    PlateChanged(Vec3),
    /// History entries were added, traversed or cleared
    HistoryChanged,
}

/// Handle returned by [`VisualizerStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StoreEvent) + Send>;

/// Canonical object state with undo/redo
pub struct VisualizerStore {
    objects: ObjectsSnapshot,
    selected_id: Option<Uuid>,
    hovered_id: Option<Uuid>,
    build_plate_size: Vec3,
    history: History<ObjectsSnapshot>,
    limits: TransformLimits,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    /// Nesting depth of [`VisualizerStore::batch`]
    batch_depth: usize,
    /// Objects changed inside the current batch
    batch_dirty: bool,
    /// Incremented on every change to the object list
    revision: u64,
}

impl fmt::Debug for VisualizerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualizerStore")
            .field("objects", &self.objects.len())
            .field("selected_id", &self.selected_id)
            .field("hovered_id", &self.hovered_id)
            .field("build_plate_size", &self.build_plate_size)
            .field("history", &self.history.len())
            .field("observers", &self.observers.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl Default for VisualizerStore {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl VisualizerStore {
    /// Create an empty store
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            objects: Vec::new(),
            selected_id: None,
            hovered_id: None,
            build_plate_size: config.plate_size(),
            history: History::new(Vec::new(), config.history_limit),
            limits: config.limits,
            observers: Vec::new(),
            next_subscription: 0,
            batch_depth: 0,
            batch_dirty: false,
            revision: 0,
        }
    }

    // ============== Queries ==============

    /// All objects in insertion order
    pub fn objects(&self) -> &[Arc<PlacedObject>] {
        &self.objects
    }

    /// Cheap clone of the current object list
    pub fn snapshot(&self) -> ObjectsSnapshot {
        self.objects.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<&Arc<PlacedObject>> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected_id
    }

    pub fn hovered_id(&self) -> Option<Uuid> {
        self.hovered_id
    }

    /// The selected object, if the selected id still resolves
    pub fn selected(&self) -> Option<&Arc<PlacedObject>> {
        self.selected_id.and_then(|id| self.get(id))
    }

    /// The hovered object, if the hovered id still resolves
    pub fn hovered(&self) -> Option<&Arc<PlacedObject>> {
        self.hovered_id.and_then(|id| self.get(id))
    }

    pub fn build_plate_size(&self) -> Vec3 {
        self.build_plate_size
    }

    pub fn limits(&self) -> &TransformLimits {
        &self.limits
    }

    pub fn history(&self) -> &History<ObjectsSnapshot> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Counter bumped on every change to the object list
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ============== Observers ==============

    /// Register a callback for store events
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&StoreEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }

    // ============== Object list ==============

    /// Add an object and return its id
    pub fn add_object(&mut self, new_object: NewObject) -> Uuid {
        let new_object = NewObject {
            position: new_object.position.map(|p| self.limits.clamp_position(p)),
            rotation: new_object.rotation.map(|r| self.limits.clamp_rotation(r)),
            scale: new_object.scale.map(|s| sanitize_scale(self.limits.clamp_scale(s))),
            ..new_object
        };
        let object = new_object.build();
        let id = object.id;
        tracing::info!(
            "Added object '{}' ({}) size={:?}",
            object.name,
            id,
            object.size
        );
        self.objects.push(Arc::new(object));
        self.commit();
        id
    }

    /// Remove an object; clears selection and hover pointing at it
    pub fn remove_object(&mut self, id: Uuid) {
        let Some(index) = self.index_of(id) else {
            tracing::debug!("remove_object: unknown id {}", id);
            return;
        };
        let removed = self.objects.remove(index);
        tracing::info!("Removed object '{}' ({})", removed.name, id);

        if self.selected_id == Some(id) {
            self.set_selected(None);
        }
        if self.hovered_id == Some(id) {
            self.set_hovered(None);
        }
        self.commit();
    }

    /// Remove the selected object, if any
    pub fn remove_selected(&mut self) {
        if let Some(id) = self.selected_id {
            self.remove_object(id);
        }
    }

    /// Remove every object
    pub fn clear_all(&mut self) {
        if self.objects.is_empty() {
            return;
        }
        tracing::info!("Cleared {} objects", self.objects.len());
        self.objects.clear();
        self.set_selected(None);
        self.set_hovered(None);
        self.commit();
    }

    /// Restore the initial empty state and default plate size
    pub fn reset_all(&mut self) {
        self.objects.clear();
        self.set_selected(None);
        self.set_hovered(None);
        self.set_build_plate_size(Vec3::from(DEFAULT_BUILD_PLATE_SIZE));
        self.commit();
    }

    // ============== UI state ==============

    pub fn set_selected(&mut self, id: Option<Uuid>) {
        if self.selected_id != id {
            self.selected_id = id;
            self.emit(StoreEvent::SelectionChanged(id));
        }
    }

    pub fn set_hovered(&mut self, id: Option<Uuid>) {
        if self.hovered_id != id {
            self.hovered_id = id;
            self.emit(StoreEvent::HoverChanged(id));
        }
    }

    /// Set width, depth and maximum height of the build volume
    pub fn set_build_plate_size(&mut self, size: Vec3) {
        if self.build_plate_size != size {
            self.build_plate_size = size;
            self.emit(StoreEvent::PlateChanged(size));
        }
    }

    /// Replace the transform limits; existing objects are not re-clamped
    pub fn set_limits(&mut self, limits: TransformLimits) {
        self.limits = limits;
    }

    // ============== Transforms ==============

    /// Set one position component. Keeps the explicit height.
    pub fn translate_axis(&mut self, id: Uuid, axis: Axis, value: f32) {
        let limits = self.limits;
        self.update(id, "translate_axis", |object| {
            object.position[axis.index()] = limits.translation.clamp_axis(axis, value);
        });
    }

    /// Set one rotation component (radians) and drop onto the plate
    pub fn rotate_axis(&mut self, id: Uuid, axis: Axis, value: f32) {
        let limits = self.limits;
        self.update(id, "rotate_axis", |object| {
            object.rotation[axis.index()] = limits.rotation.clamp_axis(axis, value);
            refit_within(object, &limits);
        });
    }

    /// Set one scale component and drop onto the plate
    pub fn scale_axis(&mut self, id: Uuid, axis: Axis, value: f32) {
        let limits = self.limits;
        self.update(id, "scale_axis", |object| {
            let mut scale = object.scale;
            scale[axis.index()] = value;
            object.scale = sanitize_scale(limits.clamp_scale(scale));
            refit_within(object, &limits);
        });
    }

    /// Set all three scale components to `value`
    pub fn scale_uniform(&mut self, id: Uuid, value: f32) {
        self.scale(id, Vec3::splat(value));
    }

    /// Set the whole position. Keeps the explicit height.
    pub fn translate(&mut self, id: Uuid, position: Vec3) {
        let limits = self.limits;
        self.update(id, "translate", |object| {
            object.position = limits.clamp_position(position);
        });
    }

    /// Set the whole rotation and drop onto the plate
    pub fn rotate(&mut self, id: Uuid, rotation: Vec3) {
        let limits = self.limits;
        self.update(id, "rotate", |object| {
            object.rotation = limits.clamp_rotation(rotation);
            refit_within(object, &limits);
        });
    }

    /// Set the whole scale and drop onto the plate
    pub fn scale(&mut self, id: Uuid, scale: Vec3) {
        let limits = self.limits;
        self.update(id, "scale", |object| {
            object.scale = sanitize_scale(limits.clamp_scale(scale));
            refit_within(object, &limits);
        });
    }

    /// Set position, rotation and scale in one history entry.
    ///
    /// The object is dropped onto the plate only if rotation or scale
    /// changed; a pure move keeps the given height. Rotation and scale
    /// within [`ORIENTATION_EPSILON`] of the stored values count as
    /// unchanged and the stored values are kept.
    pub fn apply_transform(&mut self, id: Uuid, position: Vec3, rotation: Vec3, scale: Vec3) {
        let limits = self.limits;
        self.update(id, "apply_transform", |object| {
            let rotation = limits.clamp_rotation(rotation);
            let scale = sanitize_scale(limits.clamp_scale(scale));
            let reoriented = !rotation.abs_diff_eq(object.rotation, ORIENTATION_EPSILON)
                || !scale.abs_diff_eq(object.scale, ORIENTATION_EPSILON);

            object.position = limits.clamp_position(position);
            if reoriented {
                object.rotation = rotation;
                object.scale = scale;
                refit_within(object, &limits);
            }
        });
    }

    /// Choose which gizmo handles an object shows
    pub fn set_transform_mode(&mut self, id: Uuid, mode: TransformMode) {
        self.update(id, "set_transform_mode", |object| {
            object.transform_mode = mode;
        });
    }

    // ============== History ==============

    /// Step back one snapshot. Selection and hover are left untouched.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.objects = snapshot.clone();
        tracing::debug!("Undo ({} steps left)", self.history.undo_count());
        self.revision += 1;
        self.emit(StoreEvent::ObjectsChanged);
        self.emit(StoreEvent::HistoryChanged);
        true
    }

    /// Step forward one snapshot
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.objects = snapshot.clone();
        tracing::debug!("Redo ({} steps left)", self.history.redo_count());
        self.revision += 1;
        self.emit(StoreEvent::ObjectsChanged);
        self.emit(StoreEvent::HistoryChanged);
        true
    }

    /// Collapse history to the current state
    pub fn clear_history(&mut self) {
        self.history.clear();
        tracing::debug!("History cleared");
        self.emit(StoreEvent::HistoryChanged);
    }

    /// Run several mutations as one history entry
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;

        if self.batch_depth == 0 && std::mem::take(&mut self.batch_dirty) {
            self.record();
        }
        result
    }

    // ============== Internals ==============

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Apply `edit` to a copy of the object and store it if anything changed
    fn update(&mut self, id: Uuid, operation: &str, edit: impl FnOnce(&mut PlacedObject)) {
        let Some(index) = self.index_of(id) else {
            tracing::debug!("{}: unknown id {}", operation, id);
            return;
        };

        let mut object = PlacedObject::clone(&self.objects[index]);
        edit(&mut object);

        if !object_is_finite(&object) {
            tracing::warn!("{}: rejected non-finite transform for {}", operation, id);
            return;
        }
        if object == *self.objects[index] {
            return;
        }

        self.objects[index] = Arc::new(object);
        self.commit();
    }

    /// The object list changed: notify and record (or defer inside a batch)
    fn commit(&mut self) {
        self.revision += 1;
        self.emit(StoreEvent::ObjectsChanged);

        if self.batch_depth > 0 {
            self.batch_dirty = true;
        } else {
            self.record();
        }
    }

    fn record(&mut self) {
        if self.history.push(self.objects.clone()) {
            self.emit(StoreEvent::HistoryChanged);
        }
    }
}

/// Keep every scale component away from zero, preserving its sign
fn sanitize_scale(scale: Vec3) -> Vec3 {
    let fix = |s: f32| {
        if s.abs() < MIN_SCALE {
            if s < 0.0 { -MIN_SCALE } else { MIN_SCALE }
        } else {
            s
        }
    };
    Vec3::new(fix(scale.x), fix(scale.y), fix(scale.z))
}

/// Drop onto the plate, then pull the position back into the translation
/// limits. The limits win over the drop.
fn refit_within(object: &mut PlacedObject, limits: &TransformLimits) {
    object.refit();
    object.position = limits.clamp_position(object.position);
}

fn object_is_finite(object: &PlacedObject) -> bool {
    object.position.is_finite() && object.rotation.is_finite() && object.scale.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AxisLimits;
    use crate::geometry::{Geometry, MeshFormat};
    use approx::assert_relative_eq;
    use parking_lot::Mutex;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn cube(size: Vec3) -> NewObject {
        NewObject::new("cube", MeshFormat::Stl, Arc::new(Geometry::cuboid(size)))
    }

    fn assert_size_matches_bounds(object: &PlacedObject) {
        let bounds = object.world_bounds();
        assert!(object.size.abs_diff_eq(bounds.size(), 1e-3));
    }

    #[test]
    fn test_add_object_rests_on_plate() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::new(10.0, 20.0, 10.0)));

        let object = store.get(id).unwrap();
        assert_relative_eq!(object.position.y, 10.0);
        assert_relative_eq!(object.world_bounds().min.y, 0.0);
        assert_eq!(object.transform_mode, TransformMode::Translate);
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_size_tracks_rotation_and_scale() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::new(10.0, 4.0, 2.0)));

        store.rotate_axis(id, Axis::Y, FRAC_PI_4);
        assert_size_matches_bounds(store.get(id).unwrap());
        store.scale_axis(id, Axis::X, 3.0);
        assert_size_matches_bounds(store.get(id).unwrap());
        store.rotate_axis(id, Axis::X, 0.4);
        assert_size_matches_bounds(store.get(id).unwrap());
        store.translate_axis(id, Axis::Z, 7.0);
        assert_size_matches_bounds(store.get(id).unwrap());
        store.scale_uniform(id, 0.5);
        assert_size_matches_bounds(store.get(id).unwrap());
    }

    #[test]
    fn test_rotate_and_scale_drop_to_plate() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::new(10.0, 4.0, 2.0)));

        store.rotate_axis(id, Axis::Z, FRAC_PI_2);
        assert_relative_eq!(store.get(id).unwrap().world_bounds().min.y, 0.0, epsilon = 1e-4);

        store.scale_axis(id, Axis::Y, 2.5);
        assert_relative_eq!(store.get(id).unwrap().world_bounds().min.y, 0.0, epsilon = 1e-4);

        store.rotate(id, Vec3::new(0.3, 0.2, 0.1));
        assert_relative_eq!(store.get(id).unwrap().world_bounds().min.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_translate_keeps_explicit_height() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::splat(10.0)));

        store.translate_axis(id, Axis::Y, 40.0);
        assert_eq!(store.get(id).unwrap().position.y, 40.0);

        store.translate(id, Vec3::new(1.0, 30.0, 2.0));
        assert_eq!(store.get(id).unwrap().position, Vec3::new(1.0, 30.0, 2.0));
    }

    #[test]
    fn test_apply_transform_drop_rule() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::splat(10.0)));

        // Pure move keeps the height
        store.apply_transform(id, Vec3::new(5.0, 20.0, 0.0), Vec3::ZERO, Vec3::ONE);
        assert_eq!(store.get(id).unwrap().position.y, 20.0);

        // Scale change drops onto the plate
        store.apply_transform(id, Vec3::new(5.0, 20.0, 0.0), Vec3::ZERO, Vec3::splat(2.0));
        let object = store.get(id).unwrap();
        assert_relative_eq!(object.position.y, 10.0);
        assert_eq!(object.size, Vec3::splat(20.0));
    }

    #[test]
    fn test_apply_transform_ignores_orientation_noise() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::new(20.0, 10.0, 30.0)));
        store.rotate(id, Vec3::new(0.3, 0.7, 0.1));
        store.scale(id, Vec3::new(1.3, 0.7, 2.1));
        let before = PlacedObject::clone(store.get(id).unwrap());

        // Values as they come back from a matrix decomposition
        let rotation = before.rotation + Vec3::new(0.0, -1.2e-7, -4e-8);
        let scale = before.scale + Vec3::new(1e-7, 5e-8, 0.0);
        let position = before.position + Vec3::new(0.0, 20.0, 0.0);
        store.apply_transform(id, position, rotation, scale);

        let object = store.get(id).unwrap();
        assert_eq!(object.position, position);
        assert_eq!(object.rotation, before.rotation);
        assert_eq!(object.scale, before.scale);
        assert_eq!(object.size, before.size);
    }

    #[test]
    fn test_drop_stays_within_translation_limits() {
        let config = ViewerConfig {
            limits: TransformLimits {
                translation: AxisLimits {
                    y: Some((5.0, 100.0)),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let mut store = VisualizerStore::new(&config);
        let id = store.add_object(cube(Vec3::splat(2.0)));

        store.rotate_axis(id, Axis::Y, FRAC_PI_4);
        assert_eq!(store.get(id).unwrap().position.y, 5.0);
        store.scale_axis(id, Axis::X, 2.0);
        assert_eq!(store.get(id).unwrap().position.y, 5.0);
        store.apply_transform(id, Vec3::new(0.0, 50.0, 0.0), Vec3::ZERO, Vec3::ONE);
        assert_eq!(store.get(id).unwrap().position.y, 5.0);
    }

    #[test]
    fn test_undo_redo_restores_states() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::splat(10.0)));
        store.set_selected(Some(id));
        store.set_hovered(Some(id));

        let after_add = store.snapshot();
        store.translate_axis(id, Axis::X, 10.0);
        let after_move = store.snapshot();
        store.rotate_axis(id, Axis::Y, 1.0);
        let after_rotate = store.snapshot();

        assert!(store.undo());
        assert_eq!(store.snapshot(), after_move);
        assert!(store.undo());
        assert_eq!(store.snapshot(), after_add);
        assert!(store.undo());
        assert!(store.is_empty());
        assert!(!store.undo());

        assert_eq!(store.selected_id(), Some(id));
        assert_eq!(store.hovered_id(), Some(id));

        store.redo();
        store.redo();
        store.redo();
        assert_eq!(store.snapshot(), after_rotate);
        assert!(!store.redo());
    }

    #[test]
    fn test_selection_is_not_recorded() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::ONE));
        let entries = store.history().len();

        store.set_selected(Some(id));
        store.set_hovered(Some(id));
        store.set_build_plate_size(Vec3::new(100.0, 100.0, 100.0));
        assert_eq!(store.history().len(), entries);
    }

    #[test]
    fn test_noop_edits_are_not_recorded() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::ONE));
        store.translate_axis(id, Axis::X, 3.0);
        let entries = store.history().len();

        store.translate_axis(id, Axis::X, 3.0);
        store.set_transform_mode(id, TransformMode::Translate);
        store.translate_axis(Uuid::new_v4(), Axis::X, 9.0);
        assert_eq!(store.history().len(), entries);
    }

    #[test]
    fn test_clear_history_keeps_objects() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::ONE));
        store.translate_axis(id, Axis::X, 3.0);
        let before = store.snapshot();

        store.clear_history();
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.snapshot(), before);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_remove_hovered_object_clears_query() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::ONE));
        store.set_hovered(Some(id));
        store.set_selected(Some(id));

        store.remove_object(id);
        assert!(store.hovered().is_none());
        assert!(store.selected().is_none());
        assert_eq!(store.selected_id(), None);

        // Unknown ids are ignored
        store.remove_object(id);
        store.remove_selected();
    }

    #[test]
    fn test_remove_selected() {
        let mut store = VisualizerStore::default();
        let a = store.add_object(cube(Vec3::ONE));
        let b = store.add_object(cube(Vec3::ONE));
        store.set_selected(Some(a));
        store.remove_selected();
        assert_eq!(store.len(), 1);
        assert!(store.contains(b));
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_clear_and_reset() {
        let mut store = VisualizerStore::default();
        store.add_object(cube(Vec3::ONE));
        store.add_object(cube(Vec3::ONE));
        store.clear_all();
        assert!(store.is_empty());
        assert!(store.undo());
        assert_eq!(store.len(), 2);

        store.set_build_plate_size(Vec3::splat(50.0));
        store.reset_all();
        assert!(store.is_empty());
        assert_eq!(store.build_plate_size(), Vec3::new(235.0, 235.0, 250.0));
    }

    #[test]
    fn test_batch_records_one_entry() {
        let mut store = VisualizerStore::default();
        let ids = store.batch(|store| {
            (0..3)
                .map(|_| store.add_object(cube(Vec3::ONE)))
                .collect::<Vec<_>>()
        });
        assert_eq!(ids.len(), 3);
        assert_eq!(store.history().len(), 2);

        store.undo();
        assert!(store.is_empty());
    }

    #[test]
    fn test_history_limit() {
        let config = ViewerConfig {
            history_limit: 3,
            ..Default::default()
        };
        let mut store = VisualizerStore::new(&config);
        let id = store.add_object(cube(Vec3::ONE));
        for i in 1..=5 {
            store.translate_axis(id, Axis::X, i as f32);
        }
        assert_eq!(store.history().len(), 3);
        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
        assert_eq!(store.get(id).unwrap().position.x, 3.0);
    }

    #[test]
    fn test_limits_are_enforced() {
        let config = ViewerConfig {
            limits: TransformLimits {
                translation: AxisLimits {
                    x: Some((-50.0, 50.0)),
                    ..Default::default()
                },
                rotation: AxisLimits::UNBOUNDED,
                scale: AxisLimits::uniform(0.5, 2.0),
            },
            ..Default::default()
        };
        let mut store = VisualizerStore::new(&config);
        let id = store.add_object(cube(Vec3::ONE));

        store.translate_axis(id, Axis::X, 500.0);
        store.scale_uniform(id, 10.0);
        let object = store.get(id).unwrap();
        assert_eq!(object.position.x, 50.0);
        assert_eq!(object.scale, Vec3::splat(2.0));

        store.apply_transform(id, Vec3::new(-80.0, 0.0, 0.0), Vec3::ZERO, Vec3::splat(0.1));
        let object = store.get(id).unwrap();
        assert_eq!(object.position.x, -50.0);
        assert_eq!(object.scale, Vec3::splat(0.5));
    }

    #[test]
    fn test_zero_scale_is_sanitized() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::ONE));
        store.scale_axis(id, Axis::Y, 0.0);
        let object = store.get(id).unwrap();
        assert_eq!(object.scale.y, MIN_SCALE);
        assert!(object.size.y > 0.0);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let mut store = VisualizerStore::default();
        let id = store.add_object(cube(Vec3::ONE));
        let before = store.snapshot();
        store.translate_axis(id, Axis::X, f32::NAN);
        store.rotate_axis(id, Axis::Y, f32::INFINITY);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_observers_receive_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();

        let mut store = VisualizerStore::default();
        let subscription = store.subscribe(move |event| sink.lock().push(event.clone()));
        let id = store.add_object(cube(Vec3::ONE));
        store.set_selected(Some(id));

        assert_eq!(
            *events.lock(),
            vec![
                StoreEvent::ObjectsChanged,
                StoreEvent::HistoryChanged,
                StoreEvent::SelectionChanged(Some(id)),
            ]
        );

        assert!(store.unsubscribe(subscription));
        store.set_selected(None);
        assert_eq!(events.lock().len(), 3);
    }

    #[test]
    fn test_snapshots_share_untouched_objects() {
        let mut store = VisualizerStore::default();
        let a = store.add_object(cube(Vec3::ONE));
        let b = store.add_object(cube(Vec3::ONE));
        let before = store.snapshot();

        store.translate_axis(a, Axis::X, 4.0);
        let after = store.snapshot();
        assert!(!Arc::ptr_eq(&before[0], &after[0]));
        assert!(Arc::ptr_eq(&before[1], &after[1]));
        assert_eq!(after[1].id, b);
    }
}
