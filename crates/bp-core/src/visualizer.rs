//! Public API facade
//!
//! [`Visualizer`] wraps the store with file loading, selection-relative
//! edits in external axes, and queries that return [`ObjectView`]s.

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::config::ViewerConfig;
use crate::geometry::{
    Geometry, GeometryError, MeshFormat, load_geometry, load_geometry_from_bytes,
};
use crate::object::{Axis, NewObject, PlacedObject, TransformMode};
use crate::plate::ViolationCache;
use crate::store::{StoreEvent, SubscriptionId, VisualizerStore};
use crate::view::{ObjectView, component_axis_from_external, position_axis_from_external};

/// Viewer state plus the operations exposed to the UI layer
#[derive(Debug)]
pub struct Visualizer {
    store: VisualizerStore,
    config: ViewerConfig,
    violations: ViolationCache,
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl Visualizer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            store: VisualizerStore::new(&config),
            config,
            violations: ViolationCache::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn store(&self) -> &VisualizerStore {
        &self.store
    }

    /// Direct store access for the interaction layer (gizmo and drag commits)
    pub fn store_mut(&mut self) -> &mut VisualizerStore {
        &mut self.store
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&StoreEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // ============== Loading ==============

    /// Load a mesh file and place it on the plate.
    ///
    /// `combine` overrides the configured merge behaviour for multi-mesh
    /// files. Each resulting geometry becomes one object; all of them are
    /// added in a single history entry. Nothing is added on error.
    pub fn add_object_from_path(
        &mut self,
        path: impl AsRef<Path>,
        combine: Option<bool>,
    ) -> Result<Vec<Uuid>, GeometryError> {
        let path = path.as_ref();
        let format = MeshFormat::from_path(path)?;
        let combine = combine.unwrap_or(self.config.combine_meshes);
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("object")
            .to_string();

        let geometries = load_geometry(path, format, combine).inspect_err(|e| {
            tracing::error!("Failed to load {:?}: {}", path, e);
        })?;
        Ok(self.add_geometries(&name, format, geometries))
    }

    /// Load mesh file contents (e.g. a dropped file) and place them
    pub fn add_object_from_bytes(
        &mut self,
        name: &str,
        format: MeshFormat,
        data: &[u8],
        combine: Option<bool>,
    ) -> Result<Vec<Uuid>, GeometryError> {
        let combine = combine.unwrap_or(self.config.combine_meshes);
        let geometries = load_geometry_from_bytes(data, format, combine).inspect_err(|e| {
            tracing::error!("Failed to load '{}': {}", name, e);
        })?;
        Ok(self.add_geometries(name, format, geometries))
    }

    /// Place already-built geometry at default placement
    pub fn add_geometry(
        &mut self,
        name: &str,
        format: MeshFormat,
        geometry: Arc<Geometry>,
    ) -> Uuid {
        self.store.add_object(NewObject::new(name, format, geometry))
    }

    /// Place an object with explicit overrides
    pub fn add_object(&mut self, new_object: NewObject) -> Uuid {
        self.store.add_object(new_object)
    }

    fn add_geometries(
        &mut self,
        name: &str,
        format: MeshFormat,
        geometries: Vec<Geometry>,
    ) -> Vec<Uuid> {
        let count = geometries.len();
        self.store.batch(|store| {
            geometries
                .into_iter()
                .enumerate()
                .map(|(i, geometry)| {
                    let name = if count > 1 {
                        format!("{name}_{}", i + 1)
                    } else {
                        name.to_string()
                    };
                    store.add_object(NewObject::new(name, format, Arc::new(geometry)))
                })
                .collect()
        })
    }

    // ============== Object list ==============

    pub fn remove_selected_object(&mut self) {
        self.store.remove_selected();
    }

    pub fn remove_object_by_id(&mut self, id: Uuid) {
        self.store.remove_object(id);
    }

    pub fn clear_all_objects(&mut self) {
        self.store.clear_all();
    }

    /// Empty the plate and restore the default plate size
    pub fn reset(&mut self) {
        self.store.reset_all();
    }

    pub fn set_selected_object_by_id(&mut self, id: Option<Uuid>) {
        self.store.set_selected(id);
    }

    pub fn set_hovered_object_by_id(&mut self, id: Option<Uuid>) {
        self.store.set_hovered(id);
    }

    /// Width, depth, maximum height
    pub fn update_build_plate_size(&mut self, size: [f32; 3]) {
        self.store.set_build_plate_size(Vec3::from(size));
    }

    // ============== Selection-relative edits (external axes) ==============

    /// Set one position component of the selected object.
    ///
    /// `axis` is external: Y is depth and Z is up.
    pub fn translate_selected(&mut self, axis: Axis, value: f32) {
        let Some(id) = self.store.selected_id() else {
            return;
        };
        let (internal, sign) = position_axis_from_external(axis);
        self.store.translate_axis(id, internal, sign * value);
    }

    /// Set one rotation component (radians) of the selected object
    pub fn rotate_selected(&mut self, axis: Axis, value: f32) {
        let Some(id) = self.store.selected_id() else {
            return;
        };
        self.store
            .rotate_axis(id, component_axis_from_external(axis), value);
    }

    /// Set one scale component of the selected object
    pub fn scale_selected(&mut self, axis: Axis, value: f32) {
        let Some(id) = self.store.selected_id() else {
            return;
        };
        self.store
            .scale_axis(id, component_axis_from_external(axis), value);
    }

    pub fn translate_x_selected(&mut self, value: f32) {
        self.translate_selected(Axis::X, value);
    }

    pub fn translate_y_selected(&mut self, value: f32) {
        self.translate_selected(Axis::Y, value);
    }

    pub fn translate_z_selected(&mut self, value: f32) {
        self.translate_selected(Axis::Z, value);
    }

    pub fn rotate_x_selected(&mut self, value: f32) {
        self.rotate_selected(Axis::X, value);
    }

    pub fn rotate_y_selected(&mut self, value: f32) {
        self.rotate_selected(Axis::Y, value);
    }

    pub fn rotate_z_selected(&mut self, value: f32) {
        self.rotate_selected(Axis::Z, value);
    }

    pub fn scale_x_selected(&mut self, value: f32) {
        self.scale_selected(Axis::X, value);
    }

    pub fn scale_y_selected(&mut self, value: f32) {
        self.scale_selected(Axis::Y, value);
    }

    pub fn scale_z_selected(&mut self, value: f32) {
        self.scale_selected(Axis::Z, value);
    }

    pub fn scale_uniform_selected(&mut self, value: f32) {
        if let Some(id) = self.store.selected_id() {
            self.store.scale_uniform(id, value);
        }
    }

    pub fn set_transform_mode_selected(&mut self, mode: TransformMode) {
        if let Some(id) = self.store.selected_id() {
            self.store.set_transform_mode(id, mode);
        }
    }

    // ============== History ==============

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    pub fn clear_history(&mut self) {
        self.store.clear_history();
    }

    // ============== Queries ==============

    /// Every object in external axes
    pub fn all_objects(&self) -> Vec<ObjectView> {
        self.store.objects().iter().map(ObjectView::from).collect()
    }

    pub fn selected_object(&self) -> Option<ObjectView> {
        self.store.selected().map(ObjectView::from)
    }

    /// The selected object in internal (Y-up) axes
    pub fn selected_object_raw(&self) -> Option<Arc<PlacedObject>> {
        self.store.selected().cloned()
    }

    pub fn hovered_object(&self) -> Option<ObjectView> {
        self.store.hovered().map(ObjectView::from)
    }

    pub fn selected_object_id(&self) -> Option<Uuid> {
        self.store.selected_id()
    }

    pub fn hovered_object_id(&self) -> Option<Uuid> {
        self.store.hovered_id()
    }

    pub fn selected_object_format(&self) -> Option<MeshFormat> {
        self.store.selected().map(|o| o.format)
    }

    pub fn selected_object_position(&self) -> Option<Vec3> {
        self.selected_object().map(|o| o.position)
    }

    pub fn selected_object_rotation(&self) -> Option<Vec3> {
        self.selected_object().map(|o| o.rotation)
    }

    pub fn selected_object_scale(&self) -> Option<Vec3> {
        self.selected_object().map(|o| o.scale)
    }

    pub fn selected_object_size(&self) -> Option<Vec3> {
        self.selected_object().map(|o| o.size)
    }

    pub fn build_plate_size(&self) -> [f32; 3] {
        self.store.build_plate_size().to_array()
    }

    /// Ids of objects outside the build volume
    pub fn objects_out_of_plate(&mut self) -> Vec<Uuid> {
        self.violations.violations(&self.store).to_vec()
    }

    /// Whether any object is outside the build volume
    pub fn warning_models_out_of_plate(&mut self) -> bool {
        !self.violations.violations(&self.store).is_empty()
    }
}

/// Thread-safe shared viewer state
pub type SharedVisualizer = Arc<Mutex<Visualizer>>;

/// Create a new shared viewer with default configuration
pub fn create_shared_visualizer() -> SharedVisualizer {
    Arc::new(Mutex::new(Visualizer::default()))
}
