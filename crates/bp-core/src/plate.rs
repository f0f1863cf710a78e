//! Build-volume checks
//!
//! The plate is centred on the origin: X spans `±width/2`, Z spans
//! `±depth/2`, and objects may rise up to `height` above Y = 0.

use std::sync::Arc;

use glam::Vec3;
use uuid::Uuid;

use crate::bounds::BoundingBox;
use crate::object::PlacedObject;
use crate::store::VisualizerStore;

/// Whether world-space bounds leave a plate of `plate_size` (width, depth, height)
pub fn bounds_out_of_plate(bounds: &BoundingBox, plate_size: Vec3) -> bool {
    if !bounds.is_valid() {
        return false;
    }
    let half_width = plate_size.x / 2.0;
    let half_depth = plate_size.y / 2.0;

    bounds.min.x < -half_width
        || bounds.max.x > half_width
        || bounds.min.z < -half_depth
        || bounds.max.z > half_depth
        || bounds.size().y > plate_size.z
}

/// Whether a single object violates the build volume.
///
/// Uses the bounds of the geometry under the object's current transform.
pub fn is_out_of_plate(object: &PlacedObject, plate_size: Vec3) -> bool {
    bounds_out_of_plate(&object.world_bounds(), plate_size)
}

/// Objects that do not fit the build volume, in input order
pub fn find_violations(
    objects: &[Arc<PlacedObject>],
    plate_size: Vec3,
) -> Vec<Arc<PlacedObject>> {
    objects
        .iter()
        .filter(|object| is_out_of_plate(object, plate_size))
        .cloned()
        .collect()
}

/// Memoized violation ids, keyed by store revision and plate size
#[derive(Debug, Clone, Default)]
pub struct ViolationCache {
    key: Option<(u64, Vec3)>,
    ids: Vec<Uuid>,
}

impl ViolationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the objects currently outside the plate
    pub fn violations(&mut self, store: &VisualizerStore) -> &[Uuid] {
        let key = (store.revision(), store.build_plate_size());
        if self.key != Some(key) {
            self.ids = find_violations(store.objects(), key.1)
                .iter()
                .map(|object| object.id)
                .collect();
            self.key = Some(key);
        }
        &self.ids
    }

    pub fn contains(&mut self, store: &VisualizerStore, id: Uuid) -> bool {
        self.violations(store).contains(&id)
    }
}
