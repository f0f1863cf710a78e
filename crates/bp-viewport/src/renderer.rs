//! Renderer-facing scene description
//!
//! The viewer core never talks to a GPU. Each frame it describes what to
//! draw: the plate, one instance per object with its highlight colour, the
//! corner markers of the selected object and the gizmo. A [`SceneRenderer`]
//! backend turns that into draw calls whenever the [`RedrawFlag`] is raised.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bp_core::constants::colors;
use bp_core::{BoundingBox, Geometry, PlacedObject, SubscriptionId, VisualizerStore};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use uuid::Uuid;

use crate::constants::markers;
use crate::gizmo::{GizmoInstance, GizmoStyleUniform};

/// Backend that draws a [`SceneDescription`]
pub trait SceneRenderer {
    /// Draw one frame
    fn render(&mut self, scene: &SceneDescription);
}

/// Highlight state of an object, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectHighlight {
    /// Outside the build volume
    OutOfPlate,
    /// Selected
    Selected,
    /// Under the pointer
    Hovered,
    /// Anything else
    Normal,
}

impl ObjectHighlight {
    /// Resolve the highlight for one object
    pub fn resolve(out_of_plate: bool, selected: bool, hovered: bool) -> Self {
        if out_of_plate {
            Self::OutOfPlate
        } else if selected {
            Self::Selected
        } else if hovered {
            Self::Hovered
        } else {
            Self::Normal
        }
    }

    /// RGBA colour
    pub fn color(self) -> [f32; 4] {
        let hex = match self {
            Self::OutOfPlate => colors::OUT_OF_PLATE,
            Self::Selected => colors::SELECTED,
            Self::Hovered => colors::HOVERED,
            Self::Normal => colors::DEFAULT,
        };
        colors::to_rgba(hex)
    }
}

/// Per-object instance data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ObjectInstance {
    /// Model matrix
    pub model: [[f32; 4]; 4],
    /// Base colour (RGBA)
    pub color: [f32; 4],
}

impl ObjectInstance {
    /// Create an instance from a model matrix and highlight
    pub fn new(model: Mat4, highlight: ObjectHighlight) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: highlight.color(),
        }
    }
}

/// One object to draw
#[derive(Debug, Clone)]
pub struct ObjectDraw {
    /// Object id
    pub id: Uuid,
    /// Mesh shared with the store
    pub geometry: Arc<Geometry>,
    /// Highlight state
    pub highlight: ObjectHighlight,
    /// GPU instance data
    pub instance: ObjectInstance,
}

/// Line segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point
    pub start: Vec3,
    /// End point
    pub end: Vec3,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Default)]
pub struct SceneDescription {
    /// Plate width, depth, height
    pub plate_size: Vec3,
    /// Objects in store order
    pub objects: Vec<ObjectDraw>,
    /// Corner markers of the selected object
    pub corner_markers: Vec<LineSegment>,
    /// Gizmo placement, if attached
    pub gizmo: Option<GizmoInstance>,
    /// Gizmo colours
    pub gizmo_style: Option<GizmoStyleUniform>,
}

impl SceneDescription {
    /// Object draw entry by id
    pub fn object(&self, id: Uuid) -> Option<&ObjectDraw> {
        self.objects.iter().find(|o| o.id == id)
    }
}

/// Corner markers for a box in local space, placed by `transform`.
///
/// Three short lines run inward from each corner along the box edges; their
/// length is a fraction of the smallest box dimension. Bottom markers are
/// lifted slightly so they do not z-fight with the plate.
pub fn corner_markers(bounds: &BoundingBox, transform: &Mat4) -> Vec<LineSegment> {
    if !bounds.is_valid() {
        return Vec::new();
    }
    let (min, max) = (bounds.min, bounds.max);
    let length = bounds.size().min_element() * markers::LENGTH_FRACTION;

    let mut segments = Vec::with_capacity(24);
    for (x, dx) in [(min.x, 1.0), (max.x, -1.0)] {
        for (y, dy, lift) in [(min.y, 1.0, markers::BOTTOM_OFFSET), (max.y, -1.0, 0.0)] {
            for (z, dz) in [(min.z, 1.0), (max.z, -1.0)] {
                let corner = Vec3::new(x, y + lift, z);
                for dir in [Vec3::X * dx, Vec3::Y * dy, Vec3::Z * dz] {
                    segments.push(LineSegment {
                        start: transform.transform_point3(corner),
                        end: transform.transform_point3(corner + dir * length),
                    });
                }
            }
        }
    }
    segments
}

/// Build the scene for the current store state.
///
/// `overrides` replaces the model matrix of objects being previewed by a
/// gesture that has not been committed yet.
pub fn describe_scene(
    store: &VisualizerStore,
    violations: &[Uuid],
    overrides: &[(Uuid, Mat4)],
    gizmo: Option<GizmoInstance>,
    gizmo_style: Option<GizmoStyleUniform>,
) -> SceneDescription {
    let selected = store.selected_id();
    let hovered = store.hovered_id();
    let model_of = |object: &PlacedObject| {
        overrides
            .iter()
            .find(|(id, _)| *id == object.id)
            .map_or_else(|| object.matrix(), |(_, m)| *m)
    };

    let objects = store
        .objects()
        .iter()
        .map(|object| {
            let highlight = ObjectHighlight::resolve(
                violations.contains(&object.id),
                selected == Some(object.id),
                hovered == Some(object.id),
            );
            ObjectDraw {
                id: object.id,
                geometry: Arc::clone(&object.geometry),
                highlight,
                instance: ObjectInstance::new(model_of(object.as_ref()), highlight),
            }
        })
        .collect();

    let corner_markers = store
        .selected()
        .map(|object| corner_markers(&object.geometry.bounding_box(), &model_of(object.as_ref())))
        .unwrap_or_default();

    SceneDescription {
        plate_size: store.build_plate_size(),
        objects,
        corner_markers,
        gizmo,
        gizmo_style,
    }
}

/// Redraw request flag set by store observers
#[derive(Debug, Clone, Default)]
pub struct RedrawFlag {
    requested: Arc<AtomicBool>,
}

impl RedrawFlag {
    /// Create a flag with no pending request
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a redraw
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Consume a pending request
    pub fn take(&self) -> bool {
        self.requested.swap(false, Ordering::AcqRel)
    }

    /// Request a redraw on every store event
    pub fn connect(&self, store: &mut VisualizerStore) -> SubscriptionId {
        let flag = self.clone();
        store.subscribe(move |_| flag.request())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_core::{MeshFormat, NewObject, ViewerConfig};

    fn store_with_cubes() -> (VisualizerStore, Uuid, Uuid) {
        let mut store = VisualizerStore::new(&ViewerConfig::default());
        let geometry = Arc::new(Geometry::cuboid(Vec3::new(10.0, 20.0, 30.0)));
        let a = store.add_object(NewObject::new("a", MeshFormat::Stl, Arc::clone(&geometry)));
        let b = store.add_object(
            NewObject::new("b", MeshFormat::Stl, geometry).with_position(Vec3::new(500.0, 10.0, 0.0)),
        );
        (store, a, b)
    }

    #[test]
    fn test_highlight_priority() {
        assert_eq!(ObjectHighlight::resolve(true, true, true), ObjectHighlight::OutOfPlate);
        assert_eq!(ObjectHighlight::resolve(false, true, true), ObjectHighlight::Selected);
        assert_eq!(ObjectHighlight::resolve(false, false, true), ObjectHighlight::Hovered);
        assert_eq!(ObjectHighlight::resolve(false, false, false), ObjectHighlight::Normal);
        assert_eq!(ObjectHighlight::OutOfPlate.color(), colors::to_rgba(0xef4444));
    }

    #[test]
    fn test_corner_markers() {
        let bounds = BoundingBox::new(Vec3::ZERO, Vec3::new(10.0, 20.0, 30.0));
        let segments = corner_markers(&bounds, &Mat4::IDENTITY);
        assert_eq!(segments.len(), 24);
        for segment in &segments {
            assert!((segment.end.distance(segment.start) - 3.0).abs() < 1e-5);
        }
        // First corner is the lifted bottom corner at min
        assert_eq!(segments[0].start, Vec3::new(0.0, 0.1, 0.0));
        assert_eq!(segments[0].end, Vec3::new(3.0, 0.1, 0.0));

        assert!(corner_markers(&BoundingBox::empty(), &Mat4::IDENTITY).is_empty());
    }

    #[test]
    fn test_describe_scene() {
        let (mut store, a, b) = store_with_cubes();
        store.set_selected(Some(a));
        store.set_hovered(Some(b));

        let scene = describe_scene(&store, &[b], &[], None, None);
        assert_eq!(scene.objects.len(), 2);
        assert_eq!(scene.object(a).unwrap().highlight, ObjectHighlight::Selected);
        assert_eq!(scene.object(b).unwrap().highlight, ObjectHighlight::OutOfPlate);
        assert_eq!(scene.corner_markers.len(), 24);
        assert_eq!(scene.plate_size, Vec3::new(235.0, 235.0, 250.0));
    }

    #[test]
    fn test_override_matrix() {
        let (store, a, _) = store_with_cubes();
        let moved = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let scene = describe_scene(&store, &[], &[(a, moved)], None, None);
        assert_eq!(scene.object(a).unwrap().instance.model, moved.to_cols_array_2d());
        assert!(scene.corner_markers.is_empty());
    }

    #[test]
    fn test_redraw_flag_follows_store() {
        let (mut store, a, _) = store_with_cubes();
        let flag = RedrawFlag::new();
        let subscription = flag.connect(&mut store);
        assert!(!flag.take());

        store.set_selected(Some(a));
        assert!(flag.take());
        assert!(!flag.take());

        store.unsubscribe(subscription);
        store.set_selected(None);
        assert!(!flag.take());
    }
}
