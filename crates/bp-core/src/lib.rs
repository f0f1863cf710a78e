//! Build plate core
//!
//! Object placement state for a 3D printer build plate viewer.
//!
//! # Module Structure
//!
//! ```text
//! bp-core/
//! ├── geometry/     # Mesh loading (STL, OBJ, 3MF), normals, primitives
//! ├── bounds.rs     # Axis-aligned bounding boxes
//! ├── object.rs     # PlacedObject, transform mode, drop-to-plate
//! ├── store.rs      # Transform store with observers
//! ├── history.rs    # Snapshot undo/redo
//! ├── plate.rs      # Build-volume violation checks
//! ├── view.rs       # External (Z-up) axis convention
//! ├── visualizer.rs # Public API facade
//! └── config.rs     # RON configuration
//! ```

pub mod bounds;
pub mod config;
pub mod constants;
pub mod geometry;
pub mod history;
pub mod object;
pub mod plate;
pub mod store;
pub mod view;
pub mod visualizer;

pub use bounds::BoundingBox;
pub use config::{AxisLimits, ConfigError, TransformLimits, ViewerConfig};
pub use geometry::{Geometry, GeometryError, MeshFormat, load_geometry, load_geometry_from_bytes};
pub use history::History;
pub use object::{Axis, NewObject, PlacedObject, TransformMode};
pub use plate::{ViolationCache, find_violations, is_out_of_plate};
pub use store::{ObjectsSnapshot, StoreEvent, SubscriptionId, VisualizerStore};
pub use view::ObjectView;
pub use visualizer::{SharedVisualizer, Visualizer, create_shared_visualizer};
