//! Mesh geometry and file loading (STL, OBJ, 3MF formats)
//!
//! Every loader produces [`RawMeshData`] per sub-mesh. [`finish_meshes`] then
//! merges or splits them, re-orients the Z-up file data into the Y-up scene,
//! centers each result and computes vertex normals and bounds. Geometry is
//! immutable once built and shared between objects through `Arc`.

mod normals;
mod obj;
mod primitive;
mod stl;
mod threemf;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;

pub use normals::{calculate_triangle_normal, calculate_vertex_normals};

/// Raw mesh data extracted from a file (before re-orientation)
#[derive(Debug, Clone, Default)]
pub(crate) struct RawMeshData {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl RawMeshData {
    fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.len() < 3
    }

    fn append(&mut self, other: RawMeshData) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + offset));
    }

    /// Rotate from Z-up file space into the Y-up scene and center on the
    /// bounding box center.
    fn into_scene_geometry(self) -> Geometry {
        let to_y_up = Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        let rotated: Vec<Vec3> = self
            .vertices
            .iter()
            .map(|v| to_y_up.transform_point3(Vec3::from(*v)))
            .collect();
        let center = BoundingBox::from_points(rotated.iter().copied()).center();
        let vertices = rotated.into_iter().map(|v| (v - center).to_array()).collect();
        Geometry::new(vertices, self.indices)
    }
}

/// Supported mesh file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshFormat {
    Stl,
    Obj,
    ThreeMf,
}

impl MeshFormat {
    /// Detect format from file path
    pub fn from_path(path: &Path) -> Result<Self, GeometryError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }

    /// Lowercase format tag as used in file extensions
    pub fn as_str(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "stl",
            MeshFormat::Obj => "obj",
            MeshFormat::ThreeMf => "3mf",
        }
    }

    /// Get format name
    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "STL",
            MeshFormat::Obj => "OBJ",
            MeshFormat::ThreeMf => "3MF",
        }
    }
}

impl FromStr for MeshFormat {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stl" => Ok(MeshFormat::Stl),
            "obj" => Ok(MeshFormat::Obj),
            "3mf" => Ok(MeshFormat::ThreeMf),
            other => Err(GeometryError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drawable triangle mesh with precomputed bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Vertex positions
    vertices: Vec<[f32; 3]>,
    /// Per-vertex normals
    normals: Vec<[f32; 3]>,
    /// Triangle indices
    indices: Vec<u32>,
    bounding_box: BoundingBox,
}

impl Geometry {
    /// Build a geometry from indexed triangles, computing normals and bounds.
    pub fn new(vertices: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        let normals = calculate_vertex_normals(&vertices, &indices);
        let bounding_box = BoundingBox::from_points(vertices.iter().map(|v| Vec3::from(*v)));
        Self {
            vertices,
            normals,
            indices,
            bounding_box,
        }
    }

    /// Vertex positions in geometry space
    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    /// Per-vertex normals
    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    /// Triangle indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounding box in geometry space
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Extents of the bounding box in geometry space
    pub fn size(&self) -> Vec3 {
        self.bounding_box.size()
    }

    /// Tight axis-aligned bounds of the geometry after `transform`.
    ///
    /// Every vertex is transformed, so rotated geometry does not inherit the
    /// slack of a rotated box. Falls back to the box corners when the
    /// geometry has no vertices.
    pub fn transformed_bounds(&self, transform: &Mat4) -> BoundingBox {
        if self.vertices.is_empty() {
            return self.bounding_box.transform(transform);
        }
        BoundingBox::from_points(
            self.vertices
                .iter()
                .map(|v| transform.transform_point3(Vec3::from(*v))),
        )
    }
}

/// Load a mesh file. Returns one geometry when `combine` is set, otherwise
/// one per sub-mesh.
pub fn load_geometry(
    path: impl AsRef<Path>,
    format: MeshFormat,
    combine: bool,
) -> Result<Vec<Geometry>, GeometryError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| GeometryError::Io(e.to_string()))?;
    tracing::debug!("Read {} bytes from {:?}", data.len(), path);
    load_geometry_from_bytes(&data, format, combine)
}

/// Load a mesh from in-memory file contents
pub fn load_geometry_from_bytes(
    data: &[u8],
    format: MeshFormat,
    combine: bool,
) -> Result<Vec<Geometry>, GeometryError> {
    let meshes = match format {
        MeshFormat::Stl => vec![stl::read_stl(data)?],
        MeshFormat::Obj => obj::read_obj(data)?,
        MeshFormat::ThreeMf => threemf::read_3mf(data)?,
    };
    finish_meshes(meshes, combine)
}

/// Merge or split raw sub-meshes and bring them into scene space
pub(crate) fn finish_meshes(
    meshes: Vec<RawMeshData>,
    combine: bool,
) -> Result<Vec<Geometry>, GeometryError> {
    let count = meshes.len();
    let meshes: Vec<RawMeshData> = meshes.into_iter().filter(|m| !m.is_empty()).collect();
    if meshes.is_empty() {
        return Err(if combine {
            GeometryError::Merge(format!("{count} sub-meshes produced no triangles"))
        } else {
            GeometryError::EmptyMesh
        });
    }

    if combine {
        let mut merged = RawMeshData::default();
        for mesh in meshes {
            merged.append(mesh);
        }
        Ok(vec![merged.into_scene_geometry()])
    } else {
        Ok(meshes
            .into_iter()
            .map(RawMeshData::into_scene_geometry)
            .collect())
    }
}

/// Geometry loading errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeometryError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to merge geometries: {0}")]
    Merge(String),
}
