//! 3MF loading

use std::io::Cursor;

use super::{GeometryError, RawMeshData};

/// Parse a 3MF package. Each build item becomes its own sub-mesh with the
/// item transform applied; packages without build items fall back to every
/// mesh object in the resources.
pub(crate) fn read_3mf(data: &[u8]) -> Result<Vec<RawMeshData>, GeometryError> {
    let model = lib3mf::Model::from_reader(Cursor::new(data))
        .map_err(|e| GeometryError::Parse(e.to_string()))?;

    let mut meshes = Vec::new();

    for item in &model.build.items {
        let Some(object) = model
            .resources
            .objects
            .iter()
            .find(|o| o.id == item.objectid)
        else {
            tracing::warn!("3MF build item references missing object {}", item.objectid);
            continue;
        };
        if let Some(mesh) = &object.mesh {
            meshes.push(convert_mesh(mesh, item.transform.as_ref()));
        }
    }

    if meshes.is_empty() {
        meshes = model
            .resources
            .objects
            .iter()
            .filter_map(|o| o.mesh.as_ref())
            .map(|mesh| convert_mesh(mesh, None))
            .collect();
    }

    if meshes.is_empty() {
        return Err(GeometryError::EmptyMesh);
    }
    Ok(meshes)
}

fn convert_mesh(mesh: &lib3mf::Mesh, transform: Option<&[f64; 12]>) -> RawMeshData {
    let vertices = mesh
        .vertices
        .iter()
        .map(|v| {
            let (x, y, z) = match transform {
                Some(t) => apply_transform([v.x, v.y, v.z], t),
                None => (v.x, v.y, v.z),
            };
            [x as f32, y as f32, z as f32]
        })
        .collect();

    let indices = mesh
        .triangles
        .iter()
        .flat_map(|t| [t.v1 as u32, t.v2 as u32, t.v3 as u32])
        .collect();

    RawMeshData { vertices, indices }
}

/// Apply a 3MF `transform` attribute.
///
/// The twelve values are the 4x3 matrix `m00 m01 m02 m10 m11 m12 m20 m21
/// m22 m30 m31 m32`, applied to row vectors: `[x y z 1] * M`.
fn apply_transform(p: [f64; 3], t: &[f64; 12]) -> (f64, f64, f64) {
    let [x, y, z] = p;
    (
        t[0] * x + t[3] * y + t[6] * z + t[9],
        t[1] * x + t[4] * y + t[7] * z + t[10],
        t[2] * x + t[5] * y + t[8] * z + t[11],
    )
}
