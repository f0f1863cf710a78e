//! OBJ loading

use std::io::Cursor;

use super::{GeometryError, RawMeshData};

/// Parse OBJ data. Each object/group becomes its own sub-mesh.
pub(crate) fn read_obj(data: &[u8]) -> Result<Vec<RawMeshData>, GeometryError> {
    let mut reader = Cursor::new(data);
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )
    .map_err(|e| GeometryError::Parse(e.to_string()))?;

    if models.is_empty() {
        return Err(GeometryError::EmptyMesh);
    }

    let meshes = models
        .iter()
        .map(|model| {
            let mesh = &model.mesh;
            let vertices = mesh
                .positions
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect();
            tracing::debug!(
                "OBJ model '{}': {} triangles",
                model.name,
                mesh.indices.len() / 3
            );
            RawMeshData {
                vertices,
                indices: mesh.indices.clone(),
            }
        })
        .collect();

    Ok(meshes)
}
