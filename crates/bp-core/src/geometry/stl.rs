//! STL loading

use std::collections::HashMap;
use std::io::Cursor;

use super::{GeometryError, RawMeshData};
use crate::constants::STL_VERTEX_PRECISION;

/// Parse binary or ASCII STL data into an indexed mesh
pub(crate) fn read_stl(data: &[u8]) -> Result<RawMeshData, GeometryError> {
    let mut reader = Cursor::new(data);
    let mesh = stl_io::read_stl(&mut reader).map_err(|e| GeometryError::Parse(e.to_string()))?;

    if mesh.faces.is_empty() {
        return Err(GeometryError::EmptyMesh);
    }

    Ok(index_mesh(&mesh))
}

/// Weld vertices that coincide after quantization
fn index_mesh(mesh: &stl_io::IndexedMesh) -> RawMeshData {
    let mut vertices: Vec<[f32; 3]> = Vec::new();
    let mut vertex_map: HashMap<[i32; 3], u32> = HashMap::new();
    let mut indices: Vec<u32> = Vec::with_capacity(mesh.faces.len() * 3);

    for face in &mesh.faces {
        for &vertex_idx in &face.vertices {
            let vertex = mesh.vertices[vertex_idx];
            let v = [vertex[0], vertex[1], vertex[2]];

            let key = [
                (v[0] * STL_VERTEX_PRECISION).round() as i32,
                (v[1] * STL_VERTEX_PRECISION).round() as i32,
                (v[2] * STL_VERTEX_PRECISION).round() as i32,
            ];

            let index = *vertex_map.entry(key).or_insert_with(|| {
                vertices.push(v);
                (vertices.len() - 1) as u32
            });
            indices.push(index);
        }
    }

    RawMeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_triangles(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
        let mesh: Vec<stl_io::Triangle> = triangles
            .iter()
            .map(|t| stl_io::Triangle {
                normal: stl_io::Normal::new([0.0, 0.0, 1.0]),
                vertices: [
                    stl_io::Vertex::new(t[0]),
                    stl_io::Vertex::new(t[1]),
                    stl_io::Vertex::new(t[2]),
                ],
            })
            .collect();
        let mut out = Vec::new();
        stl_io::write_stl(&mut out, mesh.iter()).unwrap();
        out
    }

    #[test]
    fn test_read_binary_stl_welds_vertices() {
        let data = write_triangles(&[
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        ]);
        let mesh = read_stl(&data).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn test_read_garbage_fails() {
        assert!(read_stl(b"definitely not an stl").is_err());
    }
}
