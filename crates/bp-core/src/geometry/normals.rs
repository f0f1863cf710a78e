//! Normal calculation utilities for mesh data

use glam::Vec3;

/// Calculate normal for a single triangle
pub fn calculate_triangle_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let (v0, v1, v2) = (Vec3::from(v0), Vec3::from(v1), Vec3::from(v2));
    let cross = (v1 - v0).cross(v2 - v0);
    if cross.length_squared() > 0.0 {
        cross.normalize().to_array()
    } else {
        [0.0, 1.0, 0.0]
    }
}

/// Calculate smooth per-vertex normals.
///
/// Face normals are accumulated unnormalized, so larger triangles weigh more.
/// Vertices that touch only degenerate triangles get `+Y`.
pub fn calculate_vertex_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accum = vec![Vec3::ZERO; vertices.len()];

    for chunk in indices.chunks(3) {
        if chunk.len() != 3 {
            continue;
        }
        let [a, b, c] = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }

        let v0 = Vec3::from(vertices[a]);
        let face = (Vec3::from(vertices[b]) - v0).cross(Vec3::from(vertices[c]) - v0);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    accum
        .into_iter()
        .map(|n| {
            if n.length_squared() > 0.0 {
                n.normalize().to_array()
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}
