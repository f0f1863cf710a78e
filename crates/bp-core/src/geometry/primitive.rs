//! Primitive geometry generation

use glam::Vec3;

use super::Geometry;

impl Geometry {
    /// Axis-aligned box centered on the origin with the given extents.
    pub fn cuboid(size: Vec3) -> Geometry {
        let h = size * 0.5;
        let vertices = vec![
            [-h.x, -h.y, -h.z],
            [h.x, -h.y, -h.z],
            [h.x, h.y, -h.z],
            [-h.x, h.y, -h.z],
            [-h.x, -h.y, h.z],
            [h.x, -h.y, h.z],
            [h.x, h.y, h.z],
            [-h.x, h.y, h.z],
        ];

        // Outward-facing, counter-clockwise winding
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -Z
            4, 5, 6, 4, 6, 7, // +Z
            0, 1, 5, 0, 5, 4, // -Y
            3, 7, 6, 3, 6, 2, // +Y
            0, 4, 7, 0, 7, 3, // -X
            1, 2, 6, 1, 6, 5, // +X
        ];

        Geometry::new(vertices, indices)
    }
}
