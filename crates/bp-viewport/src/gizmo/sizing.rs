//! Screen-space constant gizmo sizing

use glam::Vec3;

use crate::camera::{Camera, Viewport};

/// World-space length that spans `radius_px` pixels at `point`.
///
/// The point is projected to the screen, offset by the pixel radius along
/// each screen axis and unprojected at the same depth; the larger of the two
/// world distances wins.
pub fn calculate_scale_factor(
    point: Vec3,
    radius_px: f32,
    camera: &Camera,
    viewport: &Viewport,
) -> f32 {
    let screen = camera.project(point, viewport);
    let mut scale: f32 = 0.0;
    for i in 0..2 {
        let mut offset = screen;
        offset[i] += radius_px;
        let world = camera.unproject(offset, viewport);
        scale = scale.max(point.distance(world));
    }
    scale
}
