//! Gizmo collision detection utilities
//!
//! Ray tests against the pickable shapes of the gizmo handles. Every test
//! returns the ray parameter `t` of the nearest hit in front of the origin.

use glam::Vec3;

use crate::constants::camera::PARALLEL_EPSILON;
use crate::ray::{Plane, Ray};

/// Ray against a finite cylinder between `start` and `end`.
///
/// The ray and the cylinder axis are projected onto the plane perpendicular
/// to the axis, which reduces the surface test to a 2D circle quadratic; the
/// hit is then checked against the cylinder length.
pub fn ray_cylinder_intersection(ray: &Ray, start: Vec3, end: Vec3, radius: f32) -> Option<f32> {
    let axis = (end - start).normalize_or_zero();
    let length = (end - start).length();
    if length <= 0.0 {
        return None;
    }

    let d = ray.direction - axis * ray.direction.dot(axis);
    let offset = ray.origin - start;
    let o = offset - axis * offset.dot(axis);

    let a = d.dot(d);
    if a < PARALLEL_EPSILON {
        // Ray runs along the axis
        return None;
    }
    let b = 2.0 * d.dot(o);
    let c = o.dot(o) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if t < 0.0 {
        return None;
    }

    let projection = (ray.at(t) - start).dot(axis);
    (0.0..=length).contains(&projection).then_some(t)
}

/// Ray against a ring (circle with thickness) lying in the plane through
/// `center` with normal `normal`.
pub fn ray_ring_intersection(
    ray: &Ray,
    center: Vec3,
    normal: Vec3,
    radius: f32,
    thickness: f32,
) -> Option<f32> {
    let hit = ray.intersect_plane(&Plane::from_point_normal(center, normal))?;
    let distance_from_ring = ((hit - center).length() - radius).abs();
    if distance_from_ring > thickness {
        return None;
    }
    Some((hit - ray.origin).dot(ray.direction))
}

/// Ray against a sphere
pub fn ray_sphere_intersection(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt = discriminant.sqrt();
    let near = -b - sqrt;
    if near >= 0.0 {
        return Some(near);
    }
    // Origin inside the sphere
    let far = -b + sqrt;
    (far >= 0.0).then_some(far)
}

/// Ray against the parallelogram `corner + u * edge1 + v * edge2`,
/// `u, v` in `0..=1`.
pub fn ray_quad_intersection(ray: &Ray, corner: Vec3, edge1: Vec3, edge2: Vec3) -> Option<f32> {
    let normal = edge1.cross(edge2);
    let hit = ray.intersect_plane(&Plane::from_point_normal(corner, normal))?;

    let local = hit - corner;
    let u = local.dot(edge1) / edge1.length_squared();
    let v = local.dot(edge2) / edge2.length_squared();
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
        return None;
    }
    Some((hit - ray.origin).dot(ray.direction))
}
