//! Rays and planes

use glam::Vec3;

use crate::constants::camera::PARALLEL_EPSILON;

/// A half-line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; `direction` is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t`
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersection with a plane in front of the origin.
    ///
    /// Returns `None` when the ray is parallel to the plane or the plane is
    /// behind the ray.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denom = self.direction.dot(plane.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = -plane.distance_to_point(self.origin) / denom;
        if t < 0.0 {
            return None;
        }

        Some(self.at(t))
    }

    /// Parameter along the line `line_point + s * line_dir` of the point
    /// closest to this ray. `line_dir` must be unit length.
    ///
    /// Returns `None` when ray and line are parallel.
    pub fn closest_param_on_line(&self, line_point: Vec3, line_dir: Vec3) -> Option<f32> {
        let w = self.origin - line_point;
        let b = self.direction.dot(line_dir);
        let denom = 1.0 - b * b;
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let d = self.direction.dot(w);
        let e = line_dir.dot(w);
        Some((e - b * d) / denom)
    }
}

/// A plane in 3D space (n·p + d = 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Vec3,
    /// Signed distance term
    pub distance: f32,
}

impl Plane {
    /// Creates a plane from a point and normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalize_or_zero();
        Self {
            normal: n,
            distance: -n.dot(point),
        }
    }

    /// Returns the signed distance from a point to the plane.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Orthogonal projection of a point onto the plane
    pub fn project_point(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.distance_to_point(point)
    }
}
