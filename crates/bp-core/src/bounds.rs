//! Axis-aligned bounding boxes
//!
//! Used for object size, plate checks, gizmo anchoring and pointer picking.
//! An inverted box (min > max) is empty and reports a zero size.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in scene units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Inverted box that any point expands
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point; empty for no points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |bounds, point| bounds.expand_to_include(point))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Edge lengths; zero for an empty box
    pub fn size(&self) -> Vec3 {
        if self.is_valid() {
            self.max - self.min
        } else {
            Vec3::ZERO
        }
    }

    pub fn expand_to_include(&self, point: Vec3) -> Self {
        Self::new(self.min.min(point), self.max.max(point))
    }

    /// The eight corners, bit i of the index selecting max on axis i
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::select(
                glam::BVec3::new(i & 1 != 0, i & 2 != 0, i & 4 != 0),
                self.max,
                self.min,
            )
        })
    }

    /// Box around the transformed corners. Looser than the bounds of the
    /// transformed geometry once rotation is involved.
    pub fn transform(&self, transform: &Mat4) -> Self {
        if !self.is_valid() {
            return *self;
        }
        Self::from_points(self.corners().map(|c| transform.transform_point3(c)))
    }

    /// The box moved by `offset`
    pub fn translate(&self, offset: Vec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Point on the box selected by an anchor in `[-1, 1]` per axis.
    ///
    /// `[0, 0, 0]` is the center, `[0, -1, 0]` the middle of the bottom face.
    pub fn anchor_point(&self, anchor: Vec3) -> Vec3 {
        self.center() + self.half_extents() * anchor
    }

    /// Slab test against a ray. Returns the entry distance along `dir`.
    pub fn intersect_ray(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        if !self.is_valid() {
            return None;
        }

        let inv = dir.recip();
        let t0 = (self.min - origin) * inv;
        let t1 = (self.max - origin) * inv;
        let t_near = t0.min(t1).max_element();
        let t_far = t0.max(t1).min_element();

        if t_near.is_nan() || t_far.is_nan() || t_far < t_near.max(0.0) {
            return None;
        }
        Some(t_near.max(0.0))
    }

    /// False for an empty (inverted) box
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_center() {
        let bbox = BoundingBox::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bbox.center(), Vec3::ZERO);
        assert_eq!(bbox.size(), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_empty_box_has_zero_size() {
        assert_eq!(BoundingBox::empty().size(), Vec3::ZERO);
        assert!(!BoundingBox::empty().is_valid());
    }

    #[test]
    fn test_corners_and_transform() {
        let bbox = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        let corners = bbox.corners();
        assert_eq!(corners[0], Vec3::ZERO);
        assert_eq!(corners[5], Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(corners[7], Vec3::new(1.0, 2.0, 3.0));

        let moved = bbox.transform(&Mat4::from_translation(Vec3::X));
        assert_eq!(moved.min, Vec3::X);
        assert_eq!(moved.max, Vec3::new(2.0, 2.0, 3.0));
        assert!(!BoundingBox::empty().transform(&Mat4::IDENTITY).is_valid());
    }

    #[test]
    fn test_anchor_point_bottom() {
        let bbox = BoundingBox::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 4.0, 1.0));
        assert_eq!(bbox.anchor_point(Vec3::new(0.0, -1.0, 0.0)), Vec3::ZERO);
        assert_eq!(bbox.anchor_point(Vec3::ZERO), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_ray_hits_box() {
        let bbox = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = bbox.intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(t, Some(4.0));
        assert!(bbox.intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::Z).is_none());
        assert!(bbox.intersect_ray(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z).is_none());
    }
}
