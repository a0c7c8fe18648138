//! Primitive collision shapes
//!
//! Bounding spheres are the cheap prefilter that runs between the grid
//! broad phase and the OBB narrow phase.

use crate::foundation::math::Vec3;

/// A bounding sphere for collision prefiltering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere overlaps another.
    ///
    /// Strict: spheres that only touch (`distance == r1 + r2`) do not overlap.
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared < radius_sum * radius_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_overlap_is_strict() {
        let a = BoundingSphere::new(Vec3::zeros(), 1.0);
        let touching = BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let overlapping = BoundingSphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0);

        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }
}
