//! Collider shapes stored in model space
//!
//! A [`BoxCollider`] holds the fixed local extent of an entity type plus the
//! radius of its prefilter sphere. World-space shapes are produced on demand
//! from the entity's current rotation and translation.

use serde::{Deserialize, Serialize};

use super::obb::OrientedBoundingBox;
use super::primitives::BoundingSphere;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::physics::error::GeometryError;

/// Model-space box collider for one entity type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxCollider {
    /// Minimum corner of the local extent (before scaling)
    pub local_min: Vec3,
    /// Maximum corner of the local extent (before scaling)
    pub local_max: Vec3,
    /// Uniform scale applied by the world transform
    pub scale: f32,
    /// Radius of the bounding sphere used by the prefilter, in world units
    pub sphere_radius: f32,
}

impl BoxCollider {
    /// Player hitbox: a 1 x 1 x 4 slab standing on its base, scaled by 50
    pub fn player() -> Self {
        Self {
            local_min: Vec3::new(-0.5, 0.0, -2.0),
            local_max: Vec3::new(0.5, 1.0, 2.0),
            scale: 50.0,
            sphere_radius: 100.0,
        }
    }

    /// Tomb hitbox: a thin 1 x 1 x 0.08 wall, scaled by 30
    pub fn tomb() -> Self {
        Self {
            local_min: Vec3::new(-0.5, 0.0, -0.04),
            local_max: Vec3::new(0.5, 1.0, 0.04),
            scale: 30.0,
            sphere_radius: 50.0,
        }
    }

    /// World transform for an entity posed at `rotation` / `translation`
    pub fn transform(&self, rotation: Quat, translation: Vec3) -> Transform {
        Transform::from_rotation_translation_scale(rotation, translation, self.scale)
    }

    /// World-space OBB for an entity posed at `rotation` / `translation`
    pub fn world_box(&self, rotation: Quat, translation: Vec3) -> Result<OrientedBoundingBox, GeometryError> {
        let matrix = self.transform(rotation, translation).to_matrix();
        OrientedBoundingBox::from_transform(&self.local_min, &self.local_max, &matrix)
    }

    /// Prefilter sphere centred on the entity's translation
    pub fn bounding_sphere(&self, translation: Vec3) -> BoundingSphere {
        BoundingSphere::new(translation, self.sphere_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::yaw_rotation;
    use approx::assert_relative_eq;

    #[test]
    fn test_tomb_world_box_is_rotated_slab() {
        let collider = BoxCollider::tomb();
        let obb = collider
            .world_box(yaw_rotation(90.0), Vec3::new(100.0, 0.0, 100.0))
            .unwrap();

        // Rotated 90 degrees: the 30-unit width now runs along world Z
        let xs: Vec<f32> = obb.corners().iter().map(|c| c.x).collect();
        let zs: Vec<f32> = obb.corners().iter().map(|c| c.z).collect();
        let span = |v: &[f32]| {
            v.iter().copied().fold(f32::NEG_INFINITY, f32::max)
                - v.iter().copied().fold(f32::INFINITY, f32::min)
        };
        assert_relative_eq!(span(&xs), 2.4, epsilon = 1e-3);
        assert_relative_eq!(span(&zs), 30.0, epsilon = 1e-3);
    }

    #[test]
    fn test_bounding_sphere_uses_translation() {
        let sphere = BoxCollider::player().bounding_sphere(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.center, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.radius, 100.0);
    }
}
