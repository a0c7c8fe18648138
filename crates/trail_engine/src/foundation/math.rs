//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of helpers the collision core
//! needs: world transforms for players and tombs, yaw rotations, and the
//! camera matrices handed to the external renderer.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// World transform: translation, rotation and (possibly non-uniform) scale.
///
/// Composed as `T * R * S`, so local points are scaled first, then rotated,
/// then moved into place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Transform from rotation, translation and a uniform scale factor
    pub fn from_rotation_translation_scale(rotation: Quat, position: Vec3, scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::new(scale, scale, scale),
        }
    }

    /// Convert to a 4x4 world matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.to_matrix()
            .transform_point(&Point3::from(point))
            .coords
    }
}

/// Rotation of `degrees` around the world Y axis.
///
/// Positive angles turn `+Z` toward `+X`.
pub fn yaw_rotation(degrees: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), utils::deg_to_rad(degrees))
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Below this squared length a direction is treated as zero
    pub const DEGENERATE_LENGTH_SQUARED: f32 = 1.0e-12;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Normalize `v`, or `None` when it is too short (or not finite) to carry a direction
    pub fn try_normalize(v: &Vec3) -> Option<Vec3> {
        v.try_normalize(constants::DEGENERATE_LENGTH_SQUARED.sqrt())
            .filter(|n| n.iter().all(|c| c.is_finite()))
    }

    /// True when every component is finite
    pub fn is_finite(v: &Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}

/// Extension trait for Mat4 with the camera matrices used by the renderer
pub trait Mat4Ext {
    /// Create a right-handed perspective projection matrix (OpenGL clip space)
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_yaw_rotation_turns_forward_toward_x() {
        let forward = yaw_rotation(90.0) * Vec3::z();
        assert_relative_eq!(forward, Vec3::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_transform_applies_scale_before_translation() {
        let transform = Transform::from_rotation_translation_scale(
            Quat::identity(),
            Vec3::new(10.0, 0.0, 0.0),
            2.0,
        );
        let p = transform.transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Vec3::new(12.0, 2.0, 2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_try_normalize_rejects_zero() {
        assert!(utils::try_normalize(&Vec3::zeros()).is_none());
        assert!(utils::try_normalize(&Vec3::new(f32::NAN, 0.0, 0.0)).is_none());
        assert_relative_eq!(
            utils::try_normalize(&Vec3::new(0.0, 3.0, 0.0)).unwrap(),
            Vec3::y(),
            epsilon = 1e-6
        );
    }
}
