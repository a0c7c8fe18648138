//! # Chase Camera
//!
//! Camera pose and perspective parameters for the trail view. The collision
//! core never draws anything; the camera exists to drive the culling
//! [`Frustum`] and to hand view/projection matrices to whatever renders the
//! scene.

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use crate::physics::error::GeometryError;
use crate::render::frustum::Frustum;

/// Perspective camera
///
/// Uses a right-handed Y-up coordinate system in view space. Matrices are
/// computed on demand rather than cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera at `position` looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees (stored as radians)
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use trail_engine::foundation::math::Vec3;
    /// use trail_engine::render::Camera;
    ///
    /// let camera = Camera::perspective(Vec3::new(0.0, 400.0, -700.0), 45.0, 16.0 / 9.0, 0.01, 10_000.0);
    /// assert!((camera.fov - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    /// ```
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Camera with the projection parameters of `config`, at the origin
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::zeros(),
            target: Vec3::new(0.0, 0.0, 1.0),
            up: Vec3::y(),
            fov: config.fov,
            aspect: config.aspect,
            near: config.near,
            far: config.far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Set the target point and up vector together
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Unit vector from the eye toward the target, `None` when they coincide
    pub fn view_direction(&self) -> Option<Vec3> {
        utils::try_normalize(&(self.target - self.position))
    }

    /// World-to-camera matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined `projection * view`
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Push the projection parameters and pose into `frustum`
    pub fn update_frustum(&self, frustum: &mut Frustum) -> Result<(), GeometryError> {
        frustum.update_perspective(self.fov, self.aspect, self.near, self.far)?;
        frustum.update_camera(self.position, self.target, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
