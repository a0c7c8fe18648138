//! # View System
//!
//! Camera and frustum culling for the trail scene. Drawing itself belongs to
//! an external renderer; this module only decides what would be visible and
//! provides the matrices to draw it with.
//!
//! - **Camera**: chase-camera pose plus perspective parameters
//! - **Frustum**: six inward-facing planes and box/point containment tests

pub mod camera;
pub mod frustum;

pub use camera::Camera;
pub use frustum::{Containment, Frustum, FrustumPlane, Plane};
