//! Collision geometry
//!
//! Narrow-phase building blocks for the tomb collision system.
//!
//! # Module Organization
//!
//! - [`primitives`] - Bounding spheres for the prefilter
//! - [`obb`] - Oriented bounding boxes and axis projection
//! - [`sat`] - Separating Axis Theorem tests between boxes
//! - [`shape`] - Model-space colliders turned into world-space shapes on demand

pub mod primitives;
pub mod obb;
pub mod sat;
pub mod shape;

pub use primitives::BoundingSphere;
pub use obb::{OrientedBoundingBox, Projection, ProjectionMode};
pub use sat::{intervals_overlap, sat_collision, sat_collision_full};
pub use shape::BoxCollider;
