//! Physics module for collision detection
//!
//! A uniform grid supplies broad-phase candidates, bounding spheres prune
//! them, and oriented bounding boxes settle the rest with a SAT test.

pub mod collision;
pub mod collision_system;
pub mod error;

pub use collision::{
    BoundingSphere,
    BoxCollider,
    OrientedBoundingBox,
    ProjectionMode,
};
pub use collision_system::{
    CollisionReport,
    OverlapPolicy,
    Tomb,
    TombCollisionSystem,
    TombKey,
    TombStore,
};
pub use error::GeometryError;
