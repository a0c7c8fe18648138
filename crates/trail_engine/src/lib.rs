//! # Trail Engine
//!
//! Collision and visibility core for a game in which a player-steered avatar
//! leaves a trail of obstacles ("tombs") behind it.
//!
//! ## Features
//!
//! - **Spatial Grid**: uniform bucket grid used as the collision broad phase
//! - **OBB / SAT**: oriented bounding boxes and separating-axis overlap tests
//! - **Frustum Culling**: six-plane view volume with box classification
//! - **Session Loop**: player kinematics, tomb spawning and eviction per frame
//! - **Config Files**: every tunable loadable from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use trail_engine::prelude::*;
//!
//! fn main() -> Result<(), SessionError> {
//!     let mut session = GameSession::new(SessionConfig::default())?;
//!     for _ in 0..10 {
//!         session.steer(-40.0, 0.0);
//!         let report = session.step(1.0 / 60.0)?;
//!         if report.collided {
//!             println!("hit {} tomb(s)", report.hits.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod foundation;
pub mod game;
pub mod physics;
pub mod render;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{CameraConfig, CollisionConfig, Config, ConfigError, ConfigFormat, GridConfig, PlayerConfig, SessionConfig},
        foundation::{
            math::{yaw_rotation, Mat4, Quat, Transform, Vec3},
            time::{IntervalTimer, Stopwatch, Timer},
        },
        game::{FrameReport, GameSession, Player, SessionError},
        physics::{
            BoundingSphere, BoxCollider, CollisionReport, GeometryError, OrientedBoundingBox, OverlapPolicy,
            ProjectionMode, Tomb, TombCollisionSystem, TombKey, TombStore,
        },
        render::{Camera, Containment, Frustum, FrustumPlane, Plane},
        spatial::{SpatialGrid, DEFAULT_NEIGHBOR_RADIUS},
    };
}
