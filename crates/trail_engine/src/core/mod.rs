//! # Core Module
//!
//! Shared session-level configuration used by every subsystem.

pub mod config;

pub use config::{
    CameraConfig,
    CollisionConfig,
    Config,
    ConfigError,
    ConfigFormat,
    GridConfig,
    PlayerConfig,
    SessionConfig,
};
