//! # Session Configuration
//!
//! All tunables of a trail session, grouped per subsystem. Every struct has
//! defaults matching the stock game and can be loaded from TOML or RON through
//! the [`Config`] trait. Missing fields fall back to their defaults.
//!
//! ## Configuration Categories
//!
//! - **Grid**: broad-phase dimensions
//! - **Collision**: colliders, projection rule, hit policy, tomb capacity
//! - **Player**: speeds, boost timings, steering, tomb spawning
//! - **Camera**: projection parameters and follow offsets

use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants, Vec3};
use crate::physics::collision::{BoxCollider, ProjectionMode};
use crate::physics::collision_system::OverlapPolicy;

pub use crate::config::{Config, ConfigError, ConfigFormat};

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive and finite, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be non-negative and finite, got {value}"),
        })
    }
}

/// # Grid Configuration
///
/// Size of the uniform broad-phase grid. The world covered is
/// `column_count * cell_width` along X by `row_count * cell_width` along Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells along Z
    pub row_count: u16,
    /// Cells along X
    pub column_count: u16,
    /// World units per cell
    pub cell_width: f32,
}

impl GridConfig {
    /// Create a grid configuration
    pub fn new(row_count: u16, column_count: u16, cell_width: f32) -> Self {
        Self {
            row_count,
            column_count,
            cell_width,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.row_count == 0 || self.column_count == 0 {
            return Err(ConfigError::Invalid {
                field: "grid",
                reason: format!("needs at least one cell, got {}x{}", self.row_count, self.column_count),
            });
        }
        positive("grid.cell_width", self.cell_width)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(18, 18, 250.0)
    }
}

/// # Collision Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Player hitbox
    pub player: BoxCollider,
    /// Tomb hitbox
    pub tomb: BoxCollider,
    /// Corner projection rule used by the SAT test
    pub projection_mode: ProjectionMode,
    /// Whether a query stops at its first hit
    pub overlap_policy: OverlapPolicy,
    /// Oldest tombs are evicted beyond this many (0 = unbounded)
    pub max_tombs: usize,
    /// Broad-phase neighbourhood radius in cells
    pub neighbor_radius: i32,
}

impl CollisionConfig {
    /// Set the projection rule
    pub fn with_projection_mode(mut self, mode: ProjectionMode) -> Self {
        self.projection_mode = mode;
        self
    }

    /// Set the hit policy
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Set the tomb capacity
    pub fn with_max_tombs(mut self, max_tombs: usize) -> Self {
        self.max_tombs = max_tombs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, collider) in [("collision.player", &self.player), ("collision.tomb", &self.tomb)] {
            positive(name, collider.scale)?;
            positive(name, collider.sphere_radius)?;
            let extent = collider.local_max - collider.local_min;
            if extent.iter().any(|e| !e.is_finite() || *e < 0.0) {
                return Err(ConfigError::Invalid {
                    field: name,
                    reason: format!("local_max must not be below local_min, extent {extent:?}"),
                });
            }
        }
        if self.neighbor_radius < 0 {
            return Err(ConfigError::Invalid {
                field: "collision.neighbor_radius",
                reason: format!("must not be negative, got {}", self.neighbor_radius),
            });
        }
        Ok(())
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            player: BoxCollider::player(),
            tomb: BoxCollider::tomb(),
            projection_mode: ProjectionMode::Signed,
            overlap_policy: OverlapPolicy::FirstHit,
            max_tombs: 1024,
            neighbor_radius: crate::spatial::DEFAULT_NEIGHBOR_RADIUS,
        }
    }
}

/// # Player Configuration
///
/// Movement, boost, steering and tomb-spawning tunables. Times are seconds,
/// angles are degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Spawn position
    pub start_position: Vec3,
    /// Cruise speed in units per second
    pub speed: f32,
    /// Speed while boosting
    pub boost_speed: f32,
    /// How long a boost lasts
    pub boost_duration: f32,
    /// Time from one boost start until the next is allowed
    pub boost_cooldown: f32,
    /// Time between tomb spawns
    pub tomb_interval: f32,
    /// Tombs spawn this far behind the player
    pub tomb_spawn_offset: f32,
    /// Added to the player yaw for the tomb rotation
    pub tomb_yaw_offset: f32,
    /// Pointer distance to steering units
    pub steer_sensitivity: f32,
    /// Accumulated steering is applied in multiples of this
    pub steer_step: f32,
    /// Largest turn applied by one steering update
    pub max_turn: f32,
    /// Camera yaw catch-up rate per second
    pub camera_ease_rate: f32,
    /// Camera yaw stays put while within this many degrees of the player
    pub camera_ease_threshold: f32,
}

impl PlayerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.start_position.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "player.start_position",
                reason: "must be finite".to_string(),
            });
        }
        non_negative("player.speed", self.speed)?;
        non_negative("player.boost_speed", self.boost_speed)?;
        non_negative("player.boost_duration", self.boost_duration)?;
        non_negative("player.boost_cooldown", self.boost_cooldown)?;
        positive("player.tomb_interval", self.tomb_interval)?;
        non_negative("player.tomb_spawn_offset", self.tomb_spawn_offset)?;
        positive("player.steer_step", self.steer_step)?;
        non_negative("player.max_turn", self.max_turn)?;
        non_negative("player.camera_ease_rate", self.camera_ease_rate)?;
        non_negative("player.camera_ease_threshold", self.camera_ease_threshold)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(2250.0, 20.0, 2250.0),
            speed: 350.0,
            boost_speed: 1000.0,
            boost_duration: 3.0,
            boost_cooldown: 10.0,
            tomb_interval: 0.5,
            tomb_spawn_offset: 100.0,
            tomb_yaw_offset: 90.0,
            steer_sensitivity: 0.1,
            steer_step: 5.0,
            max_turn: 10.0,
            camera_ease_rate: 5.0,
            camera_ease_threshold: 3.0,
        }
    }
}

/// # Camera Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Eye distance behind the player
    pub follow_distance: f32,
    /// Eye height above the player
    pub follow_height: f32,
}

impl CameraConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov > 0.0 && self.fov < constants::PI) {
            return Err(ConfigError::Invalid {
                field: "camera.fov",
                reason: format!("must lie in (0, pi), got {}", self.fov),
            });
        }
        positive("camera.aspect", self.aspect)?;
        positive("camera.near", self.near)?;
        positive("camera.far", self.far)?;
        if self.far <= self.near {
            return Err(ConfigError::Invalid {
                field: "camera.far",
                reason: format!("must exceed near ({} <= {})", self.far, self.near),
            });
        }
        non_negative("camera.follow_distance", self.follow_distance)?;
        if !self.follow_height.is_finite() {
            return Err(ConfigError::Invalid {
                field: "camera.follow_height",
                reason: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: constants::PI / 4.0,
            aspect: 1280.0 / 720.0,
            near: 0.01,
            far: 10_000.0,
            follow_distance: 700.0,
            follow_height: 400.0,
        }
    }
}

/// # Complete Session Configuration
///
/// Top-level configuration applications load and hand to a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Broad-phase grid
    pub grid: GridConfig,
    /// Collision rules
    pub collision: CollisionConfig,
    /// Player tunables
    pub player: PlayerConfig,
    /// Camera projection and follow offsets
    pub camera: CameraConfig,
}

impl SessionConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.collision.validate()?;
        self.player.validate()?;
        self.camera.validate()
    }
}

impl Config for SessionConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.row_count, 18);
        assert_eq!(config.grid.cell_width, 250.0);
        assert_eq!(config.player.speed, 350.0);
        assert_eq!(config.collision.projection_mode, ProjectionMode::Signed);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SessionConfig::default();
        config.grid.cell_width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "grid.cell_width", .. })
        ));

        let mut config = SessionConfig::default();
        config.camera.far = config.camera.near;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "camera.far", .. })
        ));

        let mut config = SessionConfig::default();
        config.collision.neighbor_radius = -1;
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.grid.column_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let text = r#"
            [grid]
            cell_width = 100.0

            [collision]
            overlap_policy = "CollectAll"
            max_tombs = 8
        "#;
        let config = SessionConfig::from_str_with_format(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.grid.cell_width, 100.0);
        assert_eq!(config.grid.row_count, 18);
        assert_eq!(config.collision.overlap_policy, OverlapPolicy::CollectAll);
        assert_eq!(config.collision.max_tombs, 8);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_ron_round_trip() {
        let config = SessionConfig {
            collision: CollisionConfig::default()
                .with_projection_mode(ProjectionMode::Magnitude)
                .with_max_tombs(0),
            ..SessionConfig::default()
        };
        let text = config.to_string_with_format(ConfigFormat::Ron).unwrap();
        let parsed = SessionConfig::from_str_with_format(&text, ConfigFormat::Ron).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(matches!(
            SessionConfig::load_from_file("session.json"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_malformed_text_is_a_parse_error() {
        assert!(matches!(
            SessionConfig::from_str_with_format("[grid\nrow_count = ", ConfigFormat::Toml),
            Err(ConfigError::Parse(_))
        ));
    }
}
