//! Game session
//!
//! Ties one player, its tomb trail, the chase camera and the culling frustum
//! together and advances them one frame at a time.

use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::config::Config;
use crate::core::config::{ConfigError, SessionConfig};
use crate::foundation::time::Timer;
use crate::game::player::{Player, PlayerStep};
use crate::physics::collision_system::{TombCollisionSystem, TombKey};
use crate::physics::error::GeometryError;
use crate::render::{Camera, Frustum};

/// Errors raised while building or stepping a session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Degenerate pose, transform or camera
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Config could not be loaded or failed validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Frame delta that is negative or not finite
    #[error("invalid time step: {0}")]
    InvalidTimeStep(f32),
}

/// Summary of one [`GameSession::step`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// The player touched a tomb at the start of the frame
    pub collided: bool,
    /// Tombs hit this frame
    pub hits: Vec<TombKey>,
    /// Tombs whose box is not provably outside the view frustum
    pub visible_tombs: Vec<TombKey>,
    /// Tombs alive after the frame
    pub tomb_count: usize,
    /// Tomb dropped this frame
    pub spawned: Option<TombKey>,
}

/// A single-player trail session
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    player: Player,
    collisions: TombCollisionSystem,
    camera: Camera,
    frustum: Frustum,
    timer: Timer,
}

impl GameSession {
    /// Validate `config` and set up a fresh session
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let player = Player::new(config.player, config.collision.player);
        let collisions = TombCollisionSystem::new(&config.grid, &config.collision);
        let camera = player.chase_camera(&config.camera);
        let mut frustum = Frustum::new();
        camera.update_frustum(&mut frustum)?;

        info!(
            "Session started: {}x{} grid of {} units, tomb cap {}",
            config.grid.row_count, config.grid.column_count, config.grid.cell_width, config.collision.max_tombs
        );

        Ok(Self {
            config,
            player,
            collisions,
            camera,
            frustum,
            timer: Timer::new(),
        })
    }

    /// Load a TOML or RON session file and start a session from it
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let config = SessionConfig::load_from_file(path)?;
        Self::new(config)
    }

    /// Advance the session by `dt` seconds
    pub fn step(&mut self, dt: f32) -> Result<FrameReport, SessionError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SessionError::InvalidTimeStep(dt));
        }
        self.timer.tick(dt);

        let PlayerStep { collision, spawned } = self.player.update(dt, &mut self.collisions)?;

        self.camera = self.player.chase_camera(&self.config.camera);
        self.camera.update_frustum(&mut self.frustum)?;

        let mut visible_tombs = Vec::new();
        for (key, _) in self.collisions.tombs().iter() {
            if let Some(obb) = self.collisions.tomb_box(key).transpose()? {
                if self.frustum.is_box_in_frustum(&obb) {
                    visible_tombs.push(key);
                }
            }
        }

        let report = FrameReport {
            collided: collision.collided(),
            hits: collision.hits,
            visible_tombs,
            tomb_count: self.collisions.tombs().len(),
            spawned,
        };
        if report.collided {
            debug!(
                "Frame {}: player hit {} tomb(s)",
                self.timer.frame_count(),
                report.hits.len()
            );
        }
        Ok(report)
    }

    /// Forward a pointer delta to the player's steering
    pub fn steer(&mut self, dx: f32, dy: f32) -> Option<f32> {
        self.player.steer(dx, dy)
    }

    /// Ask the player to boost
    pub fn boost(&mut self) -> bool {
        self.player.boost()
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Tomb store and broad-phase grid
    pub fn collisions(&self) -> &TombCollisionSystem {
        &self.collisions
    }

    /// Chase camera as of the last step
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Culling frustum as of the last step
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Simulation clock
    pub fn timer(&self) -> &Timer {
        &self.timer
    }
}
