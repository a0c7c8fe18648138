//! Player kinematics
//!
//! The player always moves along its forward vector; pointer motion turns it
//! in coarse steps and a boost temporarily raises its speed. Every
//! `tomb_interval` seconds it drops a tomb behind itself, which is what the
//! collision system later tests against.
//!
//! All timing runs on the simulated clock advanced by [`Player::update`].

use log::{debug, trace};

use crate::core::config::{CameraConfig, PlayerConfig};
use crate::foundation::math::{yaw_rotation, Quat, Vec3};
use crate::foundation::time::IntervalTimer;
use crate::physics::collision::BoxCollider;
use crate::physics::collision_system::{CollisionReport, TombCollisionSystem, TombKey};
use crate::physics::error::GeometryError;
use crate::render::Camera;

/// Sign with `sign(0) == 0`, unlike `f32::signum`
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Boost {
    active: bool,
    started_at: f32,
    /// Session time the cooldown runs from
    cooldown_origin: f32,
}

/// Result of one [`Player::update`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStep {
    /// Collision query made at the pose the frame started with
    pub collision: CollisionReport,
    /// Tomb dropped this frame, if the spawn interval elapsed
    pub spawned: Option<TombKey>,
}

impl PlayerStep {
    /// True when the player touched a tomb this frame
    pub fn collided(&self) -> bool {
        self.collision.collided()
    }
}

/// The locally controlled avatar
#[derive(Debug, Clone)]
pub struct Player {
    config: PlayerConfig,
    collider: BoxCollider,
    position: Vec3,
    forward: Vec3,
    yaw: f32,
    steer_accumulator: f32,
    camera_yaw: f32,
    tomb_timer: IntervalTimer,
    boost: Boost,
    clock: f32,
}

impl Player {
    /// Player at `config.start_position` facing `+Z`
    pub fn new(config: PlayerConfig, collider: BoxCollider) -> Self {
        Self {
            position: config.start_position,
            forward: Vec3::z(),
            yaw: 0.0,
            steer_accumulator: 0.0,
            camera_yaw: 0.0,
            tomb_timer: IntervalTimer::new(config.tomb_interval),
            boost: Boost::default(),
            clock: 0.0,
            config,
            collider,
        }
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit direction of travel
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Heading in degrees, wrapped into `(-360, 360)`
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Eased heading the camera trails behind
    pub fn camera_yaw(&self) -> f32 {
        self.camera_yaw
    }

    /// Direction matching [`Self::camera_yaw`]
    pub fn camera_forward(&self) -> Vec3 {
        yaw_rotation(self.camera_yaw) * Vec3::z()
    }

    /// World rotation of the player body
    pub fn rotation(&self) -> Quat {
        yaw_rotation(self.yaw)
    }

    /// Hitbox used for tomb queries
    pub fn collider(&self) -> &BoxCollider {
        &self.collider
    }

    /// Seconds simulated so far
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// True while a boost is running
    pub fn is_boosting(&self) -> bool {
        self.boost.active
    }

    /// Current speed in units per second
    pub fn movement_speed(&self) -> f32 {
        if self.boost.active {
            self.config.boost_speed
        } else {
            self.config.speed
        }
    }

    /// Feed a pointer delta into the steering accumulator.
    ///
    /// The accumulator gains `|(dx, dy)| * -sign(dx) * sensitivity`. Once its
    /// magnitude reaches `steer_step` it is rounded down to a multiple of the
    /// step, clamped to `max_turn`, applied to the yaw and cleared. Returns the
    /// turn applied, if any.
    pub fn steer(&mut self, dx: f32, dy: f32) -> Option<f32> {
        let delta = (dx * dx + dy * dy).sqrt() * -sign(dx) * self.config.steer_sensitivity;
        if !delta.is_finite() {
            return None;
        }
        self.steer_accumulator += delta;

        if self.steer_accumulator.abs() < self.config.steer_step {
            return None;
        }

        let stepped = (self.steer_accumulator / self.config.steer_step).floor() * self.config.steer_step;
        let turn = stepped.abs().min(self.config.max_turn) * sign(stepped);

        self.steer_accumulator = 0.0;
        self.yaw = (self.yaw + turn) % 360.0;
        self.forward = yaw_rotation(self.yaw) * Vec3::z();
        trace!("Steered {turn:+} degrees, yaw now {:.1}", self.yaw);
        Some(turn)
    }

    /// Start a boost if the cooldown has elapsed since the last one (or since spawn)
    pub fn boost(&mut self) -> bool {
        if self.clock - self.boost.cooldown_origin < self.config.boost_cooldown {
            return false;
        }
        self.boost = Boost {
            active: true,
            started_at: self.clock,
            cooldown_origin: self.clock,
        };
        debug!("Boost started at t={:.2}s", self.clock);
        true
    }

    /// Spring-camera pose: behind and above the player, looking at it
    pub fn chase_camera(&self, config: &CameraConfig) -> Camera {
        let mut camera = Camera::from_config(config);
        camera.set_position(
            self.position - self.forward * config.follow_distance + Vec3::new(0.0, config.follow_height, 0.0),
        );
        camera.look_at(self.position, Vec3::y());
        camera
    }

    /// Advance the player by `dt` seconds.
    ///
    /// Order: collision check at the current pose, move, ease the camera yaw,
    /// maybe drop a tomb, then expire the boost.
    pub fn update(&mut self, dt: f32, tombs: &mut TombCollisionSystem) -> Result<PlayerStep, GeometryError> {
        let collision = tombs.check_collision(&self.collider, self.rotation(), self.position)?;

        self.clock += dt;
        self.position += self.forward * (self.movement_speed() * dt);

        let distance = self.yaw - self.camera_yaw;
        if distance.abs() > self.config.camera_ease_threshold {
            self.camera_yaw += distance * self.config.camera_ease_rate * dt;
        }

        let spawned = self.tomb_timer.tick(dt).then(|| {
            let translation = self.position - self.forward * self.config.tomb_spawn_offset;
            tombs.spawn_tomb(yaw_rotation(self.yaw + self.config.tomb_yaw_offset), translation)
        });

        if self.boost.active && self.clock - self.boost.started_at >= self.config.boost_duration {
            self.boost.active = false;
            debug!("Boost ended at t={:.2}s", self.clock);
        }

        Ok(PlayerStep { collision, spawned })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CollisionConfig, GridConfig};
    use approx::assert_relative_eq;

    fn player() -> Player {
        Player::new(PlayerConfig::default(), BoxCollider::player())
    }

    fn tomb_system() -> TombCollisionSystem {
        TombCollisionSystem::new(&GridConfig::default(), &CollisionConfig::default())
    }

    #[test]
    fn test_steering_accumulates_until_step() {
        let mut player = player();
        // |(-20, 0)| * 0.1 = 2 degrees, under the 5 degree step
        assert_eq!(player.steer(-20.0, 0.0), None);
        assert_eq!(player.yaw(), 0.0);
        assert_eq!(player.steer(-30.0, 0.0), Some(5.0));
        assert_eq!(player.yaw(), 5.0);
    }

    #[test]
    fn test_steering_clamps_to_max_turn() {
        let mut player = player();
        assert_eq!(player.steer(-300.0, 0.0), Some(10.0));
        assert_eq!(player.steer(300.0, 400.0), Some(-10.0));
        assert_eq!(player.yaw(), 0.0);
    }

    #[test]
    fn test_steering_right_turns_negative() {
        let mut player = player();
        assert_eq!(player.steer(30.0, 40.0), Some(-5.0));
        assert_relative_eq!(
            player.forward(),
            Vec3::new(-(5.0_f32.to_radians().sin()), 0.0, 5.0_f32.to_radians().cos()),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_vertical_motion_does_not_steer() {
        let mut player = player();
        for _ in 0..10 {
            assert_eq!(player.steer(0.0, 100.0), None);
        }
    }

    #[test]
    fn test_yaw_wraps() {
        let mut player = player();
        for _ in 0..37 {
            player.steer(-100.0, 0.0);
        }
        assert_relative_eq!(player.yaw(), 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_update_moves_and_drops_tombs() {
        let mut player = player();
        let mut tombs = tomb_system();

        let step = player.update(0.25, &mut tombs).unwrap();
        assert!(step.spawned.is_none());
        assert_relative_eq!(player.position(), Vec3::new(2250.0, 20.0, 2337.5), epsilon = 1e-3);

        let step = player.update(0.25, &mut tombs).unwrap();
        let key = step.spawned.unwrap();
        let tomb = tombs.tombs().get(key).unwrap();
        assert_relative_eq!(tomb.translation, Vec3::new(2250.0, 20.0, 2325.0), epsilon = 1e-3);
        assert_relative_eq!(tomb.rotation * Vec3::z(), Vec3::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_fresh_tomb_is_hit_on_the_next_update() {
        for dt in [1.0 / 120.0, 1.0 / 60.0, 0.1, 0.5] {
            let mut player = player();
            let mut tombs = tomb_system();
            let mut spawned = 0;
            let mut previous = None;

            for _ in 0..((3.0 / dt) as usize) {
                let step = player.update(dt, &mut tombs).unwrap();
                if let Some(key) = previous.take() {
                    assert_eq!(step.collision.hits, vec![key], "dt {dt}");
                }
                if let Some(key) = step.spawned {
                    spawned += 1;
                    previous = Some(key);
                }
            }
            assert!(spawned >= 5, "dt {dt}");
        }
    }

    #[test]
    fn test_boost_respects_cooldown_and_duration() {
        let mut player = player();
        let mut tombs = tomb_system();

        assert!(!player.boost());
        for _ in 0..20 {
            player.update(0.5, &mut tombs).unwrap();
        }
        assert!(player.boost());
        assert_eq!(player.movement_speed(), 1000.0);
        assert!(!player.boost());

        for _ in 0..5 {
            player.update(0.5, &mut tombs).unwrap();
        }
        assert!(player.is_boosting());
        player.update(0.5, &mut tombs).unwrap();
        assert!(!player.is_boosting());
        assert_eq!(player.movement_speed(), 350.0);
    }

    #[test]
    fn test_camera_yaw_eases_toward_yaw() {
        let mut player = player();
        let mut tombs = tomb_system();
        player.steer(-100.0, 0.0);

        player.update(0.1, &mut tombs).unwrap();
        // 10 degrees away, closing at 5x per second
        assert_relative_eq!(player.camera_yaw(), 5.0, epsilon = 1e-4);
        player.update(0.1, &mut tombs).unwrap();
        assert_relative_eq!(player.camera_yaw(), 7.5, epsilon = 1e-4);
        // Within the 3 degree dead zone
        player.update(0.1, &mut tombs).unwrap();
        assert_relative_eq!(player.camera_yaw(), 7.5, epsilon = 1e-4);
    }

    #[test]
    fn test_chase_camera_sits_behind_and_above() {
        let player = player();
        let camera = player.chase_camera(&CameraConfig::default());
        assert_relative_eq!(camera.position, Vec3::new(2250.0, 420.0, 1550.0), epsilon = 1e-3);
        assert_eq!(camera.target, player.position());
    }
}
