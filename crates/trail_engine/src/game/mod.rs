//! Gameplay: the player avatar and the session loop around it

pub mod player;
pub mod session;

pub use player::{Player, PlayerStep};
pub use session::{FrameReport, GameSession, SessionError};
