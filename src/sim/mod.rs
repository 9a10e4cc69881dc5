//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One update per display frame, velocities in pixels per frame
//! - No randomness
//! - All state in one owned `GameState`

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, WallHit, ball_paddle_collision, ball_wall_collision, paddle_bounce_velocity};
pub use state::{Ball, GameEvent, GameState, Hardening, Paddle, Side};
pub use tick::tick;
