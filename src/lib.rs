//! Canvas Pong - classic two-paddle Pong for the browser
//!
//! Core modules:
//! - `sim`: Simulation (entities, per-frame update, collisions, scoring)
//! - `renderer`: Drawing commands on an abstract surface (Canvas 2D on web)
//! - `frame_loop`: Host-driven update+render loop with start/stop
//! - `platform`: Browser glue (canvas lookup, pointer input)
//! - `offline`: Offline caching worker (cache-first / network-first)
//! - `settings`: Display preferences persisted in LocalStorage

pub mod error;
pub mod frame_loop;
pub mod offline;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::Error;
pub use frame_loop::Game;
pub use settings::{Settings, Theme};

/// Game rule constants. These are fixed; only presentation lives in `Settings`.
pub mod consts {
    /// Default surface size used by the headless runner
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Paddle dimensions
    pub const PADDLE_WIDTH: f32 = 20.0;
    pub const PADDLE_HEIGHT: f32 = 200.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_START_SPEED: f32 = 5.0;
    pub const BALL_START_VELOCITY: (f32, f32) = (5.0, 5.0);
    /// Added to ball speed on every paddle hit (never decays)
    pub const PADDLE_SPEEDUP: f32 = 0.6;

    /// Maximum bounce angle off a paddle edge (radians, 45°)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

    /// Opponent tracking gain - fraction of the gap closed per frame
    pub const OPPONENT_GAIN: f32 = 0.1;
}
