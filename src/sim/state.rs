//! Game state and core simulation types
//!
//! Everything the per-frame update touches lives in one owned `GameState`.
//! It serializes to JSON for debug dumps only; nothing is ever persisted or
//! read back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which half of the court an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left paddle, driven by the pointer
    Player,
    /// Right paddle, driven by the tracking AI
    Opponent,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Opponent => "opponent",
        }
    }
}

/// Something noteworthy that happened during a single update
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    /// Ball reflected off the top or bottom wall
    WallBounce,
    /// Ball struck a paddle; `speed` is the ball speed after the hit
    PaddleHit { side: Side, speed: f32 },
    /// `side` won the point
    Scored { side: Side },
}

/// A paddle. Only `pos.y` and `score` change after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub score: u32,
}

impl Paddle {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            score: 0,
        }
    }

    /// Vertical center of the paddle
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }
}

/// The ball
#[derive(Debug, Clone, Serialize)]
pub struct Ball {
    /// Center
    pub pos: Vec2,
    /// Displacement per frame
    pub vel: Vec2,
    pub radius: f32,
    /// Scalar used to rebuild `vel` after a paddle hit
    pub speed: f32,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::new(BALL_START_VELOCITY.0, BALL_START_VELOCITY.1),
            radius: BALL_RADIUS,
            speed: BALL_START_SPEED,
        }
    }
}

/// Opt-in fixes for two quirks of the classic behavior.
///
/// Both are off by default: the pointer can drag the player paddle off
/// screen, and a wall bounce only flips `vel.y`, leaving the ball wherever
/// it overshot to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hardening {
    /// Keep the pointer-driven paddle inside the surface
    #[serde(default)]
    pub clamp_player_paddle: bool,
    /// Push the ball back inside the wall it bounced off
    #[serde(default)]
    pub correct_wall_overshoot: bool,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Surface width (coordinate bound for every entity)
    pub width: f32,
    /// Surface height
    pub height: f32,
    pub player: Paddle,
    pub opponent: Paddle,
    pub ball: Ball,
    pub hardening: Hardening,
    /// Events from the most recent update
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Lay out a fresh court on a `width` x `height` surface
    pub fn new(width: f32, height: f32) -> Self {
        let paddle_y = height / 2.0 - PADDLE_HEIGHT / 2.0;
        Self {
            width,
            height,
            player: Paddle::new(0.0, paddle_y),
            opponent: Paddle::new(width - PADDLE_WIDTH, paddle_y),
            ball: Ball::new(Vec2::new(width / 2.0, height / 2.0)),
            hardening: Hardening::default(),
            events: Vec::new(),
        }
    }

    pub fn with_hardening(mut self, hardening: Hardening) -> Self {
        self.hardening = hardening;
        self
    }

    /// Center of the court
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// Side of the court the ball is currently in
    #[inline]
    pub fn ball_side(&self) -> Side {
        if self.ball.pos.x < self.width / 2.0 {
            Side::Player
        } else {
            Side::Opponent
        }
    }

    /// Pointer moved to `pointer_y` (surface-relative). Centers the player
    /// paddle on the pointer.
    pub fn pointer_moved(&mut self, pointer_y: f32) {
        let mut y = pointer_y - self.player.height / 2.0;
        if self.hardening.clamp_player_paddle {
            y = y.clamp(0.0, (self.height - self.player.height).max(0.0));
        }
        self.player.pos.y = y;
    }

    /// Re-serve after a point: center the ball, restore base speed and send
    /// it back the other way horizontally.
    pub fn reset_ball(&mut self) {
        self.ball.pos = self.center();
        self.ball.speed = BALL_START_SPEED;
        self.ball.vel.x = -self.ball.vel.x;
    }

    /// (player, opponent)
    pub fn scores(&self) -> (u32, u32) {
        (self.player.score, self.opponent.score)
    }
}
