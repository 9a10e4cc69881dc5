//! Collision detection and response
//!
//! Everything is axis-aligned: the ball is treated as its bounding square
//! (side 2r) and tested against the paddle rectangle. Overlap must be strict
//! on all four sides, so a ball merely touching a paddle edge does not hit.
//!
//! There is no swept test. A ball fast enough to jump clean over a paddle in
//! one frame is not detected.

use glam::Vec2;

use super::state::{Ball, Paddle};
use crate::consts::MAX_BOUNCE_ANGLE;

/// Axis-aligned rectangle in surface coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Bounding square of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            left: center.x - radius,
            top: center.y - radius,
            right: center.x + radius,
            bottom: center.y + radius,
        }
    }

    pub fn from_paddle(paddle: &Paddle) -> Self {
        Self {
            left: paddle.pos.x,
            top: paddle.pos.y,
            right: paddle.pos.x + paddle.width,
            bottom: paddle.pos.y + paddle.height,
        }
    }

    /// Strict overlap on all four sides
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right > other.left
            && self.bottom > other.top
            && self.left < other.right
            && self.top < other.bottom
    }
}

/// Whether the ball currently overlaps the paddle
pub fn ball_paddle_collision(ball: &Ball, paddle: &Paddle) -> bool {
    Rect::around_circle(ball.pos, ball.radius).overlaps(&Rect::from_paddle(paddle))
}

/// Where on the paddle the ball struck: -1 at the top edge, 0 at the center,
/// +1 at the bottom edge. Can exceed the range slightly when the ball clips a
/// corner.
#[inline]
pub fn contact_offset(ball: &Ball, paddle: &Paddle) -> f32 {
    (ball.pos.y - paddle.center_y()) / (paddle.height / 2.0)
}

/// New ball velocity after a paddle hit.
///
/// The bounce angle scales linearly with the contact offset up to ±45°.
/// `direction` is +1.0 to send the ball right, -1.0 to send it left. The
/// magnitude is the ball's current speed.
pub fn paddle_bounce_velocity(ball: &Ball, paddle: &Paddle, direction: f32) -> Vec2 {
    let angle = contact_offset(ball, paddle) * MAX_BOUNCE_ANGLE;
    Vec2::new(
        direction * ball.speed * angle.cos(),
        ball.speed * angle.sin(),
    )
}

/// Which horizontal wall (if any) the ball's edge has crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallHit {
    Top,
    Bottom,
}

/// Check the ball against the top (y = 0) and bottom (y = `height`) walls
pub fn ball_wall_collision(ball: &Ball, height: f32) -> Option<WallHit> {
    if ball.pos.y + ball.radius > height {
        Some(WallHit::Bottom)
    } else if ball.pos.y - ball.radius < 0.0 {
        Some(WallHit::Top)
    } else {
        None
    }
}
