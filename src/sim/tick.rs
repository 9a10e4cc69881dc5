//! Per-frame simulation step
//!
//! One call advances the game by exactly one display frame. Velocities are
//! in pixels per frame, so there is no timestep parameter.

use super::collision::{WallHit, ball_paddle_collision, ball_wall_collision, paddle_bounce_velocity};
use super::state::{GameEvent, GameState, Side};
use crate::consts::*;

/// Advance the game by one frame. Events from this frame replace
/// `state.events`.
pub fn tick(state: &mut GameState) {
    state.events.clear();

    // Move ball
    state.ball.pos += state.ball.vel;

    track_ball(state);

    // Top/bottom walls
    if let Some(wall) = ball_wall_collision(&state.ball, state.height) {
        state.ball.vel.y = -state.ball.vel.y;
        if state.hardening.correct_wall_overshoot {
            let r = state.ball.radius;
            state.ball.pos.y = match wall {
                WallHit::Top => r,
                WallHit::Bottom => state.height - r,
            };
        }
        state.events.push(GameEvent::WallBounce);
    }

    // Only the paddle on the ball's half can be hit
    let side = state.ball_side();
    let paddle = state.paddle(side);
    if ball_paddle_collision(&state.ball, paddle) {
        let direction = match side {
            Side::Player => 1.0,
            Side::Opponent => -1.0,
        };
        let vel = paddle_bounce_velocity(&state.ball, paddle, direction);
        state.ball.vel = vel;
        state.ball.speed += PADDLE_SPEEDUP;
        state.events.push(GameEvent::PaddleHit {
            side,
            speed: state.ball.speed,
        });
    }

    // Goal lines
    if state.ball.pos.x - state.ball.radius < 0.0 {
        score_point(state, Side::Opponent);
    } else if state.ball.pos.x + state.ball.radius > state.width {
        score_point(state, Side::Player);
    }
}

/// Opponent AI: close `OPPONENT_GAIN` of the gap between paddle center and
/// ball each frame. It never fully locks on, so fast balls beat it.
fn track_ball(state: &mut GameState) {
    let gap = state.ball.pos.y - state.opponent.center_y();
    state.opponent.pos.y += gap * OPPONENT_GAIN;
}

fn score_point(state: &mut GameState, side: Side) {
    state.paddle_mut(side).score += 1;
    state.reset_ball();
    state.events.push(GameEvent::Scored { side });
}
