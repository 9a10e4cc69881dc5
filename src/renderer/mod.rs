//! Rendering module
//!
//! The court is drawn through the `Surface` trait so the same frame can go to
//! a browser canvas or to a command list in headless runs.

pub mod commands;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use commands::{CommandRecorder, DrawCommand};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;

use crate::settings::Theme;
use crate::sim::GameState;

/// A 2D drawing target with a fixed size
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    /// Called once before each frame is drawn
    fn begin_frame(&mut self) {}
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: &str);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);
    fn fill_text(&mut self, text: &str, pos: Vec2, font: &str, color: &str);
    /// `dash` is the (on, off) length pattern
    fn stroke_dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, dash: (f32, f32), color: &str);
}

/// Draw one frame of `state`.
///
/// Order matters: background, net, scores, ball, then paddles on top.
pub fn render(state: &GameState, theme: &Theme, surface: &mut impl Surface) {
    let w = surface.width();
    let h = surface.height();
    let fg = theme.foreground.as_str();

    surface.begin_frame();
    surface.fill_rect(Vec2::ZERO, Vec2::new(w, h), &theme.background);

    surface.stroke_dashed_line(
        Vec2::new(w / 2.0, 0.0),
        Vec2::new(w / 2.0, h),
        theme.net_line_width,
        (theme.net_dash, theme.net_gap),
        fg,
    );

    let (player_score, opponent_score) = state.scores();
    surface.fill_text(
        &player_score.to_string(),
        Vec2::new(w / 4.0, h / 5.0),
        &theme.score_font,
        fg,
    );
    surface.fill_text(
        &opponent_score.to_string(),
        Vec2::new(3.0 * w / 4.0, h / 5.0),
        &theme.score_font,
        fg,
    );

    surface.fill_circle(state.ball.pos, state.ball.radius, fg);

    for paddle in [&state.player, &state.opponent] {
        surface.fill_rect(paddle.pos, Vec2::new(paddle.width, paddle.height), fg);
    }
}
