//! Recorded drawing commands
//!
//! `CommandRecorder` is the headless `Surface`: it keeps the calls of the
//! latest frame instead of drawing them.

use glam::Vec2;

use super::Surface;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        pos: Vec2,
        size: Vec2,
        color: String,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: String,
    },
    FillText {
        text: String,
        pos: Vec2,
        font: String,
        color: String,
    },
    DashedLine {
        from: Vec2,
        to: Vec2,
        width: f32,
        dash: (f32, f32),
        color: String,
    },
}

impl DrawCommand {
    pub fn color(&self) -> &str {
        match self {
            DrawCommand::FillRect { color, .. }
            | DrawCommand::FillCircle { color, .. }
            | DrawCommand::FillText { color, .. }
            | DrawCommand::DashedLine { color, .. } => color,
        }
    }
}

/// Surface that records commands for the current frame
#[derive(Debug, Clone)]
pub struct CommandRecorder {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl Surface for CommandRecorder {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            pos,
            size,
            color: color.to_string(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font: &str, color: &str) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            pos,
            font: font.to_string(),
            color: color.to_string(),
        });
    }

    fn stroke_dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, dash: (f32, f32), color: &str) {
        self.commands.push(DrawCommand::DashedLine {
            from,
            to,
            width,
            dash,
            color: color.to_string(),
        });
    }
}
