//! Canvas 2D surface

use glam::Vec2;
use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use crate::error::{Error, Result};

/// `Surface` backed by a canvas element's 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Grab the `kind` context (normally `"2d"`) from `canvas`
    pub fn new(canvas: HtmlCanvasElement, kind: &str) -> Result<Self> {
        let ctx = canvas
            .get_context(kind)?
            .ok_or_else(|| Error::NoContext(kind.to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::NoContext(kind.to_string()))?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        if let Err(e) = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        ) {
            log::warn!("arc failed: {:?}", e);
            return;
        }
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font: &str, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(font);
        if let Err(e) = self.ctx.fill_text(text, pos.x as f64, pos.y as f64) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }

    fn stroke_dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, dash: (f32, f32), color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        let pattern = Array::of2(&JsValue::from_f64(dash.0 as f64), &JsValue::from_f64(dash.1 as f64));
        if let Err(e) = self.ctx.set_line_dash(&pattern) {
            log::warn!("set_line_dash failed: {:?}", e);
        }
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }
}
