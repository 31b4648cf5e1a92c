// Drawing surfaces for the particle field. `CanvasRenderer` wraps the page's
// 2D canvas context; `RecordingSurface` keeps the draw calls of the last frame
// in memory so the simulation can be inspected without a browser.

use crate::color::Color;
use crate::dom_helpers;
use std::f64::consts::PI;
use vecmath::Vector2;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub trait Surface {
    fn resize(&mut self, width: f64, height: f64);
    fn set_hidden(&mut self, hidden: bool);
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color);
    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, color: Color, alpha: f64);
}

pub struct CanvasRenderer {
    pub canvas: HtmlCanvasElement,
    pub context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    // Grabs the 2D context from the canvas on the DOM
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, String> {
        let context = dom_helpers::context_2d(&canvas)?;
        let width = canvas.width() as f64;
        let height = canvas.height() as f64;
        Ok(CanvasRenderer {
            canvas,
            context,
            width,
            height,
        })
    }
}

impl Surface for CanvasRenderer {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
    }

    fn set_hidden(&mut self, hidden: bool) {
        let _ = self
            .canvas
            .style()
            .set_property("display", if hidden { "none" } else { "" });
    }

    fn clear(&mut self) {
        self.context.clear_rect(0.0, 0.0, self.width, self.height);
    }

    #[allow(deprecated)]
    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color) {
        self.context.begin_path();
        let _ = self.context.arc(center[0], center[1], radius, 0.0, 2.0 * PI);
        self.context
            .set_fill_style(&JsValue::from_str(&color.to_css_rgba(1.0)));
        self.context.fill();
    }

    #[allow(deprecated)]
    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, color: Color, alpha: f64) {
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context
            .set_stroke_style(&JsValue::from_str(&color.to_css_rgba(alpha)));
        self.context.set_line_width(0.5);
        self.context.stroke();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vector2<f64>,
        radius: f64,
        color: Color,
    },
    Line {
        from: Vector2<f64>,
        to: Vector2<f64>,
        color: Color,
        alpha: f64,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub hidden: bool,
    /// Number of `clear` calls, i.e. frames started.
    pub frames: usize,
    /// Draw calls since the last `clear`.
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        RecordingSurface::default()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn clear(&mut self) {
        self.frames += 1;
        self.commands.clear();
    }

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, color: Color, alpha: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            alpha,
        });
    }
}
