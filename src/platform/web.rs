//! Browser bindings
//!
//! Implements [`Canvas`] over `CanvasRenderingContext2d` and [`Hud`] over
//! the page's DOM. The host page must provide:
//! - `#gameCanvas` (canvas)
//! - `#gameInfo` (score/wave line)
//! - `#gameOverScreen` with `#finalScore` and `#finalWave` inside
//! - `#restartButton` (optional)

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement};

use super::input::InputAdapter;
use crate::error::StartupError;
use crate::renderer::{Canvas, Color, TextAlign};
use crate::ui::Hud;

pub const CANVAS_ID: &str = "gameCanvas";
pub const INFO_ID: &str = "gameInfo";
pub const GAME_OVER_ID: &str = "gameOverScreen";
pub const FINAL_SCORE_ID: &str = "finalScore";
pub const FINAL_WAVE_ID: &str = "finalWave";
pub const RESTART_ID: &str = "restartButton";

/// Look up a required element
pub fn require_element(document: &Document, id: &'static str) -> Result<Element, StartupError> {
    document
        .get_element_by_id(id)
        .ok_or(StartupError::MissingElement { id })
}

fn require_html(document: &Document, id: &'static str) -> Result<HtmlElement, StartupError> {
    require_element(document, id)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| StartupError::WrongElementType {
            id,
            expected: "HTML element",
        })
}

/// 2D canvas context as a [`Canvas`]
pub struct WebCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn from_document(document: &Document) -> Result<Self, StartupError> {
        let canvas = require_element(document, CANVAS_ID)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| StartupError::WrongElementType {
                id: CANVAS_ID,
                expected: "canvas",
            })?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(StartupError::ContextUnavailable)?;
        Ok(Self { canvas, ctx })
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Match the drawing buffer to the window size and return it
    pub fn fit_to_window(&self, window: &web_sys::Window) -> Vec2 {
        let dim = |v: Result<JsValue, JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32
        };
        let width = dim(window.inner_width());
        let height = dim(window.inner_height());
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Vec2::new(width as f32, height as f32)
    }

    /// Client coordinates to canvas-relative coordinates
    pub fn to_canvas_point(&self, client_x: i32, client_y: i32) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        Vec2::new(
            (client_x as f64 - rect.left()) as f32,
            (client_y as f64 - rect.top()) as f32,
        )
    }
}

impl Canvas for WebCanvas {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear_rect(&mut self, pos: Vec2, size: Vec2) {
        self.ctx
            .clear_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.ctx.set_fill_style_str(color.css());
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn stroke_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.ctx.set_stroke_style_str(color.css());
        self.ctx
            .stroke_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_path(&mut self, points: &[Vec2], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(color.css());
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font_px: u32, align: TextAlign, color: Color) {
        self.ctx.set_fill_style_str(color.css());
        self.ctx.set_font(&format!("{}px Arial", font_px));
        self.ctx.set_text_align(align.css());
        if let Err(e) = self.ctx.fill_text(text, pos.x as f64, pos.y as f64) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x as f64, offset.y as f64);
    }

    fn rotate(&mut self, radians: f32) {
        let _ = self.ctx.rotate(radians as f64);
    }
}

/// Score line and game-over panel in the page
pub struct DomHud {
    info: Element,
    panel: HtmlElement,
    final_score: Element,
    final_wave: Element,
}

impl DomHud {
    pub fn from_document(document: &Document) -> Result<Self, StartupError> {
        Ok(Self {
            info: require_element(document, INFO_ID)?,
            panel: require_html(document, GAME_OVER_ID)?,
            final_score: require_element(document, FINAL_SCORE_ID)?,
            final_wave: require_element(document, FINAL_WAVE_ID)?,
        })
    }

    fn set_panel_display(&self, value: &str) {
        if let Err(e) = self.panel.style().set_property("display", value) {
            log::warn!("Cannot toggle game-over panel: {:?}", e);
        }
    }
}

impl Hud for DomHud {
    fn set_info_text(&mut self, text: &str) {
        self.info.set_text_content(Some(text));
    }

    fn show_game_over(&mut self, score: u64, wave: u32) {
        self.final_score.set_text_content(Some(&score.to_string()));
        self.final_wave.set_text_content(Some(&wave.to_string()));
        self.set_panel_display("block");
    }

    fn hide_game_over(&mut self) {
        self.set_panel_display("none");
    }
}

/// Read the active gamepad from `navigator.getGamepads()` into `input`
pub fn poll_gamepad(navigator: &web_sys::Navigator, input: &mut InputAdapter) {
    let Some(index) = input.active_gamepad() else {
        return;
    };
    let Ok(pads) = navigator.get_gamepads() else {
        return;
    };
    let Some(pad) = pads
        .iter()
        .filter_map(|p| p.dyn_into::<web_sys::Gamepad>().ok())
        .find(|p| p.index() == index)
    else {
        return;
    };

    let axes: Vec<f64> = pad.axes().iter().filter_map(|a| a.as_f64()).collect();
    let buttons: Vec<bool> = pad
        .buttons()
        .iter()
        .map(|b| {
            b.dyn_into::<web_sys::GamepadButton>()
                .map(|b| b.pressed())
                .unwrap_or(false)
        })
        .collect();
    input.poll_gamepad(&axes, &buttons);
}
