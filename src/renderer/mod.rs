//! Canvas rendering
//!
//! The game draws through the [`Canvas`] trait: a 2D immediate-mode surface
//! with solid fills, text and a save/restore transform stack. The browser
//! implements it over `CanvasRenderingContext2d`; tests record the calls.

pub mod scene;

use glam::Vec2;

pub use scene::{FpsCounter, draw_frame};

/// CSS color string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub &'static str);

impl Color {
    pub const WHITE: Color = Color("white");
    pub const RED: Color = Color("red");
    pub const GREEN: Color = Color("green");
    pub const YELLOW: Color = Color("yellow");
    pub const PLAYER: Color = Color("#00f");
    pub const DEBUG: Color = Color("lime");

    pub fn css(self) -> &'static str {
        self.0
    }
}

/// Horizontal anchor for [`Canvas::fill_text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// 2D drawing surface
pub trait Canvas {
    /// Drawable area in canvas units
    fn size(&self) -> Vec2;

    fn clear_rect(&mut self, pos: Vec2, size: Vec2);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    /// Rectangle outline (debug overlay)
    fn stroke_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    /// Fill the closed polygon through `points`
    fn fill_path(&mut self, points: &[Vec2], color: Color);
    /// Draw `text` with its baseline at `pos`
    fn fill_text(&mut self, text: &str, pos: Vec2, font_px: u32, align: TextAlign, color: Color);

    fn save(&mut self);
    fn restore(&mut self);
    /// Global alpha for subsequent draws until the next `restore`
    fn set_alpha(&mut self, alpha: f32);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
}
