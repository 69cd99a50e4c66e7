use glam::Vec2;

use crate::render::{Anchor, Color, Rect, RenderSurface};

/// A line of text pinned to the surface by one of its anchor points.
///
/// The host rasterises the string each draw; the sprite only remembers where
/// the result landed so it can be hit-tested.
#[derive(Clone, Debug)]
pub struct TextSprite {
    text: String,
    color: Color,
    anchor: Anchor,
    pos: Vec2,
    rect: Rect,
}

impl TextSprite {
    pub fn new(text: impl Into<String>, color: Color, anchor: Anchor, pos: Vec2) -> Self {
        Self { text: text.into(), color, anchor, pos, rect: Rect::default() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Screen rect from the most recent draw.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn draw(&mut self, surface: &mut dyn RenderSurface) {
        let rendered = surface.render_text(&self.text, self.color);
        self.rect = Rect::anchored(self.anchor, self.pos, rendered.size);
        surface.blit(rendered.image, self.rect.min);
    }
}
