use glam::Vec2;
use serde::{Deserialize, Serialize};

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const SKY_BLUE: Self = Self([0.53, 0.81, 0.92, 1.0]);
}

// ── Asset handles ────────────────────────────────────────────────────────────

/// Opaque reference to an image or animation frame owned by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u32);

/// A rasterised string handed back by the host's font capability.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextImage {
    pub image: ImageId,
    pub size: Vec2,
}

// ── Rect / Anchor ────────────────────────────────────────────────────────────

/// Which point of a rect its anchor position refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    BottomLeft,
    Center,
    MidBottom,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Place a rect of `size` so that its `anchor` point sits at `at`.
    pub fn anchored(anchor: Anchor, at: Vec2, size: Vec2) -> Self {
        let min = match anchor {
            Anchor::TopLeft => at,
            Anchor::BottomLeft => Vec2::new(at.x, at.y - size.y),
            Anchor::Center => at - size * 0.5,
            Anchor::MidBottom => Vec2::new(at.x - size.x * 0.5, at.y - size.y),
        };
        Self { min, size }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.min.x + self.size.x && p.y >= self.min.y && p.y < self.min.y + self.size.y
    }
}

// ── RenderSurface ────────────────────────────────────────────────────────────

/// The drawing capability the host provides each frame.
///
/// The core only decides *what* goes *where*; pixels are the host's business.
pub trait RenderSurface {
    /// Surface dimensions in pixels.
    fn size(&self) -> Vec2;
    fn fill(&mut self, color: Color);
    fn blit(&mut self, image: ImageId, pos: Vec2);
    fn render_text(&mut self, text: &str, color: Color) -> TextImage;
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Fill(Color),
    Blit { image: ImageId, pos: Vec2 },
    Text { text: String, color: Color },
}

/// First image id handed out for rendered text.
pub const TEXT_IMAGE_BASE: u32 = 1 << 16;

/// A surface that draws nothing and remembers every call, in order.
///
/// Text is measured as 8×16 px per character.
#[derive(Debug)]
pub struct RecordingSurface {
    size: Vec2,
    pub calls: Vec<DrawCall>,
    next_text: u32,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { size: Vec2::new(width, height), calls: Vec::new(), next_text: TEXT_IMAGE_BASE }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Positions of every blit of `image`, in draw order.
    pub fn blits_of(&self, image: ImageId) -> Vec<Vec2> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Blit { image: i, pos } if *i == image => Some(*pos),
                _ => None,
            })
            .collect()
    }

    /// Every string rendered this frame, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill(&mut self, color: Color) {
        self.calls.push(DrawCall::Fill(color));
    }

    fn blit(&mut self, image: ImageId, pos: Vec2) {
        self.calls.push(DrawCall::Blit { image, pos });
    }

    fn render_text(&mut self, text: &str, color: Color) -> TextImage {
        self.calls.push(DrawCall::Text { text: text.to_string(), color });
        let image = ImageId(self.next_text);
        self.next_text += 1;
        TextImage { image, size: Vec2::new(8.0 * text.chars().count() as f32, 16.0) }
    }
}
