use glam::Vec2;

use crate::hud::TextSprite;
use crate::input::{InputEvent, KeyCode};
use crate::render::{Anchor, Color, RenderSurface};
use crate::error::Result;
use crate::scene::{Node, NodeId, Scene, SceneExit, SceneTree};

pub enum TitleNode {
    Backdrop(Color),
    Text(TextSprite),
}

impl Node for TitleNode {
    fn kind(&self) -> &'static str {
        match self {
            TitleNode::Backdrop(_) => "backdrop",
            TitleNode::Text(_) => "text",
        }
    }

    fn draw(&mut self, surface: &mut dyn RenderSurface, _dt_ms: f32) {
        match self {
            TitleNode::Backdrop(color) => surface.fill(*color),
            TitleNode::Text(text) => text.draw(surface),
        }
    }
}

/// A single centred caption. Click it or press Enter to start; Escape leaves.
///
/// Doubles as the final score screen.
pub struct TitleScreen {
    tree: SceneTree<TitleNode>,
    caption: NodeId,
    exit: Option<SceneExit>,
}

impl TitleScreen {
    pub fn new(caption: &str) -> Result<Self> {
        let mut tree = SceneTree::new(TitleNode::Backdrop(Color::SKY_BLUE));
        let root = tree.root();
        let text = TextSprite::new(caption, Color::BLACK, Anchor::Center, Vec2::ZERO);
        let caption = tree.add(root, TitleNode::Text(text))?;
        Ok(Self { tree, caption, exit: None })
    }

    pub fn caption(&self) -> Option<&TextSprite> {
        match self.tree.get(self.caption)? {
            TitleNode::Text(text) => Some(text),
            TitleNode::Backdrop(_) => None,
        }
    }

    fn caption_mut(&mut self) -> Option<&mut TextSprite> {
        match self.tree.get_mut(self.caption)? {
            TitleNode::Text(text) => Some(text),
            TitleNode::Backdrop(_) => None,
        }
    }

    fn over_caption(&self, pos: Vec2) -> bool {
        self.caption().is_some_and(|t| t.rect().contains(pos))
    }
}

impl Scene for TitleScreen {
    fn update(&mut self) {}

    fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::MouseMove(pos) => {
                let color = if self.over_caption(pos) { Color::WHITE } else { Color::BLACK };
                if let Some(caption) = self.caption_mut() {
                    caption.set_color(color);
                }
            }
            InputEvent::MouseButton { pos, .. } if self.over_caption(pos) => {
                self.exit = Some(SceneExit::StartGame);
            }
            InputEvent::KeyDown(KeyCode::Enter) => {
                if let Some(caption) = self.caption_mut() {
                    caption.set_color(Color::WHITE);
                }
            }
            InputEvent::KeyUp(KeyCode::Enter) => self.exit = Some(SceneExit::StartGame),
            InputEvent::KeyDown(KeyCode::Escape) | InputEvent::Quit => self.exit = Some(SceneExit::Quit),
            _ => {}
        }
        let root = self.tree.root();
        self.tree.handle(root, event);
    }

    fn draw(&mut self, surface: &mut dyn RenderSurface, dt_ms: f32) {
        let center = surface.size() * 0.5;
        if let Some(caption) = self.caption_mut() {
            caption.set_position(center);
        }
        let root = self.tree.root();
        self.tree.draw(root, surface, dt_ms);
    }

    fn exit(&self) -> Option<SceneExit> {
        self.exit
    }
}
