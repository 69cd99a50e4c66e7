use std::collections::HashMap;
use std::hash::Hash;

use glam::Vec2;
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::geometry::Direction;

/// Represents a raw input source that can be bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// One discrete event from the host's event stream.
///
/// Pointer positions are already mapped into the scene's own pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseMove(Vec2),
    MouseButton { button: MouseButton, pos: Vec2 },
    Quit,
}

impl InputEvent {
    /// The press that this event represents, if any. Releases and motion
    /// are not bindable.
    pub fn pressed_source(&self) -> Option<InputSource> {
        match *self {
            InputEvent::KeyDown(k) => Some(InputSource::Key(k)),
            InputEvent::MouseButton { button, .. } => Some(InputSource::Mouse(button)),
            _ => None,
        }
    }
}

/// What a key press means inside a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Step(Direction),
    Quit,
}

/// Maps logical actions (defined by the game) to one or more physical inputs.
#[derive(Debug, Clone)]
pub struct ActionMap<A: Hash + Eq + Copy> {
    bindings: HashMap<A, Vec<InputSource>>,
}

impl<A: Hash + Eq + Copy> ActionMap<A> {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, action: A, source: InputSource) {
        self.bindings.entry(action).or_default().push(source);
    }

    /// The action a press event triggers, if it is bound to one.
    pub fn action_for(&self, event: &InputEvent) -> Option<A> {
        let source = event.pressed_source()?;
        self.bindings
            .iter()
            .find(|(_, sources)| sources.contains(&source))
            .map(|(action, _)| *action)
    }
}

impl<A: Hash + Eq + Copy> Default for ActionMap<A> {
    fn default() -> Self { Self::new() }
}

impl ActionMap<Command> {
    /// Arrow keys and WASD step, Escape quits.
    pub fn arena_defaults() -> Self {
        let mut map = Self::new();
        let steps = [
            (Direction::Up, KeyCode::ArrowUp, KeyCode::KeyW),
            (Direction::Right, KeyCode::ArrowRight, KeyCode::KeyD),
            (Direction::Down, KeyCode::ArrowDown, KeyCode::KeyS),
            (Direction::Left, KeyCode::ArrowLeft, KeyCode::KeyA),
        ];
        for (dir, arrow, letter) in steps {
            map.bind(Command::Step(dir), InputSource::Key(arrow));
            map.bind(Command::Step(dir), InputSource::Key(letter));
        }
        map.bind(Command::Quit, InputSource::Key(KeyCode::Escape));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_wasd_and_arrows() {
        let map = ActionMap::arena_defaults();
        assert_eq!(map.action_for(&InputEvent::KeyDown(KeyCode::KeyA)), Some(Command::Step(Direction::Left)));
        assert_eq!(map.action_for(&InputEvent::KeyDown(KeyCode::ArrowUp)), Some(Command::Step(Direction::Up)));
        assert_eq!(map.action_for(&InputEvent::KeyDown(KeyCode::Escape)), Some(Command::Quit));
    }

    #[test]
    fn releases_are_not_actions() {
        let map = ActionMap::arena_defaults();
        assert_eq!(map.action_for(&InputEvent::KeyUp(KeyCode::KeyA)), None);
        assert_eq!(map.action_for(&InputEvent::KeyDown(KeyCode::KeyQ)), None);
    }
}
