use glam::Vec2;
use tilebrawl::error::ArenaError;
use tilebrawl::input::{InputEvent, KeyCode};
use tilebrawl::render::{ImageId, RecordingSurface, RenderSurface};
use tilebrawl::scene::{ChildRef, Node, SceneTree};

/// Minimal node: blits its own image id at its depth, counts updates and events.
struct Sprite {
    kind: &'static str,
    image: u32,
    y: f32,
    updates: u32,
    events: u32,
}

fn sprite(kind: &'static str, image: u32, y: f32) -> Sprite {
    Sprite { kind, image, y, updates: 0, events: 0 }
}

impl Node for Sprite {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn update(&mut self) {
        self.updates += 1;
    }

    fn handle(&mut self, _event: &InputEvent) {
        self.events += 1;
    }

    fn draw(&mut self, surface: &mut dyn RenderSurface, _dt_ms: f32) {
        surface.blit(ImageId(self.image), Vec2::new(0.0, self.y));
    }

    fn depth(&self) -> f32 {
        self.y
    }
}

fn blit_order(surface: &RecordingSurface) -> Vec<u32> {
    use tilebrawl::render::DrawCall;
    surface
        .calls
        .iter()
        .filter_map(|c| match c {
            DrawCall::Blit { image, .. } => Some(image.0),
            _ => None,
        })
        .collect()
}

// ── Structure ────────────────────────────────────────────────────────────────

#[test]
fn add_sets_parent_and_order() {
    let mut tree = SceneTree::new(sprite("root", 0, 0.0));
    let root = tree.root();
    let a = tree.add(root, sprite("a", 1, 0.0)).unwrap();
    let b = tree.add(root, sprite("b", 2, 0.0)).unwrap();

    assert_eq!(tree.children(root), &[a, b]);
    assert_eq!(tree.parent(a), Some(root));
    assert_eq!(tree.parent(root), None);
    assert_eq!(tree.child_at(root, 1), Some(b));
    assert_eq!(tree.child_at(root, 2), None);
    assert_eq!(tree.len(), 3);
}

#[test]
fn find_kind_returns_first_match() {
    let mut tree = SceneTree::new(sprite("root", 0, 0.0));
    let root = tree.root();
    tree.add(root, sprite("enemy", 1, 0.0)).unwrap();
    let text = tree.add(root, sprite("text", 2, 0.0)).unwrap();
    tree.add(root, sprite("text", 3, 0.0)).unwrap();

    assert_eq!(tree.find_kind(root, "text"), Some(text));
    assert_eq!(tree.find_kind(root, "player"), None);
}

#[test]
fn remove_by_handle_and_by_index() {
    let mut tree = SceneTree::new(sprite("root", 0, 0.0));
    let root = tree.root();
    let a = tree.add(root, sprite("a", 1, 0.0)).unwrap();
    let b = tree.add(root, sprite("b", 2, 0.0)).unwrap();
    let c = tree.add(root, sprite("c", 3, 0.0)).unwrap();

    let removed = tree.remove(root, b).unwrap();
    assert_eq!(removed.kind, "b");
    assert_eq!(tree.children(root), &[a, c]);

    let removed = tree.remove(root, ChildRef::Index(0)).unwrap();
    assert_eq!(removed.kind, "a");
    assert_eq!(tree.children(root), &[c]);

    assert!(tree.remove(root, 5usize).is_none());
    assert!(tree.remove(root, a).is_none());
}

#[test]
fn remove_drops_descendants() {
    let mut tree = SceneTree::new(sprite("root", 0, 0.0));
    let root = tree.root();
    let parent = tree.add(root, sprite("group", 1, 0.0)).unwrap();
    let child = tree.add(parent, sprite("leaf", 2, 0.0)).unwrap();
    let grandchild = tree.add(child, sprite("leaf", 3, 0.0)).unwrap();

    tree.remove(root, parent).unwrap();
    assert!(!tree.contains(child));
    assert!(!tree.contains(grandchild));
    assert_eq!(tree.len(), 1);
}

#[test]
fn stale_handle_does_not_alias_reused_slot() {
    let mut tree = SceneTree::new(sprite("root", 0, 0.0));
    let root = tree.root();
    let old = tree.add(root, sprite("old", 1, 0.0)).unwrap();
    tree.remove(root, old).unwrap();
    let new = tree.add(root, sprite("new", 2, 0.0)).unwrap();

    assert_eq!(old.index(), new.index());
    assert!(tree.get(old).is_none());
    assert_eq!(tree.get(new).map(|n| n.kind), Some("new"));
    assert!(matches!(tree.add(old, sprite("x", 3, 0.0)), Err(ArenaError::StaleNode(_))));
}

#[test]
fn remove_from_wrong_parent_is_none() {
    let mut tree = SceneTree::new(sprite("root", 0, 0.0));
    let root = tree.root();
    let a = tree.add(root, sprite("a", 1, 0.0)).unwrap();
    let b = tree.add(root, sprite("b", 2, 0.0)).unwrap();
    assert!(tree.remove(a, b).is_none());
    assert!(tree.contains(b));
}

// ── Dispatch ─────────────────────────────────────────────────────────────────

#[test]
fn update_and_handle_reach_every_node() {
    let mut tree = SceneTree::new(sprite("root", 0, 0.0));
    let root = tree.root();
    let a = tree.add(root, sprite("a", 1, 0.0)).unwrap();
    let deep = tree.add(a, sprite("deep", 2, 0.0)).unwrap();

    tree.update(root);
    tree.handle(root, &InputEvent::KeyDown(KeyCode::Space));
    tree.handle(root, &InputEvent::KeyUp(KeyCode::Space));

    for id in [root, a, deep] {
        let node = tree.get(id).unwrap();
        assert_eq!(node.updates, 1);
        assert_eq!(node.events, 2);
    }
}

#[test]
fn draw_paints_parent_then_children_by_depth() {
    let mut tree = SceneTree::new(sprite("root", 0, f32::NEG_INFINITY));
    let root = tree.root();
    tree.add(root, sprite("low", 1, 5.0)).unwrap();
    tree.add(root, sprite("high", 2, 1.0)).unwrap();
    tree.add(root, sprite("hud", 3, f32::INFINITY)).unwrap();
    tree.add(root, sprite("tie", 4, 1.0)).unwrap();

    let mut surface = RecordingSurface::new(256.0, 256.0);
    tree.draw(root, &mut surface, 16.0);
    assert_eq!(blit_order(&surface), vec![0, 2, 4, 1, 3]);
}

#[test]
fn draw_order_follows_depth_changes() {
    let mut tree = SceneTree::new(sprite("root", 0, 0.0));
    let root = tree.root();
    let a = tree.add(root, sprite("a", 1, 1.0)).unwrap();
    let b = tree.add(root, sprite("b", 2, 2.0)).unwrap();
    assert_eq!(tree.draw_order(root), vec![a, b]);

    tree.get_mut(a).unwrap().y = 3.0;
    assert_eq!(tree.draw_order(root), vec![b, a]);
}
