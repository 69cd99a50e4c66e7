use crate::error::{ArenaError, Result};
use crate::input::InputEvent;
use crate::render::RenderSurface;

// ---------------------------------------------------------------------------
// Scene: a whole screen driven by the host loop
// ---------------------------------------------------------------------------

/// Why a scene finished.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneExit {
    StartGame,
    Quit,
    Won,
    Lost,
}

pub trait Scene {
    fn update(&mut self);
    fn handle(&mut self, event: &InputEvent);
    fn draw(&mut self, surface: &mut dyn RenderSurface, dt_ms: f32);
    /// `Some` once the scene is done and ownership should return to the caller.
    fn exit(&self) -> Option<SceneExit>;
}

/// Run one host frame: update, draw, then feed this frame's events.
pub fn run_frame(
    scene: &mut dyn Scene,
    events: &[InputEvent],
    surface: &mut dyn RenderSurface,
    dt_ms: f32,
) -> Option<SceneExit> {
    scene.update();
    scene.draw(surface, dt_ms);
    for event in events {
        scene.handle(event);
    }
    scene.exit()
}

// ---------------------------------------------------------------------------
// Node: one member of a SceneTree
// ---------------------------------------------------------------------------

pub trait Node {
    /// Short type name, matched by [`SceneTree::find_kind`].
    fn kind(&self) -> &'static str;
    fn update(&mut self) {}
    fn handle(&mut self, _event: &InputEvent) {}
    fn draw(&mut self, _surface: &mut dyn RenderSurface, _dt_ms: f32) {}
    /// Current visual y. Siblings are painted in ascending order of this.
    fn depth(&self) -> f32 {
        0.0
    }
}

/// Generational handle to a node. A handle to a removed node never aliases
/// whatever later reuses its slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub fn index(self) -> u32 {
        self.index
    }
}

/// Selects a child either by handle or by position in its parent's list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChildRef {
    Node(NodeId),
    Index(usize),
}

impl From<NodeId> for ChildRef {
    fn from(id: NodeId) -> Self {
        ChildRef::Node(id)
    }
}

impl From<usize> for ChildRef {
    fn from(i: usize) -> Self {
        ChildRef::Index(i)
    }
}

struct Entry<N> {
    node: N,
    /// Non-owning back-reference; `None` only for the root.
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct Slot<N> {
    generation: u32,
    entry: Option<Entry<N>>,
}

// ---------------------------------------------------------------------------
// SceneTree: arena-backed composite
// ---------------------------------------------------------------------------

/// Parent/child tree of `N` stored in a flat arena.
///
/// Children are owned by the arena, not by their parent; links in both
/// directions are plain [`NodeId`]s, so there are no reference cycles.
pub struct SceneTree<N> {
    slots: Vec<Slot<N>>,
    free: Vec<u32>,
    root: NodeId,
}

impl<N: Node> SceneTree<N> {
    pub fn new(root: N) -> Self {
        let slots = vec![Slot {
            generation: 0,
            entry: Some(Entry { node: root, parent: None, children: Vec::new() }),
        }];
        Self { slots, free: Vec::new(), root: NodeId { index: 0, generation: 0 } }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.entry(id).map(|e| &e.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.entry_mut(id).map(|e| &mut e.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id)?.parent
    }

    /// Children of `id` in list order; empty for a dead handle.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entry(id).map_or(&[], |e| e.children.as_slice())
    }

    /// Bounds-checked lookup of the `index`th child.
    pub fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).get(index).copied()
    }

    /// First child of `parent` whose [`Node::kind`] is `kind`.
    pub fn find_kind(&self, parent: NodeId, kind: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.kind() == kind))
    }

    /// Attach `node` as the last child of `parent`.
    pub fn add(&mut self, parent: NodeId, node: N) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(ArenaError::StaleNode(parent.index));
        }
        let entry = Entry { node, parent: Some(parent), children: Vec::new() };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                NodeId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, entry: Some(entry) });
                NodeId { index, generation: 0 }
            }
        };
        if let Some(p) = self.entry_mut(parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Detach a child of `parent` and hand it back. Its own descendants are
    /// dropped. Returns `None` if `child` isn't a child of `parent`.
    pub fn remove(&mut self, parent: NodeId, child: impl Into<ChildRef>) -> Option<N> {
        let siblings = &self.entry(parent)?.children;
        let pos = match child.into() {
            ChildRef::Node(id) => siblings.iter().position(|&c| c == id)?,
            ChildRef::Index(i) if i < siblings.len() => i,
            ChildRef::Index(_) => return None,
        };
        let id = self.entry_mut(parent)?.children.remove(pos);
        let mut entry = self.release(id)?;
        for grandchild in std::mem::take(&mut entry.children) {
            self.drop_subtree(grandchild);
        }
        entry.parent = None;
        Some(entry.node)
    }

    // -- Recursive dispatch -------------------------------------------------

    /// Depth-first update in list order.
    pub fn update(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else { return };
        node.update();
        for child in self.children(id).to_vec() {
            self.update(child);
        }
    }

    /// Depth-first event dispatch in list order.
    pub fn handle(&mut self, id: NodeId, event: &InputEvent) {
        let Some(node) = self.get_mut(id) else { return };
        node.handle(event);
        for child in self.children(id).to_vec() {
            self.handle(child, event);
        }
    }

    /// Paint `id`, then its children from visually highest to lowest so that
    /// nearer entities overlap farther ones.
    pub fn draw(&mut self, id: NodeId, surface: &mut dyn RenderSurface, dt_ms: f32) {
        let Some(node) = self.get_mut(id) else { return };
        node.draw(surface, dt_ms);
        for child in self.draw_order(id) {
            self.draw(child, surface, dt_ms);
        }
    }

    /// Children of `id` sorted by ascending depth; ties keep list order.
    pub fn draw_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut keyed: Vec<(f32, NodeId)> = self
            .children(id)
            .iter()
            .filter_map(|&c| self.get(c).map(|n| (n.depth(), c)))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        keyed.into_iter().map(|(_, c)| c).collect()
    }

    // -- Internals ----------------------------------------------------------

    fn entry(&self, id: NodeId) -> Option<&Entry<N>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry<N>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    /// Take the entry out of its slot and retire the handle.
    fn release(&mut self, id: NodeId) -> Option<Entry<N>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation += 1;
        self.free.push(id.index);
        Some(entry)
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(entry) = self.release(id) {
            for child in entry.children {
                self.drop_subtree(child);
            }
        }
    }
}
