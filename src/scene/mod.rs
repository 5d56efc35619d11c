//! Minimal scene graph: a node arena with parent/child links, local
//! transforms, and optional drawables.
//!
//! World transforms are composed on demand from the parent chain, so
//! writing a parent's transform moves all of its descendants.

pub mod demo;
pub mod mutator;
mod transform;

use glam::{Mat4, Vec3};
pub use mutator::{SceneMutator, Spin, SpinMode};
pub use transform::{Axis, Transform};

/// Handle to a node in a [`Scene`].
///
/// Slots are reused after removal, but each reuse bumps the slot's
/// generation, so a handle to a removed node stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub fn index(self) -> u32 {
        self.index
    }

    /// How many times the slot had been reused when this handle was issued.
    #[must_use]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Something a node can draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drawable {
    /// Axis-aligned cube centered on the node origin.
    Cube {
        /// Edge length.
        size: f32,
        /// Linear RGB color.
        color: [f32; 3],
        /// Draw edges only.
        wireframe: bool,
    },
    /// X (red), Y (green), Z (blue) axis lines from the node origin.
    Axes {
        /// Line length.
        size: f32,
    },
}

/// A scene graph node.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    /// Transform relative to the parent.
    pub transform: Transform,
    /// Hidden nodes hide their whole subtree.
    pub visible: bool,
    /// What this node draws, if anything.
    pub drawable: Option<Drawable>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Empty grouping node.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            visible: true,
            drawable: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Node drawing `drawable`.
    #[must_use]
    pub fn drawable(name: impl Into<String>, drawable: Drawable) -> Self {
        Self {
            drawable: Some(drawable),
            ..Self::group(name)
        }
    }

    /// Move the node to `translation`.
    #[must_use]
    pub fn at(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    /// Debug name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent node (`None` for the root).
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Node arena rooted at a single scene node.
#[derive(Debug, Clone)]
pub struct Scene {
    slots: Vec<Slot>,
    /// Empty slot indices, reused last-freed first.
    free: Vec<u32>,
    live: usize,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    const ROOT: NodeId = NodeId {
        index: 0,
        generation: 0,
    };

    /// Scene holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::group("scene")),
            }],
            free: Vec::new(),
            live: 1,
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Allocated slots, live or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Look up a node for mutation.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Attach `node` under `parent`. Returns `None` if `parent` is dead.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        mut node: Node,
    ) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        node.parent = Some(parent);
        node.children.clear();
        let id = self.insert(node)?;
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Detach `child` from `parent` and drop its whole subtree. Returns
    /// `false` if `child` is not a live child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let is_child = self
            .node(child)
            .is_some_and(|n| n.parent == Some(parent));
        if !is_child {
            return false;
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        let mut stack = vec![child];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.release(id) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Store `node` in a free slot, or a new one.
    fn insert(&mut self, node: Node) -> Option<NodeId> {
        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = u32::try_from(self.slots.len()).ok()?;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        };
        self.live += 1;
        Some(id)
    }

    /// Empty the slot behind `id` and retire its generation.
    fn release(&mut self, id: NodeId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    /// Local-to-world matrix of `id`.
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.node(id)?;
        let mut matrix = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            matrix = node.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    /// World-space origin of `id`.
    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.w_axis.truncate())
    }

    /// Depth-first walk over visible nodes with their world matrices.
    /// Invisible nodes are skipped along with their subtrees.
    pub fn visit_visible<F>(&self, mut visit: F)
    where
        F: FnMut(NodeId, &Node, &Mat4),
    {
        let mut stack = vec![(Self::ROOT, Mat4::IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            visit(id, node, &world);
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }
    }
}
