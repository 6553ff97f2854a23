#![forbid(unsafe_code)]

//! Tidy tree positioning.
//!
//! A port of the linear-time Reingold-Tilford variant by Buchheim, Jünger and Leipert, with the
//! same conventions as `d3.tree().nodeSize([dx, dy])`:
//! - the root sits at `(0, 0)`
//! - `y = depth * dy`
//! - neighbouring nodes are at least `separation(a, b) * dx` apart, where separation is `1` for
//!   siblings and `2` for cousins by default
//!
//! Callers build a [`Hierarchy`] (children in display order) and call [`tidy::layout`].

use serde::{Deserialize, Serialize};

pub mod tidy;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct HNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
}

/// Rooted ordered tree stored as an index arena.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<HNode>,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl Hierarchy {
    /// Creates a hierarchy containing only its root.
    pub fn new() -> Self {
        Self {
            nodes: vec![HNode {
                parent: None,
                children: Vec::new(),
                depth: 0,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a child after the existing children of `parent`.
    ///
    /// Panics if `parent` does not belong to this hierarchy.
    pub fn add_child(&mut self, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.nodes.push(HNode {
            parent: Some(parent),
            children: Vec::new(),
            depth,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes.get(id.0).map_or(0, |n| n.depth)
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    /// Level by level, left to right (d3 `descendants()` order).
    pub fn breadth_first(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        out.push(self.root());
        let mut head = 0;
        while head < out.len() {
            let id = out[head];
            head += 1;
            out.extend_from_slice(self.children(id));
        }
        out
    }

    /// Children before parents, left to right.
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, next_child)) = stack.pop() {
            let children = self.children(id);
            if next_child < children.len() {
                stack.push((id, next_child + 1));
                stack.push((children[next_child], 0));
            } else {
                out.push(id);
            }
        }
        out
    }

    /// Longest distance from each node down to a leaf, indexed by [`NodeId::index`].
    pub fn heights(&self) -> Vec<usize> {
        let mut heights = vec![0usize; self.nodes.len()];
        for id in self.post_order() {
            if let Some(parent) = self.parent(id) {
                let h = heights[id.0] + 1;
                if h > heights[parent.0] {
                    heights[parent.0] = h;
                }
            }
        }
        heights
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TidyOptions {
    /// `[dx, dy]`: lateral unit between neighbours and distance between levels.
    pub node_size: (f64, f64),
    pub sibling_separation: f64,
    pub cousin_separation: f64,
}

impl Default for TidyOptions {
    fn default() -> Self {
        Self {
            node_size: (1.0, 1.0),
            sibling_separation: 1.0,
            cousin_separation: 2.0,
        }
    }
}

impl TidyOptions {
    pub fn with_node_size(dx: f64, dy: f64) -> Self {
        Self {
            node_size: (dx, dy),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Hierarchy, [NodeId; 5]) {
        let mut h = Hierarchy::new();
        let r = h.root();
        let a = h.add_child(r);
        let b = h.add_child(r);
        let a1 = h.add_child(a);
        let a2 = h.add_child(a);
        (h, [r, a, b, a1, a2])
    }

    #[test]
    fn traversal_orders_match_d3() {
        let (h, [r, a, b, a1, a2]) = sample();
        assert_eq!(h.breadth_first(), vec![r, a, b, a1, a2]);
        assert_eq!(h.post_order(), vec![a1, a2, a, b, r]);
    }

    #[test]
    fn heights_and_depths() {
        let (h, [r, a, b, a1, _]) = sample();
        let heights = h.heights();
        assert_eq!(heights[r.index()], 2);
        assert_eq!(heights[a.index()], 1);
        assert_eq!(heights[b.index()], 0);
        assert_eq!(h.depth(a1), 2);
        assert_eq!(h.parent(a1), Some(a));
        assert!(h.is_leaf(b));
    }
}
