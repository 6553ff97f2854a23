use crate::special_links::resolve_special_links;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use treechart_core::{Direction, NodeKey, Point, RootWrapper, TreeConfig, TreeNode, rotate_point};
use treechart_layout::tidy;
use treechart_layout::{Hierarchy, NodeId, TidyOptions};

/// A node positioned by one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidOutNode {
    pub key: NodeKey,
    /// Visible-child indices from the invisible root down to this node.
    pub path: Vec<usize>,
    /// Lateral position in the tree frame (before orientation).
    pub x: f64,
    /// Depth-axis position in the tree frame: `depth * levelHeight`.
    pub y: f64,
    /// Distance from the invisible root; top-level nodes have depth 1.
    pub depth: usize,
    /// Longest distance down to a visible leaf.
    pub height: usize,
    /// Index of the parent in the node list; `None` for top-level nodes.
    pub parent: Option<usize>,
    pub collapsed: bool,
    /// True when the node has children in either slot (i.e. it can be toggled).
    pub expandable: bool,
    /// Node data (payload, `_key`, `_collapsed`) for caller-side node rendering.
    pub data: Value,
}

impl LaidOutNode {
    pub fn name(&self) -> Option<&str> {
        self.data.get("name").and_then(Value::as_str)
    }

    /// Position on the rendering surface for the given orientation.
    pub fn position(&self, direction: Direction) -> Point {
        let p = Point::new(self.x, self.y);
        match direction {
            Direction::Vertical => p,
            Direction::Horizontal => rotate_point(p),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Structural,
    Special,
}

/// A link between two entries of [`TreeLayout::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub kind: LinkKind,
}

/// Output of one layout pass. Recomputed wholesale on every pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeLayout {
    /// Breadth-first, invisible root excluded.
    pub nodes: Vec<LaidOutNode>,
    /// Structural links first (breadth-first by target), then special links.
    pub links: Vec<Link>,
}

impl TreeLayout {
    pub fn source(&self, link: &Link) -> &LaidOutNode {
        &self.nodes[link.source]
    }

    pub fn target(&self, link: &Link) -> &LaidOutNode {
        &self.nodes[link.target]
    }

    /// Render key of a link: `"<sourceKey>-<targetKey>"`.
    pub fn link_key(&self, link: &Link) -> String {
        format!("{}-{}", self.source(link).key, self.target(link).key)
    }

    pub fn node_index(&self, key: &NodeKey) -> Option<usize> {
        self.nodes.iter().position(|n| &n.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Positions the visible part of `wrapper` and returns only caller nodes and links.
///
/// `nodeWidth` is the lateral unit between neighbours and `levelHeight` the distance between
/// levels; the invisible root occupies level 0 at the origin.
pub fn layout_tree(wrapper: &RootWrapper, config: &TreeConfig) -> TreeLayout {
    let mut h = Hierarchy::new();
    // Breadth-first construction, so arena ids follow d3's `descendants()` order.
    let mut entries: Vec<(&TreeNode, Vec<usize>)> = vec![(&wrapper.root, Vec::new())];
    let mut queue: VecDeque<(NodeId, usize)> = VecDeque::from([(h.root(), 0)]);
    while let Some((hid, entry)) = queue.pop_front() {
        let node = entries[entry].0;
        for (i, child) in node.visible_children().iter().enumerate() {
            let child_id = h.add_child(hid);
            let mut path = entries[entry].1.clone();
            path.push(i);
            entries.push((child, path));
            queue.push_back((child_id, entries.len() - 1));
        }
    }

    let positions = tidy::layout(
        &h,
        &TidyOptions::with_node_size(config.node_width, config.level_height),
    );
    let heights = h.heights();
    let root = h.root();

    let mut nodes = Vec::with_capacity(h.len().saturating_sub(1));
    let mut links = Vec::with_capacity(h.len().saturating_sub(1));
    for (id, (tree_node, path)) in h.breadth_first().into_iter().zip(entries).skip(1) {
        let pos = positions[id.index()];
        let parent = h
            .parent(id)
            .filter(|p| *p != root)
            .map(|p| p.index() - 1);
        let index = id.index() - 1;
        if let Some(source) = parent {
            links.push(Link {
                source,
                target: index,
                kind: LinkKind::Structural,
            });
        }
        nodes.push(LaidOutNode {
            key: tree_node.key().clone(),
            path,
            x: pos.x,
            y: pos.y,
            depth: pos.depth,
            height: heights[id.index()],
            parent,
            collapsed: tree_node.is_collapsed(),
            expandable: !tree_node.is_leaf(),
            data: tree_node.data_value(),
        });
    }

    let mut layout = TreeLayout { nodes, links };
    if let Some(special) = &wrapper.special_links {
        let extra = resolve_special_links(&layout.nodes, special);
        layout.links.extend(extra);
    }

    tracing::debug!(
        nodes = layout.nodes.len(),
        links = layout.links.len(),
        "layout pass"
    );
    layout
}
