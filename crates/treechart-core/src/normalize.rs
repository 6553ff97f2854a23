use crate::data::{Dataset, SpecialLinks, TreeNode, Visibility};
use crate::keys::{KeyGenerator, NodeKey};
use crate::Result;
use serde_json::{Map, Value};

/// Reserved name of the synthetic root. Never reaches callers through layout output.
pub const INVISIBLE_ROOT_NAME: &str = "__invisible_root";

/// The synthetic root holding deep copies of the caller's top-level nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct RootWrapper {
    pub root: TreeNode,
    pub special_links: Option<SpecialLinks>,
}

impl RootWrapper {
    pub fn empty() -> Self {
        let mut payload = Map::new();
        payload.insert(
            "name".to_string(),
            Value::String(INVISIBLE_ROOT_NAME.to_string()),
        );
        Self {
            root: TreeNode::new(
                NodeKey::new(INVISIBLE_ROOT_NAME),
                payload,
                Visibility::default(),
            ),
            special_links: None,
        }
    }

    /// The copied caller roots, in wrapper order.
    pub fn top_level(&self) -> &[TreeNode] {
        self.root.visible_children()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_leaf()
    }
}

/// Deep-copies `dataset` under an invisible root, issuing keys from `keys`.
///
/// List input is enumerated back to front: the last item becomes the first child. Callers that
/// need declared order should pass a single root or reverse the list themselves.
pub fn normalize(dataset: Option<&Dataset>, keys: &mut dyn KeyGenerator) -> Result<RootWrapper> {
    let mut wrapper = RootWrapper::empty();
    let Some(dataset) = dataset else {
        return Ok(wrapper);
    };

    if dataset.is_list() {
        for item in dataset.roots().iter().rev() {
            wrapper.root.push_child(TreeNode::from_value(item, keys)?);
        }
    } else {
        for item in dataset.roots() {
            wrapper.root.push_child(TreeNode::from_value(item, keys)?);
        }
    }
    wrapper.special_links = dataset.special_links().cloned();

    tracing::debug!(
        roots = wrapper.top_level().len(),
        nodes = wrapper.root.subtree_len() - 1,
        special_links = wrapper.special_links.as_ref().map_or(0, |s| s.links.len()),
        "normalized dataset"
    );
    Ok(wrapper)
}
