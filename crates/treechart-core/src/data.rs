use crate::keys::{KeyGenerator, NodeKey};
use crate::normalize::INVISIBLE_ROOT_NAME;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const KEY_FIELD: &str = "_key";
const CHILDREN_FIELD: &str = "children";
const HIDDEN_CHILDREN_FIELD: &str = "_children";
const COLLAPSED_FIELD: &str = "_collapsed";
const IDENTIFIER_FIELD: &str = "identifier";
const LINKS_FIELD: &str = "links";

/// Which of a node's two child slots is populated.
///
/// A node is never expanded and collapsed at the same time; a leaf is `Expanded(vec![])`.
#[derive(Debug, Clone, PartialEq)]
pub enum Visibility {
    Expanded(Vec<TreeNode>),
    Collapsed(Vec<TreeNode>),
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Expanded(Vec::new())
    }
}

/// A node of the engine-owned copy of the caller's hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    key: NodeKey,
    /// Every caller field except the child slots and engine bookkeeping (`_key`, `_collapsed`).
    payload: Map<String, Value>,
    visibility: Visibility,
}

impl TreeNode {
    pub fn new(key: NodeKey, payload: Map<String, Value>, visibility: Visibility) -> Self {
        Self {
            key,
            payload,
            visibility,
        }
    }

    /// Deep-copies a caller JSON object, issuing a fresh key for it and every descendant.
    ///
    /// Caller-supplied `_key` and `_collapsed` fields are ignored. A node that carries an
    /// array under `_children` and no `children` arrives collapsed. The name
    /// [`INVISIBLE_ROOT_NAME`] is reserved for the synthetic root and rejected.
    pub fn from_value(value: &Value, keys: &mut dyn KeyGenerator) -> Result<Self> {
        let Value::Object(obj) = value else {
            return Err(Error::invalid_dataset(format!(
                "tree nodes must be JSON objects, got {}",
                json_kind(value)
            )));
        };
        if obj.get("name").and_then(Value::as_str) == Some(INVISIBLE_ROOT_NAME) {
            return Err(Error::invalid_dataset(format!(
                "node name `{INVISIBLE_ROOT_NAME}` is reserved"
            )));
        }

        let key = keys.next_key();
        let mut payload = Map::new();
        let mut children: Option<&Vec<Value>> = None;
        let mut hidden: Option<&Vec<Value>> = None;

        for (k, v) in obj {
            match k.as_str() {
                CHILDREN_FIELD => match v {
                    Value::Null => {}
                    Value::Array(items) => children = Some(items),
                    other => {
                        return Err(Error::invalid_dataset(format!(
                            "`children` must be an array or null, got {}",
                            json_kind(other)
                        )));
                    }
                },
                HIDDEN_CHILDREN_FIELD => {
                    if let Value::Array(items) = v {
                        hidden = Some(items);
                    }
                }
                KEY_FIELD | COLLAPSED_FIELD => {}
                _ => {
                    payload.insert(k.clone(), v.clone());
                }
            }
        }

        let visibility = match (children, hidden) {
            (Some(items), _) => Visibility::Expanded(copy_children(items, keys)?),
            (None, Some(items)) if !items.is_empty() => {
                Visibility::Collapsed(copy_children(items, keys)?)
            }
            _ => Visibility::default(),
        };

        Ok(Self {
            key,
            payload,
            visibility,
        })
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn name(&self) -> Option<&str> {
        self.payload.get("name").and_then(Value::as_str)
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Looks up a data field by name. `name` is an ordinary payload field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Children the layout pass walks; empty while collapsed.
    pub fn visible_children(&self) -> &[TreeNode] {
        match &self.visibility {
            Visibility::Expanded(children) => children,
            Visibility::Collapsed(_) => &[],
        }
    }

    /// Children stashed by a collapse; empty while expanded.
    pub fn hidden_children(&self) -> &[TreeNode] {
        match &self.visibility {
            Visibility::Expanded(_) => &[],
            Visibility::Collapsed(children) => children,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self.visibility, Visibility::Collapsed(_))
    }

    /// True when the node has no children in either slot.
    pub fn is_leaf(&self) -> bool {
        match &self.visibility {
            Visibility::Expanded(children) | Visibility::Collapsed(children) => {
                children.is_empty()
            }
        }
    }

    /// Flips between expanded and collapsed, moving the subtree between the two slots.
    ///
    /// Returns `false` (and changes nothing) for leaves.
    pub fn toggle_collapsed(&mut self) -> bool {
        if self.is_leaf() {
            return false;
        }
        self.visibility = match std::mem::take(&mut self.visibility) {
            Visibility::Expanded(children) => Visibility::Collapsed(children),
            Visibility::Collapsed(children) => Visibility::Expanded(children),
        };
        true
    }

    pub(crate) fn push_child(&mut self, child: TreeNode) {
        match &mut self.visibility {
            Visibility::Expanded(children) | Visibility::Collapsed(children) => {
                children.push(child)
            }
        }
    }

    /// Follows visible child indices from this node.
    pub fn descendant(&self, path: &[usize]) -> Option<&TreeNode> {
        let mut cur = self;
        for &i in path {
            cur = cur.visible_children().get(i)?;
        }
        Some(cur)
    }

    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut TreeNode> {
        let mut cur = self;
        for &i in path {
            cur = match &mut cur.visibility {
                Visibility::Expanded(children) => children.get_mut(i)?,
                Visibility::Collapsed(_) => return None,
            };
        }
        Some(cur)
    }

    /// Node data without child slots, as handed to node renderers.
    pub fn data_value(&self) -> Value {
        let mut out = Map::new();
        out.insert(KEY_FIELD.to_string(), Value::String(self.key.to_string()));
        for (k, v) in &self.payload {
            out.insert(k.clone(), v.clone());
        }
        out.insert(COLLAPSED_FIELD.to_string(), Value::Bool(self.is_collapsed()));
        Value::Object(out)
    }

    /// Full JSON form of the subtree. The populated child slot holds an array and the other
    /// one is `null`.
    pub fn to_value(&self) -> Value {
        let Value::Object(mut out) = self.data_value() else {
            return Value::Null;
        };
        match &self.visibility {
            Visibility::Expanded(children) => {
                out.insert(
                    CHILDREN_FIELD.to_string(),
                    Value::Array(children.iter().map(TreeNode::to_value).collect()),
                );
                out.insert(HIDDEN_CHILDREN_FIELD.to_string(), Value::Null);
            }
            Visibility::Collapsed(children) => {
                out.insert(CHILDREN_FIELD.to_string(), Value::Null);
                out.insert(
                    HIDDEN_CHILDREN_FIELD.to_string(),
                    Value::Array(children.iter().map(TreeNode::to_value).collect()),
                );
            }
        }
        Value::Object(out)
    }

    /// Total node count of the subtree, hidden children included.
    pub fn subtree_len(&self) -> usize {
        match &self.visibility {
            Visibility::Expanded(children) | Visibility::Collapsed(children) => {
                1 + children.iter().map(TreeNode::subtree_len).sum::<usize>()
            }
        }
    }
}

fn copy_children(items: &[Value], keys: &mut dyn KeyGenerator) -> Result<Vec<TreeNode>> {
    items.iter().map(|v| TreeNode::from_value(v, keys)).collect()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One caller-declared edge, resolved by identifier matching after layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialLinkDecl {
    #[serde(default)]
    pub parent: Value,
    #[serde(default)]
    pub child: Value,
}

/// Edges not implied by the hierarchy: `identifier` names the field matched against
/// `parent`/`child` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialLinks {
    pub identifier: String,
    #[serde(default)]
    pub links: Vec<SpecialLinkDecl>,
}

#[derive(Debug, Clone, PartialEq)]
enum DatasetRoots {
    Single(Value),
    List(Vec<Value>),
}

/// Caller data: one root object or an ordered list of roots, plus optional special links.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    roots: DatasetRoots,
    special_links: Option<SpecialLinks>,
}

impl Dataset {
    /// Wraps a single root object. Top-level `identifier` + `links` fields are lifted into
    /// [`SpecialLinks`] and removed from the root's data.
    pub fn single(root: Value) -> Result<Self> {
        let mut root = root;
        let special_links = take_special_links(&mut root)?;
        Ok(Self {
            roots: DatasetRoots::Single(root),
            special_links,
        })
    }

    pub fn list(roots: Vec<Value>) -> Self {
        Self {
            roots: DatasetRoots::List(roots),
            special_links: None,
        }
    }

    /// Interprets arbitrary caller JSON: arrays become lists, objects single roots, `null` an
    /// empty list.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::list(Vec::new())),
            Value::Array(items) => Ok(Self::list(items)),
            obj @ Value::Object(_) => Self::single(obj),
            other => Err(Error::invalid_dataset(format!(
                "dataset must be an object or an array, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn with_special_links(mut self, special_links: SpecialLinks) -> Self {
        self.special_links = Some(special_links);
        self
    }

    pub fn special_links(&self) -> Option<&SpecialLinks> {
        self.special_links.as_ref()
    }

    pub fn is_list(&self) -> bool {
        matches!(self.roots, DatasetRoots::List(_))
    }

    /// Top-level roots in input order.
    pub fn roots(&self) -> &[Value] {
        match &self.roots {
            DatasetRoots::Single(root) => std::slice::from_ref(root),
            DatasetRoots::List(roots) => roots,
        }
    }
}

fn take_special_links(root: &mut Value) -> Result<Option<SpecialLinks>> {
    let Value::Object(obj) = root else {
        return Ok(None);
    };
    let has_identifier = obj.get(IDENTIFIER_FIELD).is_some_and(Value::is_string);
    let has_links = obj.get(LINKS_FIELD).is_some_and(Value::is_array);
    if !(has_identifier && has_links) {
        return Ok(None);
    }

    let identifier = obj.shift_remove(IDENTIFIER_FIELD).unwrap_or_default();
    let links = obj.shift_remove(LINKS_FIELD).unwrap_or_default();
    let links: Vec<SpecialLinkDecl> = serde_json::from_value(links)?;
    Ok(Some(SpecialLinks {
        identifier: identifier.as_str().unwrap_or_default().to_string(),
        links,
    }))
}
