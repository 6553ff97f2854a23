use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine-assigned node identity.
///
/// Issued once when a dataset is normalized and carried through every later layout pass; link
/// keys are derived from it (`"<source>-<target>"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh node keys.
///
/// Implementations must never hand out the same key twice over their lifetime.
pub trait KeyGenerator {
    fn next_key(&mut self) -> NodeKey;
}

/// Deterministic keys (`n0`, `n1`, ...), used by default so snapshots are stable.
#[derive(Debug, Clone, Default)]
pub struct SequentialKeys {
    next: u64,
}

impl SequentialKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys issued so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

impl KeyGenerator for SequentialKeys {
    fn next_key(&mut self) -> NodeKey {
        let key = NodeKey(format!("n{}", self.next));
        self.next += 1;
        key
    }
}

/// Random v4 UUID keys, for hosts that merge keys from several charts into one document.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeys;

impl KeyGenerator for RandomKeys {
    fn next_key(&mut self) -> NodeKey {
        NodeKey(uuid::Uuid::new_v4().to_string())
    }
}
