use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_NODE_WIDTH: f64 = 100.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;
pub const DEFAULT_LEVEL_HEIGHT: f64 = 200.0;
/// Subtracted from the node extent along the depth axis when computing the initial offset.
pub const DEFAULT_HEIGHT_DECREMENT: f64 = 200.0;
pub const ANIMATION_DURATION_MS: u64 = 800;
pub const ZOOM_STEP: f64 = 1.2;

/// Spacing parameters consumed by the layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfig {
    /// Lateral distance between sibling nodes.
    pub node_width: f64,
    pub node_height: f64,
    /// Distance between two depth levels.
    pub level_height: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            level_height: DEFAULT_LEVEL_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        self == Self::Vertical
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            other => Err(Error::InvalidOptions {
                message: format!("unknown direction `{other}` (expected vertical|horizontal)"),
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    #[default]
    Curve,
    /// Right-angle polyline through the midpoint between two levels.
    Straight,
}

impl LinkStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Curve => "curve",
            Self::Straight => "straight",
        }
    }
}

impl FromStr for LinkStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "curve" => Ok(Self::Curve),
            "straight" => Ok(Self::Straight),
            other => Err(Error::InvalidOptions {
                message: format!("unknown link style `{other}` (expected curve|straight)"),
            }),
        }
    }
}

impl fmt::Display for LinkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction parameters of a chart, minus the dataset and the rendering surfaces.
///
/// Deserializes from the camelCase JSON shape used by embedding hosts:
///
/// ```json
/// { "treeConfig": { "nodeWidth": 120, "nodeHeight": 80, "levelHeight": 160 },
///   "collapseEnabled": true, "direction": "horizontal", "linkStyle": "straight" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(default)]
    pub tree_config: TreeConfig,
    pub collapse_enabled: bool,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub link_style: LinkStyle,
}

impl ChartOptions {
    pub fn new(collapse_enabled: bool) -> Self {
        Self {
            tree_config: TreeConfig::default(),
            collapse_enabled,
            direction: Direction::default(),
            link_style: LinkStyle::default(),
        }
    }

    pub fn with_tree_config(mut self, tree_config: TreeConfig) -> Self {
        self.tree_config = tree_config;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_link_style(mut self, link_style: LinkStyle) -> Self {
        self.link_style = link_style;
        self
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let options = Self::deserialize(value)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.tree_config;
        for (name, v) in [
            ("nodeWidth", c.node_width),
            ("nodeHeight", c.node_height),
            ("levelHeight", c.level_height),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidOptions {
                    message: format!("treeConfig.{name} must be a positive number, got {v}"),
                });
            }
        }
        Ok(())
    }
}
