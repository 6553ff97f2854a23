use crate::Result;
use crate::layout::{LinkKind, TreeLayout};
use crate::link_path::path_for;
use serde::Serialize;
use serde_json::Value;
use treechart_core::{Direction, LinkStyle};

/// Serializable view of one layout pass, with positions already oriented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub direction: Direction,
    pub link_style: LinkStyle,
    pub nodes: Vec<NodeSnapshot>,
    pub links: Vec<LinkSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub depth: usize,
    pub height: usize,
    pub collapsed: bool,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSnapshot {
    pub key: String,
    pub source: String,
    pub target: String,
    pub kind: LinkKind,
    pub d: String,
}

impl LayoutSnapshot {
    pub fn from_layout(layout: &TreeLayout, style: LinkStyle, direction: Direction) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|n| {
                let p = n.position(direction);
                NodeSnapshot {
                    key: n.key.to_string(),
                    x: p.x,
                    y: p.y,
                    depth: n.depth,
                    height: n.height,
                    collapsed: n.collapsed,
                    data: n.data.clone(),
                }
            })
            .collect();
        let links = layout
            .links
            .iter()
            .map(|l| LinkSnapshot {
                key: layout.link_key(l),
                source: layout.source(l).key.to_string(),
                target: layout.target(l).key.to_string(),
                kind: l.kind,
                d: path_for(layout, l, style, direction),
            })
            .collect();
        Self {
            direction,
            link_style: style,
            nodes,
            links,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}
