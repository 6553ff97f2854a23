//! In-memory surfaces for headless hosts (CLI, tests).

use crate::fmt::{escape_xml, fmt_attr};
use crate::join::LinkJoin;
use crate::layout::TreeLayout;
use crate::surface::{OverlaySurface, TransformSurface, VectorSurface};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt::Write as _;
use treechart_core::{Direction, Size, TreeConfig};

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Adds extra space around the computed viewBox.
    pub viewbox_padding: f64,
    /// Root `id` attribute; defaults to `treechart`.
    pub diagram_id: Option<String>,
    pub direction: Direction,
    /// Node box size comes from `nodeWidth` x `nodeHeight`.
    pub tree_config: TreeConfig,
    /// When true, draw a labelled box per node.
    pub include_nodes: bool,
    /// When true, carry the surface's pan/zoom transform on the content group.
    pub include_transform: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            viewbox_padding: 8.0,
            diagram_id: None,
            direction: Direction::default(),
            tree_config: TreeConfig::default(),
            include_nodes: true,
            include_transform: false,
        }
    }
}

/// A `<path class="link">` as left behind by the last applied join.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkElement {
    pub source_key: String,
    pub target_key: String,
    pub d: String,
    pub opacity: f64,
}

/// Vector surface that records link elements by key. Transitions are applied at their end
/// state; exiting elements are removed right away.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSvgSurface {
    transform: String,
    links: IndexMap<String, LinkElement, FxBuildHasher>,
}

impl HeadlessSvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(&self) -> &IndexMap<String, LinkElement, FxBuildHasher> {
        &self.links
    }

    pub fn link(&self, key: &str) -> Option<&LinkElement> {
        self.links.get(key)
    }

    /// Serializes the links on this surface plus the nodes of `layout` as a standalone SVG.
    pub fn render_svg(&self, layout: &TreeLayout, options: &SvgRenderOptions) -> String {
        let diagram_id = options.diagram_id.as_deref().unwrap_or("treechart");
        let (min_x, min_y, width, height) = view_box(layout, options);

        let mut out = String::new();
        let _ = write!(
            &mut out,
            r#"<svg id="{}" xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}" class="treechart-{}">"#,
            escape_xml(diagram_id),
            fmt_attr(width),
            fmt_attr(height),
            fmt_attr(min_x),
            fmt_attr(min_y),
            fmt_attr(width),
            fmt_attr(height),
            options.direction,
        );
        out.push_str(
            r#"<style>.link{fill:none;stroke:#999;stroke-width:1.5px}.node rect{fill:#fff;stroke:#555}.node text{font:12px sans-serif;text-anchor:middle;dominant-baseline:central}</style>"#,
        );
        if options.include_transform && !self.transform.is_empty() {
            let _ = write!(
                &mut out,
                r#"<g style="transform: {}; transform-origin: center">"#,
                escape_xml(&self.transform)
            );
        } else {
            out.push_str("<g>");
        }

        out.push_str(r#"<g class="links">"#);
        for (key, link) in &self.links {
            let _ = write!(
                &mut out,
                r#"<path class="link" data-key="{}" d="{}""#,
                escape_xml(key),
                link.d
            );
            if link.opacity < 1.0 {
                let _ = write!(&mut out, r#" opacity="{}""#, fmt_attr(link.opacity));
            }
            out.push_str("/>");
        }
        out.push_str("</g>");

        if options.include_nodes {
            let w = options.tree_config.node_width;
            let h = options.tree_config.node_height;
            out.push_str(r#"<g class="nodes">"#);
            for node in &layout.nodes {
                let p = node.position(options.direction);
                let class = if node.collapsed { "node collapsed" } else { "node" };
                let _ = write!(
                    &mut out,
                    r#"<g class="{class}" data-key="{}" transform="translate({},{})"><rect x="{}" y="{}" width="{}" height="{}"/>"#,
                    escape_xml(node.key.as_str()),
                    fmt_attr(p.x),
                    fmt_attr(p.y),
                    fmt_attr(-w / 2.0),
                    fmt_attr(-h / 2.0),
                    fmt_attr(w),
                    fmt_attr(h),
                );
                if let Some(name) = node.name() {
                    let _ = write!(&mut out, "<text>{}</text>", escape_xml(name));
                }
                out.push_str("</g>");
            }
            out.push_str("</g>");
        }

        out.push_str("</g></svg>\n");
        out
    }
}

impl TransformSurface for HeadlessSvgSurface {
    fn transform(&self) -> &str {
        &self.transform
    }

    fn set_transform(&mut self, transform: &str) {
        transform.clone_into(&mut self.transform);
    }
}

impl VectorSurface for HeadlessSvgSurface {
    fn apply_link_join(&mut self, join: &LinkJoin) {
        for op in &join.enter {
            self.links.insert(
                op.key.clone(),
                LinkElement {
                    source_key: op.source_key.clone(),
                    target_key: op.target_key.clone(),
                    d: op.d.clone(),
                    opacity: op.transition.to_opacity,
                },
            );
        }
        for op in &join.update {
            match self.links.get_mut(&op.key) {
                Some(el) => {
                    el.d.clone_from(&op.d);
                    el.opacity = op.transition.to_opacity;
                }
                None => {
                    tracing::trace!(key = %op.key, "update for a link that is not on the surface");
                }
            }
        }
        for op in &join.exit {
            self.links.shift_remove(&op.key);
        }
    }
}

/// Overlay surface with a fixed offset size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessOverlay {
    size: Size,
    transform: String,
}

impl HeadlessOverlay {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            transform: String::new(),
        }
    }

    pub fn set_offset_size(&mut self, size: Size) {
        self.size = size;
    }
}

impl TransformSurface for HeadlessOverlay {
    fn transform(&self) -> &str {
        &self.transform
    }

    fn set_transform(&mut self, transform: &str) {
        transform.clone_into(&mut self.transform);
    }
}

impl OverlaySurface for HeadlessOverlay {
    fn offset_size(&self) -> Size {
        self.size
    }
}

fn view_box(layout: &TreeLayout, options: &SvgRenderOptions) -> (f64, f64, f64, f64) {
    let pad = options.viewbox_padding.max(0.0);
    let half_w = options.tree_config.node_width / 2.0;
    let half_h = options.tree_config.node_height / 2.0;

    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for node in &layout.nodes {
        let p = node.position(options.direction);
        let b = (p.x - half_w, p.y - half_h, p.x + half_w, p.y + half_h);
        bounds = Some(match bounds {
            None => b,
            Some((x0, y0, x1, y1)) => (x0.min(b.0), y0.min(b.1), x1.max(b.2), y1.max(b.3)),
        });
    }
    let (x0, y0, x1, y1) = bounds.unwrap_or((0.0, 0.0, 0.0, 0.0));
    (x0 - pad, y0 - pad, x1 - x0 + 2.0 * pad, y1 - y0 + 2.0 * pad)
}
