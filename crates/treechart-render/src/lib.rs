#![forbid(unsafe_code)]

//! Headless tree chart layout + link rendering.
//!
//! Pipeline: [`layout::layout_tree`] positions the normalized tree and strips the invisible
//! root, [`link_path`] turns every link into an SVG path string, and [`join::LinkJoiner`]
//! diffs consecutive passes by link key into enter/update/exit operations that a
//! [`surface::VectorSurface`] applies.

mod fmt;
pub mod join;
pub mod layout;
pub mod link_path;
pub mod model;
pub mod special_links;
pub mod surface;
pub mod svg;

pub use join::{Ease, LinkExit, LinkJoin, LinkJoiner, LinkRender, Transition};
pub use layout::{LaidOutNode, Link, LinkKind, TreeLayout, layout_tree};
pub use link_path::{PathBuilder, link_path, path_for};
pub use model::{LayoutSnapshot, LinkSnapshot, NodeSnapshot};
pub use surface::{OverlaySurface, TransformSurface, VectorSurface};
pub use svg::{HeadlessOverlay, HeadlessSvgSurface, SvgRenderOptions};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] treechart_core::Error),
    #[error("layout snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
