#![forbid(unsafe_code)]

//! `treechart` is a headless interactive tree chart.
//!
//! Feed it a nested JSON dataset and two rendering surfaces; it owns the layout, the link
//! geometry, collapse/expand state and the pan/zoom transform shared by both surfaces.
//!
//! ```no_run
//! use serde_json::json;
//! use treechart::{ChartOptions, Dataset, HeadlessOverlay, HeadlessSvgSurface, Size, TreeChart};
//!
//! let dataset = Dataset::from_value(json!({ "name": "root", "children": [{ "name": "a" }] }))?;
//! let mut chart = TreeChart::new(
//!     ChartOptions::new(true),
//!     Some(&dataset),
//!     HeadlessSvgSurface::new(),
//!     HeadlessOverlay::new(Size::new(800.0, 600.0)),
//! )?;
//! chart.init()?;
//! chart.on_click_node(0)?;
//! # Ok::<(), treechart::Error>(())
//! ```

mod chart;
pub mod controller;

pub use chart::TreeChart;
pub use controller::{SurfacePair, TransformController};

pub use treechart_core::config;
pub use treechart_core::Error as CoreError;
pub use treechart_core::{
    ChartOptions, Dataset, Direction, INVISIBLE_ROOT_NAME, KeyGenerator, LinkStyle, NodeKey,
    Point, RandomKeys, RootWrapper, SequentialKeys, Size, SpecialLinkDecl, SpecialLinks,
    TransformParseError, TransformState, TransformStyle, Translate, TreeConfig, TreeNode,
    Visibility, normalize,
};
pub use treechart_render::{
    Ease, HeadlessOverlay, HeadlessSvgSurface, LaidOutNode, LayoutSnapshot, Link, LinkExit,
    LinkJoin, LinkJoiner, LinkKind, LinkRender, OverlaySurface, SvgRenderOptions,
    TransformSurface, Transition, TreeLayout, VectorSurface, layout_tree, link_path, path_for,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the chart has been destroyed")]
    Destroyed,

    #[error("node index {index} is out of range ({len} laid-out nodes)")]
    NodeIndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Core(#[from] treechart_core::Error),

    #[error(transparent)]
    Render(#[from] treechart_render::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
