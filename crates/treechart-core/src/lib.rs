#![forbid(unsafe_code)]

//! Tree chart data model + pan/zoom transform grammar (headless).
//!
//! This crate owns everything that does not depend on a particular layout or rendering
//! surface:
//! - the engine-owned node tree ([`TreeNode`]) with its explicit [`Visibility`] state
//! - normalization of caller datasets under an invisible root ([`normalize`])
//! - chart configuration ([`ChartOptions`], [`TreeConfig`])
//! - the `scale(..) translate(..)` transform string ([`TransformState`])

pub mod config;
pub mod data;
pub mod error;
pub mod geom;
pub mod keys;
pub mod normalize;
pub mod transform;

pub use config::{ChartOptions, Direction, LinkStyle, TreeConfig};
pub use data::{Dataset, SpecialLinkDecl, SpecialLinks, TreeNode, Visibility};
pub use error::{Error, Result};
pub use geom::{Point, Size, rotate_point};
pub use keys::{KeyGenerator, NodeKey, RandomKeys, SequentialKeys};
pub use normalize::{INVISIBLE_ROOT_NAME, RootWrapper, normalize};
pub use transform::{TransformParseError, TransformState, TransformStyle, Translate};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
