//! Seams to the host's rendering surfaces.
//!
//! The chart owns two surfaces that are panned and zoomed together: a vector surface that
//! draws links and an overlay that positions caller-rendered node content.

use crate::join::LinkJoin;
use treechart_core::Size;

/// Anything carrying a `transform` style string.
pub trait TransformSurface {
    /// Current transform string; empty when none has been written.
    fn transform(&self) -> &str;
    fn set_transform(&mut self, transform: &str);
}

pub trait VectorSurface: TransformSurface {
    /// Applies one render pass: enter, then update, then exit.
    fn apply_link_join(&mut self, join: &LinkJoin);
}

pub trait OverlaySurface: TransformSurface {
    /// Laid-out size of the overlay box, used for the initial centering offset.
    fn offset_size(&self) -> Size;
}
