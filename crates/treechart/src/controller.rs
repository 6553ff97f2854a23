//! Pan/zoom state shared by the chart's two surfaces.
//!
//! Every write goes to both surfaces with the same string; the controller's [`TransformState`]
//! is the source of truth and the surfaces mirror it.

use treechart_core::config::ZOOM_STEP;
use treechart_core::{Point, TransformParseError, TransformState, Translate};
use treechart_render::TransformSurface;

/// The two surfaces that are transformed together. `primary` is the one read back by
/// [`TransformController::sync_from_surface`].
pub struct SurfacePair<'a> {
    primary: &'a mut dyn TransformSurface,
    secondary: &'a mut dyn TransformSurface,
}

impl<'a> SurfacePair<'a> {
    pub fn new(
        primary: &'a mut dyn TransformSurface,
        secondary: &'a mut dyn TransformSurface,
    ) -> Self {
        Self { primary, secondary }
    }

    fn write(&mut self, transform: &str) {
        self.primary.set_transform(transform);
        self.secondary.set_transform(transform);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    start: Point,
    origin: Option<Translate>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformController {
    state: TransformState,
    drag: Option<DragSession>,
}

impl TransformController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    /// Current translate; `None` until one has been applied.
    pub fn get_translate(&self) -> Option<Translate> {
        self.state.translate
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Replaces the whole state and writes it to both surfaces.
    pub fn set_state(&mut self, state: TransformState, surfaces: &mut SurfacePair<'_>) {
        self.state = state;
        self.apply(surfaces);
    }

    pub fn zoom_in(&mut self, surfaces: &mut SurfacePair<'_>) {
        self.set_scale(self.state.scale * ZOOM_STEP, surfaces);
    }

    pub fn zoom_out(&mut self, surfaces: &mut SurfacePair<'_>) {
        self.set_scale(self.state.scale / ZOOM_STEP, surfaces);
    }

    pub fn restore_scale(&mut self, surfaces: &mut SurfacePair<'_>) {
        self.set_scale(1.0, surfaces);
    }

    /// Sets the scale, keeping the translate.
    ///
    /// Only positive normal numbers are applied; zero, negative, subnormal and non-finite
    /// scales are ignored and leave both surfaces untouched.
    pub fn set_scale(&mut self, scale: f64, surfaces: &mut SurfacePair<'_>) -> bool {
        if !(scale.is_normal() && scale > 0.0) {
            tracing::trace!(scale, "ignoring unusable scale");
            return false;
        }
        self.state.scale = scale;
        self.apply(surfaces);
        tracing::trace!(transform = %self.state, "scale set");
        true
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag = Some(DragSession {
            start: Point::new(x, y),
            origin: self.state.translate,
        });
    }

    /// Pans by the pointer delta since [`Self::pointer_down`], divided by the current scale.
    ///
    /// Returns `false` when no drag is in progress.
    pub fn pointer_move(&mut self, x: f64, y: f64, surfaces: &mut SurfacePair<'_>) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let origin = drag.origin.unwrap_or(Translate::new(0, 0));
        let scale = self.state.scale;
        let dx = pan_offset(x - drag.start.x, scale);
        let dy = pan_offset(y - drag.start.y, scale);
        self.state.translate = Some(Translate::new(
            origin.x.saturating_add(dx),
            origin.y.saturating_add(dy),
        ));
        self.apply(surfaces);
        true
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Re-reads the primary surface after an external write.
    ///
    /// The string must match the transform grammar exactly; on error the state is unchanged.
    pub fn sync_from_surface(
        &mut self,
        primary: &dyn TransformSurface,
    ) -> Result<TransformState, TransformParseError> {
        let state: TransformState = primary.transform().parse()?;
        self.state = state;
        Ok(state)
    }

    fn apply(&self, surfaces: &mut SurfacePair<'_>) {
        surfaces.write(&self.state.to_string());
    }
}

/// `floor(delta / scale)` clamped to the `i64` range. A scale loaded from a surface may be zero,
/// so an undefined quotient pans by nothing.
fn pan_offset(delta: f64, scale: f64) -> i64 {
    let offset = (delta / scale).floor();
    if offset.is_nan() {
        0
    } else if offset >= i64::MAX as f64 {
        i64::MAX
    } else if offset <= i64::MIN as f64 {
        i64::MIN
    } else {
        offset as i64
    }
}
