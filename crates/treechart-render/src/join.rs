//! Keyed enter/update/exit diff of links between render passes.

use crate::layout::TreeLayout;
use crate::link_path::path_for;
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use treechart_core::config::ANIMATION_DURATION_MS;
use treechart_core::{Direction, LinkStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    #[default]
    CubicInOut,
}

impl Ease {
    /// Eased progress for `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// Animation handed to the surface alongside each join operation.
///
/// `from_opacity: None` means "animate from whatever is currently shown".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub duration_ms: u64,
    pub ease: Ease,
    pub from_opacity: Option<f64>,
    pub to_opacity: f64,
}

impl Transition {
    pub fn enter() -> Self {
        Self {
            duration_ms: ANIMATION_DURATION_MS,
            ease: Ease::CubicInOut,
            from_opacity: Some(0.0),
            to_opacity: 1.0,
        }
    }

    pub fn update() -> Self {
        Self {
            duration_ms: ANIMATION_DURATION_MS,
            ease: Ease::CubicInOut,
            from_opacity: None,
            to_opacity: 1.0,
        }
    }

    /// Fade out over half the regular duration; the element is removed afterwards.
    pub fn exit() -> Self {
        Self {
            duration_ms: ANIMATION_DURATION_MS / 2,
            ease: Ease::CubicInOut,
            from_opacity: None,
            to_opacity: 0.0,
        }
    }

    /// Opacity `elapsed_ms` into the transition, starting from `current` when unspecified.
    pub fn opacity_at(&self, elapsed_ms: u64, current: f64) -> f64 {
        let from = self.from_opacity.unwrap_or(current);
        if self.duration_ms == 0 {
            return self.to_opacity;
        }
        let t = self.ease.apply(elapsed_ms as f64 / self.duration_ms as f64);
        from + (self.to_opacity - from) * t
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRender {
    pub key: String,
    pub source_key: String,
    pub target_key: String,
    /// Target path data; entering links start with it, updating links animate towards it.
    pub d: String,
    pub transition: Transition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkExit {
    pub key: String,
    pub transition: Transition,
}

/// One render pass worth of link operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkJoin {
    pub enter: Vec<LinkRender>,
    pub update: Vec<LinkRender>,
    pub exit: Vec<LinkExit>,
}

impl LinkJoin {
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.update.is_empty() && self.exit.is_empty()
    }
}

/// Remembers which link keys are on screen so consecutive passes diff by key.
#[derive(Debug, Clone, Default)]
pub struct LinkJoiner {
    rendered: IndexSet<String, FxBuildHasher>,
}

impl LinkJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently on screen, in render order.
    pub fn rendered(&self) -> impl Iterator<Item = &str> {
        self.rendered.iter().map(String::as_str)
    }

    pub fn join(&mut self, layout: &TreeLayout, style: LinkStyle, direction: Direction) -> LinkJoin {
        let mut next: IndexSet<String, FxBuildHasher> = IndexSet::default();
        let mut out = LinkJoin::default();

        for link in &layout.links {
            let key = layout.link_key(link);
            if !next.insert(key.clone()) {
                tracing::trace!(%key, "duplicate link key dropped");
                continue;
            }
            let (transition, bucket) = if self.rendered.contains(&key) {
                (Transition::update(), &mut out.update)
            } else {
                (Transition::enter(), &mut out.enter)
            };
            bucket.push(LinkRender {
                source_key: layout.source(link).key.to_string(),
                target_key: layout.target(link).key.to_string(),
                d: path_for(layout, link, style, direction),
                key,
                transition,
            });
        }

        out.exit = self
            .rendered
            .iter()
            .filter(|key| !next.contains(*key))
            .map(|key| LinkExit {
                key: key.clone(),
                transition: Transition::exit(),
            })
            .collect();

        tracing::debug!(
            enter = out.enter.len(),
            update = out.update.len(),
            exit = out.exit.len(),
            "link join"
        );
        self.rendered = next;
        out
    }

    /// Forgets every rendered key; the next pass enters everything.
    pub fn reset(&mut self) {
        self.rendered.clear();
    }
}
