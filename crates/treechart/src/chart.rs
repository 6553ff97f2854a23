use crate::controller::{SurfacePair, TransformController};
use crate::{Error, Result};
use treechart_core::config::DEFAULT_HEIGHT_DECREMENT;
use treechart_core::{
    ChartOptions, Dataset, KeyGenerator, RootWrapper, SequentialKeys, TransformState,
    TransformStyle, Translate, normalize,
};
use treechart_render::{
    HeadlessOverlay, HeadlessSvgSurface, LaidOutNode, LayoutSnapshot, Link, LinkJoiner,
    OverlaySurface, TreeLayout, VectorSurface, layout_tree,
};

struct Surfaces<V, O> {
    vector: V,
    overlay: O,
}

/// An interactive tree chart bound to a vector surface and an overlay surface.
///
/// The host forwards pointer events from its event-capturing container to
/// [`TreeChart::pointer_down`], [`TreeChart::pointer_move`] and [`TreeChart::pointer_up`].
/// After [`TreeChart::destroy`] every call that touches a surface fails with
/// [`Error::Destroyed`].
pub struct TreeChart<V = HeadlessSvgSurface, O = HeadlessOverlay> {
    options: ChartOptions,
    keys: Box<dyn KeyGenerator>,
    wrapper: RootWrapper,
    layout: TreeLayout,
    joiner: LinkJoiner,
    controller: TransformController,
    surfaces: Option<Surfaces<V, O>>,
}

impl<V: VectorSurface, O: OverlaySurface> TreeChart<V, O> {
    /// Creates a chart with deterministic `n0, n1, ...` node keys.
    pub fn new(
        options: ChartOptions,
        dataset: Option<&Dataset>,
        vector: V,
        overlay: O,
    ) -> Result<Self> {
        Self::with_key_generator(
            options,
            dataset,
            vector,
            overlay,
            Box::new(SequentialKeys::new()),
        )
    }

    pub fn with_key_generator(
        options: ChartOptions,
        dataset: Option<&Dataset>,
        vector: V,
        overlay: O,
        mut keys: Box<dyn KeyGenerator>,
    ) -> Result<Self> {
        options.validate()?;
        let wrapper = normalize(dataset, keys.as_mut())?;
        Ok(Self {
            options,
            keys,
            wrapper,
            layout: TreeLayout::default(),
            joiner: LinkJoiner::new(),
            controller: TransformController::new(),
            surfaces: Some(Surfaces { vector, overlay }),
        })
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Engine-owned copy of the dataset.
    pub fn wrapper(&self) -> &RootWrapper {
        &self.wrapper
    }

    /// Output of the last layout pass.
    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    /// Laid-out nodes of the last pass, breadth-first; [`Self::on_click_node`] indexes this.
    pub fn node_data_list(&self) -> &[LaidOutNode] {
        &self.layout.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.layout.links
    }

    /// Oriented node positions and link paths of the last pass.
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::from_layout(&self.layout, self.options.link_style, self.options.direction)
    }

    pub fn snapshot_json(&self, pretty: bool) -> Result<String> {
        Ok(self.snapshot().to_json(pretty)?)
    }

    pub fn transform_state(&self) -> TransformState {
        self.controller.state()
    }

    pub fn is_destroyed(&self) -> bool {
        self.surfaces.is_none()
    }

    pub fn vector_surface(&self) -> Result<&V> {
        self.surfaces
            .as_ref()
            .map(|s| &s.vector)
            .ok_or(Error::Destroyed)
    }

    pub fn overlay_surface(&self) -> Result<&O> {
        self.surfaces
            .as_ref()
            .map(|s| &s.overlay)
            .ok_or(Error::Destroyed)
    }

    /// Mutable overlay access, e.g. for hosts that resize it before [`Self::init`].
    pub fn overlay_surface_mut(&mut self) -> Result<&mut O> {
        self.surfaces
            .as_mut()
            .map(|s| &mut s.overlay)
            .ok_or(Error::Destroyed)
    }

    /// First draw plus the initial centering transform on both surfaces.
    pub fn init(&mut self) -> Result<()> {
        self.draw()?;
        let state = self.initial_transform()?;
        self.with_surfaces(|controller, surfaces| controller.set_state(state, surfaces))?;
        tracing::debug!(transform = %state, "chart initialized");
        Ok(())
    }

    /// Offset that places the tree in view: centered across the lateral axis, pulled back by
    /// the height decrement along the depth axis.
    pub fn initial_transform(&self) -> Result<TransformState> {
        let size = self.overlay_surface()?.offset_size();
        let config = &self.options.tree_config;
        let (x, y) = if self.options.direction.is_vertical() {
            (
                (size.width / 2.0).floor(),
                (config.node_height - DEFAULT_HEIGHT_DECREMENT).floor(),
            )
        } else {
            (
                (config.node_width - DEFAULT_HEIGHT_DECREMENT).floor(),
                (size.height / 2.0).floor(),
            )
        };
        Ok(TransformState::identity().with_translate(Translate::new(x as i64, y as i64)))
    }

    pub fn initial_transform_style(&self) -> Result<TransformStyle> {
        Ok(TransformStyle::centered(&self.initial_transform()?))
    }

    /// Runs a full layout pass and hands the keyed link diff to the vector surface.
    pub fn draw(&mut self) -> Result<()> {
        let Some(surfaces) = self.surfaces.as_mut() else {
            return Err(Error::Destroyed);
        };
        self.layout = layout_tree(&self.wrapper, &self.options.tree_config);
        let join = self
            .joiner
            .join(&self.layout, self.options.link_style, self.options.direction);
        surfaces.vector.apply_link_join(&join);
        Ok(())
    }

    /// Toggles the node at `index` of [`Self::node_data_list`] and redraws.
    ///
    /// Returns `Ok(false)` without redrawing when collapsing is disabled or the node is a leaf.
    pub fn on_click_node(&mut self, index: usize) -> Result<bool> {
        if self.is_destroyed() {
            return Err(Error::Destroyed);
        }
        let Some(node) = self.layout.nodes.get(index) else {
            return Err(Error::NodeIndexOutOfRange {
                index,
                len: self.layout.nodes.len(),
            });
        };
        if !self.options.collapse_enabled {
            tracing::trace!(index, "collapse disabled; click ignored");
            return Ok(false);
        }

        let key = node.key.clone();
        let toggled = self
            .wrapper
            .root
            .descendant_mut(&node.path)
            .is_some_and(|n| n.toggle_collapsed());
        if !toggled {
            tracing::trace!(%key, "leaf click ignored");
            return Ok(false);
        }
        tracing::debug!(%key, "node toggled");
        self.draw()?;
        Ok(true)
    }

    /// Replaces the dataset. Keys are freshly issued and prior collapse state is discarded.
    pub fn update_dataset(&mut self, dataset: Option<&Dataset>) -> Result<()> {
        if self.is_destroyed() {
            return Err(Error::Destroyed);
        }
        self.wrapper = normalize(dataset, self.keys.as_mut())?;
        self.draw()
    }

    pub fn zoom_in(&mut self) -> Result<()> {
        self.with_surfaces(|c, s| c.zoom_in(s))
    }

    pub fn zoom_out(&mut self) -> Result<()> {
        self.with_surfaces(|c, s| c.zoom_out(s))
    }

    pub fn restore_scale(&mut self) -> Result<()> {
        self.with_surfaces(|c, s| c.restore_scale(s))
    }

    /// Returns whether the scale was applied; only positive normal scales are.
    pub fn set_scale(&mut self, scale: f64) -> Result<bool> {
        self.with_surfaces(|c, s| c.set_scale(scale, s))
    }

    pub fn get_translate(&self) -> Option<Translate> {
        self.controller.get_translate()
    }

    /// Re-reads the vector surface's transform after an external write.
    pub fn sync_transform_from_surface(&mut self) -> Result<TransformState> {
        let Some(surfaces) = self.surfaces.as_ref() else {
            return Err(Error::Destroyed);
        };
        let state = self
            .controller
            .sync_from_surface(&surfaces.vector)
            .map_err(treechart_core::Error::from)?;
        Ok(state)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<()> {
        if self.is_destroyed() {
            return Err(Error::Destroyed);
        }
        self.controller.pointer_down(x, y);
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<bool> {
        self.with_surfaces(|c, s| c.pointer_move(x, y, s))
    }

    /// Ends the drag session, whether or not the pointer moved.
    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    /// Releases both surfaces and hands them back to the host.
    pub fn destroy(&mut self) -> Option<(V, O)> {
        self.controller.pointer_up();
        self.joiner.reset();
        self.surfaces.take().map(|s| (s.vector, s.overlay))
    }

    fn with_surfaces<R>(
        &mut self,
        f: impl FnOnce(&mut TransformController, &mut SurfacePair<'_>) -> R,
    ) -> Result<R> {
        let Some(surfaces) = self.surfaces.as_mut() else {
            return Err(Error::Destroyed);
        };
        let mut pair = SurfacePair::new(&mut surfaces.vector, &mut surfaces.overlay);
        Ok(f(&mut self.controller, &mut pair))
    }
}
