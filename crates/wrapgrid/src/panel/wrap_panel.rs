//! The virtualizing wrap panel.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use wrapgrid_core::logging::{span_names, targets};
use wrapgrid_core::{ConnectionId, Orientation, PerfSpan, Point, Rect, Signal, Size};

use super::expansion::{ExpansionController, ExpansionPhase};
use super::generator::{ContainerGenerator, Realization};
use super::index_map::{ChildRef, GeneratorPosition, IndexMap};
use super::metrics::{sanitize_item_size, BandMetrics, MetricsInput, FALLBACK_ITEM_SIZE};
use super::range::{visible_range, ItemRange, Viewport};
use super::scroll::{offset_for_index, step_pixels, ScrollState};
use crate::config::{CacheLength, ItemSize, PanelConfig, SpacingMode};
use crate::error::{PanelError, PanelResult};
use crate::host::LayoutHost;
use crate::source::{ChangeKind, ItemKey, ItemSource, SourceChange};
use crate::template::ItemTemplate;

/// Upper bound on range/expansion resolution rounds in one measure pass.
const MAX_LAYOUT_ROUNDS: usize = 4;

/// Signals emitted by a [`WrapPanel`].
#[derive(Debug, Default)]
pub struct PanelSignals {
    /// Emitted with the new value whenever the expanded item changes.
    pub expanded_item_changed: Signal<Option<ItemKey>>,
}

/// A visual child of the panel, in child order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChildSlot {
    /// A realized item container.
    Item {
        /// Item index in the source.
        index: usize,
        /// Item bound to the container.
        key: ItemKey,
        /// Layout rectangle from the last arrange pass.
        rect: Rect,
    },
    /// The expansion container.
    Expansion {
        /// The expanded item.
        key: ItemKey,
        /// Layout rectangle from the last arrange pass.
        rect: Rect,
    },
}

/// State shared with the source change slot.
#[derive(Default)]
struct Shared {
    changes: Vec<SourceChange>,
    host: Option<Arc<dyn LayoutHost>>,
}

/// A panel that lays out uniformly sized items in wrapping bands and only
/// realizes containers for the items in view.
///
/// One item at a time can be expanded: a detail container is inserted after
/// the band holding it and every later band moves down to make room.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use wrapgrid::config::{ItemSize, PanelConfig, SpacingMode};
/// use wrapgrid::template::{Container, FnTemplate};
/// use wrapgrid::{ItemKey, Rect, Size, VecSource, WrapPanel};
///
/// struct Tile;
///
/// impl Container for Tile {
///     fn measure(&mut self, _available: Size) -> Size {
///         Size::new(100.0, 100.0)
///     }
///     fn arrange(&mut self, _rect: Rect) {}
///     fn bind(&mut self, _item: ItemKey, _index: usize) {}
/// }
///
/// let source = Arc::new(VecSource::new((0..1000).collect::<Vec<u32>>()));
/// let mut panel = WrapPanel::new(
///     PanelConfig::new()
///         .with_item_size(ItemSize::Fixed(Size::new(100.0, 100.0)))
///         .with_spacing_mode(SpacingMode::None),
/// );
/// panel.set_item_template(FnTemplate::new(|_| Ok(Box::new(Tile) as Box<dyn Container>)));
/// panel.set_source(source.clone());
///
/// panel.measure(Size::new(500.0, 250.0)).unwrap();
/// panel.arrange(Size::new(500.0, 250.0));
///
/// // Three bands of five intersect a 250px viewport.
/// assert_eq!(panel.realized_count(), 15);
/// assert_eq!(panel.extent().height, 20_000.0);
/// ```
pub struct WrapPanel {
    config: PanelConfig,
    source: Option<Arc<dyn ItemSource>>,
    source_connection: Option<ConnectionId>,
    shared: Arc<Mutex<Shared>>,
    item_template: Option<Box<dyn ItemTemplate>>,
    expansion_template: Option<Box<dyn ItemTemplate>>,
    generator: ContainerGenerator,
    expansion: ExpansionController,
    metrics: BandMetrics,
    range: ItemRange,
    scroll: ScrollState,
    item_count: usize,
    signals: PanelSignals,
}

impl WrapPanel {
    /// Create an empty panel.
    pub fn new(config: PanelConfig) -> Self {
        let generator = ContainerGenerator::new(config.recycle_pool_capacity);
        Self {
            config,
            source: None,
            source_connection: None,
            shared: Arc::new(Mutex::new(Shared::default())),
            item_template: None,
            expansion_template: None,
            generator,
            expansion: ExpansionController::new(),
            metrics: BandMetrics::default(),
            range: ItemRange::EMPTY,
            scroll: ScrollState::default(),
            item_count: 0,
            signals: PanelSignals::default(),
        }
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    /// Signals emitted by this panel.
    pub fn signals(&self) -> &PanelSignals {
        &self.signals
    }

    /// Attach the layout host that receives invalidation requests.
    pub fn set_host(&mut self, host: Arc<dyn LayoutHost>) {
        self.shared.lock().host = Some(host);
    }

    /// Detach the layout host.
    pub fn clear_host(&mut self) {
        self.shared.lock().host = None;
    }

    fn invalidate(&self) {
        let host = self.shared.lock().host.clone();
        if let Some(host) = host {
            host.invalidate();
        }
    }

    /// The attached item source.
    pub fn source(&self) -> Option<&Arc<dyn ItemSource>> {
        self.source.as_ref()
    }

    /// Attach an item source, replacing the current one.
    ///
    /// Every realized container is virtualized and the offset is reset.
    pub fn set_source(&mut self, source: Arc<dyn ItemSource>) {
        self.detach_source();

        let shared: Weak<Mutex<Shared>> = Arc::downgrade(&self.shared);
        let connection = source.signals().changed.connect(move |change| {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let host = {
                let mut shared = shared.lock();
                shared.changes.push(*change);
                shared.host.clone()
            };
            tracing::trace!(target: targets::SOURCE, ?change, "queued source change");
            if let Some(host) = host {
                host.invalidate();
            }
        });
        self.source_connection = Some(connection);
        self.source = Some(source);
        self.invalidate();
    }

    /// Detach the item source.
    pub fn clear_source(&mut self) {
        self.detach_source();
        self.invalidate();
    }

    fn detach_source(&mut self) {
        if let (Some(source), Some(connection)) = (self.source.take(), self.source_connection.take()) {
            source.signals().changed.disconnect(connection);
        }
        self.shared.lock().changes.clear();
        if let Some(template) = self.item_template.as_deref_mut() {
            self.generator.clear_realized(self.config.recycling, template);
        }
        self.expansion.invalidate(self.expansion_template.as_deref_mut());
        self.range = ItemRange::EMPTY;
        self.item_count = 0;
        self.scroll.main_offset = 0.0;
        self.scroll.cross_offset = 0.0;
    }

    /// Set the template that builds item containers.
    ///
    /// Containers built by the previous template are destroyed through it.
    pub fn set_item_template<T: ItemTemplate + 'static>(&mut self, template: T) {
        if let Some(mut old) = self.item_template.take() {
            self.generator.clear_all(old.as_mut());
        }
        self.item_template = Some(Box::new(template));
        self.range = ItemRange::EMPTY;
        self.invalidate();
    }

    /// Set the template that builds the expansion container.
    pub fn set_expansion_template<T: ItemTemplate + 'static>(&mut self, template: T) {
        self.expansion.invalidate(self.expansion_template.as_deref_mut());
        self.expansion_template = Some(Box::new(template));
        self.invalidate();
    }

    /// Remove the expansion template. The expanded item stays set but no
    /// container is built for it.
    pub fn clear_expansion_template(&mut self) {
        self.expansion.invalidate(self.expansion_template.as_deref_mut());
        self.expansion_template = None;
        self.invalidate();
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Current configuration.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: PanelConfig) {
        if self.config == config {
            return;
        }
        let old = std::mem::replace(&mut self.config, config);
        if old.orientation != self.config.orientation {
            self.scroll = ScrollState::default();
        }
        if let Some(template) = self.item_template.as_deref_mut() {
            if !self.config.recycling {
                self.generator.drain_pool(template);
            }
            if old.recycle_pool_capacity != self.config.recycle_pool_capacity {
                self.generator
                    .set_pool_capacity(self.config.recycle_pool_capacity, template);
            }
        }
        tracing::debug!(target: targets::PANEL, config = ?self.config, "configuration changed");
        self.invalidate();
    }

    fn update_config(&mut self, update: impl FnOnce(&mut PanelConfig)) {
        let mut config = self.config.clone();
        update(&mut config);
        self.set_config(config);
    }

    /// Set the orientation. Resets the scroll offset.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.update_config(|c| c.orientation = orientation);
    }

    /// Set the uniform item size.
    pub fn set_item_size(&mut self, item_size: ItemSize) {
        self.update_config(|c| c.item_size = item_size);
    }

    /// Set the spacing mode.
    pub fn set_spacing_mode(&mut self, spacing_mode: SpacingMode) {
        self.update_config(|c| c.spacing_mode = spacing_mode);
    }

    /// Enable or disable item stretching.
    pub fn set_stretch_items(&mut self, stretch: bool) {
        self.update_config(|c| c.stretch_items = stretch);
    }

    /// Enable or disable recycling. Disabling destroys pooled containers.
    pub fn set_recycling(&mut self, recycling: bool) {
        self.update_config(|c| c.recycling = recycling);
    }

    /// Set the per-kind recycle pool capacity.
    pub fn set_recycle_pool_capacity(&mut self, capacity: usize) {
        self.update_config(|c| c.recycle_pool_capacity = capacity);
    }

    /// Set the cache length.
    pub fn set_cache_length(&mut self, cache_length: CacheLength) {
        self.update_config(|c| c.cache_length = cache_length);
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Measure the panel against `available` and realize the containers for
    /// the items in view.
    ///
    /// Template failures abort the pass and are returned.
    #[tracing::instrument(skip(self), target = "wrapgrid::panel", level = "trace")]
    pub fn measure(&mut self, available: Size) -> PanelResult<Size> {
        let _perf = PerfSpan::new(span_names::MEASURE);
        self.apply_source_changes();

        let orientation = self.config.orientation;
        let count = self.source.as_ref().map_or(0, |s| s.count());
        self.item_count = count;
        self.scroll.main_viewport = orientation.main(available);
        self.scroll.cross_viewport = orientation.cross(available);

        let source = match self.source.clone() {
            Some(source) if count > 0 => source,
            _ => {
                self.measure_empty();
                return Ok(self.desired_size(available));
            }
        };
        let template = self
            .item_template
            .as_deref_mut()
            .ok_or(PanelError::NoTemplate)?;

        let item_size = match self.config.item_size {
            ItemSize::Fixed(size) => sanitize_item_size(size),
            ItemSize::Auto => {
                let probe = if self.range.is_empty() { 0 } else { self.range.start.min(count - 1) };
                match source.key_at(probe) {
                    Some(key) => {
                        let constraint = orientation.size(orientation.cross(available), f32::INFINITY);
                        self.generator.realize(probe, key, template, constraint)?;
                        sanitize_item_size(self.generator.desired_at(probe).unwrap_or(Size::ZERO))
                    }
                    None => sanitize_item_size(Size::ZERO),
                }
            }
        };

        let metrics = BandMetrics::compute(MetricsInput {
            orientation,
            item_size,
            available,
            item_count: count,
            spacing_mode: self.config.spacing_mode,
            stretch_items: self.config.stretch_items,
            max_stretched_cross: self.config.max_stretched_cross,
        });

        let mut built = 0usize;
        let mut converged = false;
        for round in 0..MAX_LAYOUT_ROUNDS {
            let band = self.expansion.band(&metrics);
            self.scroll.main_extent = metrics.items_extent(count) + band.map_or(0.0, |b| b.extent);
            self.scroll.cross_extent = metrics.cross_extent();
            self.scroll.coerce();

            let (cache_before, cache_after) = self
                .config
                .cache_length
                .to_pixels(metrics.band_extent, self.scroll.main_viewport);
            let range = visible_range(
                &metrics,
                count,
                Viewport {
                    offset: self.scroll.main_offset,
                    extent: self.scroll.main_viewport,
                    cache_before,
                    cache_after,
                },
                band,
            );

            self.generator
                .virtualize_outside(range, self.config.recycling, template);
            for index in range.iter() {
                let Some(key) = source.key_at(index) else {
                    break;
                };
                let how = self
                    .generator
                    .realize(index, key, template, metrics.arrange_size)?;
                if how == Realization::Built {
                    built += 1;
                }
            }

            let moved = self.expansion.resolve(
                Some(source.as_ref()),
                &metrics,
                range,
                self.expansion_template.as_deref_mut(),
            )?;

            let stable = range == self.range && !moved;
            self.range = range;
            if stable {
                converged = true;
                break;
            }
            tracing::trace!(target: targets::PANEL, round, ?range, "layout not settled yet");
        }
        if !converged {
            tracing::warn!(
                target: targets::PANEL,
                rounds = MAX_LAYOUT_ROUNDS,
                range = ?self.range,
                "layout did not settle, using last round"
            );
        }

        let band = self.expansion.band(&metrics);
        self.scroll.main_extent = metrics.items_extent(count) + band.map_or(0.0, |b| b.extent);
        self.scroll.coerce();
        self.metrics = metrics;

        tracing::debug!(
            target: targets::PANEL,
            count,
            range = ?self.range,
            items_per_band = metrics.items_per_band,
            realized = self.generator.realized_count(),
            built,
            pooled = self.generator.pooled_count(),
            extent = self.scroll.main_extent,
            "measured"
        );
        Ok(self.desired_size(available))
    }

    fn measure_empty(&mut self) {
        if let Some(template) = self.item_template.as_deref_mut() {
            self.generator
                .virtualize_outside(ItemRange::EMPTY, self.config.recycling, template);
        }
        self.range = ItemRange::EMPTY;
        let item_size = match self.config.item_size {
            ItemSize::Fixed(size) => sanitize_item_size(size),
            ItemSize::Auto => FALLBACK_ITEM_SIZE,
        };
        self.metrics = BandMetrics::compute(MetricsInput {
            orientation: self.config.orientation,
            item_size,
            available: self.scroll.viewport(self.config.orientation),
            item_count: 0,
            spacing_mode: self.config.spacing_mode,
            stretch_items: self.config.stretch_items,
            max_stretched_cross: self.config.max_stretched_cross,
        });
        self.expansion.collapse(self.expansion_template.as_deref_mut());
        self.scroll.main_extent = 0.0;
        self.scroll.cross_extent = 0.0;
        self.scroll.coerce();
    }

    fn desired_size(&self, available: Size) -> Size {
        let extent = self.scroll.extent(self.config.orientation);
        let pick = |available: f32, extent: f32| if available.is_finite() { available } else { extent };
        Size::new(
            pick(available.width, extent.width),
            pick(available.height, extent.height),
        )
    }

    fn apply_source_changes(&mut self) {
        let changes = std::mem::take(&mut self.shared.lock().changes);
        if changes.is_empty() {
            return;
        }
        let recycling = self.config.recycling;
        for change in changes {
            tracing::trace!(target: targets::SOURCE, ?change, "applying source change");
            let shift = isize::try_from(change.count).unwrap_or(isize::MAX);
            match change.kind {
                ChangeKind::Insert => self.generator.shift(change.index, shift),
                ChangeKind::Remove => {
                    if let Some(template) = self.item_template.as_deref_mut() {
                        self.generator
                            .discard_block(change.index, change.count, recycling, template);
                    }
                    self.generator
                        .shift(change.index.saturating_add(change.count), -shift);
                }
                ChangeKind::Replace => {
                    if let Some(template) = self.item_template.as_deref_mut() {
                        self.generator
                            .discard_block(change.index, change.count, recycling, template);
                    }
                }
                ChangeKind::Reset => {
                    if let Some(template) = self.item_template.as_deref_mut() {
                        self.generator.clear_realized(recycling, template);
                    }
                    self.expansion.invalidate(self.expansion_template.as_deref_mut());
                    self.range = ItemRange::EMPTY;
                }
            }
        }
    }

    /// Position every realized container.
    ///
    /// Band spacing and item sizes come from the preceding
    /// [`measure`](Self::measure) call; `final_size` is only returned. Hosts
    /// arrange with the size they measured with, so a different
    /// `final_size` needs a new measure pass first.
    #[tracing::instrument(skip(self), target = "wrapgrid::panel", level = "trace")]
    pub fn arrange(&mut self, final_size: Size) -> Size {
        let _perf = PerfSpan::new(span_names::ARRANGE);
        let metrics = self.metrics;
        let offset = self.scroll.offset(self.config.orientation);
        let placement = self.expansion.placement(self.config.orientation);

        let indices: Vec<usize> = self.generator.realized_indices().collect();
        for index in indices {
            let shift = match placement {
                Some(placement) if index > placement.boundary => placement.extent,
                _ => 0.0,
            };
            let layout = metrics.item_rect(index, shift);
            self.generator
                .arrange(index, layout, layout.offset(-offset.x, -offset.y));
        }
        if let Some(layout) = self.expansion.layout_rect(&metrics) {
            self.expansion
                .arrange(layout, layout.offset(-offset.x, -offset.y));
        }
        final_size
    }

    /// Destroy every container: realized, pooled and the expansion container.
    pub fn clear_children(&mut self) {
        if let Some(template) = self.item_template.as_deref_mut() {
            self.generator.clear_all(template);
        }
        self.expansion.invalidate(self.expansion_template.as_deref_mut());
        self.range = ItemRange::EMPTY;
        wrapgrid_core::wrapgrid_debug!("cleared all children");
        self.invalidate();
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// The expanded item.
    pub fn expanded_item(&self) -> Option<ItemKey> {
        self.expansion.expanded()
    }

    /// Expand `item`, or collapse with `None`.
    ///
    /// The container of a previously expanded item is destroyed right away;
    /// the new one is built by the next measure pass once its band is in view.
    pub fn set_expanded_item(&mut self, item: Option<ItemKey>) {
        if self
            .expansion
            .set_expanded(item, self.expansion_template.as_deref_mut())
        {
            self.signals.expanded_item_changed.emit(item);
            self.invalidate();
        }
    }

    /// Collapse `item` if it is expanded, expand it otherwise.
    ///
    /// Returns the expanded item afterwards.
    pub fn toggle_expanded_item(&mut self, item: ItemKey) -> Option<ItemKey> {
        let next = if self.expanded_item() == Some(item) { None } else { Some(item) };
        self.set_expanded_item(next);
        next
    }

    /// Lifecycle phase of the expansion container.
    pub fn expansion_phase(&self) -> ExpansionPhase {
        self.expansion.phase()
    }

    /// Cap the main-axis size of the expansion container. Hosts animate
    /// the detail panel open and closed by stepping this limit.
    pub fn set_expansion_extent_limit(&mut self, limit: Option<f32>) {
        if self.expansion.set_extent_limit(limit) {
            self.invalidate();
        }
    }

    /// Current expansion extent limit.
    pub fn expansion_extent_limit(&self) -> Option<f32> {
        self.expansion.extent_limit()
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Current scroll offset.
    pub fn offset(&self) -> Point {
        self.scroll.offset(self.config.orientation)
    }

    /// Content size.
    pub fn extent(&self) -> Size {
        self.scroll.extent(self.config.orientation)
    }

    /// Visible size.
    pub fn viewport(&self) -> Size {
        self.scroll.viewport(self.config.orientation)
    }

    /// Scroll along the main axis. The offset is clamped to the content.
    pub fn set_main_offset(&mut self, offset: f32) {
        let offset = self.scroll.clamp_main(offset);
        if self.scroll.main_offset != offset {
            self.scroll.main_offset = offset;
            tracing::trace!(target: targets::PANEL, offset, "main offset changed");
            self.invalidate();
        }
    }

    /// Scroll along the cross axis. The offset is clamped to the content.
    pub fn set_cross_offset(&mut self, offset: f32) {
        let offset = self.scroll.clamp_cross(offset);
        if self.scroll.cross_offset != offset {
            self.scroll.cross_offset = offset;
            self.invalidate();
        }
    }

    fn scroll_by(&mut self, delta: f32) {
        self.set_main_offset(self.scroll.main_offset + delta);
    }

    fn line_step(&self) -> f32 {
        step_pixels(
            self.config.scroll_unit,
            self.config.scroll_line_delta,
            self.metrics.band_extent,
        )
    }

    fn wheel_step(&self) -> f32 {
        step_pixels(
            self.config.scroll_unit,
            self.config.mouse_wheel_delta,
            self.metrics.band_extent,
        )
    }

    /// Scroll back by one line.
    pub fn line_up(&mut self) {
        self.scroll_by(-self.line_step());
    }

    /// Scroll forward by one line.
    pub fn line_down(&mut self) {
        self.scroll_by(self.line_step());
    }

    /// Scroll back by one viewport.
    pub fn page_up(&mut self) {
        self.scroll_by(-self.scroll.main_viewport);
    }

    /// Scroll forward by one viewport.
    pub fn page_down(&mut self) {
        self.scroll_by(self.scroll.main_viewport);
    }

    /// Scroll back by one wheel notch.
    pub fn mouse_wheel_up(&mut self) {
        self.scroll_by(-self.wheel_step());
    }

    /// Scroll forward by one wheel notch.
    pub fn mouse_wheel_down(&mut self) {
        self.scroll_by(self.wheel_step());
    }

    /// Main-axis offset that puts the band of `index` at the top of the
    /// viewport, accounting for the expansion. Not clamped.
    pub fn scroll_offset_for_index(&self, index: usize) -> f32 {
        offset_for_index(
            &self.metrics,
            index,
            self.expansion.placement(self.config.orientation),
        )
    }

    /// Scroll so the band of `index` starts the viewport, as far as the
    /// content allows. Returns the new main-axis offset.
    pub fn bring_index_into_view(&mut self, index: usize) -> f32 {
        if index >= self.item_count {
            tracing::debug!(target: targets::PANEL, index, count = self.item_count, "index out of bounds, not scrolling");
            return self.scroll.main_offset;
        }
        self.set_main_offset(self.scroll_offset_for_index(index));
        self.scroll.main_offset
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Item count seen by the last measure pass.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Items realized by the last measure pass.
    pub fn item_range(&self) -> ItemRange {
        self.range
    }

    /// Items per band in the last measure pass.
    pub fn items_per_band(&self) -> usize {
        self.metrics.items_per_band
    }

    /// Main-axis size of a band in the last measure pass.
    pub fn band_extent(&self) -> f32 {
        self.metrics.band_extent
    }

    /// Size item containers are arranged with.
    pub fn item_arrange_size(&self) -> Size {
        self.metrics.arrange_size
    }

    fn index_map(&self) -> IndexMap {
        IndexMap::new(
            self.generator.realized_indices().collect(),
            self.expansion
                .placement(self.config.orientation)
                .map(|p| p.boundary),
        )
    }

    /// Visual children in child order.
    pub fn children(&self) -> Vec<ChildSlot> {
        let map = self.index_map();
        (0..map.child_count())
            .filter_map(|child| match map.item_index_for_child_index(child)? {
                ChildRef::Item(index) => Some(ChildSlot::Item {
                    index,
                    key: self.generator.item_at(index)?,
                    rect: self.generator.rect_at(index)?,
                }),
                ChildRef::Expansion => {
                    let (key, rect) = self.expansion.arranged_rect()?;
                    Some(ChildSlot::Expansion { key, rect })
                }
            })
            .collect()
    }

    /// Child slot of the container realized for `item_index`.
    pub fn child_index_for_item_index(&self, item_index: usize) -> Option<usize> {
        self.index_map().child_index_for_item_index(item_index)
    }

    /// What occupies `child_index`.
    pub fn item_index_for_child_index(&self, child_index: usize) -> Option<ChildRef> {
        self.index_map().item_index_for_child_index(child_index)
    }

    /// Generator position of the child at `child_index`.
    pub fn generator_position_for_child_index(&self, child_index: usize) -> GeneratorPosition {
        self.index_map().generator_position_for_child_index(child_index)
    }

    /// Generator position of `item_index`.
    pub fn generator_position_from_index(&self, item_index: usize) -> GeneratorPosition {
        self.index_map().generator_position_from_index(item_index)
    }

    /// Item index a generator position refers to.
    pub fn index_from_generator_position(&self, position: GeneratorPosition) -> Option<usize> {
        self.index_map().index_from_generator_position(position)
    }

    /// Number of realized item containers.
    pub fn realized_count(&self) -> usize {
        self.generator.realized_count()
    }

    /// Number of pooled item containers.
    pub fn pooled_count(&self) -> usize {
        self.generator.pooled_count()
    }

    /// Number of live expansion containers, zero or one.
    pub fn expansion_container_count(&self) -> usize {
        self.expansion.container_count()
    }
}

impl Drop for WrapPanel {
    fn drop(&mut self) {
        if let (Some(source), Some(connection)) = (self.source.take(), self.source_connection.take()) {
            source.signals().changed.disconnect(connection);
        }
        if let Some(template) = self.item_template.as_deref_mut() {
            self.generator.clear_all(template);
        }
        self.expansion.destroy(self.expansion_template.as_deref_mut());
    }
}

impl std::fmt::Debug for WrapPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapPanel")
            .field("config", &self.config)
            .field("item_count", &self.item_count)
            .field("range", &self.range)
            .field("generator", &self.generator)
            .field("expansion", &self.expansion)
            .field("scroll", &self.scroll)
            .finish()
    }
}

static_assertions::assert_impl_all!(WrapPanel: Send);
