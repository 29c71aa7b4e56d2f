//! The single-item expansion.
//!
//! One item at a time may be expanded. Its detail container is inserted
//! after the last item of the expanded item's band and spans the whole band,
//! pushing every later band down by the container's main-axis size.
//!
//! The controller owns the detail container as a single extra slot next to
//! the generator's arena, builds it lazily once the expanded band is in the
//! realized range and destroys it as soon as the band leaves the range, the
//! item disappears from the source or a different item is expanded.

use wrapgrid_core::logging::targets;
use wrapgrid_core::{Orientation, Rect, Size};

use super::metrics::BandMetrics;
use super::range::{ExpansionBand, ItemRange};
use crate::error::TemplateError;
use crate::source::{ItemKey, ItemSource};
use crate::template::{Container, ItemTemplate};

/// Lifecycle of the expansion container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpansionPhase {
    /// Nothing is expanded, or the expanded item is not realized.
    #[default]
    Collapsed,
    /// An item is expanded but its container has not been built yet.
    Pending,
    /// The expansion container is built and placed.
    Active,
}

/// The extra child slot holding the expansion container.
struct ExtraSlot {
    container: Box<dyn Container>,
    item: ItemKey,
    index: usize,
    boundary: usize,
    measured_cross: f32,
    desired: Size,
    rect: Rect,
}

/// Where the expansion container currently sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionPlacement {
    /// The expanded item.
    pub item: ItemKey,
    /// Index of the expanded item.
    pub index: usize,
    /// Last item index of the expanded item's band.
    pub boundary: usize,
    /// Main-axis size the container occupies.
    pub extent: f32,
}

/// Insertion boundary for the item at `index`: the last index of its band,
/// clamped to the last item.
pub fn insertion_boundary(index: usize, items_per_band: usize, item_count: usize) -> usize {
    let per_band = items_per_band.max(1);
    let band_end = (index / per_band + 1) * per_band - 1;
    band_end.min(item_count.saturating_sub(1))
}

/// Owner of the expanded item and its detail container.
#[derive(Default)]
pub struct ExpansionController {
    expanded: Option<ItemKey>,
    slot: Option<ExtraSlot>,
    phase: ExpansionPhase,
    extent_limit: Option<f32>,
}

impl ExpansionController {
    /// Create a controller with nothing expanded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The expanded item.
    pub fn expanded(&self) -> Option<ItemKey> {
        self.expanded
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ExpansionPhase {
        self.phase
    }

    /// Number of live expansion containers, zero or one.
    pub fn container_count(&self) -> usize {
        usize::from(self.slot.is_some())
    }

    /// Change the expanded item.
    ///
    /// Any container built for the previous item is destroyed right away.
    /// Returns `false` if `item` was already expanded.
    pub fn set_expanded(
        &mut self,
        item: Option<ItemKey>,
        template: Option<&mut (dyn ItemTemplate + 'static)>,
    ) -> bool {
        if self.expanded == item {
            return false;
        }
        self.destroy(template);
        self.expanded = item;
        self.phase = if item.is_some() {
            ExpansionPhase::Pending
        } else {
            ExpansionPhase::Collapsed
        };
        tracing::debug!(target: targets::EXPANSION, ?item, "expanded item changed");
        true
    }

    /// Cap the main-axis size the container occupies.
    ///
    /// Returns `true` if the effective extent changed.
    pub fn set_extent_limit(&mut self, limit: Option<f32>) -> bool {
        let limit = limit.map(|l| if l.is_nan() { 0.0 } else { l.max(0.0) });
        if self.extent_limit == limit {
            return false;
        }
        self.extent_limit = limit;
        self.slot.is_some()
    }

    /// Current extent limit.
    pub fn extent_limit(&self) -> Option<f32> {
        self.extent_limit
    }

    /// Placement of the active container.
    pub fn placement(&self, orientation: Orientation) -> Option<ExpansionPlacement> {
        let slot = self.slot.as_ref()?;
        Some(ExpansionPlacement {
            item: slot.item,
            index: slot.index,
            boundary: slot.boundary,
            extent: self.clamp_extent(orientation.main(slot.desired)),
        })
    }

    /// Main-axis region of the active container, for range computation.
    pub fn band(&self, metrics: &BandMetrics) -> Option<ExpansionBand> {
        let placement = self.placement(metrics.orientation)?;
        Some(ExpansionBand {
            start: (metrics.band_of(placement.boundary) + 1) as f32 * metrics.band_extent,
            extent: placement.extent,
        })
    }

    fn clamp_extent(&self, extent: f32) -> f32 {
        let extent = if extent.is_finite() { extent.max(0.0) } else { 0.0 };
        match self.extent_limit {
            Some(limit) => extent.min(limit),
            None => extent,
        }
    }

    /// Build, keep or destroy the expansion container for the current range.
    ///
    /// Returns `true` if the placement of the container changed.
    pub fn resolve(
        &mut self,
        source: Option<&dyn ItemSource>,
        metrics: &BandMetrics,
        range: ItemRange,
        template: Option<&mut (dyn ItemTemplate + 'static)>,
    ) -> Result<bool, TemplateError> {
        let before = self.placement(metrics.orientation);

        let Some(item) = self.expanded else {
            self.collapse(template);
            return Ok(before.is_some());
        };

        let count = source.map_or(0, |s| s.count());
        let Some(index) = source.and_then(|s| s.index_of(item)) else {
            if self.phase != ExpansionPhase::Collapsed {
                tracing::debug!(target: targets::EXPANSION, ?item, "expanded item not in source, collapsing");
            }
            self.collapse(template);
            return Ok(before.is_some());
        };

        let per_band = metrics.items_per_band;
        let boundary = insertion_boundary(index, per_band, count);
        let band_start = metrics.band_of(index) * per_band;
        if !range.intersects(&ItemRange::new(band_start, boundary)) {
            if self.slot.is_some() {
                tracing::trace!(target: targets::EXPANSION, ?item, index, "expanded band left the range");
            }
            self.collapse(template);
            return Ok(before.is_some());
        }

        let Some(template) = template else {
            tracing::debug!(target: targets::EXPANSION, ?item, "no expansion template, nothing to build");
            self.phase = ExpansionPhase::Pending;
            return Ok(false);
        };

        let stale = self
            .slot
            .as_ref()
            .is_some_and(|slot| slot.item != item || slot.boundary != boundary);
        if stale {
            tracing::trace!(target: targets::EXPANSION, ?item, boundary, "insertion boundary moved, rebuilding");
            self.destroy(Some(&mut *template));
        }

        let available_cross = metrics.available_cross;
        let constraint = metrics.orientation.size(available_cross, f32::INFINITY);
        match self.slot.as_mut() {
            Some(slot) => {
                slot.index = index;
                if slot.measured_cross != available_cross {
                    slot.desired = slot.container.measure(constraint);
                    slot.measured_cross = available_cross;
                }
            }
            None => {
                let mut container = template.build(item)?;
                container.bind(item, index);
                let desired = container.measure(constraint);
                tracing::debug!(target: targets::EXPANSION, ?item, index, boundary, ?desired, "built expansion container");
                self.slot = Some(ExtraSlot {
                    container,
                    item,
                    index,
                    boundary,
                    measured_cross: available_cross,
                    desired,
                    rect: Rect::ZERO,
                });
            }
        }
        self.phase = ExpansionPhase::Active;
        Ok(before != self.placement(metrics.orientation))
    }

    /// Layout rectangle of the active container.
    pub fn layout_rect(&self, metrics: &BandMetrics) -> Option<Rect> {
        let placement = self.placement(metrics.orientation)?;
        let (cross, cross_extent) = metrics.expansion_span();
        let main = (metrics.band_of(placement.boundary) + 1) as f32 * metrics.band_extent;
        Some(metrics.orientation.rect(cross, main, cross_extent, placement.extent))
    }

    /// Arrange the active container. `layout` is kept for introspection and
    /// `visual` is handed to the container.
    pub fn arrange(&mut self, layout: Rect, visual: Rect) {
        if let Some(slot) = self.slot.as_mut() {
            slot.rect = layout;
            slot.container.arrange(visual);
        }
    }

    /// Layout rectangle assigned by the last arrange pass.
    pub fn arranged_rect(&self) -> Option<(ItemKey, Rect)> {
        self.slot.as_ref().map(|slot| (slot.item, slot.rect))
    }

    /// Destroy the container, if any, through `template`.
    ///
    /// Without a template the container is dropped.
    pub fn destroy(&mut self, template: Option<&mut (dyn ItemTemplate + 'static)>) {
        let Some(slot) = self.slot.take() else {
            return;
        };
        tracing::trace!(target: targets::EXPANSION, item = ?slot.item, "destroying expansion container");
        match template {
            Some(template) => template.destroy(slot.container),
            None => drop(slot.container),
        }
        if self.phase == ExpansionPhase::Active {
            self.phase = ExpansionPhase::Pending;
        }
    }

    /// Destroy the container and mark the expansion collapsed. The expanded
    /// item stays set.
    pub fn collapse(&mut self, template: Option<&mut (dyn ItemTemplate + 'static)>) {
        self.destroy(template);
        self.phase = ExpansionPhase::Collapsed;
    }

    /// Destroy the container and mark the expansion as waiting to be rebuilt.
    pub fn invalidate(&mut self, template: Option<&mut (dyn ItemTemplate + 'static)>) {
        self.destroy(template);
        if self.expanded.is_some() {
            self.phase = ExpansionPhase::Pending;
        }
    }
}

impl std::fmt::Debug for ExpansionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpansionController")
            .field("expanded", &self.expanded)
            .field("phase", &self.phase)
            .field("extent_limit", &self.extent_limit)
            .finish()
    }
}
