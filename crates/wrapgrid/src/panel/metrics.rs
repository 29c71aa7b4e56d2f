//! Band geometry.
//!
//! Pure functions turning the viewport, the uniform item size and the
//! spacing configuration into the numbers every other part of the panel
//! works with: how many items fit in a band, how large each band is along
//! the main axis, and how leftover cross-axis space is distributed.

use wrapgrid_core::logging::targets;
use wrapgrid_core::{Orientation, Rect, Size};

use crate::config::SpacingMode;

/// Item size used when the configured or measured size is unusable.
pub const FALLBACK_ITEM_SIZE: Size = Size::new(1.0, 1.0);

/// Replace a non-positive or non-finite item size with [`FALLBACK_ITEM_SIZE`].
pub fn sanitize_item_size(size: Size) -> Size {
    if size.is_positive() {
        size
    } else {
        tracing::warn!(
            target: targets::PANEL,
            width = size.width,
            height = size.height,
            "unusable item size, falling back to 1x1"
        );
        FALLBACK_ITEM_SIZE
    }
}

/// Derived layout numbers for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandMetrics {
    /// Axis along which bands are stacked.
    pub orientation: Orientation,
    /// Uniform item size before stretching.
    pub item_size: Size,
    /// Size each item container is measured and arranged with.
    pub arrange_size: Size,
    /// Number of items in every full band. Never zero.
    pub items_per_band: usize,
    /// Main-axis size of one band.
    pub band_extent: f32,
    /// Cross-axis gap between neighbouring items in a band.
    pub inner_spacing: f32,
    /// Cross-axis gap before the first item of a band.
    pub outer_spacing: f32,
    /// Cross-axis space the band was laid out in.
    pub available_cross: f32,
    /// Whether leftover space is distributed at all.
    pub spacing_mode: SpacingMode,
}

impl Default for BandMetrics {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            item_size: FALLBACK_ITEM_SIZE,
            arrange_size: FALLBACK_ITEM_SIZE,
            items_per_band: 1,
            band_extent: FALLBACK_ITEM_SIZE.height,
            inner_spacing: 0.0,
            outer_spacing: 0.0,
            available_cross: 0.0,
            spacing_mode: SpacingMode::None,
        }
    }
}

/// Inputs of [`BandMetrics::compute`].
#[derive(Debug, Clone, Copy)]
pub struct MetricsInput {
    pub orientation: Orientation,
    pub item_size: Size,
    pub available: Size,
    pub item_count: usize,
    pub spacing_mode: SpacingMode,
    pub stretch_items: bool,
    pub max_stretched_cross: Option<f32>,
}

impl BandMetrics {
    /// Compute band metrics. `input.item_size` must already be sanitized.
    pub fn compute(input: MetricsInput) -> Self {
        let o = input.orientation;
        let item_cross = o.cross(input.item_size);
        let band_extent = o.main(input.item_size);
        let available_cross = o.cross(input.available);

        // An unbounded cross axis puts every item in one band.
        let items_per_band = if available_cross.is_finite() {
            ((available_cross / item_cross).floor() as usize).max(1)
        } else {
            input.item_count.max(1)
        };

        let mut arrange_cross = item_cross;
        if input.stretch_items && available_cross.is_finite() {
            let stretched = available_cross / items_per_band as f32;
            arrange_cross = match input.max_stretched_cross {
                Some(max) if max.is_finite() && max > 0.0 => stretched.min(max),
                _ => stretched,
            };
            arrange_cross = arrange_cross.max(item_cross.min(available_cross));
        }

        let (inner_spacing, outer_spacing) = spacing(
            input.spacing_mode,
            available_cross,
            arrange_cross,
            items_per_band,
        );

        Self {
            orientation: o,
            item_size: input.item_size,
            arrange_size: o.size(arrange_cross, band_extent),
            items_per_band,
            band_extent,
            inner_spacing,
            outer_spacing,
            available_cross,
            spacing_mode: input.spacing_mode,
        }
    }

    /// Cross-axis size of one arranged item.
    pub fn arrange_cross(&self) -> f32 {
        self.orientation.cross(self.arrange_size)
    }

    /// Band holding `index`.
    pub fn band_of(&self, index: usize) -> usize {
        index / self.items_per_band
    }

    /// Number of bands needed for `item_count` items.
    pub fn band_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.items_per_band)
    }

    /// Main-axis extent of `item_count` items, without any expansion.
    pub fn items_extent(&self, item_count: usize) -> f32 {
        self.band_count(item_count) as f32 * self.band_extent
    }

    /// Cross-axis extent of the content.
    pub fn cross_extent(&self) -> f32 {
        if self.spacing_mode != SpacingMode::None && self.available_cross.is_finite() {
            self.available_cross
        } else {
            self.items_per_band as f32 * self.arrange_cross()
        }
    }

    /// Layout rectangle of the item at `index`, with `shift` added along
    /// the main axis.
    pub fn item_rect(&self, index: usize, shift: f32) -> Rect {
        let band = self.band_of(index);
        let slot = index % self.items_per_band;
        let cross =
            slot as f32 * (self.arrange_cross() + self.inner_spacing) + self.outer_spacing;
        let main = band as f32 * self.band_extent + shift;
        self.orientation
            .rect(cross, main, self.arrange_cross(), self.band_extent)
    }

    /// Cross-axis origin and extent of the expansion container.
    pub fn expansion_span(&self) -> (f32, f32) {
        if self.spacing_mode == SpacingMode::None || !self.available_cross.is_finite() {
            (0.0, self.items_per_band as f32 * self.arrange_cross())
        } else {
            let width = (self.available_cross - 2.0 * self.outer_spacing).max(0.0);
            (self.outer_spacing, width)
        }
    }
}

/// `(inner, outer)` spacing for the leftover cross-axis space of a band.
fn spacing(mode: SpacingMode, available_cross: f32, child_cross: f32, per_band: usize) -> (f32, f32) {
    if !available_cross.is_finite() {
        return (0.0, 0.0);
    }
    let used = (child_cross * per_band as f32).min(available_cross);
    let unused = (available_cross - used).max(0.0);
    match mode {
        SpacingMode::None => (0.0, 0.0),
        SpacingMode::Uniform => {
            let gap = unused / (per_band + 1) as f32;
            (gap, gap)
        }
        SpacingMode::BetweenItemsOnly => (unused / per_band.saturating_sub(1).max(1) as f32, 0.0),
        SpacingMode::StartAndEndOnly => (0.0, unused / 2.0),
    }
}
