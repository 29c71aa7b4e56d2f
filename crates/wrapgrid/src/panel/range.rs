//! Visible item range.

use std::fmt;
use std::ops::RangeInclusive;

use super::metrics::BandMetrics;

/// Inclusive range of item indices realized by a layout pass.
///
/// A range with `start > end` is empty.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRange {
    /// First realized index.
    pub start: usize,
    /// Last realized index.
    pub end: usize,
}

impl ItemRange {
    /// The range realizing nothing.
    pub const EMPTY: Self = Self { start: 1, end: 0 };

    /// Create a range; `start > end` yields an empty range.
    pub fn new(start: usize, end: usize) -> Self {
        if start > end { Self::EMPTY } else { Self { start, end } }
    }

    /// Returns `true` if the range holds no index.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of indices in the range.
    pub fn len(&self) -> usize {
        if self.is_empty() { 0 } else { self.end - self.start + 1 }
    }

    /// Returns `true` if `index` lies in the range.
    pub fn contains(&self, index: usize) -> bool {
        !self.is_empty() && self.start <= index && index <= self.end
    }

    /// Returns `true` if the two ranges share an index.
    pub fn intersects(&self, other: &ItemRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start <= other.end && other.start <= self.end
    }

    /// Iterate the indices of the range.
    pub fn iter(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl Default for ItemRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for ItemRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "ItemRange(empty)")
        } else {
            write!(f, "ItemRange[{}, {}]", self.start, self.end)
        }
    }
}

/// Main-axis region occupied by an active expansion container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionBand {
    /// Layout offset at which the expansion container starts.
    pub start: f32,
    /// Main-axis size of the expansion container.
    pub extent: f32,
}

impl ExpansionBand {
    /// Map a layout offset to the offset it would have without the
    /// expansion. Offsets inside the container map onto the row it is
    /// attached to.
    fn collapse_start(&self, offset: f32, band_extent: f32) -> f32 {
        if offset >= self.start + self.extent {
            offset - self.extent
        } else if offset >= self.start {
            (self.start - band_extent).max(0.0)
        } else {
            offset
        }
    }

    fn collapse_end(&self, offset: f32) -> f32 {
        if offset > self.start + self.extent {
            offset - self.extent
        } else if offset > self.start {
            self.start
        } else {
            offset
        }
    }
}

/// Inputs of [`visible_range`], all along the main axis.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    /// Scroll offset.
    pub offset: f32,
    /// Viewport extent.
    pub extent: f32,
    /// Extra pixels realized before the viewport.
    pub cache_before: f32,
    /// Extra pixels realized after the viewport.
    pub cache_after: f32,
}

/// Compute the inclusive range of items intersecting the viewport.
pub fn visible_range(
    metrics: &BandMetrics,
    item_count: usize,
    viewport: Viewport,
    expansion: Option<ExpansionBand>,
) -> ItemRange {
    if item_count == 0 {
        return ItemRange::EMPTY;
    }
    let band = metrics.band_extent;
    let per_band = metrics.items_per_band;
    let band_count = metrics.band_count(item_count);

    let mut start = (viewport.offset - viewport.cache_before).max(0.0);
    let mut end = viewport.offset + viewport.extent + viewport.cache_after;
    if let Some(expansion) = expansion {
        start = expansion.collapse_start(start, band);
        end = expansion.collapse_end(end);
    }

    let first_band = if start.is_finite() {
        ((start / band).floor() as usize).min(band_count - 1)
    } else {
        0
    };
    let last_band = if end.is_finite() {
        ((end / band).ceil() as usize).clamp(first_band + 1, band_count)
    } else {
        band_count
    };

    ItemRange::new(
        first_band * per_band,
        (last_band * per_band).min(item_count) - 1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpacingMode;
    use crate::panel::metrics::MetricsInput;
    use wrapgrid_core::{Orientation, Size};

    fn metrics(per_band: usize, band: f32) -> BandMetrics {
        BandMetrics::compute(MetricsInput {
            orientation: Orientation::Vertical,
            item_size: Size::new(10.0, band),
            available: Size::new(10.0 * per_band as f32, 1000.0),
            item_count: 1000,
            spacing_mode: SpacingMode::None,
            stretch_items: false,
            max_stretched_cross: None,
        })
    }

    fn viewport(offset: f32, extent: f32) -> Viewport {
        Viewport {
            offset,
            extent,
            cache_before: 0.0,
            cache_after: 0.0,
        }
    }

    #[test]
    fn test_item_range_basics() {
        let range = ItemRange::new(3, 6);
        assert_eq!(range.len(), 4);
        assert!(range.contains(3) && range.contains(6) && !range.contains(7));
        assert!(ItemRange::new(5, 2).is_empty());
        assert_eq!(ItemRange::EMPTY.len(), 0);
        assert_eq!(ItemRange::EMPTY.iter().count(), 0);
        assert!(range.intersects(&ItemRange::new(6, 9)));
        assert!(!range.intersects(&ItemRange::EMPTY));
    }

    #[test]
    fn test_partial_band_is_realized() {
        let m = metrics(5, 100.0);
        let range = visible_range(&m, 20, viewport(0.0, 250.0), None);
        assert_eq!(range, ItemRange::new(0, 14));
    }

    #[test]
    fn test_scrolled_range() {
        let m = metrics(5, 100.0);
        let range = visible_range(&m, 20, viewport(150.0, 100.0), None);
        assert_eq!(range, ItemRange::new(5, 14));
    }

    #[test]
    fn test_range_clamped_to_count() {
        let m = metrics(5, 100.0);
        assert_eq!(visible_range(&m, 7, viewport(0.0, 1000.0), None), ItemRange::new(0, 6));
        assert_eq!(visible_range(&m, 7, viewport(5000.0, 100.0), None), ItemRange::new(5, 6));
        assert!(visible_range(&m, 0, viewport(0.0, 100.0), None).is_empty());
    }

    #[test]
    fn test_unbounded_viewport_realizes_everything() {
        let m = metrics(5, 100.0);
        let range = visible_range(&m, 23, viewport(0.0, f32::INFINITY), None);
        assert_eq!(range, ItemRange::new(0, 22));
    }

    #[test]
    fn test_cache_extends_by_bands() {
        let m = metrics(5, 100.0);
        let cached = Viewport {
            offset: 300.0,
            extent: 100.0,
            cache_before: 100.0,
            cache_after: 100.0,
        };
        assert_eq!(visible_range(&m, 100, cached, None), ItemRange::new(10, 24));
    }

    #[test]
    fn test_expansion_displaces_later_bands() {
        let m = metrics(5, 100.0);
        let expansion = ExpansionBand {
            start: 100.0,
            extent: 80.0,
        };
        // The detail panel below band 0 pushes band 2 out of the viewport.
        let range = visible_range(&m, 20, viewport(0.0, 250.0), Some(expansion));
        assert_eq!(range, ItemRange::new(0, 9));
    }

    #[test]
    fn test_offset_inside_expansion_keeps_its_row() {
        let m = metrics(5, 100.0);
        let expansion = ExpansionBand {
            start: 100.0,
            extent: 300.0,
        };
        let range = visible_range(&m, 20, viewport(150.0, 100.0), Some(expansion));
        assert_eq!(range, ItemRange::new(0, 4));
    }
}
