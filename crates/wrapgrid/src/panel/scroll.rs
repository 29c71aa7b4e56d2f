//! Scroll offset bookkeeping and scroll-to-item math.

use wrapgrid_core::{Orientation, Point, Size};

use super::expansion::ExpansionPlacement;
use super::metrics::BandMetrics;
use crate::config::ScrollUnit;

/// Offset, extent and viewport of a panel, in axis terms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Scroll offset along the main axis.
    pub main_offset: f32,
    /// Scroll offset along the cross axis.
    pub cross_offset: f32,
    /// Content size along the main axis.
    pub main_extent: f32,
    /// Content size along the cross axis.
    pub cross_extent: f32,
    /// Visible size along the main axis.
    pub main_viewport: f32,
    /// Visible size along the cross axis.
    pub cross_viewport: f32,
}

fn clamp_offset(offset: f32, extent: f32, viewport: f32) -> f32 {
    let max = if viewport.is_finite() {
        (extent - viewport).max(0.0)
    } else {
        0.0
    };
    if offset.is_nan() { 0.0 } else { offset.clamp(0.0, max) }
}

impl ScrollState {
    /// Largest valid main-axis offset.
    pub fn max_main_offset(&self) -> f32 {
        clamp_offset(f32::INFINITY, self.main_extent, self.main_viewport)
    }

    /// Clamp `offset` to the scrollable main-axis range.
    pub fn clamp_main(&self, offset: f32) -> f32 {
        clamp_offset(offset, self.main_extent, self.main_viewport)
    }

    /// Clamp `offset` to the scrollable cross-axis range.
    pub fn clamp_cross(&self, offset: f32) -> f32 {
        clamp_offset(offset, self.cross_extent, self.cross_viewport)
    }

    /// Re-clamp both offsets after the extent or viewport changed.
    ///
    /// Returns `true` if an offset moved.
    pub fn coerce(&mut self) -> bool {
        let main = self.clamp_main(self.main_offset);
        let cross = self.clamp_cross(self.cross_offset);
        let moved = main != self.main_offset || cross != self.cross_offset;
        self.main_offset = main;
        self.cross_offset = cross;
        moved
    }

    /// Offsets as a point.
    pub fn offset(&self, orientation: Orientation) -> Point {
        orientation.point(self.cross_offset, self.main_offset)
    }

    /// Content size.
    pub fn extent(&self, orientation: Orientation) -> Size {
        orientation.size(self.cross_extent, self.main_extent)
    }

    /// Visible size.
    pub fn viewport(&self, orientation: Orientation) -> Size {
        orientation.size(self.cross_viewport, self.main_viewport)
    }
}

/// Main-axis offset that puts the band of `index` at the viewport start.
///
/// The result is not clamped.
pub fn offset_for_index(
    metrics: &BandMetrics,
    index: usize,
    expansion: Option<ExpansionPlacement>,
) -> f32 {
    let mut offset = metrics.band_of(index) as f32 * metrics.band_extent;
    if let Some(expansion) = expansion {
        if index > expansion.boundary {
            offset += expansion.extent;
        }
    }
    offset
}

/// Size in pixels of `amount` scroll steps of `unit`.
pub fn step_pixels(unit: ScrollUnit, amount: f32, band_extent: f32) -> f32 {
    match unit {
        ScrollUnit::Pixel => amount,
        ScrollUnit::Band => amount * band_extent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ItemKey;

    #[test]
    fn test_clamping() {
        let state = ScrollState {
            main_extent: 1000.0,
            main_viewport: 300.0,
            cross_extent: 200.0,
            cross_viewport: 200.0,
            ..Default::default()
        };
        assert_eq!(state.clamp_main(-5.0), 0.0);
        assert_eq!(state.clamp_main(900.0), 700.0);
        assert_eq!(state.clamp_main(f32::NAN), 0.0);
        assert_eq!(state.clamp_cross(50.0), 0.0);
        assert_eq!(state.max_main_offset(), 700.0);
    }

    #[test]
    fn test_content_smaller_than_viewport() {
        let mut state = ScrollState {
            main_offset: 40.0,
            main_extent: 100.0,
            main_viewport: 300.0,
            ..Default::default()
        };
        assert!(state.coerce());
        assert_eq!(state.main_offset, 0.0);
        assert!(!state.coerce());
    }

    #[test]
    fn test_offset_for_index_accounts_for_expansion() {
        use crate::config::SpacingMode;
        use crate::panel::metrics::MetricsInput;

        let metrics = BandMetrics::compute(MetricsInput {
            orientation: Orientation::Vertical,
            item_size: Size::new(50.0, 100.0),
            available: Size::new(200.0, 300.0),
            item_count: 40,
            spacing_mode: SpacingMode::None,
            stretch_items: false,
            max_stretched_cross: None,
        });
        let expansion = ExpansionPlacement {
            item: ItemKey::new(1),
            index: 5,
            boundary: 7,
            extent: 60.0,
        };
        assert_eq!(offset_for_index(&metrics, 9, Some(expansion)), 260.0);
        assert_eq!(offset_for_index(&metrics, 6, Some(expansion)), 100.0);
        assert_eq!(offset_for_index(&metrics, 9, None), 200.0);
    }

    #[test]
    fn test_step_units() {
        assert_eq!(step_pixels(ScrollUnit::Pixel, 16.0, 120.0), 16.0);
        assert_eq!(step_pixels(ScrollUnit::Band, 2.0, 120.0), 240.0);
    }
}
