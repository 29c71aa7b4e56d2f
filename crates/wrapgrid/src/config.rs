//! Panel configuration.
//!
//! [`PanelConfig`] gathers every option that shapes the wrap layout. It is
//! plain data (serde-serializable, so hosts can persist it with their other
//! view settings); the runtime collaborators such as the item source and the
//! templates are attached to the panel directly.
//!
//! # Example
//!
//! ```
//! use wrapgrid::config::{ItemSize, PanelConfig, SpacingMode};
//! use wrapgrid::Size;
//!
//! let config = PanelConfig::new()
//!     .with_item_size(ItemSize::Fixed(Size::new(96.0, 96.0)))
//!     .with_spacing_mode(SpacingMode::BetweenItemsOnly)
//!     .with_recycling(true);
//! assert_eq!(config.spacing_mode, SpacingMode::BetweenItemsOnly);
//! ```

use serde::{Deserialize, Serialize};
use wrapgrid_core::{Orientation, Size};

/// Default per-kind capacity of the recycle pool.
pub const DEFAULT_RECYCLE_POOL_CAPACITY: usize = 64;

/// Default distance scrolled by one line step, in pixels.
pub const DEFAULT_SCROLL_LINE_DELTA: f32 = 16.0;

/// Default distance scrolled by one mouse wheel notch, in pixels.
pub const DEFAULT_MOUSE_WHEEL_DELTA: f32 = 48.0;

/// How the uniform item size is determined.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ItemSize {
    /// Every item occupies exactly this size.
    Fixed(Size),
    /// The first measured container determines the size for the pass.
    #[default]
    Auto,
}

/// How leftover cross-axis space in a band is distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum SpacingMode {
    /// Items are packed edge to edge from the start of the band.
    None,
    /// Leftover space is split evenly between items and both band edges.
    #[default]
    Uniform,
    /// Leftover space is split evenly between items only.
    BetweenItemsOnly,
    /// Leftover space is split between the two band edges only.
    StartAndEndOnly,
}

/// Unit of a [`CacheLength`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum CacheUnit {
    /// Lengths are pixels along the main axis.
    #[default]
    Pixel,
    /// Lengths count whole bands.
    Band,
    /// Lengths count viewport extents.
    Page,
}

/// Extra content realized before and after the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CacheLength {
    /// Amount realized before the viewport start.
    pub before: f32,
    /// Amount realized after the viewport end.
    pub after: f32,
    /// Unit both amounts are expressed in.
    pub unit: CacheUnit,
}

impl CacheLength {
    /// No cache: only what intersects the viewport is realized.
    pub const NONE: Self = Self {
        before: 0.0,
        after: 0.0,
        unit: CacheUnit::Pixel,
    };

    /// Create a cache length.
    pub fn new(before: f32, after: f32, unit: CacheUnit) -> Self {
        Self {
            before,
            after,
            unit,
        }
    }

    /// Resolve `(before, after)` to pixels along the main axis.
    pub fn to_pixels(&self, band_extent: f32, viewport_extent: f32) -> (f32, f32) {
        let scale = match self.unit {
            CacheUnit::Pixel => 1.0,
            CacheUnit::Band => band_extent,
            CacheUnit::Page => viewport_extent,
        };
        let sanitize = |v: f32| if v.is_finite() { (v * scale).max(0.0) } else { 0.0 };
        (sanitize(self.before), sanitize(self.after))
    }
}

/// Unit of line and mouse wheel scroll steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum ScrollUnit {
    /// Steps are expressed in pixels.
    #[default]
    Pixel,
    /// Steps are expressed in bands.
    Band,
}

/// Configuration for a [`WrapPanel`](crate::WrapPanel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Direction in which bands are stacked.
    pub orientation: Orientation,
    /// Uniform item size.
    pub item_size: ItemSize,
    /// Distribution of leftover cross-axis space.
    pub spacing_mode: SpacingMode,
    /// Widen items to fill the band instead of spacing them.
    pub stretch_items: bool,
    /// Upper bound for a stretched item's cross extent.
    pub max_stretched_cross: Option<f32>,
    /// Reuse containers that scroll out of view.
    pub recycling: bool,
    /// Pooled containers kept per kind before further ones are destroyed.
    pub recycle_pool_capacity: usize,
    /// Extra content realized around the viewport.
    pub cache_length: CacheLength,
    /// Unit of line and wheel steps.
    pub scroll_unit: ScrollUnit,
    /// Size of a line step.
    pub scroll_line_delta: f32,
    /// Size of a mouse wheel step.
    pub mouse_wheel_delta: f32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            item_size: ItemSize::Auto,
            spacing_mode: SpacingMode::Uniform,
            stretch_items: false,
            max_stretched_cross: None,
            recycling: true,
            recycle_pool_capacity: DEFAULT_RECYCLE_POOL_CAPACITY,
            cache_length: CacheLength::NONE,
            scroll_unit: ScrollUnit::Pixel,
            scroll_line_delta: DEFAULT_SCROLL_LINE_DELTA,
            mouse_wheel_delta: DEFAULT_MOUSE_WHEEL_DELTA,
        }
    }
}

impl PanelConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the item size.
    pub fn with_item_size(mut self, item_size: ItemSize) -> Self {
        self.item_size = item_size;
        self
    }

    /// Set the spacing mode.
    pub fn with_spacing_mode(mut self, spacing_mode: SpacingMode) -> Self {
        self.spacing_mode = spacing_mode;
        self
    }

    /// Enable or disable item stretching.
    pub fn with_stretch_items(mut self, stretch: bool) -> Self {
        self.stretch_items = stretch;
        self
    }

    /// Cap the cross extent of stretched items.
    pub fn with_max_stretched_cross(mut self, max: Option<f32>) -> Self {
        self.max_stretched_cross = max;
        self
    }

    /// Enable or disable container recycling.
    pub fn with_recycling(mut self, recycling: bool) -> Self {
        self.recycling = recycling;
        self
    }

    /// Set the per-kind recycle pool capacity.
    pub fn with_recycle_pool_capacity(mut self, capacity: usize) -> Self {
        self.recycle_pool_capacity = capacity;
        self
    }

    /// Set the cache length.
    pub fn with_cache_length(mut self, cache_length: CacheLength) -> Self {
        self.cache_length = cache_length;
        self
    }

    /// Set the scroll step unit and sizes.
    pub fn with_scroll_steps(mut self, unit: ScrollUnit, line: f32, wheel: f32) -> Self {
        self.scroll_unit = unit;
        self.scroll_line_delta = line;
        self.mouse_wheel_delta = wheel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PanelConfig::default();
        assert_eq!(config.orientation, Orientation::Vertical);
        assert_eq!(config.item_size, ItemSize::Auto);
        assert_eq!(config.spacing_mode, SpacingMode::Uniform);
        assert!(config.recycling);
        assert_eq!(config.recycle_pool_capacity, DEFAULT_RECYCLE_POOL_CAPACITY);
        assert_eq!(config.cache_length, CacheLength::NONE);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "orientation": "Horizontal",
            "item_size": { "Fixed": { "width": 64.0, "height": 32.0 } },
            "recycling": false
        }"#;
        let config: PanelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.orientation, Orientation::Horizontal);
        assert_eq!(config.item_size, ItemSize::Fixed(Size::new(64.0, 32.0)));
        assert!(!config.recycling);
        assert_eq!(config.spacing_mode, SpacingMode::Uniform);
        assert_eq!(config.scroll_line_delta, DEFAULT_SCROLL_LINE_DELTA);
    }

    #[test]
    fn test_cache_length_units() {
        let bands = CacheLength::new(1.0, 2.0, CacheUnit::Band);
        assert_eq!(bands.to_pixels(100.0, 250.0), (100.0, 200.0));

        let pages = CacheLength::new(1.0, 1.0, CacheUnit::Page);
        assert_eq!(pages.to_pixels(100.0, 250.0), (250.0, 250.0));

        let negative = CacheLength::new(-10.0, f32::NAN, CacheUnit::Pixel);
        assert_eq!(negative.to_pixels(100.0, 250.0), (0.0, 0.0));
    }
}
