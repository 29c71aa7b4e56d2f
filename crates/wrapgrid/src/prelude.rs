//! Prelude module for Wrapgrid.
//!
//! ```ignore
//! use wrapgrid::prelude::*;
//! ```
//!
//! Brings the panel, its configuration, the item source types, the template
//! traits and the geometry types into scope.

// ============================================================================
// Panel
// ============================================================================

pub use crate::panel::{ChildSlot, ExpansionPhase, ItemRange, WrapPanel};
pub use crate::LayoutHost;

// ============================================================================
// Configuration
// ============================================================================

pub use crate::config::{CacheLength, CacheUnit, ItemSize, PanelConfig, ScrollUnit, SpacingMode};

// ============================================================================
// Items and Templates
// ============================================================================

pub use crate::source::{ItemKey, ItemSource, VecSource};
pub use crate::template::{Container, ContainerKind, FnTemplate, ItemTemplate};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{PanelError, PanelResult, TemplateError};

// ============================================================================
// Geometry and Signals
// ============================================================================

pub use wrapgrid_core::{Orientation, Point, Rect, Signal, Size};
