//! The wrap panel and its layout machinery.
//!
//! [`WrapPanel`] drives one measure/arrange cycle at a time:
//!
//! 1. [`range`] turns the scroll offset into the inclusive range of items in
//!    view, using the band numbers from [`metrics`]
//! 2. [`generator`] virtualizes containers that left the range and realizes
//!    the missing ones, recycling through a per-kind pool
//! 3. [`expansion`] builds or drops the detail container of the expanded
//!    item, and the two steps above repeat until nothing moves
//! 4. arrangement places every container, shifting bands that follow the
//!    expansion
//!
//! [`index_map`] translates between item indices, visual child slots and
//! generator positions; [`scroll`] holds the offset math.

pub mod expansion;
pub mod generator;
pub mod index_map;
pub mod metrics;
pub mod range;
pub mod scroll;
mod wrap_panel;

pub use expansion::ExpansionPhase;
pub use index_map::{ChildRef, GeneratorPosition};
pub use range::ItemRange;
pub use wrap_panel::{ChildSlot, PanelSignals, WrapPanel};
