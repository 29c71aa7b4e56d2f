//! Core systems for Wrapgrid.
//!
//! This crate provides the leaf building blocks used by the virtualizing
//! wrap panel in the `wrapgrid` crate:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`] and the [`Orientation`] axis
//!   projection used to express layout math once for rows and columns
//! - **Signal/Slot System**: [`Signal`] for change notification between the
//!   item source, the panel and its host
//! - **Logging**: tracing targets and helpers shared by every subsystem
//!
//! # Signal Example
//!
//! ```
//! use wrapgrid_core::Signal;
//!
//! let count_changed = Signal::<usize>::new();
//!
//! let conn_id = count_changed.connect(|count| {
//!     println!("Source now has {} items", count);
//! });
//!
//! count_changed.emit(42);
//! count_changed.disconnect(conn_id);
//! ```
//!
//! # Axis Example
//!
//! ```
//! use wrapgrid_core::{Orientation, Size};
//!
//! // Vertical panels stack rows and scroll along y.
//! let item = Size::new(120.0, 80.0);
//! assert_eq!(Orientation::Vertical.main(item), 80.0);
//! assert_eq!(Orientation::Horizontal.main(item), 120.0);
//! ```

mod error;
pub mod geometry;
pub mod logging;
pub mod signal;

pub use error::SignalError;
pub use geometry::{Orientation, Point, Rect, Size};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
