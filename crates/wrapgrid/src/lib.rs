//! Wrapgrid - a virtualizing wrap panel with single-item expansion.
//!
//! The panel lays out a large collection of uniformly sized items in bands
//! (rows, or columns when horizontal) and only keeps containers alive for
//! the items in view. One item at a time can be expanded into an inline
//! detail container that spans its band and pushes the following bands
//! down.
//!
//! The panel is an embedded layout component. It plugs into three
//! collaborators provided by the host application:
//!
//! - an [`ItemSource`] holding the items and announcing its mutations
//! - an [`ItemTemplate`](template::ItemTemplate) building a
//!   [`Container`](template::Container) per item, and optionally a second one
//!   building the expansion container
//! - a [`LayoutHost`] that runs measure/arrange cycles when asked to
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wrapgrid::prelude::*;
//!
//! struct Thumbnail;
//!
//! impl Container for Thumbnail {
//!     fn measure(&mut self, _available: Size) -> Size {
//!         Size::new(120.0, 90.0)
//!     }
//!     fn arrange(&mut self, _rect: Rect) {}
//!     fn bind(&mut self, _item: ItemKey, _index: usize) {}
//! }
//!
//! struct Details;
//!
//! impl Container for Details {
//!     fn measure(&mut self, available: Size) -> Size {
//!         Size::new(available.width, 200.0)
//!     }
//!     fn arrange(&mut self, _rect: Rect) {}
//!     fn bind(&mut self, _item: ItemKey, _index: usize) {}
//! }
//!
//! let photos = Arc::new(VecSource::new((0..500).collect::<Vec<u32>>()));
//!
//! let mut panel = WrapPanel::new(PanelConfig::new().with_spacing_mode(SpacingMode::Uniform));
//! panel.set_item_template(FnTemplate::new(|_| Ok(Box::new(Thumbnail) as Box<dyn Container>)));
//! panel.set_expansion_template(FnTemplate::new(|_| Ok(Box::new(Details) as Box<dyn Container>)));
//! panel.set_source(photos.clone());
//!
//! panel.set_expanded_item(photos.key_at(3));
//! panel.measure(Size::new(600.0, 400.0)).unwrap();
//! panel.arrange(Size::new(600.0, 400.0));
//!
//! assert_eq!(panel.items_per_band(), 5);
//! assert_eq!(panel.expansion_container_count(), 1);
//! // 100 bands of 90px plus the 200px detail panel.
//! assert_eq!(panel.extent().height, 9_200.0);
//! ```

pub mod config;
mod error;
mod host;
pub mod panel;
pub mod prelude;
pub mod source;
pub mod template;

pub use config::PanelConfig;
pub use error::{PanelError, PanelResult, TemplateError};
pub use host::LayoutHost;
pub use panel::{ChildSlot, ExpansionPhase, GeneratorPosition, ItemRange, WrapPanel};
pub use source::{ChangeKind, ItemKey, ItemSource, SourceChange, SourceSignals, VecSource};
pub use wrapgrid_core::{Orientation, Point, Rect, Signal, Size};
