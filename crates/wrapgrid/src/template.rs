//! Containers and the templates that build them.
//!
//! A [`Container`] is the realized visual for one item. The panel never
//! constructs containers itself: it asks an [`ItemTemplate`] to build one,
//! hands it back to the template when recycling, and lets the template
//! destroy it when it is evicted or removed.
//!
//! Two templates play different roles on a panel: the item template builds
//! the regular grid cells, the optional expansion template builds the detail
//! panel for the expanded item. Both implement the same trait.

use std::fmt;

use wrapgrid_core::{Rect, Size};

use crate::error::TemplateError;
use crate::source::ItemKey;

/// Key of a recycle pool.
///
/// Containers are only reused for items whose template reports the same
/// kind, so a template that produces structurally different containers can
/// keep them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContainerKind(pub u32);

impl ContainerKind {
    /// The kind used when a template does not distinguish containers.
    pub const DEFAULT: Self = Self(0);
}

/// A realized visual for a single item.
pub trait Container: Send {
    /// Measure the container against `available` and return its desired size.
    fn measure(&mut self, available: Size) -> Size;

    /// Position the container. `rect` is relative to the scrolled viewport.
    fn arrange(&mut self, rect: Rect);

    /// Bind the container to `item` at `index`.
    ///
    /// Called once after the container is built and again every time a
    /// recycled container is reused, possibly for a different item.
    fn bind(&mut self, item: ItemKey, index: usize);

    /// Release the current binding. Called before the container is pooled.
    fn unbind(&mut self) {}
}

/// Builds containers for items.
pub trait ItemTemplate: Send {
    /// Build a fresh container for `item`.
    fn build(&mut self, item: ItemKey) -> Result<Box<dyn Container>, TemplateError>;

    /// The recycle pool a container for `item` belongs to.
    fn container_kind(&self, _item: ItemKey) -> ContainerKind {
        ContainerKind::DEFAULT
    }

    /// Prepare a container for the recycle pool.
    fn recycle(&mut self, container: &mut dyn Container) {
        container.unbind();
    }

    /// Dispose of a container that will never be reused.
    fn destroy(&mut self, container: Box<dyn Container>) {
        drop(container);
    }
}

type BuildFn = dyn FnMut(ItemKey) -> Result<Box<dyn Container>, TemplateError> + Send;

/// An [`ItemTemplate`] backed by a closure.
///
/// # Example
///
/// ```
/// use wrapgrid::template::{Container, FnTemplate, ItemTemplate};
/// use wrapgrid::{ItemKey, Rect, Size};
///
/// struct Cell;
///
/// impl Container for Cell {
///     fn measure(&mut self, _available: Size) -> Size {
///         Size::new(64.0, 64.0)
///     }
///     fn arrange(&mut self, _rect: Rect) {}
///     fn bind(&mut self, _item: ItemKey, _index: usize) {}
/// }
///
/// let mut template = FnTemplate::new(|_item| Ok(Box::new(Cell) as Box<dyn Container>));
/// let mut cell = template.build(ItemKey::new(1)).unwrap();
/// assert_eq!(cell.measure(Size::INFINITE), Size::new(64.0, 64.0));
/// ```
pub struct FnTemplate {
    build: Box<BuildFn>,
    kind: ContainerKind,
}

impl FnTemplate {
    /// Create a template that builds containers with `build`.
    pub fn new<F>(build: F) -> Self
    where
        F: FnMut(ItemKey) -> Result<Box<dyn Container>, TemplateError> + Send + 'static,
    {
        Self {
            build: Box::new(build),
            kind: ContainerKind::DEFAULT,
        }
    }

    /// Report `kind` for every container this template builds.
    pub fn with_kind(mut self, kind: ContainerKind) -> Self {
        self.kind = kind;
        self
    }
}

impl ItemTemplate for FnTemplate {
    fn build(&mut self, item: ItemKey) -> Result<Box<dyn Container>, TemplateError> {
        (self.build)(item)
    }

    fn container_kind(&self, _item: ItemKey) -> ContainerKind {
        self.kind
    }
}

impl fmt::Debug for FnTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTemplate").field("kind", &self.kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        bound: Option<(ItemKey, usize)>,
    }

    impl Container for Probe {
        fn measure(&mut self, _available: Size) -> Size {
            Size::new(10.0, 20.0)
        }

        fn arrange(&mut self, _rect: Rect) {}

        fn bind(&mut self, item: ItemKey, index: usize) {
            self.bound = Some((item, index));
        }

        fn unbind(&mut self) {
            self.bound = None;
        }
    }

    #[test]
    fn test_fn_template_builds_and_reports_kind() {
        let mut template =
            FnTemplate::new(|_| Ok(Box::new(Probe { bound: None }) as Box<dyn Container>))
                .with_kind(ContainerKind(3));

        assert_eq!(template.container_kind(ItemKey::new(7)), ContainerKind(3));
        let mut container = template.build(ItemKey::new(7)).unwrap();
        assert_eq!(container.measure(Size::INFINITE), Size::new(10.0, 20.0));
    }

    #[test]
    fn test_fn_template_propagates_errors() {
        let mut template = FnTemplate::new(|item| Err(TemplateError::build(item, "no artwork")));
        let err = template.build(ItemKey::new(4)).err().unwrap();
        assert_eq!(err, TemplateError::build(ItemKey::new(4), "no artwork"));
    }

    #[test]
    fn test_default_recycle_unbinds() {
        let mut template =
            FnTemplate::new(|_| Ok(Box::new(Probe { bound: None }) as Box<dyn Container>));
        let mut probe = Probe {
            bound: Some((ItemKey::new(1), 0)),
        };
        template.recycle(&mut probe);
        assert!(probe.bound.is_none());
    }
}
