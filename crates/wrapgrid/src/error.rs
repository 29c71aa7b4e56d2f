//! Error types for the wrap panel.

use thiserror::Error;

use crate::source::ItemKey;

/// Errors raised by item or expansion templates.
///
/// A failing template is a caller bug, not a runtime condition: the panel
/// propagates these out of the layout pass instead of swallowing them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template could not build a container for the item.
    #[error("failed to build container for item {item:?}: {reason}")]
    Build {
        /// The item the container was requested for.
        item: ItemKey,
        /// Human readable failure description.
        reason: String,
    },
}

impl TemplateError {
    /// Convenience constructor for [`TemplateError::Build`].
    pub fn build(item: ItemKey, reason: impl Into<String>) -> Self {
        Self::Build {
            item,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during a layout pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// A template failed while realizing a container.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    /// Items need realizing but no item template has been set.
    #[error("no item template set")]
    NoTemplate,
}

/// Result type for panel operations.
pub type PanelResult<T> = Result<T, PanelError>;
