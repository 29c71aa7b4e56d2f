//! Tracing targets and helpers.
//!
//! Nothing here installs a subscriber; hosts bring their own. Each subsystem
//! logs under its own target, so `RUST_LOG=wrapgrid::expansion=debug` shows
//! the expansion lifecycle without the per-container generator noise.

/// Span names used throughout Wrapgrid for tracing.
pub mod span_names {
    /// A complete measure pass.
    pub const MEASURE: &str = "wrapgrid::measure";
    /// A complete arrange pass.
    pub const ARRANGE: &str = "wrapgrid::arrange";
}

/// Target names for log filtering.
pub mod targets {
    /// Panel measure/arrange and scrolling.
    pub const PANEL: &str = "wrapgrid::panel";
    /// Container realization, recycling and removal.
    pub const GENERATOR: &str = "wrapgrid::generator";
    /// Expansion container lifecycle.
    pub const EXPANSION: &str = "wrapgrid::expansion";
    /// Item source change notifications.
    pub const SOURCE: &str = "wrapgrid::source";
    /// Signal/slot system.
    pub const SIGNAL: &str = "wrapgrid::signal";
}

/// Keeps an `info` span on `wrapgrid::perf` entered for the lifetime of a
/// layout pass.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter the span for `name`, one of the [`span_names`].
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "wrapgrid::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// `tracing::trace!` under the crate-wide `wrapgrid` target.
#[macro_export]
macro_rules! wrapgrid_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "wrapgrid", $($arg)*)
    };
}

/// `tracing::debug!` under the crate-wide `wrapgrid` target.
#[macro_export]
macro_rules! wrapgrid_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "wrapgrid", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span_nests_events() {
        let _span = PerfSpan::new(span_names::MEASURE);
        crate::wrapgrid_trace!(value = 1, "inside span");
    }
}
