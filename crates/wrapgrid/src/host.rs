//! The layout host a panel lives in.

/// The retained-mode layout system driving a panel.
///
/// The host calls [`WrapPanel::measure`](crate::WrapPanel::measure) and then
/// [`WrapPanel::arrange`](crate::WrapPanel::arrange) once per layout cycle.
/// The panel calls [`invalidate`](LayoutHost::invalidate) whenever its state
/// changed in a way that needs a new cycle: scrolling, a new expanded item,
/// a configuration change or a mutation of its item source.
///
/// `invalidate` may be called from whichever thread mutated the source, so
/// implementations should only record the request.
pub trait LayoutHost: Send + Sync {
    /// Request a new measure/arrange cycle.
    fn invalidate(&self);
}
