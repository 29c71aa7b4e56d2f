//! Change notifications.
//!
//! Item sources announce their mutations and the panel announces expansion
//! changes through [`Signal`]s. A signal keeps its slots in a slotmap keyed
//! by [`ConnectionId`], so a listener can later detach with the id it got
//! from [`Signal::connect`].
//!
//! # Invocation
//!
//! Layout runs on a single thread, so every slot is invoked directly on the
//! emitting thread. Slots are collected before invocation and the connection
//! lock is released while they run: a slot may connect or disconnect on the
//! signal that is currently emitting.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use wrapgrid_core::Signal;
//!
//! // Inserted (index, count) pairs.
//! let inserted = Signal::<(usize, usize)>::new();
//! let pending = Arc::new(AtomicUsize::new(0));
//!
//! let counter = pending.clone();
//! let id = inserted.connect(move |&(_, count)| {
//!     counter.fetch_add(count, Ordering::Relaxed);
//! });
//!
//! inserted.emit((0, 3));
//! inserted.emit((10, 2));
//! assert_eq!(pending.load(Ordering::Relaxed), 5);
//!
//! assert!(inserted.disconnect(id));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// Handle to one connected slot, returned by [`Signal::connect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A notification with any number of listeners.
///
/// Slots receive the emitted value by reference. `Signal<Args>` is
/// `Send + Sync`.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    muted: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

impl<Args> Signal<Args> {
    /// A signal nobody listens to yet.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
            muted: AtomicBool::new(false),
        }
    }

    /// Register `slot`; it runs on every subsequent emission.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Remove the slot registered under `id`. Returns `false` for an unknown
    /// or already removed id.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Like [`disconnect`](Self::disconnect), reporting unknown ids as an
    /// error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Remove every slot.
    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    /// Number of registered slots.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Mute or unmute the signal. Emissions while muted are dropped.
    pub fn set_blocked(&self, blocked: bool) {
        self.muted.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    /// Invoke every slot with `args`. Does nothing while muted.
    pub fn emit(&self, args: Args) {
        let _ = self.try_emit(args);
    }

    /// Invoke every slot with `args` and return how many ran.
    #[tracing::instrument(skip_all, target = "wrapgrid::signal", level = "trace")]
    pub fn try_emit(&self, args: Args) -> Result<usize, SignalError> {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return Err(SignalError::Blocked);
        }

        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emitting");

        for slot in &slots {
            slot(&args);
        }
        Ok(slots.len())
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder<T: Copy + Send + 'static>(signal: &Signal<T>) -> (ConnectionId, Arc<Mutex<Vec<T>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let id = signal.connect(move |value: &T| sink.lock().push(*value));
        (id, log)
    }

    #[test]
    fn test_slots_see_emissions_in_order() {
        let removed = Signal::<(usize, usize)>::new();
        let (_, log) = recorder(&removed);

        removed.emit((4, 1));
        removed.emit((0, 3));

        assert_eq!(*log.lock(), vec![(4, 1), (0, 3)]);
    }

    #[test]
    fn test_disconnected_slot_stops_receiving() {
        let expanded = Signal::<Option<u64>>::new();
        let (id, log) = recorder(&expanded);

        expanded.emit(Some(7));
        assert!(expanded.disconnect(id));
        expanded.emit(None);

        assert_eq!(*log.lock(), vec![Some(7)]);
        assert_eq!(expanded.try_disconnect(id), Err(SignalError::InvalidConnection));
    }

    #[test]
    fn test_muted_signal_drops_emissions() {
        let reset = Signal::<u32>::new();
        let (_, log) = recorder(&reset);

        reset.emit(1);
        reset.set_blocked(true);
        assert_eq!(reset.try_emit(2), Err(SignalError::Blocked));
        reset.set_blocked(false);
        reset.emit(3);

        assert_eq!(*log.lock(), vec![1, 3]);
    }

    #[test]
    fn test_every_listener_runs() {
        let changed = Signal::<()>::new();
        let runs = Arc::new(AtomicUsize::new(0));
        for _ in 0..4 {
            let runs = runs.clone();
            changed.connect(move |_| {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(changed.try_emit(()), Ok(4));
        assert_eq!(runs.load(Ordering::SeqCst), 4);

        changed.disconnect_all();
        assert_eq!(changed.connection_count(), 0);
        assert_eq!(changed.try_emit(()), Ok(0));
    }

    #[test]
    fn test_slot_may_disconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let own_id: Arc<Mutex<Option<ConnectionId>>> = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&signal);
        let cell = own_id.clone();
        let id = signal.connect(move |_| {
            if let (Some(signal), Some(id)) = (weak.upgrade(), *cell.lock()) {
                signal.disconnect(id);
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(());
        assert_eq!(signal.connection_count(), 0);
    }
}
