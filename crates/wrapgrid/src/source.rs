//! Item sources for the wrap panel.
//!
//! The panel never owns items. It addresses them through an [`ItemSource`]:
//! an ordered, index-addressable collection that hands out opaque
//! [`ItemKey`]s and announces its mutations through [`SourceSignals`].
//!
//! # Example
//!
//! ```
//! use wrapgrid::source::{ItemSource, VecSource};
//!
//! let source = VecSource::new(vec!["a.png", "b.png", "c.png"]);
//! let key = source.key_at(1).unwrap();
//!
//! source.signals().changed.connect(|change| {
//!     println!("source changed: {:?}", change);
//! });
//!
//! source.remove(0);
//! assert_eq!(source.index_of(key), Some(0));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use wrapgrid_core::logging::targets;
use wrapgrid_core::Signal;

/// Opaque handle to an item in a source.
///
/// Identity is key equality: two keys are the same item exactly when they
/// compare equal, regardless of the item's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey(pub u64);

impl ItemKey {
    /// Create a key from a raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw key value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Kind of mutation announced by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// `count` items were inserted starting at `index`.
    Insert,
    /// `count` items were removed starting at `index`.
    Remove,
    /// `count` items starting at `index` were replaced by other items.
    Replace,
    /// The whole collection changed; `index` and `count` are meaningless.
    Reset,
}

/// A change notification emitted by an [`ItemSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceChange {
    /// What happened.
    pub kind: ChangeKind,
    /// First affected index.
    pub index: usize,
    /// Number of affected items.
    pub count: usize,
}

impl SourceChange {
    /// Items were inserted.
    pub fn inserted(index: usize, count: usize) -> Self {
        Self {
            kind: ChangeKind::Insert,
            index,
            count,
        }
    }

    /// Items were removed.
    pub fn removed(index: usize, count: usize) -> Self {
        Self {
            kind: ChangeKind::Remove,
            index,
            count,
        }
    }

    /// Items were replaced in place.
    pub fn replaced(index: usize, count: usize) -> Self {
        Self {
            kind: ChangeKind::Replace,
            index,
            count,
        }
    }

    /// The collection was reset.
    pub fn reset() -> Self {
        Self {
            kind: ChangeKind::Reset,
            index: 0,
            count: 0,
        }
    }
}

/// Signals emitted by item sources.
#[derive(Debug, Default)]
pub struct SourceSignals {
    /// Emitted after every mutation of the source.
    pub changed: Signal<SourceChange>,
}

impl SourceSignals {
    /// Create a new set of source signals.
    pub fn new() -> Self {
        Self::default()
    }
}

/// An ordered, index-addressable collection of items.
///
/// Implementations must emit [`SourceSignals::changed`] after each mutation
/// so the panel can invalidate its realized range before the next pass.
pub trait ItemSource: Send + Sync {
    /// Number of items.
    fn count(&self) -> usize;

    /// Key of the item at `index`, or `None` when out of bounds.
    fn key_at(&self, index: usize) -> Option<ItemKey>;

    /// Index of the item identified by `key`, or `None` if it is not present.
    ///
    /// The default implementation scans the collection.
    fn index_of(&self, key: ItemKey) -> Option<usize> {
        (0..self.count()).find(|&i| self.key_at(i) == Some(key))
    }

    /// Change notification signals.
    fn signals(&self) -> &SourceSignals;
}

/// A list-backed item source.
///
/// Each inserted value receives a fresh [`ItemKey`], so two equal values are
/// still two distinct items.
pub struct VecSource<T> {
    items: RwLock<Vec<(ItemKey, T)>>,
    next_key: AtomicU64,
    signals: SourceSignals,
}

impl<T: Send + Sync> VecSource<T> {
    /// Create a source holding `items`.
    pub fn new(items: Vec<T>) -> Self {
        let source = Self {
            items: RwLock::new(Vec::with_capacity(items.len())),
            next_key: AtomicU64::new(1),
            signals: SourceSignals::new(),
        };
        let keyed: Vec<(ItemKey, T)> = items.into_iter().map(|v| (source.allocate_key(), v)).collect();
        *source.items.write() = keyed;
        source
    }

    /// Create an empty source.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn allocate_key(&self) -> ItemKey {
        ItemKey(self.next_key.fetch_add(1, Ordering::Relaxed))
    }

    fn notify(&self, change: SourceChange) {
        tracing::trace!(target: targets::SOURCE, ?change, "source changed");
        self.signals.changed.emit(change);
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Appends an item and returns its key.
    pub fn push(&self, value: T) -> ItemKey {
        let key = self.allocate_key();
        let index = {
            let mut items = self.items.write();
            items.push((key, value));
            items.len() - 1
        };
        self.notify(SourceChange::inserted(index, 1));
        key
    }

    /// Inserts an item at `index` and returns its key.
    ///
    /// Indices past the end append.
    pub fn insert(&self, index: usize, value: T) -> ItemKey {
        let key = self.allocate_key();
        let index = {
            let mut items = self.items.write();
            let index = index.min(items.len());
            items.insert(index, (key, value));
            index
        };
        self.notify(SourceChange::inserted(index, 1));
        key
    }

    /// Removes and returns the item at `index`, or `None` when out of bounds.
    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.items.write();
            if index < items.len() {
                Some(items.remove(index).1)
            } else {
                None
            }
        };
        if removed.is_some() {
            self.notify(SourceChange::removed(index, 1));
        }
        removed
    }

    /// Removes the item identified by `key`.
    pub fn remove_key(&self, key: ItemKey) -> Option<T> {
        let index = self.index_of(key)?;
        self.remove(index)
    }

    /// Replaces the item at `index` with a new item and returns the new key.
    ///
    /// The replacement is a different item: it gets a new key.
    pub fn replace(&self, index: usize, value: T) -> Option<ItemKey> {
        let key = self.allocate_key();
        let replaced = {
            let mut items = self.items.write();
            match items.get_mut(index) {
                Some(slot) => {
                    *slot = (key, value);
                    true
                }
                None => false,
            }
        };
        if !replaced {
            return None;
        }
        self.notify(SourceChange::replaced(index, 1));
        Some(key)
    }

    /// Replaces the whole content.
    pub fn reset(&self, values: Vec<T>) {
        let keyed: Vec<(ItemKey, T)> = values.into_iter().map(|v| (self.allocate_key(), v)).collect();
        *self.items.write() = keyed;
        self.notify(SourceChange::reset());
    }

    /// Returns a clone of the item at `index`.
    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.items.read().get(index).map(|(_, v)| v.clone())
    }

    /// Runs `f` with the item identified by `key`.
    pub fn with_item<R>(&self, key: ItemKey, f: impl FnOnce(&T) -> R) -> Option<R> {
        let items = self.items.read();
        items.iter().find(|(k, _)| *k == key).map(|(_, v)| f(v))
    }
}

impl<T: Send + Sync> ItemSource for VecSource<T> {
    fn count(&self) -> usize {
        self.len()
    }

    fn key_at(&self, index: usize) -> Option<ItemKey> {
        self.items.read().get(index).map(|(k, _)| *k)
    }

    fn index_of(&self, key: ItemKey) -> Option<usize> {
        self.items.read().iter().position(|(k, _)| *k == key)
    }

    fn signals(&self) -> &SourceSignals {
        &self.signals
    }
}

impl<T: Send + Sync + std::fmt::Debug> std::fmt::Debug for VecSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VecSource")
            .field("items", &*self.items.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn record(source: &VecSource<&'static str>) -> Arc<Mutex<Vec<SourceChange>>> {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        source.signals().changed.connect(move |change| {
            changes_clone.lock().push(*change);
        });
        changes
    }

    #[test]
    fn test_keys_are_distinct_for_equal_values() {
        let source = VecSource::new(vec!["same", "same"]);
        assert_ne!(source.key_at(0), source.key_at(1));
        assert_eq!(source.key_at(2), None);
    }

    #[test]
    fn test_mutations_emit_changes() {
        let source = VecSource::new(vec!["a", "b"]);
        let changes = record(&source);

        source.push("c");
        source.insert(0, "z");
        source.remove(1);
        source.replace(0, "y");
        source.reset(vec!["q"]);

        assert_eq!(
            *changes.lock(),
            vec![
                SourceChange::inserted(2, 1),
                SourceChange::inserted(0, 1),
                SourceChange::removed(1, 1),
                SourceChange::replaced(0, 1),
                SourceChange::reset(),
            ]
        );
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn test_out_of_bounds_mutations_are_silent() {
        let source = VecSource::new(vec!["a"]);
        let changes = record(&source);

        assert_eq!(source.remove(5), None);
        assert_eq!(source.replace(5, "b"), None);
        assert!(changes.lock().is_empty());
    }

    #[test]
    fn test_index_of_tracks_identity() {
        let source = VecSource::new(vec!["a", "b", "c"]);
        let key_c = source.key_at(2).unwrap();

        source.remove(0);
        assert_eq!(source.index_of(key_c), Some(1));

        let new_key = source.replace(1, "c").unwrap();
        assert_ne!(new_key, key_c);
        assert_eq!(source.index_of(key_c), None);
        assert_eq!(source.with_item(new_key, |v| v.to_string()), Some("c".to_string()));
    }

    #[test]
    fn test_remove_key() {
        let source = VecSource::new(vec![1, 2, 3]);
        let key = source.key_at(1).unwrap();
        assert_eq!(source.remove_key(key), Some(2));
        assert_eq!(source.remove_key(key), None);
        assert_eq!(source.get(1), Some(3));
    }
}
