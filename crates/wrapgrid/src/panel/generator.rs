//! Container generation, recycling and removal.
//!
//! Realized containers live in a slotmap arena. The generator maps each
//! realized item index to its arena entry and keeps a recycle pool per
//! [`ContainerKind`]. Pools belong to one generator, so two panels never
//! share containers and dropping a panel releases everything it built.

use std::collections::{BTreeMap, HashMap};

use slotmap::{new_key_type, SlotMap};
use wrapgrid_core::logging::targets;
use wrapgrid_core::{Rect, Size};

use super::range::ItemRange;
use crate::error::TemplateError;
use crate::source::ItemKey;
use crate::template::{Container, ContainerKind, ItemTemplate};

new_key_type! {
    /// Stable handle to a container owned by a generator.
    pub struct ContainerId;
}

struct ContainerEntry {
    container: Box<dyn Container>,
    kind: ContainerKind,
    item: Option<ItemKey>,
    measured_for: Option<Size>,
    desired: Size,
    rect: Rect,
}

/// How a container was obtained for an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Realization {
    /// The index was already realized for the same item.
    Existing,
    /// The index was realized for a different item and has been re-bound.
    Rebound,
    /// A pooled container was reused.
    Recycled,
    /// The template built a new container.
    Built,
}

/// Per-kind pools of unbound containers.
#[derive(Debug)]
struct RecyclePool {
    pools: HashMap<ContainerKind, Vec<ContainerId>>,
    capacity: usize,
}

impl RecyclePool {
    fn new(capacity: usize) -> Self {
        Self {
            pools: HashMap::new(),
            capacity,
        }
    }

    fn take(&mut self, kind: ContainerKind) -> Option<ContainerId> {
        self.pools.get_mut(&kind).and_then(Vec::pop)
    }

    /// Returns `false` if the pool for `kind` is full.
    fn offer(&mut self, kind: ContainerKind, id: ContainerId) -> bool {
        let pool = self.pools.entry(kind).or_default();
        if pool.len() >= self.capacity {
            return false;
        }
        pool.push(id);
        true
    }

    fn len(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    fn drain(&mut self) -> Vec<ContainerId> {
        self.pools.drain().flat_map(|(_, ids)| ids).collect()
    }

    fn set_capacity(&mut self, capacity: usize) -> Vec<ContainerId> {
        self.capacity = capacity;
        let mut overflow = Vec::new();
        for pool in self.pools.values_mut() {
            if pool.len() > capacity {
                overflow.extend(pool.drain(capacity..));
            }
        }
        overflow
    }
}

/// Owner of every realized and pooled item container.
pub struct ContainerGenerator {
    arena: SlotMap<ContainerId, ContainerEntry>,
    realized: BTreeMap<usize, ContainerId>,
    pool: RecyclePool,
}

impl ContainerGenerator {
    /// Create a generator whose pools hold at most `pool_capacity` containers
    /// per kind.
    pub fn new(pool_capacity: usize) -> Self {
        Self {
            arena: SlotMap::with_key(),
            realized: BTreeMap::new(),
            pool: RecyclePool::new(pool_capacity),
        }
    }

    /// Number of realized containers.
    pub fn realized_count(&self) -> usize {
        self.realized.len()
    }

    /// Number of pooled containers.
    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }

    /// Realized item indices in ascending order.
    pub fn realized_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.realized.keys().copied()
    }

    /// Item bound to the container at `index`.
    pub fn item_at(&self, index: usize) -> Option<ItemKey> {
        let id = self.realized.get(&index)?;
        self.arena.get(*id).and_then(|e| e.item)
    }

    /// Layout rectangle assigned to the container at `index` by the last
    /// arrange pass.
    pub fn rect_at(&self, index: usize) -> Option<Rect> {
        let id = self.realized.get(&index)?;
        self.arena.get(*id).map(|e| e.rect)
    }

    /// Desired size reported by the last measurement of the container at
    /// `index`.
    pub fn desired_at(&self, index: usize) -> Option<Size> {
        let id = self.realized.get(&index)?;
        self.arena.get(*id).map(|e| e.desired)
    }

    /// Make sure `index` has a container bound to `item`, measured against
    /// `constraint`.
    pub fn realize(
        &mut self,
        index: usize,
        item: ItemKey,
        template: &mut dyn ItemTemplate,
        constraint: Size,
    ) -> Result<Realization, TemplateError> {
        let (id, how) = match self.realized.get(&index).copied() {
            Some(id) if self.arena.get(id).is_some_and(|e| e.item == Some(item)) => {
                (id, Realization::Existing)
            }
            Some(id) => {
                tracing::debug!(target: targets::GENERATOR, index, ?item, "re-binding stale container");
                if let Some(entry) = self.arena.get_mut(id) {
                    entry.container.bind(item, index);
                    entry.item = Some(item);
                    entry.measured_for = None;
                }
                (id, Realization::Rebound)
            }
            None => self.obtain(index, item, template)?,
        };

        if let Some(entry) = self.arena.get_mut(id) {
            if entry.measured_for != Some(constraint) {
                entry.desired = entry.container.measure(constraint);
                entry.measured_for = Some(constraint);
            }
        }
        Ok(how)
    }

    fn obtain(
        &mut self,
        index: usize,
        item: ItemKey,
        template: &mut dyn ItemTemplate,
    ) -> Result<(ContainerId, Realization), TemplateError> {
        let kind = template.container_kind(item);
        if let Some(id) = self.pool.take(kind) {
            if let Some(entry) = self.arena.get_mut(id) {
                tracing::trace!(target: targets::GENERATOR, index, ?item, "reusing pooled container");
                entry.container.bind(item, index);
                entry.item = Some(item);
                entry.measured_for = None;
                self.realized.insert(index, id);
                return Ok((id, Realization::Recycled));
            }
        }

        let mut container = template.build(item)?;
        container.bind(item, index);
        tracing::trace!(target: targets::GENERATOR, index, ?item, "built container");
        let id = self.arena.insert(ContainerEntry {
            container,
            kind,
            item: Some(item),
            measured_for: None,
            desired: Size::ZERO,
            rect: Rect::ZERO,
        });
        self.realized.insert(index, id);
        Ok((id, Realization::Built))
    }

    /// Virtualize every realized container outside `range`.
    ///
    /// Returns the number of containers virtualized.
    pub fn virtualize_outside(
        &mut self,
        range: ItemRange,
        recycling: bool,
        template: &mut dyn ItemTemplate,
    ) -> usize {
        let stale: Vec<usize> = self
            .realized
            .keys()
            .copied()
            .filter(|&index| !range.contains(index))
            .collect();
        for &index in &stale {
            self.discard(index, recycling, template);
        }
        if !stale.is_empty() {
            tracing::trace!(target: targets::GENERATOR, count = stale.len(), ?range, "virtualized containers");
        }
        stale.len()
    }

    /// Virtualize the container at `index`, recycling it if `recycling` is
    /// set and its pool has room, destroying it otherwise.
    pub fn discard(&mut self, index: usize, recycling: bool, template: &mut dyn ItemTemplate) -> bool {
        let Some(id) = self.realized.remove(&index) else {
            return false;
        };
        if recycling {
            if let Some(entry) = self.arena.get_mut(id) {
                template.recycle(entry.container.as_mut());
                entry.item = None;
                if self.pool.offer(entry.kind, id) {
                    return true;
                }
            }
        }
        self.destroy(id, template);
        true
    }

    /// Virtualize the realized containers among the `count` indices starting
    /// at `start`. Returns how many were virtualized.
    pub fn discard_block(
        &mut self,
        start: usize,
        count: usize,
        recycling: bool,
        template: &mut dyn ItemTemplate,
    ) -> usize {
        let end = start.saturating_add(count);
        let hit: Vec<usize> = self.realized.range(start..end).map(|(&i, _)| i).collect();
        for &index in &hit {
            self.discard(index, recycling, template);
        }
        hit.len()
    }

    fn destroy(&mut self, id: ContainerId, template: &mut dyn ItemTemplate) {
        if let Some(entry) = self.arena.remove(id) {
            tracing::trace!(target: targets::GENERATOR, item = ?entry.item, "destroying container");
            template.destroy(entry.container);
        }
    }

    /// Move every realized index `>= from` by `delta`.
    ///
    /// Indices shifted below `from` by a negative delta must have been
    /// discarded beforehand.
    pub fn shift(&mut self, from: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let moved = self.realized.split_off(&from);
        for (index, id) in moved {
            match index.checked_add_signed(delta) {
                Some(new_index) => {
                    self.realized.insert(new_index, id);
                }
                None => {
                    tracing::warn!(target: targets::GENERATOR, index, delta, "container shifted out of range");
                    self.realized.insert(index, id);
                }
            }
        }
    }

    /// Virtualize every realized container.
    pub fn clear_realized(&mut self, recycling: bool, template: &mut dyn ItemTemplate) {
        let indices: Vec<usize> = self.realized.keys().copied().collect();
        for index in indices {
            self.discard(index, recycling, template);
        }
    }

    /// Destroy every pooled container.
    pub fn drain_pool(&mut self, template: &mut dyn ItemTemplate) {
        for id in self.pool.drain() {
            self.destroy(id, template);
        }
    }

    /// Destroy every container, realized or pooled.
    pub fn clear_all(&mut self, template: &mut dyn ItemTemplate) {
        self.clear_realized(false, template);
        self.drain_pool(template);
    }

    /// Change the per-kind pool capacity, destroying the overflow.
    pub fn set_pool_capacity(&mut self, capacity: usize, template: &mut dyn ItemTemplate) {
        for id in self.pool.set_capacity(capacity) {
            self.destroy(id, template);
        }
    }

    /// Arrange the container at `index`. `layout` is kept for introspection
    /// and `visual` is handed to the container.
    pub fn arrange(&mut self, index: usize, layout: Rect, visual: Rect) {
        let Some(id) = self.realized.get(&index).copied() else {
            return;
        };
        if let Some(entry) = self.arena.get_mut(id) {
            entry.rect = layout;
            entry.container.arrange(visual);
        }
    }
}

impl std::fmt::Debug for ContainerGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerGenerator")
            .field("realized", &self.realized.len())
            .field("pooled", &self.pool.len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Counters shared between a mock template and its containers.
    #[derive(Debug, Default)]
    pub(crate) struct Stats {
        pub built: usize,
        pub bound: usize,
        pub recycled: usize,
        pub destroyed: usize,
        pub measured: usize,
    }

    pub(crate) struct MockContainer {
        stats: Arc<Mutex<Stats>>,
        size: Size,
    }

    impl Container for MockContainer {
        fn measure(&mut self, _available: Size) -> Size {
            self.stats.lock().measured += 1;
            self.size
        }

        fn arrange(&mut self, _rect: Rect) {}

        fn bind(&mut self, _item: ItemKey, _index: usize) {
            self.stats.lock().bound += 1;
        }
    }

    pub(crate) struct MockTemplate {
        pub stats: Arc<Mutex<Stats>>,
        pub size: Size,
    }

    impl MockTemplate {
        pub fn new(size: Size) -> Self {
            Self {
                stats: Arc::new(Mutex::new(Stats::default())),
                size,
            }
        }
    }

    impl ItemTemplate for MockTemplate {
        fn build(&mut self, _item: ItemKey) -> Result<Box<dyn Container>, TemplateError> {
            self.stats.lock().built += 1;
            Ok(Box::new(MockContainer {
                stats: self.stats.clone(),
                size: self.size,
            }))
        }

        fn recycle(&mut self, _container: &mut dyn Container) {
            self.stats.lock().recycled += 1;
        }

        fn destroy(&mut self, _container: Box<dyn Container>) {
            self.stats.lock().destroyed += 1;
        }
    }

    fn key(i: usize) -> ItemKey {
        ItemKey::new(i as u64 + 100)
    }

    fn realize_range(generator: &mut ContainerGenerator, template: &mut MockTemplate, range: ItemRange) {
        for i in range.iter() {
            generator.realize(i, key(i), template, Size::new(10.0, 10.0)).unwrap();
        }
    }

    #[test]
    fn test_realize_builds_once() {
        let mut generator = ContainerGenerator::new(8);
        let mut template = MockTemplate::new(Size::new(10.0, 10.0));

        realize_range(&mut generator, &mut template, ItemRange::new(0, 4));
        realize_range(&mut generator, &mut template, ItemRange::new(0, 4));

        let stats = template.stats.lock();
        assert_eq!(stats.built, 5);
        assert_eq!(stats.measured, 5);
        assert_eq!(generator.realized_count(), 5);
    }

    #[test]
    fn test_recycling_reuses_containers() {
        let mut generator = ContainerGenerator::new(8);
        let mut template = MockTemplate::new(Size::new(10.0, 10.0));

        realize_range(&mut generator, &mut template, ItemRange::new(0, 4));
        assert_eq!(generator.virtualize_outside(ItemRange::new(5, 9), true, &mut template), 5);
        assert_eq!(generator.pooled_count(), 5);

        let how = generator.realize(5, key(5), &mut template, Size::new(10.0, 10.0)).unwrap();
        assert_eq!(how, Realization::Recycled);
        realize_range(&mut generator, &mut template, ItemRange::new(6, 9));

        let stats = template.stats.lock();
        assert_eq!(stats.built, 5);
        assert_eq!(stats.recycled, 5);
        assert_eq!(stats.bound, 10);
        assert_eq!(generator.pooled_count(), 0);
    }

    #[test]
    fn test_recycled_container_is_measured_for_its_new_item() {
        let mut generator = ContainerGenerator::new(8);
        let mut template = MockTemplate::new(Size::new(10.0, 10.0));

        realize_range(&mut generator, &mut template, ItemRange::new(0, 4));
        generator.virtualize_outside(ItemRange::new(5, 9), true, &mut template);
        realize_range(&mut generator, &mut template, ItemRange::new(5, 9));

        let stats = template.stats.lock();
        assert_eq!(stats.built, 5);
        assert_eq!(stats.bound, 10);
        assert_eq!(stats.measured, 10);
    }

    #[test]
    fn test_discard_block_touches_only_realized_indices() {
        let mut generator = ContainerGenerator::new(8);
        let mut template = MockTemplate::new(Size::new(10.0, 10.0));

        realize_range(&mut generator, &mut template, ItemRange::new(10, 14));
        assert_eq!(generator.discard_block(0, 12, false, &mut template), 2);
        assert_eq!(generator.realized_indices().collect::<Vec<_>>(), vec![12, 13, 14]);

        assert_eq!(generator.discard_block(13, usize::MAX, true, &mut template), 2);
        assert_eq!(generator.realized_indices().collect::<Vec<_>>(), vec![12]);
        assert_eq!(generator.pooled_count(), 2);
        assert_eq!(template.stats.lock().destroyed, 2);
    }

    #[test]
    fn test_virtualize_without_recycling_destroys() {
        let mut generator = ContainerGenerator::new(8);
        let mut template = MockTemplate::new(Size::new(10.0, 10.0));

        realize_range(&mut generator, &mut template, ItemRange::new(0, 4));
        generator.virtualize_outside(ItemRange::new(3, 4), false, &mut template);

        assert_eq!(template.stats.lock().destroyed, 3);
        assert_eq!(generator.pooled_count(), 0);
        assert_eq!(generator.realized_indices().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_pool_capacity_evicts() {
        let mut generator = ContainerGenerator::new(2);
        let mut template = MockTemplate::new(Size::new(10.0, 10.0));

        realize_range(&mut generator, &mut template, ItemRange::new(0, 4));
        generator.virtualize_outside(ItemRange::EMPTY, true, &mut template);
        assert_eq!(generator.pooled_count(), 2);
        assert_eq!(template.stats.lock().destroyed, 3);

        generator.set_pool_capacity(1, &mut template);
        assert_eq!(generator.pooled_count(), 1);
        assert_eq!(template.stats.lock().destroyed, 4);
    }

    #[test]
    fn test_stale_binding_is_rebound() {
        let mut generator = ContainerGenerator::new(8);
        let mut template = MockTemplate::new(Size::new(10.0, 10.0));

        generator.realize(0, key(0), &mut template, Size::new(10.0, 10.0)).unwrap();
        let how = generator.realize(0, key(42), &mut template, Size::new(10.0, 10.0)).unwrap();
        assert_eq!(how, Realization::Rebound);
        assert_eq!(generator.item_at(0), Some(key(42)));
        assert_eq!(template.stats.lock().built, 1);
    }

    #[test]
    fn test_constraint_change_remeasures() {
        let mut generator = ContainerGenerator::new(8);
        let mut template = MockTemplate::new(Size::new(10.0, 10.0));

        generator.realize(0, key(0), &mut template, Size::new(10.0, 10.0)).unwrap();
        generator.realize(0, key(0), &mut template, Size::new(20.0, 10.0)).unwrap();
        assert_eq!(template.stats.lock().measured, 2);
        assert_eq!(generator.desired_at(0), Some(Size::new(10.0, 10.0)));
    }

    #[test]
    fn test_shift_moves_indices() {
        let mut generator = ContainerGenerator::new(8);
        let mut template = MockTemplate::new(Size::new(10.0, 10.0));

        realize_range(&mut generator, &mut template, ItemRange::new(0, 4));
        generator.shift(2, 3);
        assert_eq!(generator.realized_indices().collect::<Vec<_>>(), vec![0, 1, 5, 6, 7]);
        assert_eq!(generator.item_at(5), Some(key(2)));

        generator.discard(5, true, &mut template);
        generator.shift(6, -1);
        assert_eq!(generator.realized_indices().collect::<Vec<_>>(), vec![0, 1, 5, 6]);
        assert_eq!(generator.item_at(5), Some(key(3)));
    }

    #[test]
    fn test_clear_all_destroys_everything() {
        let mut generator = ContainerGenerator::new(8);
        let mut template = MockTemplate::new(Size::new(10.0, 10.0));

        realize_range(&mut generator, &mut template, ItemRange::new(0, 5));
        generator.virtualize_outside(ItemRange::new(0, 2), true, &mut template);
        generator.clear_all(&mut template);

        assert_eq!(generator.realized_count(), 0);
        assert_eq!(generator.pooled_count(), 0);
        assert_eq!(template.stats.lock().destroyed, 6);
    }
}
