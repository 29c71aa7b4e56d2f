//! Translation between item indices, visual child slots and generator
//! positions.
//!
//! Visual children are the realized item containers in item order with one
//! extra slot, the expansion container, inserted right after the container
//! of the insertion boundary item. The generator knows nothing about that
//! extra slot, so every child index past it is one larger than the
//! generator's own position. All translation goes through [`IndexMap`].

/// A position relative to the generator's realized items.
///
/// `index` names a realized item by its rank among realized items, `offset`
/// counts items forward from it. `index == -1` anchors before the first
/// item of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorPosition {
    /// Rank of the anchor among realized items, or `-1`.
    pub index: isize,
    /// Distance in items from the anchor.
    pub offset: isize,
}

impl GeneratorPosition {
    /// Create a generator position.
    pub const fn new(index: isize, offset: isize) -> Self {
        Self { index, offset }
    }
}

/// What occupies a visual child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRef {
    /// The container of the item at this index.
    Item(usize),
    /// The expansion container.
    Expansion,
}

/// Snapshot of the child layout of one pass.
#[derive(Debug, Clone)]
pub struct IndexMap {
    realized: Vec<usize>,
    boundary: Option<usize>,
}

impl IndexMap {
    /// Build a map over ascending `realized` indices, with an expansion slot
    /// after `boundary` when it is `Some`.
    pub fn new(realized: Vec<usize>, boundary: Option<usize>) -> Self {
        debug_assert!(realized.windows(2).all(|w| w[0] < w[1]));
        Self { realized, boundary }
    }

    /// Total number of visual children.
    pub fn child_count(&self) -> usize {
        self.realized.len() + usize::from(self.boundary.is_some())
    }

    /// Child slot of the expansion container.
    pub fn expansion_slot(&self) -> Option<usize> {
        let boundary = self.boundary?;
        Some(self.realized.partition_point(|&i| i <= boundary))
    }

    /// Child slot of the container realized for `item_index`.
    pub fn child_index_for_item_index(&self, item_index: usize) -> Option<usize> {
        let rank = self.realized.binary_search(&item_index).ok()?;
        match self.boundary {
            Some(boundary) if item_index > boundary => Some(rank + 1),
            _ => Some(rank),
        }
    }

    /// What occupies `child_index`.
    pub fn item_index_for_child_index(&self, child_index: usize) -> Option<ChildRef> {
        match self.expansion_slot() {
            Some(slot) if child_index == slot => Some(ChildRef::Expansion),
            Some(slot) if child_index > slot => {
                self.realized.get(child_index - 1).copied().map(ChildRef::Item)
            }
            _ => self.realized.get(child_index).copied().map(ChildRef::Item),
        }
    }

    /// Generator position of the child at `child_index`.
    ///
    /// Children past the expansion slot are one ahead of the generator.
    pub fn generator_position_for_child_index(&self, child_index: usize) -> GeneratorPosition {
        let index = match self.expansion_slot() {
            Some(slot) if child_index > slot => child_index - 1,
            _ => child_index,
        };
        GeneratorPosition::new(index as isize, 0)
    }

    /// Generator position of `item_index`, anchored at the closest realized
    /// item at or before it.
    pub fn generator_position_from_index(&self, item_index: usize) -> GeneratorPosition {
        let rank = self.realized.partition_point(|&i| i <= item_index);
        if rank == 0 {
            return GeneratorPosition::new(-1, item_index as isize + 1);
        }
        let anchor = self.realized[rank - 1];
        GeneratorPosition::new((rank - 1) as isize, (item_index - anchor) as isize)
    }

    /// Item index a generator position refers to.
    pub fn index_from_generator_position(&self, position: GeneratorPosition) -> Option<usize> {
        if position.index == -1 {
            return usize::try_from(position.offset - 1).ok();
        }
        let anchor = *self.realized.get(usize::try_from(position.index).ok()?)?;
        anchor.checked_add_signed(position.offset)
    }
}
