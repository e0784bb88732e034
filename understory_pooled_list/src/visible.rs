// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ordered set of rows currently mapped to handles.

use alloc::vec::Vec;

use crate::ItemId;
use crate::item::ItemHandle;

/// Visible `(row, handle)` entries in strictly ascending row order.
///
/// Rows are only ever appended in ascending order within one pass, so the
/// sequence is sorted by construction and lookups are binary searches.
#[derive(Debug)]
pub(crate) struct VisibleRows<W> {
    entries: Vec<Entry<W>>,
}

#[derive(Debug)]
struct Entry<W> {
    row: ItemId,
    // `None` once the handle has been taken during reconciliation.
    handle: Option<ItemHandle<W>>,
    fresh: bool,
}

impl<W> Default for VisibleRows<W> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<W> VisibleRows<W> {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Appends `row`, which must be greater than every row already present.
    ///
    /// `fresh` marks rows that were not visible before this pass.
    pub(crate) fn push(&mut self, row: ItemId, handle: ItemHandle<W>, fresh: bool) {
        debug_assert!(
            self.entries.last().is_none_or(|last| last.row < row),
            "visible rows must be appended in ascending order (got {row} after {:?})",
            self.entries.last().map(|last| last.row)
        );
        self.entries.push(Entry {
            row,
            handle: Some(handle),
            fresh,
        });
    }

    fn search(&self, row: ItemId) -> Option<usize> {
        self.entries.binary_search_by_key(&row, |e| e.row).ok()
    }

    pub(crate) fn contains(&self, row: ItemId) -> bool {
        self.get(row).is_some()
    }

    pub(crate) fn get(&self, row: ItemId) -> Option<&ItemHandle<W>> {
        self.search(row)
            .and_then(|index| self.entries[index].handle.as_ref())
    }

    pub(crate) fn get_mut(&mut self, row: ItemId) -> Option<&mut ItemHandle<W>> {
        let index = self.search(row)?;
        self.entries[index].handle.as_mut()
    }

    /// Removes the handle for `row`, leaving a tombstone so the order holds.
    pub(crate) fn take(&mut self, row: ItemId) -> Option<ItemHandle<W>> {
        let index = self.search(row)?;
        self.entries[index].handle.take()
    }

    /// Moves every remaining handle out, emptying the set.
    pub(crate) fn drain_handles(&mut self) -> impl Iterator<Item = ItemHandle<W>> + '_ {
        self.entries.drain(..).filter_map(|e| e.handle)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (ItemId, &ItemHandle<W>)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.handle.as_ref().map(|h| (e.row, h)))
    }

    /// Rows paired with whether they became visible in the latest pass.
    pub(crate) fn iter_mut_with_fresh(
        &mut self,
    ) -> impl Iterator<Item = (ItemId, &mut ItemHandle<W>, bool)> + '_ {
        self.entries
            .iter_mut()
            .filter_map(|e| e.handle.as_mut().map(|h| (e.row, h, e.fresh)))
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.entries.iter().map(|e| e.row)
    }

    pub(crate) fn first_row(&self) -> Option<ItemId> {
        self.entries.first().map(|e| e.row)
    }

    pub(crate) fn last_row(&self) -> Option<ItemId> {
        self.entries.last().map(|e| e.row)
    }

    /// Row whose frame contains the content-space `y`, if visible.
    pub(crate) fn row_at(&self, y: f64) -> Option<ItemId> {
        let index = self.entries.partition_point(|e| {
            e.handle.as_ref().is_some_and(|h| h.frame().y1 <= y)
        });
        let entry = self.entries.get(index)?;
        let frame = entry.handle.as_ref()?.frame();
        (frame.y0 <= y && y < frame.y1).then_some(entry.row)
    }

    /// Returns `true` when rows are strictly ascending.
    pub(crate) fn is_strictly_ascending(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].row < w[1].row)
    }
}
