// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycling pool for rendered items.

use alloc::vec::Vec;

/// An unordered bag of released items waiting to be reused.
///
/// [`ItemPool::acquire`] hands back *some* previously released item; which one
/// is unspecified and callers must not rely on FIFO or LIFO behavior. Any bag
/// implementation is a valid substitute.
///
/// The pool also counts how many items were ever created through
/// [`ItemPool::acquire_or_create`] and how many were thrown away by
/// [`ItemPool::drain`]. Together with the number of items a caller currently
/// holds, these counters make leak checks cheap:
/// `created() - discarded() == len() + held_by_caller`.
#[derive(Clone, Debug)]
pub struct ItemPool<T> {
    free: Vec<T>,
    created: usize,
    discarded: usize,
}

impl<T> Default for ItemPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemPool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            free: Vec::new(),
            created: 0,
            discarded: 0,
        }
    }

    /// Removes an arbitrary released item from the pool.
    pub fn acquire(&mut self) -> Option<T> {
        self.free.pop()
    }

    /// Reuses a released item if one exists, otherwise constructs one.
    ///
    /// `create` may decline to construct (return `None`), for example when the
    /// caller has no factory configured.
    pub fn acquire_or_create(&mut self, create: impl FnOnce() -> Option<T>) -> Option<T> {
        if let Some(item) = self.free.pop() {
            return Some(item);
        }
        let item = create()?;
        self.created += 1;
        Some(item)
    }

    /// Returns an item to the pool for future reuse.
    pub fn release(&mut self, item: T) {
        self.free.push(item);
    }

    /// Discards every pooled item, returning how many were dropped.
    pub fn drain(&mut self) -> usize {
        let count = self.free.len();
        self.free.clear();
        self.discarded += count;
        count
    }

    /// Number of items currently waiting in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Returns `true` if no released items are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Total number of items constructed through this pool.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }

    /// Total number of items dropped by [`ItemPool::drain`].
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Items constructed and not yet discarded, wherever they currently live.
    #[must_use]
    pub fn live(&self) -> usize {
        self.created - self.discarded
    }
}
