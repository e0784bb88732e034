// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse per-row height overrides with a shared template fallback.

use hashbrown::HashMap;

use crate::ItemId;

/// Height bookkeeping for a list whose rows mostly share one height.
///
/// Rows without an explicit entry use the *template height*: the minimum
/// height of a freshly created, never displayed item. Explicit entries win
/// over the template while their index is in bounds. Entries for indices at or
/// past the current length are ignored, not purged, so a list that shrinks
/// and grows again picks its old measurements back up.
///
/// All heights exclude the separator gap between rows.
#[derive(Clone, Debug, Default)]
pub struct HeightLedger {
    heights: HashMap<ItemId, f64>,
    template: Option<f64>,
}

impl HeightLedger {
    /// Creates an empty ledger with no template height yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `height` for `index`.
    ///
    /// Returns `true` when the stored value changed, meaning the row needs to
    /// be laid out again.
    pub fn set(&mut self, index: ItemId, height: f64) -> bool {
        match self.heights.insert(index, height) {
            Some(previous) => previous != height,
            None => true,
        }
    }

    /// Forgets the explicit height of `index`, returning it if present.
    pub fn remove(&mut self, index: ItemId) -> Option<f64> {
        self.heights.remove(&index)
    }

    /// Forgets every explicit height.
    pub fn clear(&mut self) {
        self.heights.clear();
    }

    /// Height of `index` in a list of `len` rows.
    #[must_use]
    pub fn get(&self, index: ItemId, len: usize) -> f64 {
        if index < len
            && let Some(&height) = self.heights.get(&index)
        {
            return height;
        }
        self.template_height()
    }

    /// Returns the explicit height recorded for `index`, ignoring bounds.
    #[must_use]
    pub fn explicit(&self, index: ItemId) -> Option<f64> {
        self.heights.get(&index).copied()
    }

    /// Returns `true` when any explicit height is recorded.
    ///
    /// This selects between the closed-form and the accumulating window
    /// computations, and deliberately includes out-of-bounds entries.
    #[must_use]
    pub fn has_explicit_heights(&self) -> bool {
        !self.heights.is_empty()
    }

    /// Number of explicit entries, in bounds or not.
    #[must_use]
    pub fn explicit_len(&self) -> usize {
        self.heights.len()
    }

    /// The cached template height, or `0.0` before one was measured.
    #[must_use]
    pub fn template_height(&self) -> f64 {
        self.template.unwrap_or(0.0)
    }

    /// Returns `true` once a template height has been measured.
    #[must_use]
    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// Stores a freshly measured template height.
    pub fn set_template_height(&mut self, height: f64) {
        self.template = Some(height);
    }

    /// Drops the cached template height so it is measured again.
    pub fn invalidate_template(&mut self) {
        self.template = None;
    }

    /// Total content height of `len` rows separated by `separator`.
    #[must_use]
    pub fn content_height(&self, len: usize, separator: f64) -> f64 {
        if len == 0 {
            return 0.0;
        }
        let template = self.template_height();
        let gaps = separator * (len - 1) as f64;
        if self.heights.is_empty() {
            return template * len as f64 + gaps;
        }

        let mut custom = 0_usize;
        let mut height = 0.0;
        for (&index, &h) in &self.heights {
            if index < len {
                custom += 1;
                height += h;
            }
        }
        height + template * (len - custom) as f64 + gaps
    }

    /// Content offset of the top edge of `index`.
    ///
    /// Uses a closed form when no explicit heights exist, otherwise the same
    /// front-to-back accumulation the window scan performs.
    #[must_use]
    pub fn offset_of(&self, index: ItemId, len: usize, separator: f64) -> f64 {
        if self.heights.is_empty() {
            return (self.template_height() + separator) * index as f64;
        }
        (0..index)
            .map(|row| self.get(row, len) + separator)
            .sum()
    }
}
