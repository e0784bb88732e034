// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible window computation.
//!
//! Given a scroll offset, a viewport height, and a [`HeightLedger`], work out
//! which rows intersect the viewport, where the first of them starts, and how
//! tall each one is.
//!
//! Two strategies are used:
//!
//! - **Uniform**: no explicit heights are recorded, so every row is
//!   `template + separator` tall and the window is a closed-form computation.
//! - **Mixed**: at least one explicit height exists, so rows are accumulated
//!   from index 0 until the bottom edge of the viewport is passed. The scan
//!   stops at the viewport, so its cost is proportional to the rows above and
//!   inside the window, not to the list length.

use core::ops::Range;

use smallvec::SmallVec;

use crate::ItemId;
use crate::ledger::HeightLedger;

/// Inline capacity for per-row heights; enough for most viewports.
const INLINE_ROWS: usize = 32;

/// Input to [`compute_visible_window`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowQuery {
    /// Scroll offset from the top of the content.
    pub offset: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
    /// Number of rows in the list.
    pub len: usize,
    /// Gap between consecutive rows.
    pub separator: f64,
}

/// The rows intersecting a viewport.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleWindow {
    /// Index of the first visible row.
    pub first_row: ItemId,
    /// Content offset of the top edge of `first_row`.
    pub offset_y: f64,
    /// Height of each visible row, in row order starting at `first_row`.
    pub heights: SmallVec<[f64; INLINE_ROWS]>,
}

impl VisibleWindow {
    /// Number of visible rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns `true` if no rows are visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Range of visible row indices.
    #[must_use]
    pub fn rows(&self) -> Range<ItemId> {
        self.first_row..self.first_row + self.heights.len()
    }

    /// Content offset just past the last visible row, including its gap.
    #[must_use]
    pub fn end_offset(&self, separator: f64) -> f64 {
        self.heights
            .iter()
            .fold(self.offset_y, |y, h| y + h + separator)
    }
}

/// Computes the visible window, or `None` when nothing can be shown yet.
///
/// `None` means the viewport has no usable size while rows exist (or the rows
/// have no usable height). Callers should skip layout entirely in that case and
/// keep whatever is currently displayed until the next trigger.
///
/// An empty list always yields an empty window.
#[must_use]
pub fn compute_visible_window(query: &WindowQuery, ledger: &HeightLedger) -> Option<VisibleWindow> {
    if query.len == 0 {
        return Some(VisibleWindow::default());
    }
    if query.viewport_height.is_nan() || query.viewport_height <= 0.0 {
        log::debug!(
            "visible window skipped: viewport height {} is not positive",
            query.viewport_height
        );
        return None;
    }

    let window = if ledger.has_explicit_heights() {
        mixed_window(query, ledger)
    } else {
        uniform_window(query, ledger.template_height())?
    };

    if window.is_empty() {
        log::debug!(
            "visible window skipped: no rows intersect offset {} of {} rows",
            query.offset,
            query.len
        );
        return None;
    }
    Some(window)
}

fn uniform_window(query: &WindowQuery, template: f64) -> Option<VisibleWindow> {
    let padded = template + query.separator;
    if padded.is_nan() || padded <= 0.0 {
        log::warn!(
            "uniform rows have no height (template {template}, separator {}); nothing to lay out",
            query.separator
        );
        return None;
    }

    let last_index = query.len - 1;
    let offset = query.offset.max(0.0);

    let mut first_row = floor_to_index(offset / padded);
    let mut offset_y = first_row as f64 * padded;
    let last_row = ceil_to_index((offset_y + query.viewport_height) / padded).min(last_index);

    if first_row > last_index {
        first_row = last_index;
        offset_y = first_row as f64 * padded;
    }
    if first_row == 0 {
        offset_y = 0.0;
    }

    let count = last_row.saturating_sub(first_row) + 1;
    let mut heights = SmallVec::with_capacity(count);
    heights.resize(count, template);
    Some(VisibleWindow {
        first_row,
        offset_y,
        heights,
    })
}

fn mixed_window(query: &WindowQuery, ledger: &HeightLedger) -> VisibleWindow {
    let bottom = query.offset + query.viewport_height;
    let mut window = VisibleWindow::default();
    let mut row_offset = 0.0;
    let mut found = false;

    for row in 0..query.len {
        let height = ledger.get(row, query.len);

        // Rows ending (gap included) above the offset are skipped; the row
        // straddling the offset starts the window.
        if row_offset > query.offset - height - query.separator && row_offset <= query.offset {
            window.first_row = row;
            window.offset_y = row_offset;
            found = true;
        }
        if row_offset >= bottom {
            break;
        }

        row_offset += height + query.separator;
        if found {
            window.heights.push(height);
        }
    }
    window
}

/// Floors a non-negative value to an index, saturating on overflow.
fn floor_to_index(value: f64) -> usize {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float-to-int casts saturate; the value is non-negative and clamped afterwards"
    )]
    {
        value.max(0.0) as usize
    }
}

/// Ceils a non-negative value to an index, saturating on overflow.
fn ceil_to_index(value: f64) -> usize {
    let floor = floor_to_index(value);
    if (floor as f64) < value {
        floor.saturating_add(1)
    } else {
        floor
    }
}
