// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll offset bookkeeping and clamping.
//!
//! [`ScrollState`] holds the scroll offset and the viewport size. Content
//! height is never stored here: it depends on the list length and the height
//! ledger, so callers pass it in on every query and a stale value can never
//! leak into a later pass.
//!
//! Bottom anchoring follows the usual chat-log pattern:
//!
//! 1. Ask [`ScrollState::is_at_bottom`] before mutating the data.
//! 2. Append rows or change heights.
//! 3. If the list was anchored, move to [`ScrollState::max_offset`] again.
//!
//! ```rust
//! use kurbo::Size;
//! use understory_pooled_list::ScrollState;
//!
//! let mut scroll = ScrollState::new(Size::new(100.0, 30.0));
//! // 100 units of content, 30 visible.
//! scroll.set_offset(scroll.max_offset(100.0));
//! assert!(scroll.is_at_bottom(100.0, 1.0));
//!
//! // Content grows; the old offset is no longer at the bottom.
//! assert!(!scroll.is_at_bottom(120.0, 1.0));
//! scroll.set_offset(scroll.max_offset(120.0));
//! assert_eq!(scroll.offset(), 90.0);
//! ```

use kurbo::Size;

/// Scroll offset plus viewport size of a vertical list.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    offset: f64,
    viewport: Size,
}

impl ScrollState {
    /// Creates a state scrolled to the top of a viewport of `viewport` size.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            offset: 0.0,
            viewport,
        }
    }

    /// Current offset from the top of the content.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Current viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Height of the viewport.
    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport.height
    }

    /// Stores a new viewport size. Returns `true` if it changed.
    pub fn set_viewport(&mut self, viewport: Size) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        true
    }

    /// Stores a new offset as-is. Returns `true` if it changed.
    pub fn set_offset(&mut self, offset: f64) -> bool {
        if self.offset == offset {
            return false;
        }
        self.offset = offset;
        true
    }

    /// Returns `true` when `content_height` fits inside the viewport.
    #[must_use]
    pub fn content_fits(&self, content_height: f64) -> bool {
        content_height <= self.viewport.height
    }

    /// Largest offset that still shows content at the bottom edge.
    ///
    /// `0` when the content fits entirely inside the viewport.
    #[must_use]
    pub fn max_offset(&self, content_height: f64) -> f64 {
        (content_height - self.viewport.height.max(0.0)).max(0.0)
    }

    /// Clamps `offset` into `[0, max_offset]`.
    #[must_use]
    pub fn clamp(&self, offset: f64, content_height: f64) -> f64 {
        offset.clamp(0.0, self.max_offset(content_height))
    }

    /// Pulls the current offset back inside the content after it shrank.
    ///
    /// Returns `true` if the offset moved.
    pub fn clamp_to_content(&mut self, content_height: f64) -> bool {
        let clamped = self.clamp(self.offset, content_height);
        self.set_offset(clamped)
    }

    /// Offset a host-requested jump should land on, or `None` to ignore it.
    ///
    /// Jumps are ignored while the content fits in the viewport, otherwise
    /// `y` is clamped to the scrollable range.
    #[must_use]
    pub fn bounded_offset(&self, y: f64, content_height: f64) -> Option<f64> {
        if self.content_fits(content_height) {
            return None;
        }
        Some(self.clamp(y, content_height))
    }

    /// Offset that brings the row spanning `top..top + height` into view.
    ///
    /// A row above the viewport is aligned to the top edge, a row extending
    /// below it is aligned to the bottom edge, and a fully visible row leaves
    /// the offset unchanged. The result is not clamped.
    #[must_use]
    pub fn reveal_offset(&self, top: f64, height: f64) -> f64 {
        if top < self.offset {
            top
        } else if top + height > self.offset + self.viewport.height {
            top + height - self.viewport.height
        } else {
            self.offset
        }
    }

    /// Returns `true` if the offset is within `epsilon` above the bottom.
    ///
    /// Content that fits entirely is always at the bottom.
    #[must_use]
    pub fn is_at_bottom(&self, content_height: f64, epsilon: f64) -> bool {
        self.offset.max(0.0) + epsilon >= self.max_offset(content_height)
    }
}
