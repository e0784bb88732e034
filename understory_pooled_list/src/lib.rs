// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pooled_list --heading-base-level=0

//! Understory Pooled List: a virtualized list that recycles rendered items.
//!
//! This crate maps a logical list of `N` variable-height rows onto a small,
//! reused pool of host-rendered nodes. It tracks which rows intersect the
//! viewport for the current scroll offset and keeps the visible window, the
//! scroll offset, and the pooled nodes consistent as the data or the viewport
//! changes. It was built for chat transcripts, which grow at the end while
//! the reader is usually pinned to the bottom, but nothing in it knows about
//! chat.
//!
//! The pieces, bottom-up:
//!
//! - [`ItemPool`]: an unordered bag of released nodes.
//! - [`HeightLedger`]: sparse per-row heights with a template fallback.
//! - [`compute_visible_window`]: which rows a viewport shows, in closed form
//!   when all rows share the template height and by accumulation otherwise.
//! - [`ScrollState`]: offset, viewport, clamping, and bottom anchoring.
//! - [`WidgetList`]: the controller that runs reconciliation passes over host
//!   nodes implementing [`ListItem`], and routes taps to rows.
//! - [`WindowedScroller`]: a coarser batch-windowing alternative for hosts
//!   that can only offer a plain scroll container.
//!
//! The crate does not draw anything. After each pass the host reads
//! [`WidgetList::visible_items`] and [`WidgetList::separators`] and positions
//! its nodes and divider lines accordingly.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::Size;
//! use understory_pooled_list::{ListItem, WidgetList};
//!
//! #[derive(Default)]
//! struct Bubble {
//!     text: String,
//! }
//!
//! impl ListItem for Bubble {
//!     fn min_size(&self) -> Size {
//!         Size::new(80.0, 20.0)
//!     }
//! }
//!
//! let messages: Vec<String> = (0..1000).map(|i| format!("message {i}")).collect();
//! let messages = Rc::new(RefCell::new(messages));
//! let mut list = WidgetList::with_data(
//!     Rc::clone(&messages),
//!     Bubble::default,
//!     |message: &String, bubble: &mut Bubble| bubble.text.clone_from(message),
//! );
//!
//! // Nothing is laid out until the list knows its viewport.
//! list.resize(Size::new(300.0, 200.0));
//! assert!(list.live_item_count() < 20);
//!
//! list.scroll_to_index(500);
//! assert!(list.is_visible(500));
//! let (_, bubble) = list.visible_items().find(|(row, _)| *row == 500).unwrap();
//! assert_eq!(bubble.node().text, "message 500");
//! ```
//!
//! Row heights default to the minimum height of a freshly created node. Hosts
//! that measure wrapped text feed the real height back with
//! [`WidgetList::set_item_height`]; from then on the window is computed by
//! accumulating heights from the top.
//!
//! This crate is `no_std` and uses `alloc`. Diagnostics go through the `log`
//! facade.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod item;
mod ledger;
mod list;
mod pool;
mod reconcile;
mod scroll;
mod visible;
mod window;
mod windowed;

/// Index of a logical row, `0..len`.
pub type ItemId = usize;

pub use config::{
    DEFAULT_BOTTOM_ANCHOR_EPSILON, DEFAULT_DIVIDER_THICKNESS, DEFAULT_SEPARATOR_THICKNESS,
    ListConfig,
};
pub use error::ConfigError;
pub use item::{ItemHandle, ListItem, RowTapCallback, TapEvent};
pub use ledger::HeightLedger;
pub use list::WidgetList;
pub use pool::ItemPool;
pub use reconcile::{PassMode, PassReport};
pub use scroll::ScrollState;
pub use window::{VisibleWindow, WindowQuery, compute_visible_window};
pub use windowed::{
    BatchShift, SHIFT_BACKWARD_FRACTION, SHIFT_FORWARD_FRACTION, ScrollTarget, ShiftDirection,
    WindowedConfig, WindowedScroller,
};
