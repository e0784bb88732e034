// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendered item handles and tap routing.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use kurbo::{Point, Rect, Size};

use crate::ItemId;

/// A host-owned visual node that can render one list row at a time.
///
/// The list never inspects the node beyond these two hooks; content is filled
/// in by the caller's update callback.
pub trait ListItem {
    /// Smallest size the node can be laid out at.
    ///
    /// Measured once on a fresh template node to obtain the default row height.
    fn min_size(&self) -> Size;

    /// Re-applies host styling (theme, fonts) to a freshly constructed node.
    fn refresh(&mut self) {}
}

/// A pointer tap delivered to a list row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapEvent {
    /// Position relative to the tapped row's frame.
    pub position: Point,
    /// Position in list content coordinates.
    pub absolute_position: Point,
}

impl TapEvent {
    /// Builds an event from a content-space point and the frame it hit.
    #[must_use]
    pub fn in_frame(absolute_position: Point, frame: Rect) -> Self {
        Self {
            position: Point::new(
                absolute_position.x - frame.x0,
                absolute_position.y - frame.y0,
            ),
            absolute_position,
        }
    }
}

/// Host callback receiving the tapped row and the event.
pub type RowTapCallback = Rc<dyn Fn(ItemId, &TapEvent)>;

type TapSlot = Box<dyn Fn(&TapEvent)>;

/// Late-bound row tap handlers shared by every handle of one list.
///
/// Slots capture the row at rewire time and look the handler up at tap time,
/// so replacing a handler affects already-visible rows immediately.
#[derive(Default)]
pub(crate) struct TapRouter {
    primary: RefCell<Option<RowTapCallback>>,
    secondary: RefCell<Option<RowTapCallback>>,
}

impl TapRouter {
    pub(crate) fn set_primary(&self, callback: Option<RowTapCallback>) {
        *self.primary.borrow_mut() = callback;
    }

    pub(crate) fn set_secondary(&self, callback: Option<RowTapCallback>) {
        *self.secondary.borrow_mut() = callback;
    }

    fn primary(&self, row: ItemId, event: &TapEvent) {
        // Clone out so the handler may replace itself.
        let callback = self.primary.borrow().clone();
        if let Some(callback) = callback {
            callback(row, event);
        }
    }

    fn secondary(&self, row: ItemId, event: &TapEvent) {
        let callback = self.secondary.borrow().clone();
        if let Some(callback) = callback {
            callback(row, event);
        }
    }
}

impl fmt::Debug for TapRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapRouter")
            .field("primary", &self.primary.borrow().is_some())
            .field("secondary", &self.secondary.borrow().is_some())
            .finish()
    }
}

/// A pooled node plus the state the list keeps about it.
///
/// While visible, a handle is bound to one row, has a frame in list content
/// coordinates, and its two tap slots forward to the list's row handlers with
/// that row. While pooled it is unbound and both slots are empty.
pub struct ItemHandle<W> {
    node: W,
    frame: Rect,
    bound: Option<ItemId>,
    on_tapped: Option<TapSlot>,
    on_secondary_tapped: Option<TapSlot>,
}

impl<W> ItemHandle<W> {
    pub(crate) fn new(node: W) -> Self {
        Self {
            node,
            frame: Rect::ZERO,
            bound: None,
            on_tapped: None,
            on_secondary_tapped: None,
        }
    }

    /// The host node.
    #[must_use]
    pub fn node(&self) -> &W {
        &self.node
    }

    /// Mutable access to the host node.
    pub fn node_mut(&mut self) -> &mut W {
        &mut self.node
    }

    /// Frame assigned by the most recent pass, in content coordinates.
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Row this handle was last populated for, if any.
    #[must_use]
    pub fn bound_row(&self) -> Option<ItemId> {
        self.bound
    }

    /// Returns `true` if both tap slots are wired.
    #[must_use]
    pub fn is_wired(&self) -> bool {
        self.on_tapped.is_some() && self.on_secondary_tapped.is_some()
    }

    /// Delivers a primary tap to the row this handle is bound to.
    pub fn tapped(&self, event: &TapEvent) {
        if let Some(slot) = &self.on_tapped {
            slot(event);
        }
    }

    /// Delivers a secondary tap to the row this handle is bound to.
    pub fn secondary_tapped(&self, event: &TapEvent) {
        if let Some(slot) = &self.on_secondary_tapped {
            slot(event);
        }
    }

    pub(crate) fn place(&mut self, frame: Rect) {
        self.frame = frame;
    }

    /// Points both tap slots at `row`.
    pub(crate) fn rewire(&mut self, row: ItemId, router: &Rc<TapRouter>) {
        self.bound = Some(row);
        let primary = Rc::clone(router);
        self.on_tapped = Some(Box::new(move |event: &TapEvent| primary.primary(row, event)));
        let secondary = Rc::clone(router);
        self.on_secondary_tapped =
            Some(Box::new(move |event: &TapEvent| secondary.secondary(row, event)));
    }

    /// Drops both tap slots and the row binding before the handle is pooled.
    pub(crate) fn unwire(&mut self) {
        self.bound = None;
        self.on_tapped = None;
        self.on_secondary_tapped = None;
    }
}

impl<W: fmt::Debug> fmt::Debug for ItemHandle<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemHandle")
            .field("node", &self.node)
            .field("frame", &self.frame)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}
