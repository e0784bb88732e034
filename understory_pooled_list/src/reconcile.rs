// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciliation of the visible set against a freshly computed window.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::mem;

use kurbo::Rect;

use crate::ItemId;
use crate::item::{ItemHandle, ListItem, TapRouter};
use crate::pool::ItemPool;
use crate::visible::VisibleRows;
use crate::window::VisibleWindow;

/// How a pass populates row content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PassMode {
    /// Only rows that just became visible are populated.
    ///
    /// Used for scrolling, resizing, and height changes, where rows that stay
    /// visible still show the right content.
    #[default]
    Incremental,
    /// Every visible row is populated and the pool is drained.
    ///
    /// Used after a theme change or a bulk data mutation, when pooled nodes may
    /// carry stale styling and visible rows may carry stale content.
    Full,
}

/// What one reconciliation pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Population mode of the pass.
    pub mode: PassMode,
    /// Rows in the computed window.
    pub rows: usize,
    /// Rows that kept the handle they already had.
    pub reused: usize,
    /// Rows served by a previously pooled handle.
    pub acquired: usize,
    /// Rows served by a newly constructed handle.
    pub created: usize,
    /// Handles returned to the pool.
    pub released: usize,
    /// Rows whose content callback ran.
    pub populated: usize,
    /// Pooled handles discarded by a full pass.
    pub drained: usize,
    /// Rows left out because no handle could be produced.
    pub skipped: usize,
}

/// Horizontal extent and spacing used to place rows and dividers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Geometry {
    pub(crate) width: f64,
    pub(crate) separator: f64,
    pub(crate) divider: f64,
    pub(crate) hide_separators: bool,
}

/// Caller hooks consulted during a pass.
pub(crate) trait RowHooks<W> {
    /// Constructs a fresh, unconfigured node, or `None` without a factory.
    fn create(&mut self) -> Option<W>;

    /// Fills `node` with the content of `row`.
    fn update(&mut self, row: ItemId, node: &mut W);

    /// Router the rewired tap slots forward to.
    fn router(&self) -> &Rc<TapRouter>;
}

/// Constructs and styles a node, the same way the template is built.
fn create_handle<W: ListItem>(hooks: &mut impl RowHooks<W>) -> Option<ItemHandle<W>> {
    let mut node = hooks.create()?;
    node.refresh();
    Some(ItemHandle::new(node))
}

fn populate<W>(hooks: &mut impl RowHooks<W>, row: ItemId, handle: &mut ItemHandle<W>) {
    hooks.update(row, handle.node_mut());
    handle.rewire(row, hooks.router());
}

/// Owns every handle of a list: the visible set, the pool, and the dividers.
///
/// A handle is always in exactly one of `visible` or `pool`; `was_visible` is
/// only non-empty while a pass is running.
#[derive(Debug)]
pub(crate) struct Reconciler<W> {
    pool: ItemPool<ItemHandle<W>>,
    visible: VisibleRows<W>,
    was_visible: VisibleRows<W>,
    separators: Vec<Rect>,
}

impl<W> Default for Reconciler<W> {
    fn default() -> Self {
        Self {
            pool: ItemPool::new(),
            visible: VisibleRows::default(),
            was_visible: VisibleRows::default(),
            separators: Vec::new(),
        }
    }
}

impl<W> Reconciler<W> {
    pub(crate) fn visible(&self) -> &VisibleRows<W> {
        &self.visible
    }

    pub(crate) fn pool(&self) -> &ItemPool<ItemHandle<W>> {
        &self.pool
    }

    pub(crate) fn separators(&self) -> &[Rect] {
        &self.separators
    }

    fn layout_separators(&mut self, geometry: &Geometry) {
        let wanted = if geometry.hide_separators {
            0
        } else {
            self.visible.len().saturating_sub(1)
        };
        self.separators.truncate(wanted);
        self.separators.resize(wanted, Rect::ZERO);

        // Centre each divider in the gap above the row that follows it.
        let lift = (geometry.separator + geometry.divider) / 2.0;
        for (slot, (_, handle)) in self.separators.iter_mut().zip(self.visible.iter().skip(1)) {
            let top = handle.frame().y0 - lift;
            *slot = Rect::new(0.0, top, geometry.width, top + geometry.divider);
        }
    }
}

impl<W: ListItem> Reconciler<W> {
    /// Maps `window` onto handles and populates content according to `mode`.
    pub(crate) fn run(
        &mut self,
        window: &VisibleWindow,
        geometry: &Geometry,
        mode: PassMode,
        hooks: &mut impl RowHooks<W>,
    ) -> PassReport {
        let mut report = PassReport {
            mode,
            rows: window.len(),
            ..PassReport::default()
        };

        // `was_visible` is empty between passes, so this leaves `visible` empty.
        mem::swap(&mut self.visible, &mut self.was_visible);
        // Pooled nodes predate the refresh; new rows must get fresh ones.
        if mode == PassMode::Full {
            report.drained = self.pool.drain();
        }

        let mut y = window.offset_y;
        for (offset, &height) in window.heights.iter().enumerate() {
            let row = window.first_row + offset;
            let frame = Rect::new(0.0, y, geometry.width, y + height);
            y += height + geometry.separator;

            let (mut handle, fresh) = match self.was_visible.take(row) {
                Some(handle) => {
                    report.reused += 1;
                    (handle, false)
                }
                None => {
                    let created_before = self.pool.created();
                    let Some(handle) = self.pool.acquire_or_create(|| create_handle(hooks)) else {
                        report.skipped += 1;
                        continue;
                    };
                    if self.pool.created() > created_before {
                        report.created += 1;
                    } else {
                        report.acquired += 1;
                    }
                    (handle, true)
                }
            };
            handle.place(frame);
            self.visible.push(row, handle, fresh);
        }

        for mut handle in self.was_visible.drain_handles() {
            handle.unwire();
            self.pool.release(handle);
            report.released += 1;
        }

        debug_assert!(self.visible.is_strictly_ascending());
        self.layout_separators(geometry);

        for (row, handle, fresh) in self.visible.iter_mut_with_fresh() {
            if mode == PassMode::Full || fresh {
                populate(hooks, row, handle);
                report.populated += 1;
            }
        }
        if mode == PassMode::Full {
            report.drained += self.pool.drain();
        }

        log::trace!("list pass: {report:?}");
        report
    }

    /// Re-populates `row` if it is visible. Returns whether it was.
    pub(crate) fn populate_row(&mut self, row: ItemId, hooks: &mut impl RowHooks<W>) -> bool {
        match self.visible.get_mut(row) {
            Some(handle) => {
                populate(hooks, row, handle);
                true
            }
            None => false,
        }
    }

    /// Releases every visible handle to the pool, for example when the list
    /// is detached from its host.
    pub(crate) fn release_all(&mut self) -> usize {
        let mut released = 0;
        for mut handle in self.visible.drain_handles() {
            handle.unwire();
            self.pool.release(handle);
            released += 1;
        }
        self.separators.clear();
        released
    }
}
