// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The list controller tying the engine together.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::ops::RangeInclusive;

use kurbo::{Point, Rect, Size};

use crate::ItemId;
use crate::config::ListConfig;
use crate::item::{ItemHandle, ListItem, RowTapCallback, TapEvent, TapRouter};
use crate::ledger::HeightLedger;
use crate::reconcile::{Geometry, PassMode, PassReport, Reconciler, RowHooks};
use crate::scroll::ScrollState;
use crate::window::{WindowQuery, compute_visible_window};

type LengthFn = dyn Fn() -> usize;
type CreateItemFn<W> = dyn FnMut() -> W;
type UpdateItemFn<W> = dyn FnMut(ItemId, &mut W);

/// A vertically scrolling list that renders only the rows in view.
///
/// The list does not own the data. It asks a `length` callback how many rows
/// exist, builds host nodes with `create_item`, and fills a node with row
/// content through `update_item`. Only enough nodes to cover the viewport are
/// alive at once; nodes scrolled out of view go to a pool and are reused for
/// rows scrolling in.
///
/// Every mutation that can move rows runs a *pass* which recomputes the
/// visible window, reassigns nodes, and positions frames. Scrolling and
/// resizing run incremental passes that only populate rows that just came into
/// view; [`refresh`](Self::refresh) runs a full pass.
///
/// All coordinates are in list content space: row frames start at `y = 0` for
/// the first row and the host subtracts [`scroll_offset`](Self::scroll_offset)
/// when drawing.
pub struct WidgetList<W> {
    length: Option<Box<LengthFn>>,
    create_item: Option<Box<CreateItemFn<W>>>,
    update_item: Option<Box<UpdateItemFn<W>>>,
    router: Rc<TapRouter>,
    config: ListConfig,
    ledger: HeightLedger,
    template_size: Option<Size>,
    scroll: ScrollState,
    // Tracks scroll-driven anchoring only; data growth does not clear it.
    pinned_to_bottom: bool,
    reconciler: Reconciler<W>,
    last_pass: Option<PassReport>,
}

impl<W> Default for WidgetList<W> {
    fn default() -> Self {
        Self {
            length: None,
            create_item: None,
            update_item: None,
            router: Rc::new(TapRouter::default()),
            config: ListConfig::default(),
            ledger: HeightLedger::new(),
            template_size: None,
            scroll: ScrollState::default(),
            pinned_to_bottom: true,
            reconciler: Reconciler::default(),
            last_pass: None,
        }
    }
}

impl<W> fmt::Debug for WidgetList<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetList")
            .field("len", &self.length.as_ref().map(|length| length()))
            .field("config", &self.config)
            .field("scroll", &self.scroll)
            .field("explicit_heights", &self.ledger.explicit_len())
            .field("visible", &self.reconciler.visible().len())
            .field("pooled", &self.reconciler.pool().len())
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

/// Adapts the list's stored callbacks to the reconciler.
struct Callbacks<'a, W> {
    create: &'a mut Option<Box<CreateItemFn<W>>>,
    update: &'a mut Option<Box<UpdateItemFn<W>>>,
    router: &'a Rc<TapRouter>,
}

impl<W> RowHooks<W> for Callbacks<'_, W> {
    fn create(&mut self) -> Option<W> {
        self.create.as_mut().map(|create| create())
    }

    fn update(&mut self, row: ItemId, node: &mut W) {
        if let Some(update) = self.update.as_mut() {
            update(row, node);
        }
    }

    fn router(&self) -> &Rc<TapRouter> {
        self.router
    }
}

impl<W: ListItem> WidgetList<W> {
    /// Creates a list from a length callback, a node factory, and a content
    /// callback.
    ///
    /// The template node is built and measured right away; nothing is laid
    /// out until the first [`resize`](Self::resize).
    pub fn new(
        length: impl Fn() -> usize + 'static,
        create_item: impl FnMut() -> W + 'static,
        update_item: impl FnMut(ItemId, &mut W) + 'static,
    ) -> Self {
        let mut list = Self {
            length: Some(Box::new(length)),
            create_item: Some(Box::new(create_item)),
            update_item: Some(Box::new(update_item)),
            ..Self::default()
        };
        list.ensure_template();
        list
    }

    /// Creates a list backed by a shared vector.
    ///
    /// The length is read from the vector on every pass. `update_item`
    /// receives a reference to the element of the row being populated, so it
    /// must not borrow `data` mutably itself.
    pub fn with_data<T: 'static>(
        data: Rc<RefCell<Vec<T>>>,
        create_item: impl FnMut() -> W + 'static,
        mut update_item: impl FnMut(&T, &mut W) + 'static,
    ) -> Self {
        let length = {
            let data = Rc::clone(&data);
            move || data.borrow().len()
        };
        let update = move |row: ItemId, node: &mut W| match data.borrow().get(row) {
            Some(item) => update_item(item, node),
            None => log::warn!("list data has no row {row}; leaving its item unpopulated"),
        };
        Self::new(length, create_item, update)
    }

    /// Replaces the length callback and lays the list out again.
    pub fn set_length(&mut self, length: impl Fn() -> usize + 'static) {
        self.length = Some(Box::new(length));
        self.update(PassMode::Incremental);
    }

    /// Replaces the node factory.
    ///
    /// The template height is measured again and a full pass drops every
    /// pooled node built by the previous factory.
    pub fn set_create_item(&mut self, create_item: impl FnMut() -> W + 'static) {
        self.create_item = Some(Box::new(create_item));
        self.refresh();
    }

    /// Replaces the content callback and re-populates every visible row.
    pub fn set_update_item(&mut self, update_item: impl FnMut(ItemId, &mut W) + 'static) {
        self.update_item = Some(Box::new(update_item));
        self.update(PassMode::Full);
    }

    /// Number of rows reported by the length callback, `0` without one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.length.as_ref().map_or(0, |length| length())
    }

    /// Returns `true` if the list has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current layout configuration.
    #[must_use]
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Applies a new layout configuration.
    ///
    /// An invalid configuration is logged and ignored.
    pub fn set_config(&mut self, config: ListConfig) {
        if let Err(err) = config.validate() {
            log::warn!("ignoring list config: {err}");
            return;
        }
        if self.config == config {
            return;
        }
        self.config = config;
        self.update(PassMode::Incremental);
    }

    /// Shows or hides the divider rectangles. The gap between rows remains.
    pub fn set_hide_separators(&mut self, hide: bool) {
        if self.config.hide_separators() == hide {
            return;
        }
        self.config.set_hide_separators(hide);
        self.update(PassMode::Incremental);
    }

    /// Installs or clears the primary tap handler.
    ///
    /// Rows already on screen pick up the new handler immediately.
    pub fn set_on_item_tapped(&self, callback: Option<RowTapCallback>) {
        self.router.set_primary(callback);
    }

    /// Installs or clears the secondary (context) tap handler.
    pub fn set_on_item_secondary_tapped(&self, callback: Option<RowTapCallback>) {
        self.router.set_secondary(callback);
    }

    /// Sets the viewport size and lays out again when it changed.
    pub fn resize(&mut self, viewport: Size) {
        if !self.scroll.set_viewport(viewport) {
            return;
        }
        self.update(PassMode::Incremental);
        self.track_bottom();
    }

    /// Current viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.scroll.viewport()
    }

    /// Current scroll offset from the top of the content.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset()
    }

    /// Scroll state of the list.
    #[must_use]
    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    /// Notifies the list that the host scrolled to `offset`.
    ///
    /// Runs an incremental pass if the offset changed.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        if offset.is_nan() {
            log::warn!("ignoring NaN scroll offset");
            return;
        }
        if self.scroll.set_offset(offset) {
            self.update(PassMode::Incremental);
            self.track_bottom();
        }
    }

    /// Scrolls to the first row.
    pub fn scroll_to_top(&mut self) {
        self.move_to(0.0);
    }

    /// Scrolls so the end of the content meets the bottom of the viewport.
    pub fn scroll_to_bottom(&mut self) {
        let max = self.scroll.max_offset(self.content_height());
        self.move_to(max);
    }

    /// Scrolls the least distance that brings row `id` fully into view.
    ///
    /// Out-of-range rows are ignored.
    pub fn scroll_to_index(&mut self, id: ItemId) {
        let len = self.len();
        if id >= len {
            log::debug!("scroll_to_index({id}) ignored: list has {len} rows");
            return;
        }
        self.ensure_template();
        let separator = self.config.separator_thickness();
        let top = self.ledger.offset_of(id, len, separator);
        let height = self.ledger.get(id, len);
        let target = self.scroll.reveal_offset(top, height);
        self.move_to(self.scroll.clamp(target, self.content_height()));
    }

    /// Scrolls to `offset`, clamped to the scrollable range.
    ///
    /// Does nothing when the content fits entirely in the viewport.
    pub fn scroll_to_offset(&mut self, offset: f64) {
        if offset.is_nan() {
            log::warn!("ignoring NaN scroll target");
            return;
        }
        if let Some(target) = self.scroll.bounded_offset(offset, self.content_height()) {
            self.move_to(target);
        }
    }

    /// Returns `true` if the viewport currently shows the end of the content.
    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        self.scroll
            .is_at_bottom(self.content_height(), self.config.bottom_anchor_epsilon())
    }

    /// Scrolls to the bottom if the last scroll or resize left the list
    /// anchored there. Returns whether it did.
    ///
    /// Streaming hosts call this after appending rows or growing the last
    /// row, so a reader following the conversation keeps following it while a
    /// reader looking at history is left alone.
    pub fn scroll_to_bottom_if_at_bottom(&mut self) -> bool {
        if !self.pinned_to_bottom {
            return false;
        }
        self.scroll_to_bottom();
        true
    }

    /// Lays out and re-populates every visible row, after measuring the
    /// template again.
    ///
    /// Use after a theme change or a bulk data change. Pooled nodes are
    /// dropped since they may carry stale styling.
    pub fn refresh(&mut self) {
        self.ledger.invalidate_template();
        self.template_size = None;
        self.ensure_template();
        self.update(PassMode::Full);
    }

    /// Re-populates row `id` if it is visible.
    pub fn refresh_item(&mut self, id: ItemId) {
        let len = self.len();
        if id >= len {
            log::warn!("refresh_item({id}) ignored: list has {len} rows");
            return;
        }
        self.update(PassMode::Incremental);
        let mut hooks = Callbacks {
            create: &mut self.create_item,
            update: &mut self.update_item,
            router: &self.router,
        };
        self.reconciler.populate_row(id, &mut hooks);
    }

    /// Records the height of row `id`, excluding the gap below it.
    ///
    /// The row is laid out and re-populated only when the height actually
    /// changed; the return value says whether it did.
    pub fn set_item_height(&mut self, id: ItemId, height: f64) -> bool {
        let len = self.len();
        if id >= len {
            log::warn!("set_item_height({id}) ignored: list has {len} rows");
            return false;
        }
        if !height.is_finite() || height <= 0.0 {
            log::warn!("set_item_height({id}) ignored: {height} is not a positive finite height");
            return false;
        }
        let changed = self.ledger.set(id, height);
        if changed {
            self.refresh_item(id);
        }
        changed
    }

    /// Height of row `id`: the recorded one, or the template height.
    #[must_use]
    pub fn item_height(&self, id: ItemId) -> f64 {
        self.ledger.get(id, self.len())
    }

    /// Forgets every recorded row height.
    pub fn clear_item_heights(&mut self) {
        if !self.ledger.has_explicit_heights() {
            return;
        }
        self.ledger.clear();
        self.update(PassMode::Incremental);
    }

    /// Height of all rows plus the gaps between them.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.ledger
            .content_height(self.len(), self.config.separator_thickness())
    }

    /// Size of the scrollable content.
    ///
    /// The width is the template width; rows are laid out at the viewport
    /// width regardless.
    #[must_use]
    pub fn content_size(&self) -> Size {
        let width = self.template_size.map_or(0.0, |size| size.width);
        Size::new(width, self.content_height())
    }

    /// Smallest size the list can be shown at: room for one template row.
    ///
    /// [`Size::ZERO`] until a node factory is set.
    #[must_use]
    pub fn min_size(&self) -> Size {
        self.template_size.unwrap_or(Size::ZERO)
    }

    /// Returns `true` if row `id` currently has a node.
    #[must_use]
    pub fn is_visible(&self, id: ItemId) -> bool {
        self.reconciler.visible().contains(id)
    }

    /// Visible rows in ascending order.
    pub fn visible_rows(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.reconciler.visible().rows()
    }

    /// First and last visible row, if any.
    #[must_use]
    pub fn visible_range(&self) -> Option<RangeInclusive<ItemId>> {
        let visible = self.reconciler.visible();
        Some(visible.first_row()?..=visible.last_row()?)
    }

    /// Visible rows paired with their nodes, in ascending order.
    pub fn visible_items(&self) -> impl Iterator<Item = (ItemId, &ItemHandle<W>)> + '_ {
        self.reconciler.visible().iter()
    }

    /// Divider rectangles for the current layout.
    #[must_use]
    pub fn separators(&self) -> &[Rect] {
        self.reconciler.separators()
    }

    /// Row whose frame contains the content-space `point`.
    #[must_use]
    pub fn item_at(&self, point: Point) -> Option<ItemId> {
        let visible = self.reconciler.visible();
        let row = visible.row_at(point.y)?;
        let frame = visible.get(row)?.frame();
        (frame.x0 <= point.x && point.x < frame.x1).then_some(row)
    }

    /// Delivers a primary tap at the content-space `point`.
    ///
    /// Returns `true` if a row was hit.
    pub fn tap_at(&self, point: Point) -> bool {
        self.hit(point, |handle, event| handle.tapped(event))
    }

    /// Delivers a secondary tap at the content-space `point`.
    ///
    /// Returns `true` if a row was hit.
    pub fn secondary_tap_at(&self, point: Point) -> bool {
        self.hit(point, |handle, event| handle.secondary_tapped(event))
    }

    fn hit(&self, point: Point, deliver: impl FnOnce(&ItemHandle<W>, &TapEvent)) -> bool {
        let Some(row) = self.item_at(point) else {
            return false;
        };
        let Some(handle) = self.reconciler.visible().get(row) else {
            return false;
        };
        deliver(handle, &TapEvent::in_frame(point, handle.frame()));
        true
    }

    /// Number of nodes alive, visible or pooled.
    #[must_use]
    pub fn live_item_count(&self) -> usize {
        self.reconciler.pool().live()
    }

    /// Number of nodes waiting in the pool.
    #[must_use]
    pub fn pooled_item_count(&self) -> usize {
        self.reconciler.pool().len()
    }

    /// Returns every visible node to the pool, for example while the host
    /// hides the list. The next pass takes them back.
    pub fn release_visible(&mut self) -> usize {
        self.reconciler.release_all()
    }

    /// Report of the most recent pass that ran.
    #[must_use]
    pub fn last_pass(&self) -> Option<PassReport> {
        self.last_pass
    }

    fn move_to(&mut self, offset: f64) {
        if self.scroll.set_offset(offset) {
            self.update(PassMode::Incremental);
        }
        self.track_bottom();
    }

    fn track_bottom(&mut self) {
        self.pinned_to_bottom = self.is_at_bottom();
    }

    /// Measures a fresh, refreshed node once and caches its minimum size.
    fn ensure_template(&mut self) {
        if self.ledger.has_template() {
            return;
        }
        let Some(create) = self.create_item.as_mut() else {
            return;
        };
        let mut template = create();
        template.refresh();
        let size = template.min_size();
        self.template_size = Some(size);
        self.ledger.set_template_height(size.height);
    }

    fn update(&mut self, mode: PassMode) -> Option<PassReport> {
        let len = self.len();
        if len > 0 {
            if self.create_item.is_none() {
                log::warn!("list has {len} rows but no create_item callback; rows are skipped");
            }
            if self.update_item.is_none() {
                log::warn!("list has {len} rows but no update_item callback; rows stay empty");
            }
        }
        self.ensure_template();

        let separator = self.config.separator_thickness();
        self.scroll
            .clamp_to_content(self.ledger.content_height(len, separator));

        let query = WindowQuery {
            offset: self.scroll.offset(),
            viewport_height: self.scroll.viewport_height(),
            len,
            separator,
        };
        let window = compute_visible_window(&query, &self.ledger)?;
        let geometry = Geometry {
            width: self.scroll.viewport().width,
            separator,
            divider: self.config.divider_thickness(),
            hide_separators: self.config.hide_separators(),
        };
        let mut hooks = Callbacks {
            create: &mut self.create_item,
            update: &mut self.update_item,
            router: &self.router,
        };
        let report = self.reconciler.run(&window, &geometry, mode, &mut hooks);
        self.last_pass = Some(report);
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use kurbo::{Point, Size};

    use super::WidgetList;
    use crate::ListConfig;
    use crate::item::ListItem;
    use crate::reconcile::PassMode;

    #[derive(Debug, Default)]
    struct Label {
        text: u32,
    }

    impl ListItem for Label {
        fn min_size(&self) -> Size {
            Size::new(50.0, 20.0)
        }
    }

    fn list(len: Rc<Cell<usize>>) -> WidgetList<Label> {
        let mut list = WidgetList::new(
            move || len.get(),
            Label::default,
            |row, label: &mut Label| label.text = u32::try_from(row).unwrap(),
        );
        list.set_config(ListConfig::new(1.0, 1.0).unwrap());
        list
    }

    #[test]
    fn nothing_is_laid_out_before_resize() {
        let list = list(Rc::new(Cell::new(10)));
        assert_eq!(list.visible_rows().count(), 0);
        assert_eq!(list.last_pass(), None);
    }

    #[derive(Debug)]
    struct Tall;

    impl ListItem for Tall {
        fn min_size(&self) -> Size {
            Size::new(80.0, 45.0)
        }
    }

    #[test]
    fn min_size_is_known_before_layout_and_follows_the_factory() {
        let list = list(Rc::new(Cell::new(10)));
        assert_eq!(list.min_size(), Size::new(50.0, 20.0));

        let mut late = WidgetList::<Tall>::default();
        assert_eq!(late.min_size(), Size::ZERO);
        late.set_create_item(|| Tall);
        assert_eq!(late.min_size(), Size::new(80.0, 45.0));
        assert!((late.item_height(0) - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resize_lays_out_visible_rows() {
        let mut list = list(Rc::new(Cell::new(100)));
        list.resize(Size::new(200.0, 60.0));
        // ceil(60 / 21) = 3, so rows 0..=3.
        assert_eq!(list.visible_range(), Some(0..=3));
        assert_eq!(list.live_item_count(), 4);
        assert_eq!(list.min_size(), Size::new(50.0, 20.0));
        for (row, handle) in list.visible_items() {
            assert_eq!(handle.node().text, u32::try_from(row).unwrap());
            assert!((handle.frame().width() - 200.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn unchanged_offset_runs_no_pass() {
        let mut list = list(Rc::new(Cell::new(100)));
        list.resize(Size::new(200.0, 60.0));
        list.set_scroll_offset(30.0);
        let report = list.last_pass();
        list.set_scroll_offset(30.0);
        assert_eq!(list.last_pass(), report);
        assert_eq!(report.map(|r| r.mode), Some(PassMode::Incremental));
    }

    #[test]
    fn set_item_height_validates_input() {
        let mut list = list(Rc::new(Cell::new(5)));
        list.resize(Size::new(200.0, 60.0));
        list.set_item_height(9, 40.0);
        list.set_item_height(1, f64::NAN);
        list.set_item_height(1, -3.0);
        assert!((list.content_height() - 104.0).abs() < 1e-9);

        list.set_item_height(1, 40.0);
        assert!((list.item_height(1) - 40.0).abs() < f64::EPSILON);
        assert!((list.content_height() - 124.0).abs() < 1e-9);

        list.clear_item_heights();
        assert!((list.item_height(1) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn with_data_reads_the_shared_vector() {
        let data = Rc::new(RefCell::new(vec![7_u32, 8, 9]));
        let mut list = WidgetList::with_data(Rc::clone(&data), Label::default, |value, label| {
            label.text = *value;
        });
        list.resize(Size::new(100.0, 500.0));
        let texts: Vec<u32> = list.visible_items().map(|(_, h)| h.node().text).collect();
        assert_eq!(texts, [7, 8, 9]);

        data.borrow_mut().push(10);
        list.refresh();
        assert_eq!(list.len(), 4);
        assert!(list.is_visible(3));
    }

    #[test]
    fn item_at_maps_points_to_rows() {
        let mut list = list(Rc::new(Cell::new(10)));
        list.resize(Size::new(100.0, 100.0));
        assert_eq!(list.item_at(Point::new(10.0, 5.0)), Some(0));
        assert_eq!(list.item_at(Point::new(10.0, 25.0)), Some(1));
        // In the gap between row 0 and row 1.
        assert_eq!(list.item_at(Point::new(10.0, 20.5)), None);
        // Beyond the row width.
        assert_eq!(list.item_at(Point::new(150.0, 5.0)), None);
    }

    #[test]
    fn release_visible_returns_nodes_to_the_pool() {
        let mut list = list(Rc::new(Cell::new(10)));
        list.resize(Size::new(100.0, 60.0));
        let live = list.live_item_count();
        assert_eq!(list.release_visible(), live);
        assert_eq!(list.pooled_item_count(), live);
        assert!(list.separators().is_empty());

        list.refresh_item(0);
        assert_eq!(list.pooled_item_count(), 0);
        assert_eq!(list.live_item_count(), live);
    }
}
