// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch-windowed scrolling, the coarse alternative to [`WidgetList`].
//!
//! [`WindowedScroller`] keeps a contiguous batch of at most `max_rows` rows
//! materialized and lets the host's scroll container lay all of them out.
//! When the reader scrolls past 80% of the batch it slides forward by `step`
//! rows; below 20% it slides backward. Every slide rebuilds the batch through
//! the host's `materialize` callback.
//!
//! Sliding changes what sits under the scroll offset, so after a full step the
//! scroller proposes a corrective offset nudge of
//! `(content_height - viewport_height) / step`. This only approximates the
//! height of the rows that moved and is known to behave well for two
//! configurations: a step of 3 over 12 rows, and a step of 5 over 30 rows.
//! Other ratios are accepted but logged.
//!
//! Prefer [`WidgetList`] for anything that needs per-pixel accuracy; this type
//! exists for hosts that can only give the list a plain scroll container.
//!
//! [`WidgetList`]: crate::WidgetList

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use crate::config::DEFAULT_BOTTOM_ANCHOR_EPSILON;
use crate::error::{ConfigError, check_length};

/// Scroll fraction above which the batch slides forward.
pub const SHIFT_FORWARD_FRACTION: f64 = 0.80;

/// Scroll fraction below which the batch slides backward.
pub const SHIFT_BACKWARD_FRACTION: f64 = 0.20;

const KNOWN_GOOD: [(usize, usize); 2] = [(3, 12), (5, 30)];

/// Batch size and slide step of a [`WindowedScroller`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowedConfig {
    step: usize,
    max_rows: usize,
    bottom_anchor_epsilon: f64,
}

impl Default for WindowedConfig {
    fn default() -> Self {
        Self {
            step: 3,
            max_rows: 12,
            bottom_anchor_epsilon: DEFAULT_BOTTOM_ANCHOR_EPSILON,
        }
    }
}

impl WindowedConfig {
    /// Creates a config sliding by `step` rows over a batch of `max_rows`.
    pub fn new(step: usize, max_rows: usize) -> Result<Self, ConfigError> {
        if step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if step >= max_rows {
            return Err(ConfigError::StepExceedsBatch { step, max_rows });
        }
        if !KNOWN_GOOD.contains(&(step, max_rows)) {
            log::warn!(
                "windowed scroller step {step} over {max_rows} rows is untested; \
                 offset correction may jump"
            );
        }
        Ok(Self {
            step,
            max_rows,
            ..Self::default()
        })
    }

    /// Returns a copy with a different bottom anchoring tolerance.
    pub fn with_bottom_anchor_epsilon(mut self, epsilon: f64) -> Result<Self, ConfigError> {
        self.bottom_anchor_epsilon = check_length("bottom_anchor_epsilon", epsilon)?;
        Ok(self)
    }

    /// Rows added and removed per slide.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Largest number of materialized rows.
    #[must_use]
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Distance from the bottom that still counts as anchored there.
    #[must_use]
    pub fn bottom_anchor_epsilon(&self) -> f64 {
        self.bottom_anchor_epsilon
    }
}

/// Which way a batch slid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShiftDirection {
    /// Towards the end of the data.
    Forward,
    /// Towards the start of the data.
    Backward,
}

/// Result of a slide triggered by [`WindowedScroller::on_scrolled`].
#[derive(Clone, Debug, PartialEq)]
pub struct BatchShift {
    /// Direction of the slide.
    pub direction: ShiftDirection,
    /// The materialized range after the slide.
    pub range: Range<usize>,
    /// Offset adjustment to apply, present only after a full step.
    pub nudge: Option<f64>,
}

impl BatchShift {
    /// The offset the host should scroll to, given the one it reported.
    #[must_use]
    pub fn corrected_offset(&self, offset: f64) -> f64 {
        offset + self.nudge.unwrap_or(0.0)
    }
}

/// Where the host should move its scroll container after a jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    /// Start of the batch.
    Top,
    /// End of the batch.
    Bottom,
    /// Middle of the batch, where the requested row sits.
    Centre,
}

type LengthFn = dyn Fn() -> usize;
type MaterializeFn<R> = dyn FnMut(Range<usize>) -> Vec<R>;

/// Keeps a sliding batch of materialized rows.
pub struct WindowedScroller<R> {
    config: WindowedConfig,
    length: Box<LengthFn>,
    materialize: Box<MaterializeFn<R>>,
    lower: usize,
    upper: usize,
    rows: Vec<R>,
    at_bottom: bool,
}

impl<R> fmt::Debug for WindowedScroller<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowedScroller")
            .field("config", &self.config)
            .field("range", &(self.lower..self.upper))
            .field("rows", &self.rows.len())
            .field("at_bottom", &self.at_bottom)
            .finish_non_exhaustive()
    }
}

impl<R> WindowedScroller<R> {
    /// Creates a scroller showing the first batch.
    pub fn new(
        config: WindowedConfig,
        length: impl Fn() -> usize + 'static,
        materialize: impl FnMut(Range<usize>) -> Vec<R> + 'static,
    ) -> Self {
        let mut scroller = Self {
            config,
            length: Box::new(length),
            materialize: Box::new(materialize),
            lower: 0,
            upper: 0,
            rows: Vec::new(),
            at_bottom: false,
        };
        scroller.upper = config.max_rows.min(scroller.len());
        scroller.rebuild();
        scroller
    }

    /// Number of rows in the underlying data.
    #[must_use]
    pub fn len(&self) -> usize {
        (self.length)()
    }

    /// Returns `true` if the underlying data is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The scroller's configuration.
    #[must_use]
    pub fn config(&self) -> &WindowedConfig {
        &self.config
    }

    /// Range of data rows currently materialized.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.lower..self.upper
    }

    /// The materialized rows, in data order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Returns `true` if the last scroll or jump left the reader at the end.
    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        self.at_bottom
    }

    /// Reacts to the host's scroll container moving to `offset`.
    ///
    /// Returns the slide performed, if any. The host should scroll to
    /// [`BatchShift::corrected_offset`] after laying out the new rows.
    ///
    /// If the data shrank below the batch, the batch is first pulled back to
    /// the end of the data and its rows rebuilt, even when no slide follows.
    pub fn on_scrolled(
        &mut self,
        offset: f64,
        content_height: f64,
        viewport_height: f64,
    ) -> Option<BatchShift> {
        let len = self.len();
        if self.clamp_to_len(len) {
            self.rebuild();
        }

        let scrollable = content_height - viewport_height;
        self.at_bottom = offset + self.config.bottom_anchor_epsilon >= scrollable;
        if scrollable.is_nan() || scrollable <= 0.0 {
            return None;
        }

        let fraction = offset / scrollable;
        let step = self.config.step;
        let max_rows = self.config.max_rows;
        let before = self.range();

        let (direction, full_step) = if fraction > SHIFT_FORWARD_FRACTION {
            let full_step = self.upper + step < len;
            if self.upper + step > len {
                self.upper = len;
                self.lower = len.saturating_sub(max_rows);
            } else {
                self.lower += step;
                self.upper += step;
            }
            (ShiftDirection::Forward, full_step)
        } else if fraction < SHIFT_BACKWARD_FRACTION {
            let full_step = self.lower > step;
            if self.lower < step {
                self.lower = 0;
                self.upper = max_rows.min(len);
            } else {
                self.lower -= step;
                self.upper = (self.upper - step).min(len);
            }
            (ShiftDirection::Backward, full_step)
        } else {
            return None;
        };

        if self.range() == before {
            return None;
        }
        self.rebuild();

        let nudge = full_step.then(|| {
            // Approximates the height of the rows that moved out.
            let nudge = scrollable / step as f64;
            match direction {
                ShiftDirection::Forward => -nudge,
                ShiftDirection::Backward => nudge,
            }
        });
        log::debug!("windowed scroller slid {direction:?} to {:?}", self.range());
        Some(BatchShift {
            direction,
            range: self.range(),
            nudge,
        })
    }

    /// Materializes the last batch and anchors to the bottom.
    pub fn go_to_bottom(&mut self) -> ScrollTarget {
        self.upper = self.len();
        self.lower = self.upper.saturating_sub(self.config.max_rows);
        self.rebuild();
        self.at_bottom = true;
        ScrollTarget::Bottom
    }

    /// Follows the end of the data if the reader was anchored there.
    ///
    /// Returns whether it did; the host then scrolls to the bottom.
    pub fn go_to_bottom_if_at_bottom(&mut self) -> bool {
        if self.at_bottom {
            self.go_to_bottom();
        }
        self.at_bottom
    }

    /// Materializes the first batch.
    pub fn go_to_top(&mut self) -> ScrollTarget {
        self.lower = 0;
        self.upper = self.config.max_rows.min(self.len());
        self.rebuild();
        self.at_bottom = false;
        ScrollTarget::Top
    }

    /// Materializes a batch centred on `index`, clamped to the data.
    ///
    /// The host scrolls to the middle of the batch, which shows `index` or a
    /// row close to it.
    pub fn go_to_index(&mut self, index: usize) -> ScrollTarget {
        let max_rows = self.config.max_rows;
        let lower = index.saturating_sub(max_rows / 2);
        self.upper = (lower + max_rows).min(self.len());
        self.lower = lower.min(self.upper.saturating_sub(max_rows));
        self.rebuild();
        self.at_bottom = false;
        ScrollTarget::Centre
    }

    /// Rebuilds the current batch, for example after rows changed in place.
    pub fn refresh_current(&mut self) {
        self.clamp_to_len(self.len());
        self.rebuild();
    }

    /// Pulls the batch back inside `0..len`, keeping it full where the data
    /// allows. Returns whether the range changed.
    fn clamp_to_len(&mut self, len: usize) -> bool {
        if self.upper <= len {
            return false;
        }
        self.upper = len;
        self.lower = self.lower.min(len.saturating_sub(self.config.max_rows));
        true
    }

    fn rebuild(&mut self) {
        self.rows = (self.materialize)(self.lower..self.upper);
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use super::{ScrollTarget, ShiftDirection, WindowedConfig, WindowedScroller};
    use crate::ConfigError;

    fn scroller(len: Rc<Cell<usize>>) -> WindowedScroller<usize> {
        WindowedScroller::new(
            WindowedConfig::default(),
            move || len.get(),
            |range| range.collect::<Vec<_>>(),
        )
    }

    #[test]
    fn config_validation() {
        assert_eq!(WindowedConfig::new(0, 12), Err(ConfigError::ZeroStep));
        assert_eq!(
            WindowedConfig::new(12, 12),
            Err(ConfigError::StepExceedsBatch {
                step: 12,
                max_rows: 12
            })
        );
        let config = WindowedConfig::new(5, 30).unwrap();
        assert_eq!((config.step(), config.max_rows()), (5, 30));
        // Untested ratios are accepted.
        assert!(WindowedConfig::new(4, 20).is_ok());
    }

    #[test]
    fn starts_with_the_first_batch() {
        let long = scroller(Rc::new(Cell::new(100)));
        assert_eq!(long.range(), 0..12);
        assert_eq!(long.rows().len(), 12);

        let short = scroller(Rc::new(Cell::new(5)));
        assert_eq!(short.range(), 0..5);
    }

    #[test]
    fn slides_forward_past_eighty_percent() {
        let mut scroller = scroller(Rc::new(Cell::new(100)));
        // Content 1000, viewport 400: scrollable 600, offset 540 is 90%.
        let shift = scroller.on_scrolled(540.0, 1000.0, 400.0).unwrap();
        assert_eq!(shift.direction, ShiftDirection::Forward);
        assert_eq!(shift.range, 3..15);
        assert_eq!(shift.nudge, Some(-200.0));
        assert!((shift.corrected_offset(540.0) - 340.0).abs() < f64::EPSILON);
        assert_eq!(scroller.rows().first(), Some(&3));
    }

    #[test]
    fn middle_of_batch_does_not_slide() {
        let mut scroller = scroller(Rc::new(Cell::new(100)));
        assert_eq!(scroller.on_scrolled(300.0, 1000.0, 400.0), None);
        assert!(!scroller.is_at_bottom());
        // Content that fits never slides.
        assert_eq!(scroller.on_scrolled(0.0, 300.0, 400.0), None);
        assert!(scroller.is_at_bottom());
    }

    #[test]
    fn backward_slide_clamps_at_the_start() {
        let mut scroller = scroller(Rc::new(Cell::new(100)));
        // Already at the start: nothing to do.
        assert_eq!(scroller.on_scrolled(10.0, 1000.0, 400.0), None);

        scroller.on_scrolled(540.0, 1000.0, 400.0);
        let shift = scroller.on_scrolled(10.0, 1000.0, 400.0).unwrap();
        assert_eq!(shift.direction, ShiftDirection::Backward);
        assert_eq!(shift.range, 0..12);
        // Exactly one step back to the start is not a full step.
        assert_eq!(shift.nudge, None);
    }

    #[test]
    fn forward_slide_clamps_at_the_end() {
        let mut scroller = scroller(Rc::new(Cell::new(14)));
        let shift = scroller.on_scrolled(590.0, 1000.0, 400.0).unwrap();
        assert_eq!(shift.range, 2..14);
        assert_eq!(shift.nudge, None);
        // Pinned at the end: further scrolling changes nothing.
        assert_eq!(scroller.on_scrolled(600.0, 1000.0, 400.0), None);
        assert!(scroller.is_at_bottom());
    }

    #[test]
    fn go_to_index_centres_the_batch() {
        let mut scroller = scroller(Rc::new(Cell::new(100)));
        assert_eq!(scroller.go_to_index(50), ScrollTarget::Centre);
        assert_eq!(scroller.range(), 44..56);
        scroller.go_to_index(98);
        assert_eq!(scroller.range(), 88..100);
        scroller.go_to_index(2);
        assert_eq!(scroller.range(), 0..12);
        assert!(!scroller.is_at_bottom());
    }

    #[test]
    fn follows_appends_only_when_anchored() {
        let len = Rc::new(Cell::new(100));
        let mut scroller = scroller(Rc::clone(&len));
        assert!(!scroller.go_to_bottom_if_at_bottom());

        assert_eq!(scroller.go_to_bottom(), ScrollTarget::Bottom);
        assert_eq!(scroller.range(), 88..100);
        len.set(110);
        assert!(scroller.go_to_bottom_if_at_bottom());
        assert_eq!(scroller.range(), 98..110);

        scroller.go_to_top();
        len.set(120);
        assert!(!scroller.go_to_bottom_if_at_bottom());
        assert_eq!(scroller.range(), 0..12);
    }

    #[test]
    fn refresh_current_clamps_to_shrunk_data() {
        let len = Rc::new(Cell::new(100));
        let mut scroller = scroller(Rc::clone(&len));
        scroller.go_to_bottom();
        len.set(95);
        scroller.refresh_current();
        assert_eq!(scroller.range(), 83..95);
        assert_eq!(scroller.rows().len(), 12);

        len.set(4);
        scroller.refresh_current();
        assert_eq!(scroller.range(), 0..4);
    }

    #[test]
    fn scrolling_after_the_data_shrank_keeps_the_range_ordered() {
        let len = Rc::new(Cell::new(100));
        let mut scroller = scroller(Rc::clone(&len));
        scroller.go_to_bottom();
        len.set(50);

        let shift = scroller.on_scrolled(10.0, 1000.0, 400.0).unwrap();
        assert_eq!(shift.direction, ShiftDirection::Backward);
        assert_eq!(shift.range, 35..47);
        assert_eq!(shift.nudge, Some(200.0));
        assert_eq!(scroller.rows(), (35..47).collect::<Vec<_>>().as_slice());

        scroller.go_to_bottom();
        len.set(20);
        // Already at the end once clamped, so there is nothing to slide.
        assert_eq!(scroller.on_scrolled(590.0, 1000.0, 400.0), None);
        assert_eq!(scroller.range(), 8..20);
        assert_eq!(scroller.rows().first(), Some(&8));
    }
}
