// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless host pieces shared by the demos.
//!
//! There is no GUI toolkit here. [`TextRow`] stands in for a wrapped text
//! label, and [`render`] dumps what a host would draw after each pass.

use core::fmt::Write as _;

use kurbo::Size;
use understory_pooled_list::{ListItem, WidgetList};

/// Width of one character in the fake monospace font.
pub const CHAR_WIDTH: f64 = 8.0;

/// Height of one wrapped line.
pub const LINE_HEIGHT: f64 = 18.0;

/// Vertical padding around the text of a row.
pub const ROW_PADDING: f64 = 6.0;

/// A wrapped, monospace text label.
#[derive(Clone, Debug, Default)]
pub struct TextRow {
    text: String,
    styled: bool,
}

impl TextRow {
    /// Replaces the displayed text.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    /// The displayed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` once the host theme was applied.
    #[must_use]
    pub fn is_styled(&self) -> bool {
        self.styled
    }
}

impl ListItem for TextRow {
    fn min_size(&self) -> Size {
        Size::new(CHAR_WIDTH * 4.0, LINE_HEIGHT + 2.0 * ROW_PADDING)
    }

    fn refresh(&mut self) {
        self.styled = true;
    }
}

/// Height `text` needs when wrapped at `width`.
#[must_use]
pub fn measure(text: &str, width: f64) -> f64 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "a row never holds more characters than fit in usize"
    )]
    let per_line = ((width / CHAR_WIDTH).floor() as usize).max(1);
    let lines = text.chars().count().div_ceil(per_line).max(1);
    lines as f64 * LINE_HEIGHT + 2.0 * ROW_PADDING
}

/// Describes the current layout: one line per visible row plus the dividers.
#[must_use]
pub fn render(list: &WidgetList<TextRow>) -> String {
    let mut out = String::new();
    let offset = list.scroll_offset();
    for (row, handle) in list.visible_items() {
        let frame = handle.frame();
        let _ = writeln!(
            out,
            "{row:>5} @ {:>7.1}..{:<7.1} {}",
            frame.y0 - offset,
            frame.y1 - offset,
            handle.node().text()
        );
    }
    let _ = writeln!(
        out,
        "{} dividers, {} live nodes ({} pooled), offset {offset:.1} of {:.1}",
        list.separators().len(),
        list.live_item_count(),
        list.pooled_item_count(),
        list.content_height(),
    );
    out
}
