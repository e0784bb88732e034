// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout configuration for [`WidgetList`](crate::WidgetList).

use crate::error::{ConfigError, check_length};

/// Default gap between consecutive rows, matching a typical theme padding.
pub const DEFAULT_SEPARATOR_THICKNESS: f64 = 4.0;

/// Default thickness of the divider line drawn inside each gap.
pub const DEFAULT_DIVIDER_THICKNESS: f64 = 1.0;

/// Default tolerance for treating a scroll offset as "at the bottom".
pub const DEFAULT_BOTTOM_ANCHOR_EPSILON: f64 = 1.0;

/// Layout and anchoring knobs for a [`WidgetList`](crate::WidgetList).
///
/// All lengths are expressed in the list's content units (typically logical
/// pixels).
///
/// - `separator_thickness` is the gap reserved between two rows. It takes part
///   in every offset computation, so it is counted `len - 1` times in the
///   content height.
/// - `divider_thickness` is the height of the divider rectangle centred in
///   each gap. It is purely visual.
/// - `hide_separators` suppresses divider rectangles; the gap itself remains.
/// - `bottom_anchor_epsilon` controls how far above the end of the content an
///   offset may sit and still count as pinned to the bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListConfig {
    separator_thickness: f64,
    divider_thickness: f64,
    hide_separators: bool,
    bottom_anchor_epsilon: f64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            separator_thickness: DEFAULT_SEPARATOR_THICKNESS,
            divider_thickness: DEFAULT_DIVIDER_THICKNESS,
            hide_separators: false,
            bottom_anchor_epsilon: DEFAULT_BOTTOM_ANCHOR_EPSILON,
        }
    }
}

impl ListConfig {
    /// Creates a config with the given gap and divider thickness.
    ///
    /// Both values must be finite and non-negative.
    pub fn new(separator_thickness: f64, divider_thickness: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            separator_thickness: check_length("separator_thickness", separator_thickness)?,
            divider_thickness: check_length("divider_thickness", divider_thickness)?,
            ..Self::default()
        })
    }

    /// Returns a copy with divider rectangles hidden or shown.
    #[must_use]
    pub fn with_hide_separators(mut self, hide: bool) -> Self {
        self.hide_separators = hide;
        self
    }

    /// Returns a copy with a different bottom anchoring tolerance.
    pub fn with_bottom_anchor_epsilon(mut self, epsilon: f64) -> Result<Self, ConfigError> {
        self.bottom_anchor_epsilon = check_length("bottom_anchor_epsilon", epsilon)?;
        Ok(self)
    }

    /// Gap between consecutive rows.
    #[must_use]
    pub fn separator_thickness(&self) -> f64 {
        self.separator_thickness
    }

    /// Height of the divider rectangle drawn in each gap.
    #[must_use]
    pub fn divider_thickness(&self) -> f64 {
        self.divider_thickness
    }

    /// Whether divider rectangles are suppressed.
    #[must_use]
    pub fn hide_separators(&self) -> bool {
        self.hide_separators
    }

    /// Tolerance used by [`WidgetList::is_at_bottom`](crate::WidgetList::is_at_bottom).
    #[must_use]
    pub fn bottom_anchor_epsilon(&self) -> f64 {
        self.bottom_anchor_epsilon
    }

    pub(crate) fn set_hide_separators(&mut self, hide: bool) {
        self.hide_separators = hide;
    }

    /// Re-checks every length, for configs assembled field by field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_length("separator_thickness", self.separator_thickness)?;
        check_length("divider_thickness", self.divider_thickness)?;
        check_length("bottom_anchor_epsilon", self.bottom_anchor_epsilon)?;
        Ok(())
    }
}
