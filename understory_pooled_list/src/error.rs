// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use core::fmt;

/// Error returned when a [`ListConfig`](crate::ListConfig) or
/// [`WindowedConfig`](crate::WindowedConfig) is rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// A thickness or tolerance was negative, NaN, or infinite.
    InvalidLength {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The windowed scroller step was zero.
    ZeroStep,
    /// The windowed scroller step does not fit inside the materialized batch.
    StepExceedsBatch {
        /// Requested step.
        step: usize,
        /// Requested batch size.
        max_rows: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { field, value } => {
                write!(f, "`{field}` must be finite and non-negative, got {value}")
            }
            Self::ZeroStep => f.write_str("windowed scroller step must be at least 1"),
            Self::StepExceedsBatch { step, max_rows } => write!(
                f,
                "windowed scroller step {step} must be smaller than the batch of {max_rows} rows"
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

pub(crate) fn check_length(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidLength { field, value })
    }
}
