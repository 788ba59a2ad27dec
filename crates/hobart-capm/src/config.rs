//! Estimation settings and requested-window validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AlignmentMode, NegativeVariancePolicy};

/// Longest window that can be requested, in months.
pub const MAX_MONTHS: usize = 60;

/// Window used when the request is missing or invalid.
pub const DEFAULT_MONTHS: usize = 60;

/// Configuration for CAPM estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapmConfig {
    /// Requested window length in monthly prices (default: 60)
    pub months: usize,
    /// How benchmark and risk-free series are matched to the instrument (default: positional)
    pub alignment: AlignmentMode,
    /// Handling of a negative residual variance (default: clamp to zero)
    pub negative_variance: NegativeVariancePolicy,
}

impl Default for CapmConfig {
    fn default() -> Self {
        Self {
            months: DEFAULT_MONTHS,
            alignment: AlignmentMode::default(),
            negative_variance: NegativeVariancePolicy::default(),
        }
    }
}

impl CapmConfig {
    /// Default configuration with a specific window length.
    pub fn with_months(months: usize) -> Self {
        Self {
            months,
            ..Default::default()
        }
    }
}

/// Why a requested window length was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthsError {
    /// No value supplied.
    #[error("no number of months given")]
    Missing,

    /// Value is not an integer.
    #[error("{0:?} is not a whole number of months")]
    NotANumber(String),

    /// Value is outside `1..=max`.
    #[error("{value} months is outside 1..={max}")]
    OutOfRange {
        /// Parsed value
        value: i64,
        /// Largest accepted value
        max: usize,
    },
}

/// Validate a user-supplied window length.
///
/// Callers fall back to [`DEFAULT_MONTHS`] on error.
pub fn parse_requested_months(arg: Option<&str>, max: usize) -> Result<usize, MonthsError> {
    let raw = arg.ok_or(MonthsError::Missing)?;
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| MonthsError::NotANumber(raw.to_string()))?;

    match usize::try_from(value) {
        Ok(months) if (1..=max).contains(&months) => Ok(months),
        _ => Err(MonthsError::OutOfRange { value, max }),
    }
}
