//! Error types for CAPM estimation.

use thiserror::Error;

use crate::{Period, SeriesKind};

/// Result type for CAPM operations.
pub type Result<T> = std::result::Result<T, CapmError>;

/// Errors that can occur while building series or estimating CAPM parameters.
#[derive(Debug, Error, PartialEq)]
pub enum CapmError {
    /// Too few aligned return periods to fit a regression.
    #[error("Insufficient data: need at least {required} return periods, got {actual}")]
    InsufficientData {
        /// Required number of return periods
        required: usize,
        /// Actual number of return periods
        actual: usize,
    },

    /// Benchmark excess returns have no variance, so the slope is undefined.
    #[error("Benchmark excess returns are constant over {observations} periods")]
    ConstantBenchmark {
        /// Number of periods in the window
        observations: usize,
    },

    /// Two sequences that must line up have different lengths.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// A supporting series has fewer periods than the estimation window.
    #[error("{series} series too short: window needs {required} periods, got {actual}")]
    SeriesTooShort {
        /// Which series was short
        series: SeriesKind,
        /// Periods required by the window
        required: usize,
        /// Periods available
        actual: usize,
    },

    /// Period-keyed alignment could not find a period.
    #[error("{series} series has no value for {period}")]
    MissingPeriod {
        /// Which series lacked the period
        series: SeriesKind,
        /// The missing period
        period: Period,
    },

    /// Returns contain infinities or NaN, typically from a zero price.
    #[error("Non-finite {series} excess return at position {index}")]
    NonFinite {
        /// Which series produced the value
        series: SeriesKind,
        /// Position within the aligned window
        index: usize,
    },

    /// Systematic variance exceeds total variance and the policy rejects it.
    #[error("Negative residual variance: {radicand}")]
    NegativeVariance {
        /// The offending value of var(instrument) - beta^2 var(benchmark)
        radicand: f64,
    },

    /// Requested window length of zero.
    #[error("Invalid window: requested months must be at least 1")]
    EmptyWindow,

    /// A period label could not be parsed.
    #[error("Invalid period label: {0}")]
    InvalidPeriod(String),
}

impl CapmError {
    /// Whether the error belongs to the insufficient-data class (degenerate regression).
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. } | Self::ConstantBenchmark { .. })
    }
}
