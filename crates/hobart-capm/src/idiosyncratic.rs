//! Idiosyncratic risk from total and systematic variance.
//!
//! `sqrt(var(instrument) - beta^2 * var(benchmark))` with population variances. The two
//! sequences must be the ones the beta was fitted on, at the same adjustment stage.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{CapmError, Result};

/// What to do when systematic variance exceeds total variance.
///
/// For an OLS beta fitted on the same sequences the radicand equals the residual variance and
/// is non-negative up to rounding, so a negative value is either rounding noise or a beta that
/// came from elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NegativeVariancePolicy {
    /// Report zero idiosyncratic risk.
    #[default]
    ClampToZero,
    /// Report NaN, as an unguarded square root would.
    Propagate,
    /// Fail with [`CapmError::NegativeVariance`].
    Reject,
}

/// Population variance (divides by N). NaN for an empty sequence.
pub fn population_variance(values: &Array1<f64>) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.var(0.0)
}

/// Residual risk magnitude implied by `beta`.
///
/// # Errors
/// * `CapmError::DimensionMismatch` if the sequences differ in length
/// * `CapmError::InsufficientData` if they are empty
/// * `CapmError::NegativeVariance` under [`NegativeVariancePolicy::Reject`]
pub fn idiosyncratic_risk(
    beta: f64,
    instrument_returns: &Array1<f64>,
    benchmark_returns: &Array1<f64>,
    policy: NegativeVariancePolicy,
) -> Result<f64> {
    if instrument_returns.len() != benchmark_returns.len() {
        return Err(CapmError::DimensionMismatch {
            expected: instrument_returns.len(),
            actual: benchmark_returns.len(),
        });
    }
    if instrument_returns.is_empty() {
        return Err(CapmError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let radicand = population_variance(instrument_returns)
        - beta.powi(2) * population_variance(benchmark_returns);

    if radicand >= 0.0 || radicand.is_nan() {
        return Ok(radicand.sqrt());
    }

    match policy {
        NegativeVariancePolicy::ClampToZero => {
            tracing::debug!(radicand, "clamping negative residual variance to zero");
            Ok(0.0)
        }
        NegativeVariancePolicy::Propagate => Ok(f64::NAN),
        NegativeVariancePolicy::Reject => Err(CapmError::NegativeVariance { radicand }),
    }
}
