//! Single-factor OLS regression of instrument excess returns on benchmark excess returns.
//!
//! Solves `y = alpha + beta * x + e` in closed form:
//! `beta = sum((x - x_bar)(y - y_bar)) / sum((x - x_bar)^2)`, `alpha = y_bar - beta * x_bar`.

use ndarray::Array1;

use crate::{CapmError, Result, SeriesKind};

/// Result of the CAPM regression.
#[derive(Debug, Clone, PartialEq)]
pub struct CapmFit {
    /// Slope: sensitivity to the benchmark
    pub beta: f64,
    /// Intercept: excess return not explained by the benchmark
    pub alpha: f64,
    /// Share of instrument variance explained by the fit
    pub r_squared: f64,
    /// `y - (alpha + beta * x)` per period
    pub residuals: Array1<f64>,
}

impl CapmFit {
    /// Number of periods used in the fit.
    pub fn observations(&self) -> usize {
        self.residuals.len()
    }
}

/// Fit `instrument_excess` (dependent) on `benchmark_excess` (independent) with an intercept.
///
/// # Errors
/// * `CapmError::DimensionMismatch` if the sequences differ in length
/// * `CapmError::InsufficientData` with fewer than two periods
/// * `CapmError::NonFinite` if either sequence contains an infinity or NaN
/// * `CapmError::ConstantBenchmark` if the benchmark has no variance
pub fn fit(instrument_excess: &Array1<f64>, benchmark_excess: &Array1<f64>) -> Result<CapmFit> {
    let n = instrument_excess.len();
    if benchmark_excess.len() != n {
        return Err(CapmError::DimensionMismatch {
            expected: n,
            actual: benchmark_excess.len(),
        });
    }
    if n < 2 {
        return Err(CapmError::InsufficientData {
            required: 2,
            actual: n,
        });
    }
    check_finite(SeriesKind::Instrument, instrument_excess)?;
    check_finite(SeriesKind::Benchmark, benchmark_excess)?;

    let y = instrument_excess;
    let x = benchmark_excess;
    let x_mean = x.mean().unwrap_or(0.0);
    let y_mean = y.mean().unwrap_or(0.0);

    let sxx: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();
    if sxx <= rounding_floor(x) {
        return Err(CapmError::ConstantBenchmark { observations: n });
    }
    let sxy: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(xi, yi)| (xi - x_mean) * (yi - y_mean))
        .sum();

    let beta = sxy / sxx;
    let alpha = y_mean - beta * x_mean;

    let fitted = x.mapv(|xi| alpha + beta * xi);
    let residuals = y - &fitted;

    let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r.powi(2)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Ok(CapmFit {
        beta,
        alpha,
        r_squared,
        residuals,
    })
}

/// Largest sum of squares that summation error alone can produce for a constant `x`.
///
/// The computed mean of `n` equal values is off by at most about `n * eps * max|x|`, so
/// anything at or below `n` times that squared carries no real spread. All zeros give zero.
fn rounding_floor(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let max_abs = x.iter().fold(0.0_f64, |acc, xi| acc.max(xi.abs()));
    let mean_error = n * f64::EPSILON * max_abs;
    n * mean_error * mean_error
}

fn check_finite(series: SeriesKind, values: &Array1<f64>) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(CapmError::NonFinite { series, index }),
        None => Ok(()),
    }
}
