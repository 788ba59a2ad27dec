//! Per-instrument CAPM estimation against a shared market context.

use serde::{Deserialize, Serialize};

use crate::{
    CapmConfig, MonthlySeries, Result, align::align, idiosyncratic::idiosyncratic_risk,
    regression::fit,
};

/// Benchmark prices and risk-free rates shared by every instrument in a run.
///
/// Built once and only ever read during estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketContext {
    benchmark: MonthlySeries,
    risk_free: MonthlySeries,
}

impl MarketContext {
    /// Create a context from monthly benchmark prices and monthly risk-free rates.
    pub const fn new(benchmark: MonthlySeries, risk_free: MonthlySeries) -> Self {
        Self {
            benchmark,
            risk_free,
        }
    }

    /// Monthly benchmark prices.
    pub const fn benchmark(&self) -> &MonthlySeries {
        &self.benchmark
    }

    /// Monthly risk-free rates.
    pub const fn risk_free(&self) -> &MonthlySeries {
        &self.risk_free
    }
}

/// CAPM parameters for one instrument, at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmEstimate {
    /// Regression slope on benchmark excess returns
    pub beta: f64,
    /// Regression intercept
    pub alpha: f64,
    /// `sqrt(var(instrument) - beta^2 var(benchmark))`
    pub idiosyncratic_risk: f64,
    /// Monthly prices in the estimation window
    pub months_used: usize,
    /// Goodness of fit
    pub r_squared: f64,
}

/// Runs alignment, regression and idiosyncratic risk for one instrument at a time.
#[derive(Debug, Clone, Default)]
pub struct CapmEstimator {
    config: CapmConfig,
}

impl CapmEstimator {
    /// Create an estimator.
    pub const fn new(config: CapmConfig) -> Self {
        Self { config }
    }

    /// Estimator settings.
    pub const fn config(&self) -> &CapmConfig {
        &self.config
    }

    /// Estimate beta, alpha and idiosyncratic risk for `prices`.
    ///
    /// # Errors
    /// Any alignment, regression or idiosyncratic-risk error for this instrument.
    pub fn estimate(&self, context: &MarketContext, prices: &MonthlySeries) -> Result<CapmEstimate> {
        let window = align(
            context.benchmark(),
            prices,
            context.risk_free(),
            self.config.months,
            self.config.alignment,
        )?;

        let result = fit(&window.instrument_excess, &window.benchmark_excess)?;
        // Same excess sequences the beta was fitted on.
        let idiosyncratic_risk = idiosyncratic_risk(
            result.beta,
            &window.instrument_excess,
            &window.benchmark_excess,
            self.config.negative_variance,
        )?;

        tracing::trace!(
            months = window.window_len,
            beta = result.beta,
            alpha = result.alpha,
            "capm fit"
        );

        Ok(CapmEstimate {
            beta: result.beta,
            alpha: result.alpha,
            idiosyncratic_risk,
            months_used: window.window_len,
            r_squared: result.r_squared,
        })
    }
}
