//! Batch estimation over a ticker list.
//!
//! The market context (benchmark and risk-free monthly series) is loaded once; a failure there
//! aborts the run. Every ticker afterwards yields exactly one [`TickerOutcome`], a failure
//! placeholder when its prices cannot be fetched or its parameters cannot be estimated.

use chrono::{Months, NaiveDate};
use futures::future;
use futures::stream::{self, StreamExt};
use hobart_capm::{CapmConfig, CapmEstimator, MarketContext, Period, to_monthly};
use hobart_data::{DataError, PriceFeed, RateFeed, Ticker};
use hobart_output::{ResultRecord, TickerOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Benchmark symbol (Russell 2000 ETF).
pub const DEFAULT_BENCHMARK: &str = "IWM";

/// Years of daily history requested from the feeds.
pub const DEFAULT_LOOKBACK_YEARS: u32 = 5;

/// Errors that abort a batch before any ticker is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The benchmark feed failed.
    #[error("benchmark {symbol} unavailable: {source}")]
    Benchmark {
        /// Benchmark symbol
        symbol: String,
        /// Feed error
        #[source]
        source: DataError,
    },

    /// The benchmark feed returned nothing.
    #[error("benchmark {0} returned no prices")]
    EmptyBenchmark(String),

    /// The risk-free feed failed.
    #[error("risk-free rates unavailable: {0}")]
    RiskFree(#[source] DataError),

    /// No risk-free rate at or after the benchmark's first month.
    #[error("no risk-free rates from {0} onwards")]
    EmptyRiskFree(Period),

    /// The ticker list could not be read.
    #[error("ticker list unavailable: {0}")]
    Tickers(#[source] DataError),
}

/// Batch run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Benchmark symbol (default: IWM)
    pub benchmark: String,
    /// Years of daily history to fetch (default: 5)
    pub lookback_years: u32,
    /// Tickers fetched at once; 1 is strictly sequential (default: 1)
    pub concurrency: usize,
    /// Estimation settings
    pub capm: CapmConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            benchmark: DEFAULT_BENCHMARK.to_string(),
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            concurrency: 1,
            capm: CapmConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Fetch range ending on `end`, `lookback_years` long.
    pub fn date_range(&self, end: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = end
            .checked_sub_months(Months::new(self.lookback_years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN);
        (start, end)
    }
}

/// Load the benchmark and risk-free monthly series shared by every ticker.
///
/// The risk-free series is cut to start at the benchmark's first month.
///
/// # Errors
/// Returns a `BatchError` if either feed fails or returns nothing usable.
pub async fn load_market_context<P, R>(
    prices: &P,
    rates: &R,
    benchmark: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<MarketContext, BatchError>
where
    P: PriceFeed,
    R: RateFeed,
{
    let benchmark_error = |source| BatchError::Benchmark {
        symbol: benchmark.to_string(),
        source,
    };
    let ticker = Ticker::new(benchmark).map_err(benchmark_error)?;
    let observations = prices
        .daily_prices(&ticker, start, end)
        .await
        .map_err(benchmark_error)?;
    let benchmark_series = to_monthly(&observations);
    let first = benchmark_series
        .first_period()
        .ok_or_else(|| BatchError::EmptyBenchmark(benchmark.to_string()))?;

    let rate_observations = rates
        .daily_rates(start, end)
        .await
        .map_err(BatchError::RiskFree)?;
    let risk_free = to_monthly(&rate_observations).since(first);
    if risk_free.is_empty() {
        return Err(BatchError::EmptyRiskFree(first));
    }

    tracing::info!(
        benchmark,
        benchmark_months = benchmark_series.len(),
        risk_free_months = risk_free.len(),
        "loaded market context"
    );

    Ok(MarketContext::new(benchmark_series, risk_free))
}

/// Runs every ticker through the estimator against one market context.
#[derive(Debug)]
pub struct BatchDriver<'a, P> {
    feed: &'a P,
    context: &'a MarketContext,
    estimator: CapmEstimator,
    start: NaiveDate,
    end: NaiveDate,
    concurrency: usize,
}

impl<'a, P: PriceFeed> BatchDriver<'a, P> {
    /// Create a driver fetching ticker prices from `feed` over `start..=end`.
    pub fn new(
        feed: &'a P,
        context: &'a MarketContext,
        config: &BatchConfig,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            feed,
            context,
            estimator: CapmEstimator::new(config.capm.clone()),
            start,
            end,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Estimate one ticker. Never fails: errors become a placeholder outcome.
    pub async fn process(&self, ticker: &Ticker) -> TickerOutcome {
        let observations = match self.feed.daily_prices(ticker, self.start, self.end).await {
            Ok(observations) => observations,
            Err(e) => {
                tracing::warn!(%ticker, error = %e, "price fetch failed");
                return TickerOutcome::failed(ticker.as_str(), e);
            }
        };

        let prices = to_monthly(&observations);
        match self.estimator.estimate(self.context, &prices) {
            Ok(estimate) => {
                tracing::debug!(
                    %ticker,
                    beta = estimate.beta,
                    months = estimate.months_used,
                    "estimated"
                );
                ResultRecord::from_estimate(ticker.as_str(), &estimate).into()
            }
            Err(e) => {
                tracing::warn!(%ticker, error = %e, "estimation failed");
                TickerOutcome::failed(ticker.as_str(), e)
            }
        }
    }

    /// Process `tickers`, calling `observer` on each outcome as it completes.
    ///
    /// Outcomes are returned, and observed, in input order.
    pub async fn run(
        &self,
        tickers: &[Ticker],
        mut observer: impl FnMut(&TickerOutcome),
    ) -> Vec<TickerOutcome> {
        let mut outcomes = Vec::with_capacity(tickers.len());

        stream::iter(tickers)
            .map(|ticker| self.process(ticker))
            .buffered(self.concurrency)
            .for_each(|outcome| {
                observer(&outcome);
                outcomes.push(outcome);
                future::ready(())
            })
            .await;

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(5, "2019-03-15")]
    #[case(1, "2023-03-15")]
    #[case(0, "2024-03-15")]
    fn test_date_range(#[case] years: u32, #[case] expected: &str) {
        let config = BatchConfig {
            lookback_years: years,
            ..Default::default()
        };
        let end = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let (start, to) = config.date_range(end);
        assert_eq!(start.to_string(), expected);
        assert_eq!(to, end);
    }

    #[test]
    fn test_default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.benchmark, "IWM");
        assert_eq!(config.lookback_years, 5);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.capm.months, 60);
    }

    #[test]
    fn test_error_messages() {
        let err = BatchError::Benchmark {
            symbol: "IWM".to_string(),
            source: DataError::InvalidSymbol("Empty symbol".to_string()),
        };
        assert!(err.to_string().starts_with("benchmark IWM unavailable"));

        let err = BatchError::EmptyRiskFree(Period::new(2020, 1).unwrap());
        assert_eq!(err.to_string(), "no risk-free rates from 2020-01 onwards");
    }
}
