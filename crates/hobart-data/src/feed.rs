//! Feed abstractions shared by the online and offline providers.

use std::future::Future;

use chrono::NaiveDate;
use hobart_capm::PriceObservation;

use crate::{Result, Ticker};

/// Source of daily prices for a ticker.
pub trait PriceFeed {
    /// Daily closes for `ticker` between `start` and `end` inclusive, oldest first.
    ///
    /// # Errors
    /// Returns an error if the ticker is unknown or the source is unavailable.
    fn daily_prices(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<PriceObservation>>> + Send;
}

/// Source of daily risk-free rates.
///
/// Rates are decimal fractions (a 5.25% yield is `0.0525`), missing quotes are `0.0`.
pub trait RateFeed {
    /// Daily rates between `start` and `end` inclusive, oldest first.
    ///
    /// # Errors
    /// Returns an error if the source is unavailable or malformed.
    fn daily_rates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<PriceObservation>>> + Send;
}
