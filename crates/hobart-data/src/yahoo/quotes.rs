//! Quote data fetching from Yahoo Finance.

use crate::error::{DataError, Result, check_range};
use crate::{PriceFeed, Ticker};
use chrono::{DateTime, NaiveDate, NaiveTime};
use hobart_capm::PriceObservation;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Which quote field to treat as the period price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceField {
    /// Raw close
    #[default]
    Close,
    /// Dividend- and split-adjusted close
    AdjustedClose,
}

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
    field: PriceField,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a new Yahoo Finance quote provider with default rate limiting (1 req/sec).
    ///
    /// # Errors
    /// Returns `DataError::YahooApi` if the HTTP connector cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(1000))
    }

    /// Create a new Yahoo Finance quote provider with custom rate limiting.
    ///
    /// # Errors
    /// Returns `DataError::YahooApi` if the HTTP connector cannot be built.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
            field: PriceField::default(),
        })
    }

    /// Use `field` as the observed price.
    pub const fn with_field(mut self, field: PriceField) -> Self {
        self.field = field;
        self
    }

    /// Quote field read as the period price.
    pub const fn field(&self) -> PriceField {
        self.field
    }

    /// Fetch daily prices for a single symbol.
    ///
    /// # Arguments
    /// * `symbol` - The ticker symbol (e.g., "AAPL")
    /// * `start` - First day of the range
    /// * `end` - Last day of the range
    ///
    /// # Returns
    /// One observation per trading day, oldest first
    pub async fn fetch_quotes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceObservation>> {
        check_range(start, end)?;

        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let start_time = to_offset_datetime(start, NaiveTime::MIN)?;
        // Midnight after the last day, so that day's quote is included.
        let end_time = to_offset_datetime(end.succ_opt().unwrap_or(end), NaiveTime::MIN)?;

        let response = self
            .provider
            .get_quote_history(symbol, start_time, end_time)
            .await?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        if quotes.is_empty() {
            return Err(DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "No data returned from Yahoo Finance".to_string(),
            });
        }

        let mut observations = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let timestamp = quote.timestamp;
            let date = DateTime::from_timestamp(timestamp, 0)
                .ok_or_else(|| DataError::TimeConversion(format!("timestamp {timestamp}")))?
                .date_naive();
            let price = match self.field {
                PriceField::Close => quote.close,
                PriceField::AdjustedClose => quote.adjclose,
            };
            observations.push(PriceObservation::dated(date, price));
        }

        tracing::debug!(symbol, days = observations.len(), "fetched quotes");

        // Apply rate limiting
        sleep(self.rate_limit_delay).await;

        Ok(observations)
    }
}

impl PriceFeed for YahooQuoteProvider {
    async fn daily_prices(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceObservation>> {
        self.fetch_quotes(ticker.as_str(), start, end).await
    }
}

fn to_offset_datetime(date: NaiveDate, at: NaiveTime) -> Result<time::OffsetDateTime> {
    let timestamp = date.and_time(at).and_utc().timestamp();
    time::OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}
