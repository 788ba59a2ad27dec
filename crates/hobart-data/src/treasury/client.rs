//! Treasury daily par yield curve client with rate limiting.

use crate::RateFeed;
use crate::error::{DataError, Result, check_range};
use crate::treasury::yield_curve::{
    DailyYield, YieldCurveConfig, parse_yield_curve_xml, to_rate_observations,
};
use chrono::{Datelike, NaiveDate};
use hobart_capm::PriceObservation;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// Treasury interest rate XML endpoint
const TREASURY_XML_URL: &str =
    "https://home.treasury.gov/resource-center/data-chart-center/interest-rates/pages/xml";

/// Default delay between requests
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(250);

const USER_AGENT: &str = "Hobart-CAPM/0.1 (contact@example.com)";

/// Rate limiter spacing consecutive requests
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// Client for the daily Treasury par yield curve.
pub struct TreasuryClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    base_url: String,
    config: YieldCurveConfig,
}

impl std::fmt::Debug for TreasuryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreasuryClient")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TreasuryClient {
    /// Create a client reading the 1-month tenor as quoted.
    ///
    /// # Errors
    /// Returns `DataError::Network` if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(DEFAULT_RATE_LIMIT)
    }

    /// Create a client with a custom delay between requests.
    ///
    /// # Example
    /// ```no_run
    /// use hobart_data::treasury::TreasuryClient;
    /// use std::time::Duration;
    ///
    /// # fn example() -> hobart_data::Result<()> {
    /// let client = TreasuryClient::with_rate_limit(Duration::from_millis(500))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_rate_limit(min_interval: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(min_interval))),
            base_url: TREASURY_XML_URL.to_string(),
            config: YieldCurveConfig::default(),
        })
    }

    /// Select tenor and rate convention.
    pub const fn with_config(mut self, config: YieldCurveConfig) -> Self {
        self.config = config;
        self
    }

    /// Active tenor and rate convention.
    pub const fn config(&self) -> YieldCurveConfig {
        self.config
    }

    /// Fetch every business day of `year` for the configured tenor.
    pub async fn fetch_year(&self, year: i32) -> Result<Vec<DailyYield>> {
        self.rate_limiter.lock().await.wait().await;

        let url = format!(
            "{}?data=daily_treasury_yield_curve&field_tdr_date_value={}",
            self.base_url, year
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch yield curve for {}: HTTP {}",
                year,
                response.status()
            )));
        }

        let body = response.text().await.map_err(DataError::Network)?;
        let yields = parse_yield_curve_xml(&body, self.config.tenor)?;
        tracing::debug!(year, days = yields.len(), "fetched yield curve");
        Ok(yields)
    }
}

impl RateFeed for TreasuryClient {
    async fn daily_rates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceObservation>> {
        check_range(start, end)?;

        let mut yields = Vec::new();
        for year in start.year()..=end.year() {
            yields.extend(self.fetch_year(year).await?);
        }

        let observations = to_rate_observations(&yields, self.config.convention, start, end);
        if observations.is_empty() {
            return Err(DataError::MissingData {
                symbol: self.config.tenor.field_name().to_string(),
                reason: format!("no yields between {start} and {end}"),
            });
        }
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::treasury::{RateConvention, Tenor};

    #[test]
    fn test_client_config() {
        let config = YieldCurveConfig {
            tenor: Tenor::ThreeMonth,
            convention: RateConvention::Monthly,
        };
        let client = TreasuryClient::new().unwrap().with_config(config);
        assert_eq!(client.config(), config);
    }

    #[tokio::test]
    async fn test_invalid_date_range() {
        let client = TreasuryClient::new().unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            client.daily_rates(start, end).await,
            Err(DataError::InvalidDateRange { .. })
        ));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_fetch_year() {
        let client = TreasuryClient::new().unwrap();
        let yields = client.fetch_year(2023).await.unwrap();
        assert!(yields.len() > 200);
        assert!(yields.iter().any(|y| y.percent.is_some()));
    }
}
