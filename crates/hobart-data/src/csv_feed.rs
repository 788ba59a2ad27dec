//! Offline feeds backed by CSV files.
//!
//! Prices live in one file per ticker, `<dir>/<TICKER>.csv`, with a `date,close` header.
//! Rates live in a single `date,rate` file holding percentages; `NA` marks a missing quote.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use hobart_capm::PriceObservation;
use serde::Deserialize;

use crate::error::{DataError, Result, check_range};
use crate::treasury::{DailyYield, RateConvention, parse_percent, to_rate_observations};
use crate::{PriceFeed, RateFeed, Ticker};

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: NaiveDate,
    close: f64,
}

#[derive(Debug, Deserialize)]
struct RateRow {
    date: NaiveDate,
    rate: String,
}

/// Price feed reading `<TICKER>.csv` files from a directory.
#[derive(Debug, Clone)]
pub struct CsvPriceFeed {
    dir: PathBuf,
}

impl CsvPriceFeed {
    /// Feed rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `ticker`'s prices.
    pub fn path_for(&self, ticker: &Ticker) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }
}

impl PriceFeed for CsvPriceFeed {
    async fn daily_prices(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceObservation>> {
        check_range(start, end)?;

        let path = self.path_for(ticker);
        let contents = read_file(&path, ticker.as_str()).await?;
        let mut rows = parse_price_csv(&contents)?;
        rows.retain(|(date, _)| *date >= start && *date <= end);

        if rows.is_empty() {
            return Err(DataError::MissingData {
                symbol: ticker.to_string(),
                reason: format!("no prices between {start} and {end}"),
            });
        }

        Ok(rows
            .into_iter()
            .map(|(date, close)| PriceObservation::dated(date, close))
            .collect())
    }
}

/// Rate feed reading a single `date,rate` file.
#[derive(Debug, Clone)]
pub struct CsvRateFeed {
    path: PathBuf,
    convention: RateConvention,
}

impl CsvRateFeed {
    /// Feed reading `path`, rates taken as quoted.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            convention: RateConvention::default(),
        }
    }

    /// Apply `convention` to the quoted percentages.
    pub const fn with_convention(mut self, convention: RateConvention) -> Self {
        self.convention = convention;
        self
    }
}

impl RateFeed for CsvRateFeed {
    async fn daily_rates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceObservation>> {
        check_range(start, end)?;

        let contents = read_file(&self.path, "risk-free").await?;
        let yields = parse_rate_csv(&contents)?;
        let observations = to_rate_observations(&yields, self.convention, start, end);
        if observations.is_empty() {
            return Err(DataError::MissingData {
                symbol: "risk-free".to_string(),
                reason: format!("no rates between {start} and {end}"),
            });
        }
        Ok(observations)
    }
}

/// Parse `date,close` rows, sorted oldest first.
///
/// # Errors
/// Returns `DataError::Csv` for malformed rows.
pub fn parse_price_csv(contents: &str) -> Result<Vec<(NaiveDate, f64)>> {
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let row: PriceRow = row?;
        rows.push((row.date, row.close));
    }
    rows.sort_by_key(|(date, _)| *date);
    Ok(rows)
}

/// Parse `date,rate` rows of quoted percentages, sorted oldest first.
///
/// # Errors
/// Returns `DataError::Csv` for malformed rows and `DataError::Parse` for unreadable rates.
pub fn parse_rate_csv(contents: &str) -> Result<Vec<DailyYield>> {
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let mut yields = Vec::new();
    for row in reader.deserialize() {
        let row: RateRow = row?;
        yields.push(DailyYield {
            date: row.date,
            percent: parse_percent(&row.rate)?,
        });
    }
    yields.sort_by_key(|y| y.date);
    Ok(yields)
}

async fn read_file(path: &Path, symbol: &str) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DataError::MissingData {
            symbol: symbol.to_string(),
            reason: format!("{} not found", path.display()),
        }),
        Err(e) => Err(DataError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hobart_capm::Period;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_price_csv_sorts() {
        let rows = parse_price_csv("date,close\n2024-01-03,10.5\n2024-01-02,10.0\n").unwrap();
        assert_eq!(rows, vec![(date(2024, 1, 2), 10.0), (date(2024, 1, 3), 10.5)]);
    }

    #[test]
    fn test_parse_price_csv_malformed() {
        assert!(matches!(
            parse_price_csv("date,close\n2024-01-02,abc\n"),
            Err(DataError::Csv(_))
        ));
    }

    #[test]
    fn test_parse_rate_csv_missing_values() {
        let yields = parse_rate_csv("date,rate\n2024-01-02,5.55\n2024-01-03,NA\n").unwrap();
        assert_eq!(yields[0].percent, Some(5.55));
        assert_eq!(yields[1].percent, None);
    }

    #[tokio::test]
    async fn test_price_feed_reads_ticker_file() {
        let dir = std::env::temp_dir().join("hobart-csv-feed-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("ABC.csv"),
            "date,close\n2023-12-29,9.0\n2024-01-02,10.0\n2024-02-01,11.0\n",
        )
        .unwrap();

        let feed = CsvPriceFeed::new(&dir);
        let ticker = Ticker::new("ABC").unwrap();
        let observations = feed
            .daily_prices(&ticker, date(2024, 1, 1), date(2024, 12, 31))
            .await
            .unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].period, Period::new(2024, 1).unwrap());
        assert_eq!(observations[1].price, 11.0);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_price_feed_unknown_ticker() {
        let feed = CsvPriceFeed::new(std::env::temp_dir().join("hobart-csv-feed-empty"));
        let ticker = Ticker::new("NOPE").unwrap();
        let result = feed
            .daily_prices(&ticker, date(2024, 1, 1), date(2024, 12, 31))
            .await;
        assert!(matches!(result, Err(DataError::MissingData { .. })));
    }

    #[tokio::test]
    async fn test_rate_feed_convention() {
        let path = std::env::temp_dir().join("hobart-csv-rates-test.csv");
        std::fs::write(&path, "date,rate\n2024-01-02,6.0\n2024-01-03,NA\n").unwrap();

        let feed = CsvRateFeed::new(&path).with_convention(RateConvention::Monthly);
        let rates = feed
            .daily_rates(date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();

        assert_eq!(rates.len(), 2);
        assert_abs_diff_eq!(rates[0].price, 0.005, epsilon = 1e-15);
        assert_eq!(rates[1].price, 0.0);

        std::fs::remove_file(path).ok();
    }
}
