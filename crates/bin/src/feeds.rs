//! Feed selection: online providers or offline files.

use chrono::NaiveDate;
use hobart_capm::PriceObservation;
use hobart_data::treasury::YieldCurveConfig;
use hobart_data::{
    CsvPriceFeed, CsvRateFeed, PriceFeed, RateFeed, Result, Ticker, TreasuryClient,
    YahooQuoteProvider,
};

use crate::cli::Cli;

#[derive(Debug)]
pub(crate) enum PriceSource {
    Yahoo(YahooQuoteProvider),
    Files(CsvPriceFeed),
}

impl PriceSource {
    pub(crate) fn from_cli(cli: &Cli) -> Result<Self> {
        match &cli.prices_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "reading prices from files");
                Ok(Self::Files(CsvPriceFeed::new(dir)))
            }
            None => Ok(Self::Yahoo(
                YahooQuoteProvider::new()?.with_field(cli.price_field()),
            )),
        }
    }
}

impl PriceFeed for PriceSource {
    async fn daily_prices(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceObservation>> {
        match self {
            Self::Yahoo(feed) => feed.daily_prices(ticker, start, end).await,
            Self::Files(feed) => feed.daily_prices(ticker, start, end).await,
        }
    }
}

#[derive(Debug)]
pub(crate) enum RateSource {
    Treasury(TreasuryClient),
    File(CsvRateFeed),
}

impl RateSource {
    pub(crate) fn from_cli(cli: &Cli) -> Result<Self> {
        let curve: YieldCurveConfig = cli.yield_curve();
        match &cli.rates_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "reading risk-free rates from file");
                Ok(Self::File(
                    CsvRateFeed::new(path).with_convention(curve.convention),
                ))
            }
            None => Ok(Self::Treasury(TreasuryClient::new()?.with_config(curve))),
        }
    }
}

impl RateFeed for RateSource {
    async fn daily_rates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceObservation>> {
        match self {
            Self::Treasury(feed) => feed.daily_rates(start, end).await,
            Self::File(feed) => feed.daily_rates(start, end).await,
        }
    }
}
