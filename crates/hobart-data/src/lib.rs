#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod csv_feed;
pub mod error;
pub mod feed;
pub mod tickers;
pub mod treasury;
pub mod yahoo;

pub use csv_feed::{CsvPriceFeed, CsvRateFeed};
pub use error::{DataError, Result};
pub use feed::{PriceFeed, RateFeed};
pub use tickers::{Ticker, parse_tickers, read_tickers};
pub use treasury::TreasuryClient;
pub use yahoo::YahooQuoteProvider;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
