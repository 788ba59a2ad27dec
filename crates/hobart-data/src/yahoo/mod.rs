//! Yahoo Finance data providers.

pub mod quotes;

pub use quotes::{PriceField, YahooQuoteProvider};
