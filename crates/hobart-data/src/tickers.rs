//! Ticker symbols and the newline-delimited ticker list.

use std::path::Path;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{DataError, Result};

/// Stock ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Create a ticker, rejecting empty or whitespace-only symbols.
    ///
    /// # Errors
    /// Returns `DataError::InvalidSymbol` for an empty symbol.
    pub fn new(symbol: impl Into<String>) -> Result<Self> {
        let symbol = symbol.into();
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse a ticker list: one symbol per line.
///
/// Blank lines and lines starting with `#` are skipped; surrounding whitespace is trimmed.
pub fn parse_tickers(contents: &str) -> Vec<Ticker> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| Ticker(line.to_string()))
        .collect()
}

/// Read a ticker list file.
///
/// # Errors
/// Returns `DataError::Io` if the file cannot be read.
pub async fn read_tickers(path: impl AsRef<Path>) -> Result<Vec<Ticker>> {
    let contents = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(parse_tickers(&contents))
}
