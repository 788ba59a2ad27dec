//! Export of batch outcomes as CSV or JSON.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::TickerOutcome;

/// Column header of the CSV table.
pub const CSV_HEADER: [&str; 5] = ["Ticker", "Beta", "Alpha", "Idiosyncratic risk", "Months Used"];

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output was not valid UTF-8.
    #[error("Invalid UTF-8 output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Comma-separated values format.
    #[default]
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Whether `path` carries this format's extension, ignoring case.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::PrettyJson => "pretty-json",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for [TickerOutcome] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.write_record(CSV_HEADER)?;
                for outcome in self {
                    wtr.write_record(outcome.csv_fields())?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                Ok(String::from_utf8(bytes)?)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<TickerOutcome> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        self.as_slice().export_to_string(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResultRecord;
    use rstest::rstest;

    fn outcomes() -> Vec<TickerOutcome> {
        vec![
            TickerOutcome::Estimated(ResultRecord {
                ticker: "AAPL".to_string(),
                beta: 1.1834211,
                alpha: 0.0123456,
                idiosyncratic_risk: 0.0541,
                months_used: 60,
            }),
            TickerOutcome::failed("ZZZZ", "no prices"),
        ]
    }

    #[test]
    fn test_csv_table() {
        let csv = outcomes().export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Ticker,Beta,Alpha,Idiosyncratic risk,Months Used",
                "AAPL,1.1834211,0.0123456,0.0541,60",
                "ZZZZ,NO BETA COMPUTED: no prices,,,",
            ]
        );
    }

    #[test]
    fn test_csv_empty_batch_has_header() {
        let csv = Vec::<TickerOutcome>::new()
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        assert_eq!(csv, "Ticker,Beta,Alpha,Idiosyncratic risk,Months Used\n");
    }

    #[test]
    fn test_csv_quotes_reason_with_comma() {
        let outcomes = vec![TickerOutcome::failed("X", "a, b")];
        let csv = outcomes.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("X,\"NO BETA COMPUTED: a, b\",,,"));
    }

    #[test]
    fn test_json_array() {
        let json = outcomes().export_to_string(ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["status"], "estimated");
        assert_eq!(value[0]["Ticker"], "AAPL");
        assert_eq!(value[0]["Months Used"], 60);
        assert_eq!(value[1]["status"], "failed");
        assert_eq!(value[1]["reason"], "no prices");
    }

    #[test]
    fn test_pretty_json() {
        let json = outcomes().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("\n  "));
        let parsed: Vec<TickerOutcome> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].record().map(|r| r.months_used), Some(60));
        assert_eq!(parsed[1], TickerOutcome::failed("ZZZZ", "no prices"));
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_format_from_str(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_format_from_str_invalid() {
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }

    #[rstest]
    #[case("stock_summary.csv", ExportFormat::Csv, true)]
    #[case("OUT.JSON", ExportFormat::PrettyJson, true)]
    #[case("stock_summary.csv", ExportFormat::Json, false)]
    #[case("stock_summary", ExportFormat::Csv, false)]
    fn test_matches_path(#[case] path: &str, #[case] format: ExportFormat, #[case] expected: bool) {
        assert_eq!(format.matches_path(Path::new(path)), expected);
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join("hobart-export-test.csv");
        outcomes().export_to_file(&path, ExportFormat::Csv).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Ticker,"));
        std::fs::remove_file(path).ok();
    }
}
