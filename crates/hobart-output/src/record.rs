//! Per-ticker result records.

use hobart_capm::CapmEstimate;
use serde::{Deserialize, Deserializer, Serialize};

/// Decimal places kept for beta and alpha.
pub const COEFFICIENT_DECIMALS: i32 = 7;

/// Text placed in the beta column of a failed ticker's row.
pub const FAILURE_MARKER: &str = "NO BETA COMPUTED";

/// Round `value` to `places` decimal places, half away from zero.
///
/// Values that round to zero come back as `+0.0`, so a tiny negative coefficient prints as `0`
/// rather than `-0`. NaN passes through.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn nan_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Estimated CAPM parameters for one ticker.
///
/// An undefined idiosyncratic risk (see `NegativeVariancePolicy::Propagate`) is NaN. The CSV
/// table prints it as `NaN`; JSON has no NaN, so it is written as `null` and read back as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Ticker symbol.
    #[serde(rename = "Ticker")]
    pub ticker: String,

    /// Beta, rounded.
    #[serde(rename = "Beta")]
    pub beta: f64,

    /// Alpha, rounded.
    #[serde(rename = "Alpha")]
    pub alpha: f64,

    /// Idiosyncratic risk at natural precision.
    #[serde(rename = "Idiosyncratic risk", deserialize_with = "nan_if_null")]
    pub idiosyncratic_risk: f64,

    /// Months in the estimation window.
    #[serde(rename = "Months Used")]
    pub months_used: usize,
}

impl ResultRecord {
    /// Build a record from an estimate, rounding beta and alpha.
    pub fn from_estimate(ticker: impl Into<String>, estimate: &CapmEstimate) -> Self {
        Self {
            ticker: ticker.into(),
            beta: round_to(estimate.beta, COEFFICIENT_DECIMALS),
            alpha: round_to(estimate.alpha, COEFFICIENT_DECIMALS),
            idiosyncratic_risk: estimate.idiosyncratic_risk,
            months_used: estimate.months_used,
        }
    }

    fn csv_fields(&self) -> [String; 5] {
        [
            self.ticker.clone(),
            self.beta.to_string(),
            self.alpha.to_string(),
            self.idiosyncratic_risk.to_string(),
            self.months_used.to_string(),
        ]
    }
}

/// What the batch produced for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TickerOutcome {
    /// Parameters were estimated.
    Estimated(ResultRecord),

    /// No parameters could be computed.
    Failed {
        /// Ticker symbol.
        ticker: String,
        /// Why the ticker failed.
        reason: String,
    },
}

impl TickerOutcome {
    /// Failed outcome for `ticker`.
    pub fn failed(ticker: impl Into<String>, reason: impl ToString) -> Self {
        Self::Failed {
            ticker: ticker.into(),
            reason: reason.to_string(),
        }
    }

    /// The ticker this outcome belongs to.
    pub fn ticker(&self) -> &str {
        match self {
            Self::Estimated(record) => &record.ticker,
            Self::Failed { ticker, .. } => ticker,
        }
    }

    /// The record, if estimation succeeded.
    pub const fn record(&self) -> Option<&ResultRecord> {
        match self {
            Self::Estimated(record) => Some(record),
            Self::Failed { .. } => None,
        }
    }

    /// Whether this is a failure placeholder.
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The five table columns for this outcome.
    ///
    /// A failure keeps the ticker, puts the marker and reason in the beta column and leaves
    /// the rest empty.
    pub fn csv_fields(&self) -> [String; 5] {
        match self {
            Self::Estimated(record) => record.csv_fields(),
            Self::Failed { ticker, reason } => [
                ticker.clone(),
                format!("{FAILURE_MARKER}: {reason}"),
                String::new(),
                String::new(),
                String::new(),
            ],
        }
    }
}

impl From<ResultRecord> for TickerOutcome {
    fn from(record: ResultRecord) -> Self {
        Self::Estimated(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn estimate() -> CapmEstimate {
        CapmEstimate {
            beta: 1.234_567_891_2,
            alpha: -0.000_123_456_78,
            idiosyncratic_risk: 0.051_234_567_891,
            months_used: 48,
            r_squared: 0.4,
        }
    }

    #[rstest]
    #[case(1.234_567_891_2, 1.234_567_9)]
    #[case(-0.000_123_456_78, -0.000_123_5)]
    #[case(2.0, 2.0)]
    #[case(0.0, 0.0)]
    fn test_round_to_seven(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(round_to(value, COEFFICIENT_DECIMALS), expected);
    }

    #[test]
    fn test_round_to_keeps_nan() {
        assert!(round_to(f64::NAN, COEFFICIENT_DECIMALS).is_nan());
    }

    #[rstest]
    #[case(-1e-9)]
    #[case(-0.0)]
    #[case(-0.000_000_04)]
    fn test_round_to_never_negative_zero(#[case] value: f64) {
        let rounded = round_to(value, COEFFICIENT_DECIMALS);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());
        assert_eq!(rounded.to_string(), "0");
    }

    #[test]
    fn test_nan_risk_rendering() {
        let record = ResultRecord {
            idiosyncratic_risk: f64::NAN,
            ..ResultRecord::from_estimate("GE", &estimate())
        };
        assert_eq!(record.csv_fields()[3], "NaN");

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["Idiosyncratic risk"].is_null());

        let parsed: ResultRecord = serde_json::from_value(json).unwrap();
        assert!(parsed.idiosyncratic_risk.is_nan());
        assert_eq!(parsed.beta, record.beta);
    }

    #[test]
    fn test_record_from_estimate() {
        let record = ResultRecord::from_estimate("AAPL", &estimate());
        assert_eq!(record.ticker, "AAPL");
        assert_eq!(record.beta, 1.234_567_9);
        assert_eq!(record.alpha, -0.000_123_5);
        assert_eq!(record.idiosyncratic_risk, 0.051_234_567_891);
        assert_eq!(record.months_used, 48);
    }

    #[test]
    fn test_failed_fields() {
        let outcome = TickerOutcome::failed("ZZZZ", "no prices");
        assert!(outcome.is_failed());
        assert_eq!(outcome.ticker(), "ZZZZ");
        assert!(outcome.record().is_none());
        assert_eq!(
            outcome.csv_fields(),
            [
                "ZZZZ".to_string(),
                "NO BETA COMPUTED: no prices".to_string(),
                String::new(),
                String::new(),
                String::new()
            ]
        );
    }

    #[test]
    fn test_estimated_fields() {
        let outcome = TickerOutcome::from(ResultRecord::from_estimate("KO", &estimate()));
        assert!(!outcome.is_failed());
        let fields = outcome.csv_fields();
        assert_eq!(fields[0], "KO");
        assert_eq!(fields[1], "1.2345679");
        assert_eq!(fields[4], "48");
    }
}
