//! Batch run summary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::TickerOutcome;

/// Counts and averages over a batch of outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Tickers processed.
    pub total: usize,

    /// Tickers with estimated parameters.
    pub estimated: usize,

    /// Tickers that produced a placeholder.
    pub failed: usize,

    /// Mean beta over estimated tickers.
    pub mean_beta: Option<f64>,

    /// Mean months used over estimated tickers.
    pub mean_months_used: Option<f64>,
}

impl BatchSummary {
    /// Summarize `outcomes`.
    pub fn from_outcomes(outcomes: &[TickerOutcome]) -> Self {
        let records: Vec<_> = outcomes.iter().filter_map(TickerOutcome::record).collect();
        let estimated = records.len();

        let mean = |values: Vec<f64>| {
            (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
        };

        Self {
            total: outcomes.len(),
            estimated,
            failed: outcomes.len() - estimated,
            mean_beta: mean(records.iter().map(|r| r.beta).collect()),
            mean_months_used: mean(records.iter().map(|r| r.months_used as f64).collect()),
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticker{}: {} estimated, {} failed",
            self.total,
            if self.total == 1 { "" } else { "s" },
            self.estimated,
            self.failed
        )?;
        if let Some(beta) = self.mean_beta {
            write!(f, " (mean beta {beta:.3})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResultRecord;
    use approx::assert_relative_eq;

    fn record(ticker: &str, beta: f64, months_used: usize) -> TickerOutcome {
        TickerOutcome::Estimated(ResultRecord {
            ticker: ticker.to_string(),
            beta,
            alpha: 0.0,
            idiosyncratic_risk: 0.05,
            months_used,
        })
    }

    #[test]
    fn test_summary_counts() {
        let outcomes = vec![
            record("A", 1.0, 60),
            TickerOutcome::failed("B", "no prices"),
            record("C", 0.5, 30),
        ];
        let summary = BatchSummary::from_outcomes(&outcomes);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.estimated, 2);
        assert_eq!(summary.failed, 1);
        assert_relative_eq!(summary.mean_beta.unwrap(), 0.75);
        assert_relative_eq!(summary.mean_months_used.unwrap(), 45.0);
        assert_eq!(
            summary.to_string(),
            "3 tickers: 2 estimated, 1 failed (mean beta 0.750)"
        );
    }

    #[test]
    fn test_summary_all_failed() {
        let outcomes = vec![TickerOutcome::failed("B", "no prices")];
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.mean_beta, None);
        assert_eq!(summary.to_string(), "1 ticker: 0 estimated, 1 failed");
    }

    #[test]
    fn test_summary_empty_batch() {
        let summary = BatchSummary::from_outcomes(&[]);
        assert_eq!(summary.to_string(), "0 tickers: 0 estimated, 0 failed");
    }
}
