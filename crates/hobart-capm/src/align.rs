//! Excess return alignment over a trailing window.
//!
//! The window length is `min(requested_months, instrument periods)` and is always taken from
//! the most recent end of each series. Prices in the window become `window_len - 1` simple
//! returns, and the risk-free rate is subtracted period by period.

use std::fmt;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{CapmError, MonthlySeries, Period, Result, series::to_returns};

/// How the benchmark and risk-free series are matched to the instrument window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentMode {
    /// Match by position from the most recent end of each series.
    #[default]
    Positional,
    /// Match by calendar month, driven by the instrument's periods.
    ByPeriod,
}

/// Identifies one of the three series taking part in an estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    /// The benchmark index
    Benchmark,
    /// The instrument being estimated
    Instrument,
    /// The risk-free rate
    RiskFree,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Benchmark => "benchmark",
            Self::Instrument => "instrument",
            Self::RiskFree => "risk-free",
        })
    }
}

/// Excess returns over a common trailing window.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedWindow {
    /// Instrument return minus risk-free rate, per period
    pub instrument_excess: Array1<f64>,
    /// Benchmark return minus risk-free rate, per period
    pub benchmark_excess: Array1<f64>,
    /// Number of monthly prices in the window (returns are one fewer)
    pub window_len: usize,
}

impl AlignedWindow {
    fn empty(window_len: usize) -> Self {
        Self {
            instrument_excess: Array1::zeros(0),
            benchmark_excess: Array1::zeros(0),
            window_len,
        }
    }

    /// Number of excess return periods.
    pub fn len(&self) -> usize {
        self.instrument_excess.len()
    }

    /// Whether the window holds no return periods.
    pub fn is_empty(&self) -> bool {
        self.instrument_excess.is_empty()
    }
}

/// Align instrument and benchmark prices against the risk-free series.
///
/// Both returned sequences have length `window_len - 1`; with fewer than two prices in the
/// window they are empty and the regression step reports insufficient data.
///
/// # Errors
/// * `CapmError::EmptyWindow` if `requested_months` is zero
/// * `CapmError::SeriesTooShort` if, positionally, the benchmark or risk-free series has fewer
///   periods than the window
/// * `CapmError::MissingPeriod` if, by period, a window month is absent from either series
pub fn align(
    benchmark: &MonthlySeries,
    instrument: &MonthlySeries,
    risk_free: &MonthlySeries,
    requested_months: usize,
    mode: AlignmentMode,
) -> Result<AlignedWindow> {
    if requested_months == 0 {
        return Err(CapmError::EmptyWindow);
    }

    let window_len = requested_months.min(instrument.len());
    if window_len < 2 {
        return Ok(AlignedWindow::empty(window_len));
    }

    let window = instrument.trailing(window_len);
    let (benchmark_prices, rates) = match mode {
        AlignmentMode::Positional => positional_inputs(benchmark, risk_free, window_len)?,
        AlignmentMode::ByPeriod => period_inputs(benchmark, risk_free, window.periods())?,
    };
    let rates = ArrayView1::from(&rates[..window_len - 1]);

    let instrument_excess = to_returns(window.values()) - rates;
    let benchmark_excess = to_returns(&benchmark_prices) - rates;

    Ok(AlignedWindow {
        instrument_excess,
        benchmark_excess,
        window_len,
    })
}

fn positional_inputs(
    benchmark: &MonthlySeries,
    risk_free: &MonthlySeries,
    window_len: usize,
) -> Result<(Vec<f64>, Vec<f64>)> {
    for (kind, series) in [
        (SeriesKind::Benchmark, benchmark),
        (SeriesKind::RiskFree, risk_free),
    ] {
        if series.len() < window_len {
            return Err(CapmError::SeriesTooShort {
                series: kind,
                required: window_len,
                actual: series.len(),
            });
        }
    }

    Ok((
        benchmark.trailing(window_len).values().to_vec(),
        risk_free.trailing(window_len).values().to_vec(),
    ))
}

fn period_inputs(
    benchmark: &MonthlySeries,
    risk_free: &MonthlySeries,
    periods: &[Period],
) -> Result<(Vec<f64>, Vec<f64>)> {
    let lookup = |kind: SeriesKind, series: &MonthlySeries, period: Period| {
        series
            .get(period)
            .ok_or(CapmError::MissingPeriod { series: kind, period })
    };

    let prices = periods
        .iter()
        .map(|&p| lookup(SeriesKind::Benchmark, benchmark, p))
        .collect::<Result<Vec<_>>>()?;
    // The rate for the return from month i to i+1 is the rate at month i.
    let rates = periods[..periods.len() - 1]
        .iter()
        .map(|&p| lookup(SeriesKind::RiskFree, risk_free, p))
        .collect::<Result<Vec<_>>>()?;

    Ok((prices, rates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    fn monthly(start_year: i32, values: &[f64]) -> MonthlySeries {
        let mut period = Period::new(start_year, 1).unwrap();
        let mut periods = Vec::with_capacity(values.len());
        for _ in values {
            periods.push(period);
            period = period.succ();
        }
        MonthlySeries::new(periods, values.to_vec()).unwrap()
    }

    #[rstest]
    #[case(6, 6)]
    #[case(3, 3)]
    #[case(60, 6)]
    #[case(1, 1)]
    fn test_window_length(#[case] requested: usize, #[case] expected: usize) {
        let instrument = monthly(2020, &[10.0, 11.0, 12.0, 11.0, 13.0, 14.0]);
        let benchmark = monthly(2020, &[100.0, 101.0, 99.0, 102.0, 104.0, 103.0]);
        let risk_free = monthly(2020, &[0.0; 6]);

        let window = align(
            &benchmark,
            &instrument,
            &risk_free,
            requested,
            AlignmentMode::Positional,
        )
        .unwrap();

        assert_eq!(window.window_len, expected);
        assert!(window.window_len <= requested);
        assert_eq!(window.instrument_excess.len(), expected.saturating_sub(1));
        assert_eq!(window.benchmark_excess.len(), window.instrument_excess.len());
    }

    #[test]
    fn test_uses_most_recent_periods_and_subtracts_rates() {
        // Instrument is shorter, so the window is 3 and only the tail of the others is used.
        let instrument = monthly(2021, &[20.0, 22.0, 22.0]);
        let benchmark = monthly(2021, &[50.0, 60.0, 100.0, 110.0, 121.0]);
        let risk_free = monthly(2021, &[0.9, 0.9, 0.01, 0.02, 0.5]);

        let window = align(&benchmark, &instrument, &risk_free, 12, AlignmentMode::Positional)
            .unwrap();

        assert_eq!(window.window_len, 3);
        // Returns: instrument [0.1, 0.0], benchmark [0.1, 0.1]; rates used: [0.01, 0.02]
        assert_abs_diff_eq!(window.instrument_excess[0], 0.09, epsilon = 1e-12);
        assert_abs_diff_eq!(window.instrument_excess[1], -0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(window.benchmark_excess[0], 0.09, epsilon = 1e-12);
        assert_abs_diff_eq!(window.benchmark_excess[1], 0.08, epsilon = 1e-12);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_single_price_gives_empty_window() {
        let instrument = monthly(2021, &[20.0]);
        let benchmark = monthly(2021, &[50.0, 60.0]);
        let risk_free = monthly(2021, &[0.0, 0.0]);

        let window =
            align(&benchmark, &instrument, &risk_free, 60, AlignmentMode::Positional).unwrap();
        assert_eq!(window.window_len, 1);
        assert!(window.is_empty());
    }

    #[test]
    fn test_zero_months_rejected() {
        let series = monthly(2021, &[1.0, 2.0]);
        let err = align(&series, &series, &series, 0, AlignmentMode::Positional).unwrap_err();
        assert_eq!(err, CapmError::EmptyWindow);
    }

    #[test]
    fn test_short_risk_free_series() {
        let instrument = monthly(2021, &[1.0, 2.0, 3.0, 4.0]);
        let risk_free = monthly(2021, &[0.0, 0.0]);

        let err = align(&instrument, &instrument, &risk_free, 4, AlignmentMode::Positional)
            .unwrap_err();
        assert_eq!(
            err,
            CapmError::SeriesTooShort {
                series: SeriesKind::RiskFree,
                required: 4,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_by_period_joins_on_months() {
        // Benchmark starts a year earlier; positional and by-period agree when the tails line up.
        let instrument = monthly(2021, &[10.0, 11.0, 12.0]);
        let mut bench_values = vec![1.0; 12];
        bench_values.extend([100.0, 110.0, 99.0]);
        let benchmark = monthly(2020, &bench_values);
        let risk_free = monthly(2020, &[0.001; 15]);

        let by_period =
            align(&benchmark, &instrument, &risk_free, 3, AlignmentMode::ByPeriod).unwrap();
        let positional =
            align(&benchmark, &instrument, &risk_free, 3, AlignmentMode::Positional).unwrap();

        assert_eq!(by_period.window_len, 3);
        for i in 0..2 {
            assert_abs_diff_eq!(
                by_period.benchmark_excess[i],
                positional.benchmark_excess[i],
                epsilon = 1e-12
            );
            assert_abs_diff_eq!(
                by_period.instrument_excess[i],
                positional.instrument_excess[i],
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_by_period_missing_benchmark_month() {
        let instrument = monthly(2021, &[10.0, 11.0, 12.0]);
        let benchmark = monthly(2019, &[1.0, 2.0, 3.0]);
        let risk_free = monthly(2021, &[0.0; 3]);

        let err =
            align(&benchmark, &instrument, &risk_free, 3, AlignmentMode::ByPeriod).unwrap_err();
        assert_eq!(
            err,
            CapmError::MissingPeriod {
                series: SeriesKind::Benchmark,
                period: Period::new(2021, 1).unwrap(),
            }
        );
    }

    #[test]
    fn test_by_period_missing_risk_free_month() {
        let instrument = monthly(2021, &[10.0, 11.0, 12.0]);
        let benchmark = monthly(2021, &[100.0, 101.0, 102.0]);
        let january = Period::new(2021, 1).unwrap();
        let march = Period::new(2021, 3).unwrap();
        let risk_free = MonthlySeries::new(vec![january, march], vec![0.001, 0.001]).unwrap();

        let err =
            align(&benchmark, &instrument, &risk_free, 3, AlignmentMode::ByPeriod).unwrap_err();
        assert_eq!(
            err,
            CapmError::MissingPeriod {
                series: SeriesKind::RiskFree,
                period: Period::new(2021, 2).unwrap(),
            }
        );
    }

    #[test]
    fn test_by_period_ignores_risk_free_for_last_month() {
        // The last window month ends a return, so no rate is needed for it.
        let instrument = monthly(2021, &[10.0, 11.0, 12.0]);
        let benchmark = monthly(2021, &[100.0, 101.0, 102.0]);
        let risk_free = monthly(2021, &[0.001, 0.002]);

        let window =
            align(&benchmark, &instrument, &risk_free, 3, AlignmentMode::ByPeriod).unwrap();
        assert_eq!(window.len(), 2);
        assert_abs_diff_eq!(window.instrument_excess[0], 0.1 - 0.001, epsilon = 1e-12);
    }
}
