//! Monthly price series and simple returns.
//!
//! Daily observations are collapsed to one value per calendar month: the last observation seen
//! for a month wins, and months keep the order in which they first appear. Returns are simple
//! period-over-period changes, `(p[i+1] - p[i]) / p[i]`.

use std::collections::HashMap;

use ndarray::Array1;

use crate::{CapmError, Period, PriceObservation, Result};

/// Ordered `(period, value)` pairs with one entry per distinct period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    periods: Vec<Period>,
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Build a series from parallel vectors.
    ///
    /// # Errors
    /// Returns `CapmError::DimensionMismatch` if the lengths differ.
    pub fn new(periods: Vec<Period>, values: Vec<f64>) -> Result<Self> {
        if periods.len() != values.len() {
            return Err(CapmError::DimensionMismatch {
                expected: periods.len(),
                actual: values.len(),
            });
        }
        Ok(Self { periods, values })
    }

    /// Collapse observations to one value per period. See [`to_monthly`].
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = PriceObservation>,
    {
        let mut positions: HashMap<Period, usize> = HashMap::new();
        let mut series = Self::default();

        for obs in observations {
            if let Some(&idx) = positions.get(&obs.period) {
                series.values[idx] = obs.price;
            } else {
                positions.insert(obs.period, series.values.len());
                series.periods.push(obs.period);
                series.values.push(obs.price);
            }
        }

        series
    }

    /// Number of periods.
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no periods.
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Periods in series order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Values in series order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Earliest period in series order.
    pub fn first_period(&self) -> Option<Period> {
        self.periods.first().copied()
    }

    /// Latest period in series order.
    pub fn last_period(&self) -> Option<Period> {
        self.periods.last().copied()
    }

    /// Value recorded for `period`, if any.
    pub fn get(&self, period: Period) -> Option<f64> {
        self.periods
            .iter()
            .position(|p| *p == period)
            .map(|i| self.values[i])
    }

    /// Drop everything before the first period at or after `start`.
    pub fn since(&self, start: Period) -> Self {
        let from = self
            .periods
            .iter()
            .position(|p| *p >= start)
            .unwrap_or(self.periods.len());
        Self {
            periods: self.periods[from..].to_vec(),
            values: self.values[from..].to_vec(),
        }
    }

    /// The most recent `n` periods (all of them if `n >= len`).
    pub fn trailing(&self, n: usize) -> Self {
        let from = self.len().saturating_sub(n);
        Self {
            periods: self.periods[from..].to_vec(),
            values: self.values[from..].to_vec(),
        }
    }

    /// Apply `f` to every value, keeping periods.
    pub fn map_values(mut self, f: impl Fn(f64) -> f64) -> Self {
        self.values.iter_mut().for_each(|v| *v = f(*v));
        self
    }

    /// Simple returns of the values. See [`to_returns`].
    pub fn returns(&self) -> Array1<f64> {
        to_returns(&self.values)
    }

    /// Iterate `(period, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Period, f64)> + '_ {
        self.periods.iter().copied().zip(self.values.iter().copied())
    }
}

impl FromIterator<PriceObservation> for MonthlySeries {
    fn from_iter<I: IntoIterator<Item = PriceObservation>>(iter: I) -> Self {
        Self::from_observations(iter)
    }
}

/// Collapse raw observations to a monthly series.
///
/// The value for each period is the last observation seen for it in input order, and periods
/// keep first-appearance order. Observations need not be grouped by period.
pub fn to_monthly(observations: &[PriceObservation]) -> MonthlySeries {
    MonthlySeries::from_observations(observations.iter().copied())
}

/// Simple period-over-period returns, one fewer than `prices`.
///
/// A zero price yields an infinite or NaN return; nothing is guarded here.
pub fn to_returns(prices: &[f64]) -> Array1<f64> {
    prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}
