//! Calendar-month periods and raw price observations.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::CapmError;

/// A calendar month, the unit every series in this crate is keyed by.
///
/// Periods order chronologically and display as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, returning `None` if `month` is not in `1..=12`.
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if matches!(month, 1..=12) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month of the year, 1-based.
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// The following month.
    pub const fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<NaiveDate> for Period {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl FromStr for Period {
    type Err = CapmError;

    /// Parses `YYYY-MM`, or any longer label starting with it such as `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CapmError::InvalidPeriod(s.to_string());
        let label = s.trim();
        let (year, rest) = label.split_once('-').ok_or_else(invalid)?;
        let month = rest.get(..2).ok_or_else(invalid)?;
        if rest.len() > 2 && !rest[2..].starts_with('-') {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

/// One observed price, tagged with the month it falls in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Month of the observation
    pub period: Period,
    /// Observed price (or rate, for risk-free feeds)
    pub price: f64,
}

impl PriceObservation {
    /// Create a new observation.
    pub const fn new(period: Period, price: f64) -> Self {
        Self { period, price }
    }

    /// Create an observation from a dated price.
    pub fn dated(date: NaiveDate, price: f64) -> Self {
        Self::new(Period::from_date(date), price)
    }
}

impl From<(Period, f64)> for PriceObservation {
    fn from((period, price): (Period, f64)) -> Self {
        Self::new(period, price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2019-03", 2019, 3)]
    #[case("2019-03-28", 2019, 3)]
    #[case(" 2020-12 ", 2020, 12)]
    fn test_parse_period(#[case] label: &str, #[case] year: i32, #[case] month: u32) {
        let period: Period = label.parse().unwrap();
        assert_eq!(period.year(), year);
        assert_eq!(period.month(), month);
    }

    #[rstest]
    #[case("2019")]
    #[case("2019-13")]
    #[case("2019-3")]
    #[case("2019-031")]
    #[case("abcd-01")]
    fn test_parse_invalid_period(#[case] label: &str) {
        assert!(matches!(
            label.parse::<Period>(),
            Err(CapmError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let period = Period::new(2007, 4).unwrap();
        assert_eq!(period.to_string(), "2007-04");
        assert_eq!(period.to_string().parse::<Period>().unwrap(), period);
    }

    #[test]
    fn test_ordering_and_succ() {
        let dec = Period::new(2023, 12).unwrap();
        let jan = dec.succ();
        assert_eq!(jan, Period::new(2024, 1).unwrap());
        assert!(dec < jan);
    }

    #[test]
    fn test_dated_observation() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let obs = PriceObservation::dated(date, 101.5);
        assert_eq!(obs.period, Period::new(2024, 2).unwrap());
        assert_eq!(obs.price, 101.5);
    }
}
