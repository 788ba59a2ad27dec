//! Daily par yield curve records and their XML representation.

use chrono::NaiveDate;
use hobart_capm::PriceObservation;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// Maturity on the par yield curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tenor {
    /// 1 month bill
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    /// 2 month bill
    #[serde(rename = "2M")]
    TwoMonth,
    /// 3 month bill
    #[serde(rename = "3M")]
    ThreeMonth,
    /// 6 month bill
    #[serde(rename = "6M")]
    SixMonth,
    /// 1 year bill
    #[serde(rename = "1Y")]
    OneYear,
}

impl Tenor {
    /// Element name carrying this tenor in the feed.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::OneMonth => "BC_1MONTH",
            Self::TwoMonth => "BC_2MONTH",
            Self::ThreeMonth => "BC_3MONTH",
            Self::SixMonth => "BC_6MONTH",
            Self::OneYear => "BC_1YEAR",
        }
    }
}

/// How a quoted annual yield becomes a per-period rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateConvention {
    /// Quoted percentage divided by 100, no annual-to-monthly conversion
    #[default]
    AsQuoted,
    /// Quoted percentage divided by 100 and by 12
    Monthly,
}

impl RateConvention {
    /// Convert a quoted percentage into a decimal rate.
    pub fn apply(self, percent: f64) -> f64 {
        let annual = percent / 100.0;
        match self {
            Self::AsQuoted => annual,
            Self::Monthly => annual / 12.0,
        }
    }
}

/// Risk-free series selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YieldCurveConfig {
    /// Tenor to read
    pub tenor: Tenor,
    /// Rate convention
    pub convention: RateConvention,
}

/// One day's quote for a single tenor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyYield {
    /// Record date
    pub date: NaiveDate,
    /// Quoted yield in percent, `None` when the feed has no value
    pub percent: Option<f64>,
}

impl DailyYield {
    /// Decimal rate under `convention`; missing quotes become zero.
    pub fn rate(&self, convention: RateConvention) -> f64 {
        self.percent.map_or(0.0, |p| convention.apply(p))
    }
}

/// Parse a quoted percentage. Empty, `NA` and `N/A` are missing values.
///
/// # Errors
/// Returns `DataError::Parse` for any other non-numeric text.
pub fn parse_percent(text: &str) -> Result<Option<f64>> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("na") || text.eq_ignore_ascii_case("n/a") {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|e| DataError::Parse(format!("invalid yield '{text}': {e}")))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Date,
    Yield,
}

/// Extract `tenor` quotes from a daily par yield curve XML document.
///
/// Each `properties` element is one business day; it must carry a `NEW_DATE`.
/// A day without the tenor element, or with a null one, yields `percent: None`.
///
/// # Errors
/// Returns `DataError::XmlParse` for malformed XML and `DataError::Parse` for
/// unreadable dates or yields.
pub fn parse_yield_curve_xml(xml: &str, tenor: Tenor) -> Result<Vec<DailyYield>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let tenor_name = tenor.field_name().as_bytes();
    let mut yields = Vec::new();
    let mut in_record = false;
    let mut field: Option<Field> = None;
    let mut date: Option<NaiveDate> = None;
    let mut percent: Option<f64> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                if name.as_ref() == b"properties" {
                    in_record = true;
                    date = None;
                    percent = None;
                } else if in_record && name.as_ref() == b"NEW_DATE" {
                    field = Some(Field::Date);
                } else if in_record && name.as_ref() == tenor_name {
                    field = Some(Field::Yield);
                }
            }
            Event::Text(t) => {
                let Some(current) = field else { continue };
                let text = t
                    .unescape()
                    .map_err(|e| DataError::XmlParse(e.to_string()))?;
                match current {
                    Field::Date => date = Some(parse_record_date(&text)?),
                    Field::Yield => percent = parse_percent(&text)?,
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"properties" {
                    let day = date.ok_or_else(|| {
                        DataError::Parse("yield curve record without NEW_DATE".to_string())
                    })?;
                    yields.push(DailyYield { date: day, percent });
                    in_record = false;
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    yields.sort_by_key(|y| y.date);
    Ok(yields)
}

/// Decimal rate observations for the days in `start..=end`.
pub fn to_rate_observations(
    yields: &[DailyYield],
    convention: RateConvention,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<PriceObservation> {
    yields
        .iter()
        .filter(|y| y.date >= start && y.date <= end)
        .map(|y| PriceObservation::dated(y.date, y.rate(convention)))
        .collect()
}

// "2023-01-03T00:00:00"
fn parse_record_date(text: &str) -> Result<NaiveDate> {
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| DataError::Parse(format!("invalid record date '{text}': {e}")))
}
