//! U.S. Treasury risk-free rates.

pub mod client;
pub mod yield_curve;

pub use client::TreasuryClient;
pub use yield_curve::{
    DailyYield, RateConvention, Tenor, YieldCurveConfig, parse_percent, parse_yield_curve_xml,
    to_rate_observations,
};
