#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod align;
pub mod config;
pub mod error;
pub mod estimator;
pub mod idiosyncratic;
pub mod period;
pub mod regression;
pub mod series;

pub use align::{AlignedWindow, AlignmentMode, SeriesKind, align};
pub use config::{
    CapmConfig, DEFAULT_MONTHS, MAX_MONTHS, MonthsError, parse_requested_months,
};
pub use error::{CapmError, Result};
pub use estimator::{CapmEstimate, CapmEstimator, MarketContext};
pub use idiosyncratic::{NegativeVariancePolicy, idiosyncratic_risk, population_variance};
pub use period::{Period, PriceObservation};
pub use regression::{CapmFit, fit};
pub use series::{MonthlySeries, to_monthly, to_returns};
