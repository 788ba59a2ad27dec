#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod batch;

// Re-export main types from sub-crates
pub use hobart_capm as capm;
pub use hobart_data as data;
pub use hobart_output as output;

pub use batch::{
    BatchConfig, BatchDriver, BatchError, DEFAULT_BENCHMARK, DEFAULT_LOOKBACK_YEARS,
    load_market_context,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
