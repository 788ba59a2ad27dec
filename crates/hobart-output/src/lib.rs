#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod record;
pub mod summary;

pub use export::{CSV_HEADER, ExportError, ExportFormat, Exporter};
pub use record::{COEFFICIENT_DECIMALS, FAILURE_MARKER, ResultRecord, TickerOutcome, round_to};
pub use summary::BatchSummary;
