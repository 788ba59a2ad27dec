//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use hobart::{BatchConfig, DEFAULT_BENCHMARK, DEFAULT_LOOKBACK_YEARS};
use hobart_capm::{AlignmentMode, CapmConfig, NegativeVariancePolicy};
use hobart_data::treasury::{RateConvention, Tenor, YieldCurveConfig};
use hobart_data::yahoo::PriceField;
use hobart_output::ExportFormat;

#[derive(Debug, Parser)]
#[command(name = "hobart")]
#[command(about = "CAPM beta, alpha and idiosyncratic risk for a list of tickers", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Months of history to use, 1 to 60 (anything else falls back to 60)
    #[arg(allow_hyphen_values = true)]
    pub(crate) months: Option<String>,

    /// Further positional arguments are accepted and ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub(crate) extra: Vec<String>,

    /// Ticker list, one symbol per line
    #[arg(long, default_value = "stocks.txt")]
    pub(crate) tickers: PathBuf,

    /// Output file
    #[arg(long, default_value = "stock_summary.csv")]
    pub(crate) output: PathBuf,

    /// Benchmark symbol
    #[arg(long, default_value = DEFAULT_BENCHMARK)]
    pub(crate) benchmark: String,

    /// Years of daily history to fetch
    #[arg(long, default_value_t = DEFAULT_LOOKBACK_YEARS)]
    pub(crate) years: u32,

    /// Treasury tenor used as the risk-free rate
    #[arg(long, value_enum, default_value_t = TenorArg::OneMonth)]
    pub(crate) tenor: TenorArg,

    /// How quoted yields become per-period rates
    #[arg(long, value_enum, default_value_t = ConventionArg::AsQuoted)]
    pub(crate) rate_convention: ConventionArg,

    /// How benchmark and risk-free months are matched to each ticker
    #[arg(long, value_enum, default_value_t = AlignmentArg::Positional)]
    pub(crate) alignment: AlignmentArg,

    /// Handling of negative residual variance
    #[arg(long, value_enum, default_value_t = NegativeVarianceArg::Clamp)]
    pub(crate) negative_variance: NegativeVarianceArg,

    /// Tickers fetched at once
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub(crate) concurrency: u16,

    /// Read `<TICKER>.csv` price files from this directory instead of Yahoo Finance
    #[arg(long)]
    pub(crate) prices_dir: Option<PathBuf>,

    /// Read `date,rate` percentages from this file instead of the Treasury feed
    #[arg(long)]
    pub(crate) rates_file: Option<PathBuf>,

    /// Use the dividend- and split-adjusted close instead of the raw close
    #[arg(long)]
    pub(crate) adjusted_close: bool,

    /// Output format: csv, json or pretty-json
    #[arg(long, default_value_t = ExportFormat::Csv)]
    pub(crate) format: ExportFormat,
}

impl Cli {
    /// Batch settings for a validated window length.
    pub(crate) fn batch_config(&self, months: usize) -> BatchConfig {
        BatchConfig {
            benchmark: self.benchmark.clone(),
            lookback_years: self.years,
            concurrency: usize::from(self.concurrency),
            capm: CapmConfig {
                months,
                alignment: self.alignment.into(),
                negative_variance: self.negative_variance.into(),
            },
        }
    }

    pub(crate) const fn price_field(&self) -> PriceField {
        if self.adjusted_close {
            PriceField::AdjustedClose
        } else {
            PriceField::Close
        }
    }

    pub(crate) fn yield_curve(&self) -> YieldCurveConfig {
        YieldCurveConfig {
            tenor: self.tenor.into(),
            convention: self.rate_convention.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TenorArg {
    #[value(name = "1M")]
    OneMonth,
    #[value(name = "2M")]
    TwoMonth,
    #[value(name = "3M")]
    ThreeMonth,
    #[value(name = "6M")]
    SixMonth,
    #[value(name = "1Y")]
    OneYear,
}

impl From<TenorArg> for Tenor {
    fn from(arg: TenorArg) -> Self {
        match arg {
            TenorArg::OneMonth => Self::OneMonth,
            TenorArg::TwoMonth => Self::TwoMonth,
            TenorArg::ThreeMonth => Self::ThreeMonth,
            TenorArg::SixMonth => Self::SixMonth,
            TenorArg::OneYear => Self::OneYear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ConventionArg {
    AsQuoted,
    Monthly,
}

impl From<ConventionArg> for RateConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::AsQuoted => Self::AsQuoted,
            ConventionArg::Monthly => Self::Monthly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum AlignmentArg {
    Positional,
    ByPeriod,
}

impl From<AlignmentArg> for AlignmentMode {
    fn from(arg: AlignmentArg) -> Self {
        match arg {
            AlignmentArg::Positional => Self::Positional,
            AlignmentArg::ByPeriod => Self::ByPeriod,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum NegativeVarianceArg {
    Clamp,
    Nan,
    Reject,
}

impl From<NegativeVarianceArg> for NegativeVariancePolicy {
    fn from(arg: NegativeVarianceArg) -> Self {
        match arg {
            NegativeVarianceArg::Clamp => Self::ClampToZero,
            NegativeVarianceArg::Nan => Self::Propagate,
            NegativeVarianceArg::Reject => Self::Reject,
        }
    }
}
