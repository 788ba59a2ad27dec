//! Hobart CLI binary.
//!
//! Estimates CAPM parameters for every ticker in a list and writes a summary table.

mod cli;
mod feeds;

use chrono::Utc;
use clap::Parser;
use cli::Cli;
use feeds::{PriceSource, RateSource};
use hobart::{BatchDriver, BatchError, load_market_context};
use hobart_capm::{DEFAULT_MONTHS, MAX_MONTHS, parse_requested_months};
use hobart_data::read_tickers;
use hobart_output::{BatchSummary, Exporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::process;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hobart=info".into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!(error = %e, "run failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();

    let months = parse_requested_months(cli.months.as_deref(), MAX_MONTHS).unwrap_or_else(|e| {
        tracing::warn!(reason = %e, "using the default of {DEFAULT_MONTHS} months");
        DEFAULT_MONTHS
    });
    if !cli.extra.is_empty() {
        tracing::debug!(ignored = ?cli.extra, "ignoring extra arguments");
    }
    let config = cli.batch_config(months);
    if !cli.format.matches_path(&cli.output) {
        tracing::warn!(
            output = %cli.output.display(),
            format = %cli.format,
            "output file extension does not match the format"
        );
    }

    let tickers = read_tickers(&cli.tickers)
        .await
        .map_err(BatchError::Tickers)?;
    if tickers.is_empty() {
        tracing::warn!(path = %cli.tickers.display(), "ticker list is empty");
    }

    let (start, end) = config.date_range(Utc::now().date_naive());
    let prices = PriceSource::from_cli(&cli)?;
    let rates = RateSource::from_cli(&cli)?;

    println!(
        "Estimating {} ticker{} against {} over {} months ({} to {})",
        tickers.len(),
        if tickers.len() == 1 { "" } else { "s" },
        config.benchmark,
        months,
        start,
        end
    );

    let context = load_market_context(&prices, &rates, &config.benchmark, start, end).await?;

    let pb = ProgressBar::new(tickers.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let driver = BatchDriver::new(&prices, &context, &config, start, end);
    let outcomes = driver
        .run(&tickers, |outcome| {
            pb.set_message(outcome.ticker().to_string());
            pb.inc(1);
        })
        .await;

    let summary = BatchSummary::from_outcomes(&outcomes);
    pb.finish_with_message(summary.to_string());

    outcomes.export_to_file(&cli.output, cli.format)?;
    tracing::info!(
        output = %cli.output.display(),
        format = %cli.format,
        estimated = summary.estimated,
        failed = summary.failed,
        "wrote results"
    );

    println!("Results written to {}", cli.output.display());
    println!("Elapsed time: {:.2?}", started.elapsed());

    Ok(())
}
