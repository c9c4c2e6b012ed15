//! Command-line parsing for the exchange-rate pipeline.
//!
//! Parsing is kept apart from the stages themselves: month ranges are passed
//! through unchecked so the acquirer reports invalid input the same way it
//! does for any other caller.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rates", version, about = "UAH exchange rates: fetch, store, report")]
pub struct Cli {
    /// Directory holding the storage buckets (overrides RATES_STORE_ROOT).
    #[arg(long, global = true, value_name = "DIR")]
    pub store_root: Option<PathBuf>,

    /// Bucket name (overrides RATES_BUCKET).
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// TrueType font for chart text (overrides RATES_FONT_PATH).
    #[arg(long, global = true, value_name = "TTF")]
    pub font: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch both currencies for a month range and store the merged CSV.
    Acquire(RangeArgs),
    /// Load a stored dataset, print it, store the presentation CSV and chart.
    Report(ReportArgs),
    /// `acquire`, then `report` on the dataset it stored.
    Run(RangeArgs),
}

/// Month range within one year.
#[derive(Debug, Args, Clone)]
pub struct RangeArgs {
    #[arg(short, long, default_value_t = 2022)]
    pub year: i32,

    /// First month (1-12).
    #[arg(short = 's', long, default_value_t = 1)]
    pub start_month: u32,

    /// Last month (1-12), included in full.
    #[arg(short = 'e', long, default_value_t = 12)]
    pub end_month: u32,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Storage key of the merged dataset.
    #[arg(short, long, default_value = "exchange_rates/exchange_rate_2022_01_12.csv")]
    pub key: String,
}
