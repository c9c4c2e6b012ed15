//! Wiring of the real collaborators (NBU client, filesystem bucket, Plotters
//! renderer) into the acquirer and reporter.
//!
//! Keeping this in one place lets `run` chain both stages without the CLI
//! handlers knowing how collaborators are built.

use crate::acquire::{AcquireOutput, acquire};
use crate::config::Config;
use crate::data::NbuClient;
use crate::error::AppError;
use crate::plot::PngChartRenderer;
use crate::report::{ReportOutput, report};
use crate::storage::FsBlobStore;

fn open_store(config: &Config) -> Result<FsBlobStore, AppError> {
    FsBlobStore::open(config.bucket_dir(), config.bucket.clone()).map_err(AppError::unreported)
}

/// Acquire `year`, `start_month..=end_month` into the configured bucket.
pub fn run_acquire(config: &Config, year: i32, start_month: u32, end_month: u32) -> Result<AcquireOutput, AppError> {
    let store = open_store(config)?;
    let source = NbuClient::new(config).map_err(AppError::unreported)?;
    Ok(acquire(config, &source, &store, year, start_month, end_month)?)
}

/// Report on `key` from the configured bucket, printing to stdout.
pub fn run_report(config: &Config, key: &str) -> Result<ReportOutput, AppError> {
    let store = open_store(config)?;
    let renderer = PngChartRenderer::from_font_path(config.font_path.as_deref()).map_err(AppError::unreported)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    Ok(report(config, &store, &renderer, key, &mut out)?)
}

/// Both stages in sequence; the reporter reads what the acquirer stored.
pub fn run_both(config: &Config, year: i32, start_month: u32, end_month: u32) -> Result<ReportOutput, AppError> {
    let acquired = run_acquire(config, year, start_month, end_month)?;
    run_report(config, &acquired.key)
}
