//! Shared domain types.
//!
//! These types are intentionally small and serializable so they can be:
//!
//! - produced by the data source and merged in-memory
//! - written to / read back from the stored CSV dataset
//! - projected into the presentation table and the chart

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// One observation of a single currency's rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// One row of the merged dataset: both currencies observed on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub date: NaiveDate,
    pub rate_primary: f64,
    pub rate_secondary: f64,
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build the range `year-start_month-01 ..= year-end_month-<last day>`.
    pub fn for_months(year: i32, start_month: u32, end_month: u32) -> Result<Self, PipelineError> {
        for month in [start_month, end_month] {
            if !(1..=12).contains(&month) {
                return Err(PipelineError::InvalidInput(format!(
                    "month must be in 1..=12, got {month}"
                )));
            }
        }
        if start_month > end_month {
            return Err(PipelineError::InvalidInput(format!(
                "start month {start_month} is after end month {end_month}"
            )));
        }

        let start = NaiveDate::from_ymd_opt(year, start_month, 1)
            .ok_or_else(|| PipelineError::InvalidInput(format!("unsupported year {year}")))?;
        let end_day = last_day_of_month(year, end_month)?;
        let end = NaiveDate::from_ymd_opt(year, end_month, end_day)
            .ok_or_else(|| PipelineError::InvalidInput(format!("unsupported year {year}")))?;

        Ok(Self { start, end })
    }

    /// Compact `YYYYMMDD` form used by the data source query string.
    pub fn start_compact(&self) -> String {
        self.start.format("%Y%m%d").to_string()
    }

    pub fn end_compact(&self) -> String {
        self.end.format("%Y%m%d").to_string()
    }
}

/// Last calendar day (28..=31) of `month` in `year`.
pub fn last_day_of_month(year: i32, month: u32) -> Result<u32, PipelineError> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .ok_or_else(|| PipelineError::InvalidInput(format!("no calendar month {year}-{month:02}")))
}

/// The two currencies being compared plus the currency they are quoted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPair {
    pub primary: String,
    pub secondary: String,
    pub base: String,
}

impl Default for CurrencyPair {
    fn default() -> Self {
        Self {
            primary: "USD".to_string(),
            secondary: "EUR".to_string(),
            base: "UAH".to_string(),
        }
    }
}

/// Content type of a stored blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Csv,
    Png,
}

impl MediaType {
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Csv => "text/csv",
            MediaType::Png => "image/png",
        }
    }
}

/// A blob written to (or read from) the storage target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub key: String,
    pub bytes: Vec<u8>,
    pub media_type: MediaType,
}

impl StoredArtifact {
    pub fn csv(key: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            bytes,
            media_type: MediaType::Csv,
        }
    }

    pub fn png(key: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            bytes,
            media_type: MediaType::Png,
        }
    }
}

/// Storage key for the merged dataset of `(year, start_month, end_month)`.
///
/// Example: `exchange_rates/exchange_rate_2022_01_12.csv`.
pub fn dataset_key(prefix: &str, year: i32, start_month: u32, end_month: u32) -> String {
    let name = format!("exchange_rate_{year}_{start_month:02}_{end_month:02}.csv");
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        name
    } else {
        format!("{prefix}/{name}")
    }
}
