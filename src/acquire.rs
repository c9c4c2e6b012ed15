//! Acquirer: fetch both currencies, merge on date, store the dataset CSV.
//!
//! Nothing is written unless both series were fetched, parsed, non-empty and
//! the merged CSV was fully built in memory.

use crate::config::Config;
use crate::data::{RateSource, merge_on_date};
use crate::domain::{DateRange, MergedRecord, StoredArtifact, dataset_key};
use crate::error::PipelineError;
use crate::io::encode_dataset;
use crate::messages::{self, Operation};
use crate::storage::BlobStore;

/// What a successful acquisition stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquireOutput {
    pub key: String,
    pub range: DateRange,
    pub records: Vec<MergedRecord>,
}

/// Fetch, merge and store the dataset for `year`, `start_month..=end_month`.
///
/// Failures are reported on stderr and logged here; the caller only decides
/// what to do with the returned error.
pub fn acquire(
    config: &Config,
    source: &dyn RateSource,
    store: &dyn BlobStore,
    year: i32,
    start_month: u32,
    end_month: u32,
) -> Result<AcquireOutput, PipelineError> {
    let key = dataset_key(&config.dataset_prefix, year, start_month, end_month);

    let range = match DateRange::for_months(year, start_month, end_month) {
        Ok(range) => range,
        Err(err) => {
            eprintln!("{} ({err})", messages::invalid_month());
            log::error!("acquire {year}/{start_month}..{end_month} rejected: {err}");
            return Err(err);
        }
    };

    let records = fetch_merged(config, source, &range).map_err(|err| {
        eprintln!("{}", messages::failure(Operation::Fetch(&config.api_url), &err));
        log::error!("acquire {}..{} failed: {err}", range.start, range.end);
        err
    })?;

    let stored = encode_dataset(&records)
        .map(|bytes| StoredArtifact::csv(key.clone(), bytes))
        .and_then(|artifact| store.put(&artifact));
    if let Err(err) = stored {
        eprintln!("{}", messages::failure(Operation::Upload(&key), &err));
        log::error!("storing {key} failed: {err}");
        return Err(err);
    }

    println!("{}", messages::uploaded(&key, store.target_name()));
    log::info!("stored {} merged rows at {key}", records.len());

    Ok(AcquireOutput { key, range, records })
}

fn fetch_merged(
    config: &Config,
    source: &dyn RateSource,
    range: &DateRange,
) -> Result<Vec<MergedRecord>, PipelineError> {
    let pair = &config.currencies;

    // Both requests must succeed before anything is merged.
    let primary = source.fetch_series(range, &pair.primary)?;
    let secondary = source.fetch_series(range, &pair.secondary)?;
    log::debug!(
        "fetched {} {} and {} {} observations",
        primary.len(),
        pair.primary,
        secondary.len(),
        pair.secondary
    );

    if primary.is_empty() || secondary.is_empty() {
        let missing: Vec<&str> = [(&primary, &pair.primary), (&secondary, &pair.secondary)]
            .into_iter()
            .filter(|(series, _)| series.is_empty())
            .map(|(_, code)| code.as_str())
            .collect();
        return Err(PipelineError::EmptyResult(format!(
            "no observations for {} between {} and {}",
            missing.join(", "),
            range.start,
            range.end
        )));
    }

    let merged = merge_on_date(&primary, &secondary);
    if merged.is_empty() {
        log::warn!("series share no dates between {} and {}", range.start, range.end);
    }
    Ok(merged)
}
