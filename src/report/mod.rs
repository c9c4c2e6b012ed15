//! Reporter: reload a stored dataset, print it, store the presentation CSV and
//! the chart.
//!
//! Order of effects: read, print table, write presentation CSV, render,
//! write chart. Each failure is reported where it happens and stops the run.

use std::io::Write;

use crate::config::Config;
use crate::domain::{MergedRecord, StoredArtifact};
use crate::error::PipelineError;
use crate::io::{PresentationView, decode_dataset};
use crate::messages::{self, Operation};
use crate::plot::{ChartRenderer, ChartSpec};
use crate::storage::BlobStore;

pub mod format;

pub use format::format_table;

/// What a successful report produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    pub rows: Vec<MergedRecord>,
    pub presentation_key: String,
    pub chart_key: String,
}

/// Report on the dataset stored at `key`, writing the table to `out`.
pub fn report(
    config: &Config,
    store: &dyn BlobStore,
    renderer: &dyn ChartRenderer,
    key: &str,
    out: &mut dyn Write,
) -> Result<ReportOutput, PipelineError> {
    let bytes = store
        .get(key)
        .map_err(|err| fail(Operation::Download(key), err))?;

    let rows = decode_dataset(&bytes).map_err(|err| fail(Operation::Parse(key), err))?;
    if rows.is_empty() {
        return Err(fail(
            Operation::Parse(key),
            PipelineError::EmptyResult(format!("dataset '{key}' has no rows")),
        ));
    }
    log::info!("loaded {} rows from {key}", rows.len());

    let view = PresentationView::new(&config.currencies, rows);
    let chart = ChartSpec::for_rates(&config.currencies, &view.rows);

    emit(out, &format!("\n{}", messages::table_heading(&chart.title)));
    emit(out, format_table(&view).trim_end_matches('\n'));

    let presentation_key = config.presentation_key.as_str();
    view.to_csv()
        .map(|bytes| StoredArtifact::csv(presentation_key, bytes))
        .and_then(|artifact| store.put(&artifact))
        .map_err(|err| fail(Operation::Upload(presentation_key), err))?;
    emit(out, &messages::uploaded(presentation_key, store.target_name()));

    let chart_key = config.chart_key.as_str();
    let png = renderer
        .render(&chart)
        .map_err(|err| fail(Operation::Render(chart_key), err))?;
    store
        .put(&StoredArtifact::png(chart_key, png))
        .map_err(|err| fail(Operation::Upload(chart_key), err))?;
    emit(out, &messages::uploaded(chart_key, store.target_name()));

    Ok(ReportOutput {
        rows: view.rows,
        presentation_key: presentation_key.to_string(),
        chart_key: chart_key.to_string(),
    })
}

fn fail(operation: Operation<'_>, err: PipelineError) -> PipelineError {
    eprintln!("{}", messages::failure(operation, &err));
    log::error!("report step {operation:?} failed: {err}");
    err
}

fn emit(out: &mut dyn Write, line: &str) {
    if let Err(e) = writeln!(out, "{line}") {
        log::warn!("failed to write report output: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use chrono::NaiveDate;

    use crate::io::encode_dataset;
    use crate::storage::MemoryBlobStore;

    const DATASET_KEY: &str = "exchange_rates/exchange_rate_2022_01_01.csv";

    /// Renderer stub: returns fixed bytes (or fails) and counts calls.
    struct StubRenderer {
        fail: bool,
        calls: Cell<usize>,
    }

    impl StubRenderer {
        fn ok() -> Self {
            Self { fail: false, calls: Cell::new(0) }
        }
    }

    impl ChartRenderer for StubRenderer {
        fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, PipelineError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(PipelineError::RenderFailure("stub".into()));
            }
            Ok(format!("png:{}", spec.lines.len()).into_bytes())
        }
    }

    fn sample_rows() -> Vec<MergedRecord> {
        vec![
            MergedRecord {
                date: NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
                rate_primary: 28.5,
                rate_secondary: 32.1,
            },
            MergedRecord {
                date: NaiveDate::from_ymd_opt(2022, 1, 4).unwrap(),
                rate_primary: 28.6,
                rate_secondary: 32.3,
            },
        ]
    }

    fn seeded_store() -> MemoryBlobStore {
        let store = MemoryBlobStore::new();
        let bytes = encode_dataset(&sample_rows()).unwrap();
        store.put(&StoredArtifact::csv(DATASET_KEY, bytes)).unwrap();
        store
    }

    #[test]
    fn report_prints_table_and_stores_two_artifacts() {
        let config = Config::default();
        let store = seeded_store();
        let renderer = StubRenderer::ok();
        let mut out = Vec::new();

        let result = report(&config, &store, &renderer, DATASET_KEY, &mut out).unwrap();

        assert_eq!(result.rows, sample_rows());
        // One seed write plus the two report artifacts.
        assert_eq!(store.put_count(), 3);
        assert_eq!(
            store.keys(),
            vec![
                DATASET_KEY.to_string(),
                config.presentation_key.clone(),
                config.chart_key.clone()
            ]
        );

        let presentation = store.artifact(&config.presentation_key).unwrap();
        assert_eq!(
            String::from_utf8(presentation.bytes).unwrap(),
            "Дата,Курс USD (UAH),Курс EUR (UAH)\n2022-01-03,28.5,32.1\n2022-01-04,28.6,32.3\n"
        );
        let chart = store.artifact(&config.chart_key).unwrap();
        assert_eq!(chart.media_type.mime(), "image/png");
        assert_eq!(chart.bytes, b"png:2".to_vec());

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Дані для графіка (Курс гривні до USD та EUR за 2022 рік):"));
        assert!(printed.contains("      Дата  Курс USD (UAH)  Курс EUR (UAH)"));
        assert!(printed.contains("2022-01-03         28.5000         32.1000"));
        assert!(printed.contains("2022-01-04         28.6000         32.3000"));
        assert!(printed.contains(&messages::uploaded(&config.chart_key, "memory")));
    }

    #[test]
    fn missing_key_is_not_found_and_prints_nothing() {
        let config = Config::default();
        let store = MemoryBlobStore::new();
        let renderer = StubRenderer::ok();
        let mut out = Vec::new();

        let err = report(&config, &store, &renderer, DATASET_KEY, &mut out).unwrap_err();

        assert!(matches!(err, PipelineError::NotFound(_)));
        assert!(out.is_empty());
        assert_eq!(store.put_count(), 0);
        assert_eq!(renderer.calls.get(), 0);
    }

    #[test]
    fn bad_dates_abort_before_any_output() {
        let config = Config::default();
        let store = MemoryBlobStore::new();
        let csv = "date,rate_primary,rate_secondary\n03.01.2022,28.5,32.1\n";
        store.put(&StoredArtifact::csv(DATASET_KEY, csv.as_bytes().to_vec())).unwrap();
        let mut out = Vec::new();

        let err = report(&config, &store, &StubRenderer::ok(), DATASET_KEY, &mut out).unwrap_err();

        assert!(matches!(err, PipelineError::ParseFailure(ref m) if m.contains("03.01.2022")));
        assert!(out.is_empty());
        assert_eq!(store.put_count(), 1);
    }

    #[test]
    fn non_finite_rate_aborts_before_any_output() {
        let config = Config::default();
        let store = MemoryBlobStore::new();
        let csv = "date,rate_primary,rate_secondary\n2022-01-03,28.5,NaN\n";
        store.put(&StoredArtifact::csv(DATASET_KEY, csv.as_bytes().to_vec())).unwrap();
        let renderer = StubRenderer::ok();
        let mut out = Vec::new();

        let err = report(&config, &store, &renderer, DATASET_KEY, &mut out).unwrap_err();

        assert!(matches!(err, PipelineError::ParseFailure(ref m) if m.contains("non-finite")));
        assert!(out.is_empty());
        assert_eq!(store.put_count(), 1);
        assert_eq!(renderer.calls.get(), 0);
    }

    #[test]
    fn outsized_rate_still_produces_a_chart() {
        let config = Config::default();
        let store = MemoryBlobStore::new();
        let csv = "date,rate_primary,rate_secondary\n2022-01-03,1,1e15\n2022-01-04,2,1e15\n";
        store.put(&StoredArtifact::csv(DATASET_KEY, csv.as_bytes().to_vec())).unwrap();
        let mut out = Vec::new();

        let renderer = crate::plot::PngChartRenderer::without_text();
        report(&config, &store, &renderer, DATASET_KEY, &mut out).unwrap();

        let chart = store.artifact(&config.chart_key).unwrap();
        assert_eq!(chart.bytes[..4], [0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn render_failure_stores_no_chart() {
        let config = Config::default();
        let store = seeded_store();
        let renderer = StubRenderer { fail: true, calls: Cell::new(0) };
        let mut out = Vec::new();

        let err = report(&config, &store, &renderer, DATASET_KEY, &mut out).unwrap_err();

        assert!(matches!(err, PipelineError::RenderFailure(_)));
        assert!(store.artifact(&config.chart_key).is_none());
        assert!(store.artifact(&config.presentation_key).is_some());
    }

    #[test]
    fn write_failure_is_storage_failure() {
        let config = Config::default();
        let store = seeded_store();
        store.fail_writes();
        let renderer = StubRenderer::ok();
        let mut out = Vec::new();

        let err = report(&config, &store, &renderer, DATASET_KEY, &mut out).unwrap_err();

        assert!(matches!(err, PipelineError::StorageFailure(_)));
        assert_eq!(renderer.calls.get(), 0);
    }
}
