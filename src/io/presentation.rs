//! Presentation view: merged rows under display-locale column labels.
//!
//! The stored presentation CSV keeps full precision; only the printed table
//! (see `report::format`) rounds.

use csv::WriterBuilder;

use crate::domain::{CurrencyPair, MergedRecord};
use crate::error::PipelineError;
use crate::io::dataset::DATE_FORMAT;
use crate::messages;

#[derive(Debug, Clone, PartialEq)]
pub struct PresentationView {
    pub date_label: String,
    pub primary_label: String,
    pub secondary_label: String,
    pub rows: Vec<MergedRecord>,
}

impl PresentationView {
    /// Relabel `rows` for `pair`. Values are carried over untouched.
    pub fn new(pair: &CurrencyPair, rows: Vec<MergedRecord>) -> Self {
        Self {
            date_label: messages::date_label().to_string(),
            primary_label: messages::rate_label(&pair.primary, &pair.base),
            secondary_label: messages::rate_label(&pair.secondary, &pair.base),
            rows,
        }
    }

    pub fn headers(&self) -> [&str; 3] {
        [
            self.date_label.as_str(),
            self.primary_label.as_str(),
            self.secondary_label.as_str(),
        ]
    }

    /// CSV bytes with relabeled header and raw-precision values.
    pub fn to_csv(&self) -> Result<Vec<u8>, PipelineError> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        let csv_err =
            |e: csv::Error| PipelineError::StorageFailure(format!("failed to encode presentation CSV: {e}"));

        writer.write_record(self.headers()).map_err(csv_err)?;
        for r in &self.rows {
            writer
                .write_record([
                    r.date.format(DATE_FORMAT).to_string(),
                    r.rate_primary.to_string(),
                    r.rate_secondary.to_string(),
                ])
                .map_err(csv_err)?;
        }

        writer
            .into_inner()
            .map_err(|e| PipelineError::StorageFailure(format!("failed to flush presentation CSV: {e}")))
    }
}
