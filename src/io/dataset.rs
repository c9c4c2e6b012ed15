//! Merged dataset CSV: `date,rate_primary,rate_secondary`.
//!
//! Dates are always written and read as `YYYY-MM-DD`. Rates are written with
//! the shortest representation that parses back to the same `f64`.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Deserialize;

use crate::domain::MergedRecord;
use crate::error::PipelineError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATASET_HEADER: [&str; 3] = ["date", "rate_primary", "rate_secondary"];

/// Number of raw date values quoted when date parsing fails.
const DATE_SAMPLE_LEN: usize = 5;

/// Serialize merged rows (with header) into CSV bytes.
pub fn encode_dataset(records: &[MergedRecord]) -> Result<Vec<u8>, PipelineError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    let csv_err = |e: csv::Error| PipelineError::StorageFailure(format!("failed to encode dataset CSV: {e}"));

    writer.write_record(DATASET_HEADER).map_err(csv_err)?;
    for r in records {
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
        .map_err(|e| PipelineError::StorageFailure(format!("failed to flush dataset CSV: {e}")))
}

#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    rate_primary: f64,
    rate_secondary: f64,
}

/// Parse dataset CSV bytes back into merged rows.
///
/// Strict: a single bad row fails the whole parse. Date failures quote the
/// first few raw date values to make format mismatches obvious.
pub fn decode_dataset(bytes: &[u8]) -> Result<Vec<MergedRecord>, PipelineError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| PipelineError::ParseFailure(format!("unreadable CSV header: {e}")))?
        .clone();

    let missing: Vec<&str> = DATASET_HEADER
        .into_iter()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::ParseFailure(format!(
            "missing columns {} (found: {})",
            missing.join(", "),
            headers.iter().collect::<Vec<_>>().join(", ")
        )));
    }

    let records: Vec<StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .map_err(|e| PipelineError::ParseFailure(format!("malformed CSV: {e}")))?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let raw: RawRow = record
            .deserialize(Some(&headers))
            .map_err(|e| PipelineError::ParseFailure(format!("row {}: {e}", i + 1)))?;
        if !(raw.rate_primary.is_finite() && raw.rate_secondary.is_finite()) {
            return Err(PipelineError::ParseFailure(format!(
                "row {}: non-finite rate on '{}'",
                i + 1,
                raw.date
            )));
        }
        rows.push(raw);
    }

    let mut out = Vec::with_capacity(rows.len());
    for (i, raw) in rows.iter().enumerate() {
        let date = NaiveDate::parse_from_str(&raw.date, DATE_FORMAT).map_err(|e| {
            PipelineError::ParseFailure(format!(
                "row {}: date '{}' does not match {DATE_FORMAT} ({e}); sample dates: [{}]",
                i + 1,
                raw.date,
                date_sample(&rows)
            ))
        })?;
        out.push(MergedRecord {
            date,
            rate_primary: raw.rate_primary,
            rate_secondary: raw.rate_secondary,
        });
    }

    Ok(out)
}

fn date_sample(rows: &[RawRow]) -> String {
    rows.iter()
        .take(DATE_SAMPLE_LEN)
        .map(|r| r.date.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<MergedRecord> {
        [
            (3, 27.2782, 30.9226),
            (4, 27.2125, 30.7893),
            (5, 27.3201, 30.8705),
            (6, 27.4113, 31.0),
        ]
        .iter()
        .map(|&(d, p, s)| MergedRecord {
            date: NaiveDate::from_ymd_opt(2022, 1, d).unwrap(),
            rate_primary: p,
            rate_secondary: s,
        })
        .collect()
    }

    #[test]
    fn dataset_round_trips() {
        let records = fixture();
        let bytes = encode_dataset(&records).unwrap();
        assert_eq!(decode_dataset(&bytes).unwrap(), records);
    }

    #[test]
    fn encoded_layout_is_iso_with_header() {
        let bytes = encode_dataset(&fixture()[..2]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "date,rate_primary,rate_secondary\n2022-01-03,27.2782,30.9226\n2022-01-04,27.2125,30.7893\n"
        );
    }

    #[test]
    fn bad_date_fails_whole_parse_with_sample() {
        let csv = "date,rate_primary,rate_secondary\n2022-01-03,1,2\n04.01.2022,1,2\n2022-01-05,1,2\n";
        let err = decode_dataset(csv.as_bytes()).unwrap_err();
        match err {
            PipelineError::ParseFailure(msg) => {
                assert!(msg.contains("row 2"), "{msg}");
                assert!(msg.contains("2022-01-03, 04.01.2022, 2022-01-05"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_rate_and_missing_column_fail() {
        let csv = "date,rate_primary,rate_secondary\n2022-01-03,abc,2\n";
        assert!(matches!(decode_dataset(csv.as_bytes()), Err(PipelineError::ParseFailure(_))));

        let csv = "date,rate_USD\n2022-01-03,1\n";
        let err = decode_dataset(csv.as_bytes()).unwrap_err();
        match err {
            PipelineError::ParseFailure(msg) => {
                assert!(msg.contains("rate_primary, rate_secondary"), "{msg}");
                assert!(msg.contains("found: date, rate_USD"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_finite_rates_are_rejected() {
        for row in ["2022-01-03,NaN,32.1", "2022-01-03,28.5,inf", "2022-01-03,-inf,32.1"] {
            let csv = format!("date,rate_primary,rate_secondary\n{row}\n");
            let err = decode_dataset(csv.as_bytes()).unwrap_err();
            assert!(
                matches!(err, PipelineError::ParseFailure(ref m) if m.contains("non-finite")),
                "{row}: {err:?}"
            );
        }
    }

    #[test]
    fn header_only_decodes_to_no_rows() {
        let bytes = encode_dataset(&[]).unwrap();
        assert!(decode_dataset(&bytes).unwrap().is_empty());
    }
}
