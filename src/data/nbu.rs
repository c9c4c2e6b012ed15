//! National Bank of Ukraine exchange-rate API integration.
//!
//! One request per currency:
//! `GET <base>?start=YYYYMMDD&end=YYYYMMDD&valcode=USD&sort=exchangedate&json`
//!
//! The response is a JSON array; we only read `exchangedate` and `rate`.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::data::RateSource;
use crate::domain::{DateRange, RatePoint};
use crate::error::PipelineError;

/// Date formats the service has been seen to use (`03.01.2022` is the norm).
const SOURCE_DATE_FORMATS: [&str; 2] = ["%d.%m.%Y", "%Y-%m-%d"];

pub struct NbuClient {
    client: Client,
    base_url: String,
}

impl NbuClient {
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| PipelineError::TransportFailure(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }
}

impl RateSource for NbuClient {
    fn fetch_series(&self, range: &DateRange, code: &str) -> Result<Vec<RatePoint>, PipelineError> {
        let start = range.start_compact();
        let end = range.end_compact();
        // `json` is a bare flag, so it goes into the URL rather than `.query()`.
        let url = format!("{}?json", self.base_url);

        log::debug!("requesting {code} rates {start}..{end} from {}", self.base_url);
        let resp = self
            .client
            .get(url)
            .query(&[
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("valcode", code),
                ("sort", "exchangedate"),
            ])
            .send()
            .map_err(|e| PipelineError::TransportFailure(format!("{code} request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(PipelineError::TransportFailure(format!(
                "{code} request failed with status {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| PipelineError::TransportFailure(format!("failed to read {code} response: {e}")))?;

        parse_observations(&body, code)
    }
}

#[derive(Debug, Deserialize)]
struct Observation {
    exchangedate: String,
    rate: f64,
}

/// Parse a response body into points, in the order the service returned them.
pub fn parse_observations(body: &str, code: &str) -> Result<Vec<RatePoint>, PipelineError> {
    let observations: Vec<Observation> = serde_json::from_str(body)
        .map_err(|e| PipelineError::ParseFailure(format!("malformed {code} response: {e}")))?;

    let mut out = Vec::with_capacity(observations.len());
    for obs in observations {
        let date = parse_source_date(&obs.exchangedate).ok_or_else(|| {
            PipelineError::ParseFailure(format!("invalid {code} exchange date '{}'", obs.exchangedate))
        })?;
        if !obs.rate.is_finite() {
            return Err(PipelineError::ParseFailure(format!("non-finite {code} rate on {date}")));
        }
        out.push(RatePoint { date, rate: obs.rate });
    }

    Ok(out)
}

fn parse_source_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    SOURCE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_payload() {
        let body = r#"[
            {"exchangedate":"03.01.2022","r030":840,"cc":"USD","txt":"Долар США","enname":"US Dollar","rate":27.2782,"units":1,"rate_per_unit":27.2782,"group":"1","calcdate":"31.12.2021"},
            {"exchangedate":"04.01.2022","r030":840,"cc":"USD","txt":"Долар США","enname":"US Dollar","rate":27.2125,"units":1,"rate_per_unit":27.2125,"group":"1","calcdate":"03.01.2022"}
        ]"#;
        let points = parse_observations(body, "USD").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2022, 1, 3).unwrap());
        assert_eq!(points[0].rate, 27.2782);
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2022, 1, 4).unwrap());
    }

    #[test]
    fn accepts_iso_dates_and_empty_arrays() {
        let points = parse_observations(r#"[{"exchangedate":"2022-01-03","rate":30.5}]"#, "EUR").unwrap();
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2022, 1, 3).unwrap());

        assert!(parse_observations("[]", "EUR").unwrap().is_empty());
    }

    #[test]
    fn malformed_bodies_are_parse_failures() {
        let err = parse_observations("<html>maintenance</html>", "USD").unwrap_err();
        assert!(matches!(err, PipelineError::ParseFailure(_)));

        let err = parse_observations(r#"[{"exchangedate":"3/1/22","rate":1.0}]"#, "USD").unwrap_err();
        assert!(matches!(err, PipelineError::ParseFailure(ref m) if m.contains("3/1/22")));
    }
}
