//! Run configuration.
//!
//! Every stage receives a `Config` explicitly instead of reading globals, so
//! tests can build one by hand and point it at in-memory collaborators.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::CurrencyPair;
use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "https://bank.gov.ua/NBU_Exchange/exchange_site";
pub const DEFAULT_BUCKET: &str = "lab2bucket-lnu";
pub const DEFAULT_DATASET_PREFIX: &str = "exchange_rates";
pub const DEFAULT_PRESENTATION_KEY: &str = "exchange_rates/exchange_rate_data_2022.csv";
pub const DEFAULT_CHART_KEY: &str = "plots/uah_exchange_rates_2022.png";

#[derive(Debug, Clone)]
pub struct Config {
    /// Data source endpoint (queried once per currency).
    pub api_url: String,
    pub http_timeout: Duration,
    /// Directory holding the buckets of the filesystem store.
    pub store_root: PathBuf,
    /// Bucket name; also shown in operator messages.
    pub bucket: String,
    pub currencies: CurrencyPair,
    /// Namespace prefix for merged datasets.
    pub dataset_prefix: String,
    pub presentation_key: String,
    pub chart_key: String,
    /// TrueType font for chart text. Without it the chart has no labels.
    pub font_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(30),
            store_root: PathBuf::from("storage"),
            bucket: DEFAULT_BUCKET.to_string(),
            currencies: CurrencyPair::default(),
            dataset_prefix: DEFAULT_DATASET_PREFIX.to_string(),
            presentation_key: DEFAULT_PRESENTATION_KEY.to_string(),
            chart_key: DEFAULT_CHART_KEY.to_string(),
            font_path: None,
        }
    }
}

impl Config {
    /// Defaults overridden by `RATES_*` variables (a `.env` file is honored).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, but with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("RATES_API_URL") {
            config.api_url = v;
        }
        if let Some(v) = get("RATES_HTTP_TIMEOUT_SECS") {
            let secs: u64 = v
                .parse()
                .map_err(|_| AppError::new(2, format!("Invalid RATES_HTTP_TIMEOUT_SECS '{v}'.")))?;
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("RATES_STORE_ROOT") {
            config.store_root = PathBuf::from(v);
        }
        if let Some(v) = get("RATES_BUCKET") {
            config.bucket = v;
        }
        if let Some(v) = get("RATES_PRIMARY") {
            config.currencies.primary = v.to_uppercase();
        }
        if let Some(v) = get("RATES_SECONDARY") {
            config.currencies.secondary = v.to_uppercase();
        }
        if let Some(v) = get("RATES_BASE") {
            config.currencies.base = v.to_uppercase();
        }
        if let Some(v) = get("RATES_DATASET_PREFIX") {
            config.dataset_prefix = v;
        }
        if let Some(v) = get("RATES_PRESENTATION_KEY") {
            config.presentation_key = v;
        }
        if let Some(v) = get("RATES_CHART_KEY") {
            config.chart_key = v;
        }
        if let Some(v) = get("RATES_FONT_PATH") {
            config.font_path = Some(PathBuf::from(v));
        }

        if config.currencies.primary == config.currencies.secondary {
            return Err(AppError::new(
                2,
                format!(
                    "Primary and secondary currency must differ (both '{}').",
                    config.currencies.primary
                ),
            ));
        }

        Ok(config)
    }

    /// Bucket directory used by the filesystem store.
    pub fn bucket_dir(&self) -> PathBuf {
        self.store_root.join(&self.bucket)
    }
}
