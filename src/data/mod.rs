//! Data acquisition: the rate source seam, the NBU client behind it, and the
//! date-aligned merge of two series.

pub mod merge;
pub mod nbu;

pub use merge::merge_on_date;
pub use nbu::NbuClient;

use crate::domain::{DateRange, RatePoint};
use crate::error::PipelineError;

/// Something that can return one currency's daily rates over a date range.
pub trait RateSource {
    /// Points for `code` within `range`, sorted by date by the source.
    fn fetch_series(&self, range: &DateRange, code: &str) -> Result<Vec<RatePoint>, PipelineError>;
}
