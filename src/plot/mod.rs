//! Chart description + the renderer seam.
//!
//! `ChartSpec` is a render-only description built from the presentation view:
//! all series, labels and ticks are computed here so the renderer only draws.

use chrono::NaiveDate;

use crate::domain::{CurrencyPair, MergedRecord};
use crate::error::PipelineError;
use crate::messages;

pub mod png;

pub use png::PngChartRenderer;

/// Turns a chart description into an encoded raster image.
pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, PipelineError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub label: String,
    pub color: (u8, u8, u8),
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    pub lines: Vec<LineSpec>,
    /// Integer y values that get a tick label and a grid line.
    pub y_ticks: Vec<i64>,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    /// Dual-line chart of `rows` (primary green, secondary blue), 1200x600.
    pub fn for_rates(pair: &CurrencyPair, rows: &[MergedRecord]) -> Self {
        let title = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => messages::chart_title(pair, &messages::period(first.date, last.date)),
            _ => messages::chart_title(pair, ""),
        };

        Self {
            title: title.trim_end().to_string(),
            x_label: messages::date_label().to_string(),
            y_label: messages::axis_rate_label(&pair.base),
            legend_title: messages::legend_title().to_string(),
            lines: vec![
                LineSpec {
                    label: messages::legend_entry(&pair.primary),
                    color: (0, 128, 0),
                    points: rows.iter().map(|r| (r.date, r.rate_primary)).collect(),
                },
                LineSpec {
                    label: messages::legend_entry(&pair.secondary),
                    color: (0, 0, 255),
                    points: rows.iter().map(|r| (r.date, r.rate_secondary)).collect(),
                },
            ],
            y_ticks: unit_ticks(rows),
            width: 1200,
            height: 600,
        }
    }

    /// Earliest and latest date across all lines.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.lines.iter().flat_map(|l| l.points.iter().map(|(d, _)| *d));
        dates.fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
    }

    /// Smallest and largest value across all lines.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let values = self.lines.iter().flat_map(|l| l.points.iter().map(|(_, v)| *v));
        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Upper limit on the number of unit ticks a chart carries.
pub const MAX_UNIT_TICKS: usize = 500;

/// Unit-step y ticks from `floor(min primary)` to `ceil(max secondary)`.
///
/// The bounds mix the two series on purpose: the lower bound only looks at the
/// primary rate and the upper bound only at the secondary rate. When the
/// primary minimum lies above the secondary maximum the list is empty. A span
/// wider than [`MAX_UNIT_TICKS`] also yields no ticks.
pub fn unit_ticks(rows: &[MergedRecord]) -> Vec<i64> {
    let min_primary = rows.iter().map(|r| r.rate_primary).fold(f64::INFINITY, f64::min);
    let max_secondary = rows
        .iter()
        .map(|r| r.rate_secondary)
        .fold(f64::NEG_INFINITY, f64::max);

    if !(min_primary.is_finite() && max_secondary.is_finite()) {
        return Vec::new();
    }

    let (lo, hi) = (min_primary.floor(), max_secondary.ceil());
    if hi - lo >= MAX_UNIT_TICKS as f64 {
        log::warn!("tick span {lo}..={hi} exceeds {MAX_UNIT_TICKS} unit steps; chart drawn without ticks");
        return Vec::new();
    }
    (lo as i64..=hi as i64).collect()
}
