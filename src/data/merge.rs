//! Date alignment of two independent series.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{MergedRecord, RatePoint};

/// Inner join of `primary` and `secondary` on date.
///
/// Only dates observed in both series survive. Output is ascending by date.
/// When a series repeats a date, its first observation wins.
pub fn merge_on_date(primary: &[RatePoint], secondary: &[RatePoint]) -> Vec<MergedRecord> {
    let primary = first_by_date(primary);
    let secondary = first_by_date(secondary);

    primary
        .into_iter()
        .filter_map(|(date, rate_primary)| {
            secondary.get(&date).map(|&rate_secondary| MergedRecord {
                date,
                rate_primary,
                rate_secondary,
            })
        })
        .collect()
}

fn first_by_date(points: &[RatePoint]) -> BTreeMap<NaiveDate, f64> {
    let mut map = BTreeMap::new();
    for p in points {
        map.entry(p.date).or_insert(p.rate);
    }
    map
}
