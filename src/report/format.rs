//! Terminal table for the presentation view.
//!
//! Every row is printed (no pagination). Rates are rounded to
//! `DISPLAY_DECIMALS` here and only here.

use crate::io::PresentationView;
use crate::io::dataset::DATE_FORMAT;

pub const DISPLAY_DECIMALS: usize = 4;

const COLUMN_GAP: &str = "  ";

/// Format the whole view as a right-aligned text table.
pub fn format_table(view: &PresentationView) -> String {
    let headers = view.headers();
    let body: Vec<[String; 3]> = view
        .rows
        .iter()
        .map(|r| {
            [
                r.date.format(DATE_FORMAT).to_string(),
                format!("{:.*}", DISPLAY_DECIMALS, r.rate_primary),
                format!("{:.*}", DISPLAY_DECIMALS, r.rate_secondary),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    for row in &body {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize; 3]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:>w$}"))
        .collect();
    out.push_str(&line.join(COLUMN_GAP));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{CurrencyPair, MergedRecord};

    #[test]
    fn table_relabels_and_rounds_for_display() {
        let rows = vec![
            MergedRecord {
                date: NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
                rate_primary: 28.5,
                rate_secondary: 32.123456,
            },
            MergedRecord {
                date: NaiveDate::from_ymd_opt(2022, 1, 4).unwrap(),
                rate_primary: 28.6,
                rate_secondary: 32.3,
            },
        ];
        let view = PresentationView::new(&CurrencyPair::default(), rows);
        let table = format_table(&view);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "      Дата  Курс USD (UAH)  Курс EUR (UAH)");
        assert_eq!(lines[1], "2022-01-03         28.5000         32.1235");
        assert_eq!(lines[2], "2022-01-04         28.6000         32.3000");
    }

    #[test]
    fn every_row_is_printed() {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let rows: Vec<MergedRecord> = (0..400)
            .map(|i| MergedRecord {
                date: start + chrono::Duration::days(i),
                rate_primary: 27.0,
                rate_secondary: 30.0,
            })
            .collect();
        let view = PresentationView::new(&CurrencyPair::default(), rows);
        assert_eq!(format_table(&view).lines().count(), 401);
    }
}
