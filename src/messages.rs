//! Operator-facing text in the display locale (Ukrainian).
//!
//! Log lines stay in English; everything printed for the operator, the table
//! headers and the chart labels come from here.

use chrono::{Datelike, NaiveDate};

use crate::domain::CurrencyPair;
use crate::error::PipelineError;

pub fn date_label() -> &'static str {
    "Дата"
}

/// Column label for a currency, e.g. `Курс USD (UAH)`.
pub fn rate_label(code: &str, base: &str) -> String {
    format!("Курс {code} ({base})")
}

pub fn axis_rate_label(base: &str) -> String {
    format!("Курс ({base})")
}

pub fn legend_title() -> &'static str {
    "Валюта"
}

/// Legend entry; known codes get their currency sign.
pub fn legend_entry(code: &str) -> String {
    match code {
        "USD" => "$ USD".to_string(),
        "EUR" => "€ EUR".to_string(),
        "GBP" => "£ GBP".to_string(),
        other => other.to_string(),
    }
}

/// `за 2022 рік` or `за 2022–2023 роки`.
pub fn period(first: NaiveDate, last: NaiveDate) -> String {
    if first.year() == last.year() {
        format!("за {} рік", first.year())
    } else {
        format!("за {}–{} роки", first.year(), last.year())
    }
}

/// `Курс гривні до USD та EUR за 2022 рік`.
pub fn chart_title(pair: &CurrencyPair, period: &str) -> String {
    let base = if pair.base == "UAH" { "гривні".to_string() } else { pair.base.clone() };
    format!("Курс {base} до {} та {} {period}", pair.primary, pair.secondary)
}

pub fn table_heading(title: &str) -> String {
    format!("Дані для графіка ({title}):")
}

pub fn uploaded(key: &str, bucket: &str) -> String {
    format!("Файл {key} завантажено в бакет {bucket}.")
}

pub fn invalid_month() -> &'static str {
    "Задайте місяць цифрою від 1 до 12."
}

/// Localized failure line naming the operation and the cause.
pub fn failure(operation: Operation, err: &PipelineError) -> String {
    let what = match err {
        PipelineError::InvalidInput(_) => "Некоректні вхідні дані",
        PipelineError::TransportFailure(_) => "Помилка отримання даних від API",
        PipelineError::EmptyResult(_) => "Дані для одного з валют відсутні",
        PipelineError::ParseFailure(_) => "Помилка розбору даних",
        PipelineError::NotFound(_) => "Файл не знайдено",
        PipelineError::StorageFailure(_) => "Помилка сховища",
        PipelineError::RenderFailure(_) => "Помилка побудови графіка",
    };
    format!("{} ({}): {what}: {err}", operation.label(), operation.key())
}

/// A pipeline step, for failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    Fetch(&'a str),
    Upload(&'a str),
    Download(&'a str),
    Parse(&'a str),
    Render(&'a str),
}

impl Operation<'_> {
    fn label(&self) -> &'static str {
        match self {
            Operation::Fetch(_) => "Запит до API",
            Operation::Upload(_) => "Завантаження",
            Operation::Download(_) => "Читання",
            Operation::Parse(_) => "Розбір CSV",
            Operation::Render(_) => "Побудова графіка",
        }
    }

    fn key(&self) -> &str {
        match self {
            Operation::Fetch(k)
            | Operation::Upload(k)
            | Operation::Download(k)
            | Operation::Parse(k)
            | Operation::Render(k) => *k,
        }
    }
}
