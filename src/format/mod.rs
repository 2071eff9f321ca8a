//! Locale-aware presentation helpers.
//!
//! Aggregation works on unrounded `f64` values; rounding only happens here.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number formatting preferences derived from a language tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    /// Integer digits needed before grouping kicks in (`es` skips 4-digit values).
    pub min_grouping_digits: usize,
    pub symbol_after: bool,
}

impl LocaleConfig {
    pub fn for_tag(tag: &str) -> Self {
        let lowered = tag.to_ascii_lowercase();
        if lowered == "es" || lowered.starts_with("es-") {
            Self {
                language_tag: tag.into(),
                decimal_separator: ',',
                grouping_separator: '.',
                min_grouping_digits: 5,
                symbol_after: true,
            }
        } else {
            Self {
                language_tag: tag.into(),
                decimal_separator: '.',
                grouping_separator: ',',
                min_grouping_digits: 4,
                symbol_after: false,
            }
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::for_tag("es-ES")
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac)) => (int_part.to_string(), Some(frac.to_string())),
        None => (body, None),
    };
    let grouped = if int_part.len() >= locale.min_grouping_digits {
        group_digits(&int_part, locale.grouping_separator)
    } else {
        int_part
    };
    let mut out = String::new();
    if value < 0.0 && body_is_nonzero(&grouped, frac_part.as_deref()) {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator);
        out.push_str(&frac);
    }
    out
}

fn body_is_nonzero(int_part: &str, frac_part: Option<&str>) -> bool {
    int_part
        .chars()
        .chain(frac_part.unwrap_or("").chars())
        .any(|ch| ch.is_ascii_digit() && ch != '0')
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Formats `amount` as currency, e.g. `1234,56 €` for `es-ES`/EUR.
pub fn format_currency(amount: f64, code: &str, locale: &LocaleConfig) -> String {
    let body = format_number(locale, amount, minor_units_for(code));
    let symbol = symbol_for(code);
    if locale.symbol_after {
        format!("{}\u{a0}{}", body, symbol)
    } else if let Some(digits) = body.strip_prefix('-') {
        format!("-{}{}", symbol, digits)
    } else {
        format!("{}{}", symbol, body)
    }
}

/// Whole-number percentage, rounding halves away from zero.
pub fn format_percent(value: f64) -> String {
    format!("{:.0}", value.round())
}

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Full Spanish month name for `month` (1-12); empty when out of range.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("")
}

/// Abbreviated Spanish month name for `month` (1-12); empty when out of range.
pub fn month_abbreviation(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_ABBREVIATIONS.get(idx as usize))
        .copied()
        .unwrap_or("")
}

/// `"5 mar"`
pub fn day_label(date: NaiveDate) -> String {
    format!("{} {}", date.day(), month_abbreviation(date.month()))
}

/// `"mar 2024"`
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", month_abbreviation(date.month()), date.year())
}
