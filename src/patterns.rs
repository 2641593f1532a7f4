//! Value shape recognition for noisy spreadsheet text.
//!
//! Each cell is classified into at most one [`ValueClass`] by an ordered
//! table of patterns: percentage, currency, plain number, then the four date
//! shapes. The first pattern that matches wins. New currency glyphs or date
//! shapes are added as table entries.

use crate::constants::{CURRENCY_SYMBOLS, MONTH_ABBREVIATIONS};
use crate::models::CellValue;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Shape of a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueClass {
    Percentage,
    Currency,
    Number,
    Date,
    Unclassified,
}

/// Digits with optional comma grouping and an optional fractional part.
/// Grouping is either thousands (`1,234,567`) or lakh/crore (`12,34,567`).
const AMOUNT: &str = r"(?:\d{1,3}(?:,\d{3})+|\d{1,2}(?:,\d{2})+,\d{3}|\d+)(?:\.\d+)?";

fn currency_class() -> String {
    let glyphs: String = CURRENCY_SYMBOLS
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    format!("[{}]", glyphs)
}

fn month_alternation() -> String {
    MONTH_ABBREVIATIONS.join("|")
}

fn compile(pattern: &str) -> Regex {
    // Patterns are assembled from constants above; a failure is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid value pattern {}: {}", pattern, e))
}

/// Ordered (pattern, class) table; earlier entries take precedence
static VALUE_PATTERNS: LazyLock<Vec<(Regex, ValueClass)>> = LazyLock::new(|| {
    let currency = currency_class();
    let months = month_alternation();
    vec![
        (
            compile(r"^[+-]?\d+(?:\.\d+)?%$"),
            ValueClass::Percentage,
        ),
        (
            compile(&format!(r"^[+-]?{currency}\s?[+-]?{AMOUNT}$")),
            ValueClass::Currency,
        ),
        (
            compile(&format!(r"^[+-]?{AMOUNT}\s?{currency}$")),
            ValueClass::Currency,
        ),
        (compile(&format!(r"^[+-]?{AMOUNT}$")), ValueClass::Number),
        (
            compile(r"^\d{1,2}[/-]\d{1,2}[/-]\d{2,4}$"),
            ValueClass::Date,
        ),
        (compile(r"^\d{4}[/-]\d{1,2}[/-]\d{1,2}$"), ValueClass::Date),
        (
            compile(&format!(r"(?i)^(?:{months})\s+\d{{1,2}},\s*\d{{4}}$")),
            ValueClass::Date,
        ),
        (
            compile(&format!(r"(?i)^\d{{1,2}}\s+(?:{months})\s+\d{{4}}$")),
            ValueClass::Date,
        ),
    ]
});

/// Leading sign plus a digit or currency glyph: the cell reads as data
static LOOKS_LIKE_DATA: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"^[+-]?(?:\d|{})", currency_class())));

/// Classify trimmed text against the pattern table
pub fn classify_text(text: &str) -> ValueClass {
    let text = text.trim();
    VALUE_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, class)| *class)
        .unwrap_or(ValueClass::Unclassified)
}

/// Classify a raw cell; typed workbook cells skip the text patterns
pub fn classify_cell(cell: &CellValue) -> ValueClass {
    match cell {
        CellValue::Number(_) => ValueClass::Number,
        CellValue::DateTime(_) => ValueClass::Date,
        CellValue::Text(s) => classify_text(s),
        CellValue::Empty | CellValue::Bool(_) => ValueClass::Unclassified,
    }
}

/// Whether a lone cell reads as a data value rather than a section label
pub fn looks_like_data(cell: &CellValue) -> bool {
    cell.is_date_instant() || LOOKS_LIKE_DATA.is_match(cell.as_text().trim())
}

/// Numeric magnitude of a number, currency amount or percentage.
///
/// Glyphs, `%`, grouping commas and whitespace are stripped; `"12.5%"`
/// yields `12.5`.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '%' && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    // A sign may sit before the glyph: "-$5" becomes "-5" above, "$-5" too.
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Date formats tried in order; day-first wins over month-first when ambiguous
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y", "%m-%d-%Y", "%b %d, %Y",
    "%b %d,%Y", "%d %b %Y",
];

const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%m/%d/%y", "%m-%d-%y"];

/// Day and month first with a two-digit trailing year, e.g. `5-1-24`
static SHORT_YEAR_DATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\d{1,2}[/-]\d{1,2}[/-]\d{2}$"));

/// Calendar date for text in one of the recognized date shapes
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if classify_text(text) != ValueClass::Date {
        return None;
    }
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let formats = if SHORT_YEAR_DATE.is_match(&normalized) {
        SHORT_YEAR_FORMATS
    } else {
        DATE_FORMATS
    };
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&normalized, format).ok())
}
