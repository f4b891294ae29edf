//! Display form of the computed values.
//!
//! Everything here is applied last. A formatted string is never read back as
//! an amount; only the date display format is parsed back, by the filters.

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::*;
use crate::schema::*;

/// The format dates are displayed and exported with.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Formats found in form exports, tried after DATE_FORMAT.
const DATETIME_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];
const DATE_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// The columns shown as dollar amounts.
pub const CURRENCY_COLUMNS: [&str; 6] = [
    INSTRUCTOR_PROVIDED_TOTAL,
    SIDE_PROJECTS,
    INVOICES_RECEIPTS,
    RATE,
    OH_RATE,
    CALCULATED_TOTAL,
];

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(DATE_FORMAT).to_string()
}

/// Parses a date as written by `format_timestamp`, or as found in a form export.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, DATE_FORMAT) {
        return Some(ts);
    }
    for fmt in DATETIME_INPUT_FORMATS.iter() {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `1234.5` -> `"$1,234.50"`
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, c) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    // -0.001 rounds to zero and must not show a sign.
    let sign = if amount < 0.0 && fixed != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, cents)
}

/// The currency display of a cell. Blank and non-numeric cells are shown empty.
pub fn format_currency_value(v: &Value) -> String {
    match v {
        Value::Timestamp(_) => String::new(),
        _ => v
            .as_f64()
            .filter(|f| f.is_finite())
            .map(format_currency)
            .unwrap_or_default(),
    }
}

pub fn display_value(v: &Value) -> String {
    match v {
        Value::Text(s) => s.clone(),
        Value::Count(n) => n.to_string(),
        Value::Amount(f) => f.to_string(),
        Value::Timestamp(ts) => format_timestamp(ts),
    }
}

/// Renders every cell as text, with the given columns as dollar amounts.
pub fn format_table(table: &Table, currency_columns: &[&str]) -> Table {
    let currency_idx: Vec<bool> = table
        .columns()
        .iter()
        .map(|c| currency_columns.contains(&c.as_str()))
        .collect();
    let mut res = Table::new(table.columns().to_vec());
    for row in table.rows() {
        let cells: Vec<Value> = row
            .iter()
            .zip(currency_idx.iter())
            .map(|(v, is_currency)| {
                if *is_currency {
                    Value::Text(format_currency_value(v))
                } else {
                    Value::Text(display_value(v))
                }
            })
            .collect();
        res.push_row(cells);
    }
    res
}

/// `format_table` with the standard currency columns.
pub fn display_table(table: &Table) -> Table {
    format_table(table, &CURRENCY_COLUMNS)
}
