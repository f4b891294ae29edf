use log::debug;
use regex::Regex;
use std::sync::OnceLock;

use crate::config::*;
use crate::format::{display_value, format_timestamp, parse_timestamp};
use crate::schema::*;

// An amount in free text: digits, optionally followed by a decimal part.
fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid amount pattern"))
}

/// The declared type of each column. Pass-through columns are text.
pub fn column_kind(name: &str) -> ColumnKind {
    match name {
        DATE => ColumnKind::Temporal,
        INSTRUCTOR_PROVIDED_TOTAL | SIDE_PROJECTS | INVOICES_RECEIPTS | CALCULATED_TOTAL => {
            ColumnKind::FreeIncome
        }
        WORK_MEETINGS | ADMIN_MEETINGS | TOTAL_CLASSES | RATE | OH_RATE => ColumnKind::Count,
        v if VENUES.contains(&v) => ColumnKind::Count,
        _ => ColumnKind::Text,
    }
}

/// Sums every number written in the text. `"$50 plus $25.50 tip"` is 75.5.
pub fn sum_amounts(text: &str) -> f64 {
    amount_pattern()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|f| f.is_finite())
        .sum()
}

/// The largest count kept in a cell. Larger counts are capped.
pub const MAX_COUNT: i64 = 1_000_000;

/// Truncates a number to a count, between 0 and `MAX_COUNT`.
pub fn count_from_f64(f: f64) -> i64 {
    if f.is_finite() && f >= 0.0 {
        f.trunc().min(MAX_COUNT as f64) as i64
    } else {
        0
    }
}

/// A count from a cell. Anything but a non-negative number is zero.
pub fn parse_count(text: &str) -> i64 {
    text.trim().parse::<f64>().map(count_from_f64).unwrap_or(0)
}

/// Title case: a letter is uppercased when it follows a
/// non-letter and lowercased otherwise.
pub fn title_case(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                res.extend(c.to_lowercase());
            } else {
                res.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            res.push(c);
            prev_is_letter = false;
        }
    }
    res
}

/// Converts one cell to the kind of its column.
pub fn coerce_value(kind: ColumnKind, v: &Value) -> Value {
    match (kind, v) {
        (ColumnKind::Text, Value::Text(s)) => Value::Text(s.trim().to_string()),
        (ColumnKind::Text, other) => Value::Text(display_value(other)),

        (ColumnKind::Count, Value::Text(s)) => Value::Count(parse_count(s)),
        (ColumnKind::Count, Value::Count(n)) => Value::Count((*n).clamp(0, MAX_COUNT)),
        (ColumnKind::Count, Value::Amount(f)) => Value::Count(count_from_f64(*f)),
        (ColumnKind::Count, Value::Timestamp(_)) => Value::Count(0),

        (ColumnKind::FreeIncome, Value::Text(s)) => Value::Amount(sum_amounts(s)),
        (ColumnKind::FreeIncome, Value::Count(n)) => Value::Amount(*n as f64),
        (ColumnKind::FreeIncome, Value::Amount(f)) => Value::Amount(*f),
        (ColumnKind::FreeIncome, Value::Timestamp(_)) => Value::Amount(0.0),

        // A date that cannot be read stays as text; it will not match any month.
        (ColumnKind::Temporal, Value::Text(s)) => match parse_timestamp(s) {
            Some(ts) => Value::Timestamp(ts),
            None => Value::Text(s.trim().to_string()),
        },
        (ColumnKind::Temporal, Value::Timestamp(ts)) => Value::Timestamp(*ts),
        (ColumnKind::Temporal, other) => Value::Text(display_value(other)),
    }
}

/// Brings the date column back to timestamps, for tables that went through
/// the display form.
pub fn normalize_dates(table: &mut Table) {
    table.map_column(DATE, |v| coerce_value(ColumnKind::Temporal, v));
}

// The columns read by the later stages. They are reported when missing.
fn referenced_columns() -> Vec<&'static str> {
    let mut res = vec![
        DATE,
        FULL_NAME,
        EMAIL,
        WORK_MEETINGS,
        ADMIN_MEETINGS,
        SIDE_PROJECTS,
        INVOICES_RECEIPTS,
    ];
    res.extend(VENUES.iter());
    res
}

/// Types every column of the table according to its declared kind.
///
/// Missing columns are skipped and reported.
pub fn coerce_table(table: &mut Table) -> Vec<PipelineWarning> {
    let columns: Vec<String> = table.columns().to_vec();
    for name in columns.iter() {
        let kind = column_kind(name);
        if name == FULL_NAME {
            table.map_column(name, |v| match coerce_value(kind, v) {
                Value::Text(s) => Value::Text(title_case(&s)),
                other => other,
            });
        } else {
            table.map_column(name, |v| coerce_value(kind, v));
        }
    }

    let warnings: Vec<PipelineWarning> = referenced_columns()
        .into_iter()
        .filter(|c| !table.has_column(c))
        .map(|c| PipelineWarning::MissingColumn(c.to_string()))
        .collect();
    debug!(
        "coerce_table: {} rows, missing columns: {:?}",
        table.num_rows(),
        warnings
    );
    warnings
}

/// The text of a date cell, whatever its current form.
pub fn date_text(v: &Value) -> String {
    match v {
        Value::Timestamp(ts) => format_timestamp(ts),
        other => display_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TableBuilder;

    #[test]
    fn free_income_text() {
        assert_eq!(sum_amounts("$50 plus $25.50 tip"), 75.5);
        assert_eq!(sum_amounts("none"), 0.0);
        assert_eq!(sum_amounts(""), 0.0);
        assert_eq!(sum_amounts("120"), 120.0);
        let huge = format!("{} and 5", "9".repeat(400));
        assert_eq!(sum_amounts(&huge), 5.0);
        // Thousands separators split the number.
        assert_eq!(sum_amounts("$1,200"), 201.0);
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count(" 3 "), 3);
        assert_eq!(parse_count("2.0"), 2);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("three"), 0);
        assert_eq!(parse_count("-1"), 0);
        assert_eq!(parse_count("9e18"), MAX_COUNT);
        assert_eq!(parse_count("inf"), 0);
    }

    #[test]
    fn names() {
        assert_eq!(title_case("jANE  doe"), "Jane  Doe");
        assert_eq!(title_case("mary-kate o'neil"), "Mary-Kate O'Neil");
    }

    #[test]
    fn coerces_by_column_kind() {
        let mut b = TableBuilder::new(&[
            DATE,
            FULL_NAME,
            EMAIL,
            WORK_MEETINGS,
            SIDE_PROJECTS,
            "Arroyo",
            "Comments",
        ]);
        b.add_row_simple(&[
            "2024-08-01 10:00:00",
            "  jane doe ",
            " jane@example.com ",
            "x",
            "$50 plus $25.50 tip",
            "",
            "  ok ",
        ])
        .unwrap();
        let mut t = b.build();
        let warnings = coerce_table(&mut t);
        assert_eq!(t.get(0, FULL_NAME), Some(&Value::text("Jane Doe")));
        assert_eq!(t.get(0, EMAIL), Some(&Value::text("jane@example.com")));
        assert_eq!(t.get(0, WORK_MEETINGS), Some(&Value::Count(0)));
        assert_eq!(t.get(0, SIDE_PROJECTS), Some(&Value::Amount(75.5)));
        assert_eq!(t.get(0, "Arroyo"), Some(&Value::Count(0)));
        assert_eq!(t.get(0, "Comments"), Some(&Value::text("ok")));
        assert!(matches!(t.get(0, DATE), Some(Value::Timestamp(_))));
        assert!(warnings.contains(&PipelineWarning::MissingColumn(ADMIN_MEETINGS.to_string())));
        assert!(!warnings.contains(&PipelineWarning::MissingColumn(EMAIL.to_string())));
    }

    #[test]
    fn coercion_is_stable() {
        let mut b = TableBuilder::new(&[DATE, RATE, INVOICES_RECEIPTS]);
        b.add_row_simple(&["not a date", "45", "12.5"]).unwrap();
        let mut once = b.build();
        coerce_table(&mut once);
        let mut twice = once.clone();
        coerce_table(&mut twice);
        assert_eq!(once, twice);
        assert_eq!(once.get(0, DATE), Some(&Value::text("not a date")));
    }
}
