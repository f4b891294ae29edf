use chrono::{Datelike, NaiveDateTime};
use log::debug;

use crate::config::*;
use crate::format::{display_value, parse_timestamp};
use crate::schema::*;

fn cell_timestamp(v: &Value) -> Option<NaiveDateTime> {
    match v {
        Value::Timestamp(ts) => Some(*ts),
        Value::Text(s) => parse_timestamp(s),
        _ => None,
    }
}

/// Keeps the rows dated in the given month.
///
/// A missing date column leaves the table unchanged.
pub fn filter_by_month(table: &Table, filter: &MonthFilter) -> Table {
    let idx = match table.column_index(DATE) {
        Some(idx) => idx,
        None => {
            debug!("filter_by_month: no column {:?}, not filtering", DATE);
            return table.clone();
        }
    };
    let res = table.retain_rows(|row| match cell_timestamp(&row[idx]) {
        Some(ts) => {
            ts.month() == filter.month() && filter.year().map_or(true, |y| ts.year() == y)
        }
        None => false,
    });
    debug!(
        "filter_by_month: {:?}: {} -> {} rows",
        filter,
        table.num_rows(),
        res.num_rows()
    );
    res
}

/// Keeps the rows whose value in `column` contains `needle`, ignoring case.
///
/// A missing column leaves the table unchanged.
pub fn filter_by_column(table: &Table, column: &str, needle: &str) -> Table {
    let idx = match table.column_index(column) {
        Some(idx) => idx,
        None => {
            debug!("filter_by_column: no column {:?}, not filtering", column);
            return table.clone();
        }
    };
    let needle = needle.to_lowercase();
    table.retain_rows(|row| display_value(&row[idx]).to_lowercase().contains(&needle))
}

/// Applies the month filter, then the email filter, then the name filter.
pub fn apply_filters(table: &Table, request: &FilterRequest) -> Table {
    let mut res = match &request.month {
        Some(m) => filter_by_month(table, m),
        None => table.clone(),
    };
    if let Some(email) = &request.email {
        res = filter_by_column(&res, EMAIL, email);
    }
    if let Some(name) = &request.name {
        res = filter_by_column(&res, FULL_NAME, name);
    }
    res
}
