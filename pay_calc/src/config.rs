// ********* Table data structures ***********

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The content of a single cell.
///
/// Raw tables only contain `Text`. The coercer turns each column into the
/// variant declared by its `ColumnKind`.
#[derive(PartialEq, Debug, Clone)]
pub enum Value {
    /// Free text. A blank cell is the empty string, never a null marker.
    Text(String),
    /// A whole, non-negative count (meetings, classes) or an integer rate.
    Count(i64),
    /// A currency amount.
    Amount(f64),
    /// A point in time, as found in the date column.
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    pub fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    /// The numeric content of the cell, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Count(n) => Some(*n as f64),
            Value::Amount(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            Value::Timestamp(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Text(s) if s.trim().is_empty())
    }
}

/// An ordered list of rows sharing one set of columns.
///
/// Invariant: every row has exactly as many cells as there are columns.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Table {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Appends a row, padding it with blank cells or truncating it to the
    /// width of the table.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::empty());
        self.rows.push(row);
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Replaces a cell. Returns false if the row or the column does not exist.
    pub fn set(&mut self, row: usize, column: &str, value: Value) -> bool {
        match (self.column_index(column), self.rows.get_mut(row)) {
            (Some(idx), Some(r)) => {
                r[idx] = value;
                true
            }
            _ => false,
        }
    }

    /// Renames a column in place. Nothing happens if `old` is missing or if
    /// `new` is already taken.
    pub fn rename_column(&mut self, old: &str, new: &str) -> bool {
        if self.has_column(new) {
            return false;
        }
        match self.column_index(old) {
            Some(idx) => {
                self.columns[idx] = new.to_string();
                true
            }
            None => false,
        }
    }

    /// Inserts a column filled with `default`. The position is clamped to the
    /// width of the table.
    pub fn insert_column(&mut self, position: usize, name: &str, default: Value) {
        let pos = position.min(self.columns.len());
        self.columns.insert(pos, name.to_string());
        for r in self.rows.iter_mut() {
            r.insert(pos, default.clone());
        }
    }

    /// Rewrites every cell of a column. Returns false if the column is missing.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(&Value) -> Value,
    {
        match self.column_index(name) {
            Some(idx) => {
                for r in self.rows.iter_mut() {
                    r[idx] = f(&r[idx]);
                }
                true
            }
            None => false,
        }
    }

    /// A new table with the same columns and only the rows accepted by the
    /// predicate, in the same order.
    pub fn retain_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

/// How the cells of a column are coerced.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ColumnKind {
    /// Trimmed text.
    Text,
    /// Whole number; anything that is not a number becomes zero.
    Count,
    /// Human-entered text where every embedded number is summed.
    FreeIncome,
    /// Date and time of the report.
    Temporal,
}

// ********* Configuration **********

/// The fixed rates paid for meetings.
#[derive(PartialEq, Debug, Clone)]
pub struct PayRules {
    pub work_meeting_rate: f64,
    pub admin_meeting_rate: f64,
}

impl PayRules {
    pub const DEFAULT_RULES: PayRules = PayRules {
        work_meeting_rate: 20.0,
        admin_meeting_rate: 25.0,
    };
}

impl Default for PayRules {
    fn default() -> Self {
        PayRules::DEFAULT_RULES
    }
}

/// Per-instructor class rates, keyed by the title-cased full name.
///
/// `oh` holds the rates paid for Orchard Hills classes.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RateTable {
    pub base: HashMap<String, f64>,
    pub oh: HashMap<String, f64>,
}

impl RateTable {
    pub fn new() -> RateTable {
        RateTable::default()
    }

    pub fn with_base_rate(mut self, name: &str, rate: f64) -> RateTable {
        self.base.insert(name.to_string(), rate);
        self
    }

    pub fn with_oh_rate(mut self, name: &str, rate: f64) -> RateTable {
        self.oh.insert(name.to_string(), rate);
        self
    }

    pub fn base_rate(&self, name: &str) -> Option<f64> {
        self.base.get(name).cloned()
    }

    pub fn oh_rate(&self, name: &str) -> Option<f64> {
        self.oh.get(name).cloned()
    }
}

/// Selects the rows of one calendar month.
///
/// Without a year, the same month of every year matches.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct MonthFilter {
    month: u32,
    year: Option<i32>,
}

impl MonthFilter {
    pub fn new(month: u32) -> Result<MonthFilter, PayError> {
        if (1..=12).contains(&month) {
            Ok(MonthFilter { month, year: None })
        } else {
            Err(PayError::InvalidMonth(month))
        }
    }

    pub fn in_year(self, year: i32) -> MonthFilter {
        MonthFilter {
            month: self.month,
            year: Some(year),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

/// The filters of one request. Absent fields do not filter.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FilterRequest {
    pub month: Option<MonthFilter>,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl FilterRequest {
    pub fn is_empty(&self) -> bool {
        self.month.is_none() && self.email.is_none() && self.name.is_none()
    }
}

// ******** Output data structures *********

/// Conditions that degrade the output without stopping the pipeline.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum PipelineWarning {
    /// A column used by the calculations is not in the table. It was skipped.
    MissingColumn(String),
    /// Some classes of the row have no rate (base or OH), so they were paid
    /// nothing.
    UnresolvedName { row: usize, name: String },
}

/// A normalized and computed table, with what went wrong along the way.
#[derive(PartialEq, Debug, Clone)]
pub struct Processed {
    pub table: Table,
    pub warnings: Vec<PipelineWarning>,
}

impl Processed {
    pub fn unresolved_names(&self) -> Vec<String> {
        self.warnings
            .iter()
            .filter_map(|w| match w {
                PipelineWarning::UnresolvedName { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Errors from invalid requests.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum PayError {
    InvalidMonth(u32),
    RowLength { expected: usize, actual: usize },
}

impl Error for PayError {}

impl Display for PayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayError::InvalidMonth(m) => write!(f, "month must be between 1 and 12, got {}", m),
            PayError::RowLength { expected, actual } => {
                write!(f, "row has {} cells, expected {}", actual, expected)
            }
        }
    }
}
