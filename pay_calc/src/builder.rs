pub use crate::config::*;

/// A builder for raw tables, as produced by the spreadsheet readers.
///
/// All the cells are stored as text. Typing them is the job of the pipeline.
///
/// ```
/// use pay_calc::builder::TableBuilder;
/// # use pay_calc::PayError;
///
/// let mut builder = TableBuilder::new(&["Full Name", "Email"]);
/// builder.add_row_simple(&["jane doe", "jane@example.com"])?;
/// let table = builder.build();
/// assert_eq!(table.num_rows(), 1);
///
/// # Ok::<(), PayError>(())
/// ```
pub struct TableBuilder {
    pub(crate) _columns: Vec<String>,
    pub(crate) _rows: Vec<Vec<Value>>,
}

impl TableBuilder {
    pub fn new(columns: &[&str]) -> TableBuilder {
        TableBuilder::with_columns(columns.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_columns(columns: Vec<String>) -> TableBuilder {
        TableBuilder {
            _columns: columns,
            _rows: Vec::new(),
        }
    }

    pub fn add_row_simple(&mut self, cells: &[&str]) -> Result<(), PayError> {
        self.add_row(cells.iter().map(|s| s.to_string()).collect())
    }

    /// Adds a row of text cells.
    ///
    /// The row must have one cell per column.
    pub fn add_row(&mut self, cells: Vec<String>) -> Result<(), PayError> {
        if cells.len() != self._columns.len() {
            return Err(PayError::RowLength {
                expected: self._columns.len(),
                actual: cells.len(),
            });
        }
        self._rows.push(cells.into_iter().map(Value::Text).collect());
        Ok(())
    }

    pub fn build(self) -> Table {
        let mut table = Table::new(self._columns);
        for row in self._rows {
            table.push_row(row);
        }
        table
    }
}
