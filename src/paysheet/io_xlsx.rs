// Reading the report workbook into a raw table of text cells.

use calamine::{DataType, Range, Reader, Xlsx};
use std::io::Cursor;

use pay_calc::builder::TableBuilder;

use crate::paysheet::{
    io_common::{cell_to_string, header_name},
    *,
};

/// Reads one worksheet of an uploaded workbook.
///
/// The first row is the header. Every cell is kept as text, untrimmed. Rows with only blank
/// cells are dropped.
pub fn read_xlsx_bytes(bytes: &[u8], worksheet: Option<&str>) -> PaysheetResult<Table> {
    let wrange = get_range(bytes, worksheet)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = match iter.next() {
        Some(h) => h
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_name(cell, idx))
            .collect(),
        None => {
            debug!("read_xlsx_bytes: empty worksheet");
            return Ok(Table::default());
        }
    };
    debug!("read_xlsx_bytes: header: {:?}", header);

    let width = header.len();
    let mut builder = TableBuilder::with_columns(header);
    for (idx, row) in iter.enumerate() {
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            debug!("read_xlsx_bytes: skipping blank row {}", idx + 2);
            continue;
        }
        let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
        cells.resize(width, String::new());
        builder.add_row(cells).context(PipelineSnafu {})?;
    }
    let table = builder.build();
    info!(
        "read_xlsx_bytes: {} rows, {} columns",
        table.num_rows(),
        table.columns().len()
    );
    Ok(table)
}

fn get_range(bytes: &[u8], worksheet: Option<&str>) -> PaysheetResult<Range<DataType>> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes.to_vec())).context(OpeningExcelSnafu {})?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet {
        debug!("read_xlsx_bytes: worksheet: {:?}", name);
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?
            .context(OpeningExcelSnafu {})
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu {})
    }
}
