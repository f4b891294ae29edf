// Writing the computed table back as a formatted workbook.

use rust_xlsxwriter::{
    ConditionalFormatCell, ConditionalFormatCellRule, Format, FormatBorder, Workbook, Worksheet,
};

use pay_calc::format::{display_value, CURRENCY_COLUMNS};
use pay_calc::schema::{ADMIN_MEETINGS, VENUES, WORK_MEETINGS};

use crate::paysheet::*;

#[derive(PartialEq, Debug, Clone)]
pub struct ExportOptions {
    /// Meeting and class counts strictly above this value are highlighted.
    pub highlight_threshold: f64,
}

struct ExportFormats {
    header: Format,
    currency: Format,
    highlight: Format,
}

fn create_formats() -> ExportFormats {
    ExportFormats {
        header: Format::new().set_bold().set_border(FormatBorder::Thin),
        currency: Format::new().set_num_format("$#,##0.00"),
        highlight: Format::new()
            .set_background_color(0xFFC7CE)
            .set_font_color(0x9C0006),
    }
}

// The first and last positions of the named columns present in the table.
fn column_span(table: &Table, names: &[&str]) -> Option<(u16, u16)> {
    let idxs: Vec<usize> = names
        .iter()
        .filter_map(|n| table.column_index(n))
        .collect();
    let first = *idxs.iter().min()?;
    let last = *idxs.iter().max()?;
    Some((first as u16, last as u16))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
    is_currency: bool,
    formats: &ExportFormats,
) -> PaysheetResult<()> {
    match value {
        Value::Amount(f) if is_currency => {
            worksheet
                .write_number_with_format(row, col, *f, &formats.currency)
                .context(WritingExcelSnafu {})?;
        }
        Value::Amount(f) => {
            worksheet
                .write_number(row, col, *f)
                .context(WritingExcelSnafu {})?;
        }
        Value::Count(n) => {
            worksheet
                .write_number(row, col, *n as f64)
                .context(WritingExcelSnafu {})?;
        }
        v if v.is_blank() => {}
        v => {
            worksheet
                .write_string(row, col, display_value(v))
                .context(WritingExcelSnafu {})?;
        }
    }
    Ok(())
}

/// Writes the table as a single-sheet workbook.
///
/// Amounts stay numbers; the currency columns get a dollar number format.
/// Every column is sized to its content and has a filter button.
pub fn export_xlsx(table: &Table, options: &ExportOptions) -> PaysheetResult<Vec<u8>> {
    let formats = create_formats();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &formats.header)
            .context(WritingExcelSnafu {})?;
    }

    let currency: Vec<bool> = table
        .columns()
        .iter()
        .map(|c| CURRENCY_COLUMNS.contains(&c.as_str()))
        .collect();
    for (idx, row) in table.rows().iter().enumerate() {
        let r = (idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            write_cell(worksheet, r, col as u16, value, currency[col], &formats)?;
        }
    }

    let num_rows = table.num_rows() as u32;
    if !table.columns().is_empty() {
        let last_col = (table.columns().len() - 1) as u16;
        worksheet
            .autofilter(0, 0, num_rows, last_col)
            .context(WritingExcelSnafu {})?;
    }

    if num_rows > 0 {
        let rule = ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::GreaterThan(
                options.highlight_threshold,
            ))
            .set_format(&formats.highlight);
        let spans = [
            column_span(table, &[WORK_MEETINGS, ADMIN_MEETINGS]),
            column_span(table, &VENUES),
        ];
        for (first, last) in spans.iter().flatten() {
            debug!("export_xlsx: highlighting columns {}..={}", first, last);
            worksheet
                .add_conditional_format(1, *first, num_rows, *last, &rule)
                .context(WritingExcelSnafu {})?;
        }
    }

    worksheet.autofit();

    let bytes = workbook.save_to_buffer().context(WritingExcelSnafu {})?;
    info!(
        "export_xlsx: {} rows, {} bytes",
        table.num_rows(),
        bytes.len()
    );
    Ok(bytes)
}
