use log::{debug, info, warn};

use pay_calc::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod config_reader;
mod io_common;
pub mod io_export;
pub mod io_html;
pub mod io_remote;
pub mod io_xlsx;

use crate::paysheet::config_reader::*;

#[derive(Debug, Snafu)]
pub enum PaysheetError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading the workbook: {source}"))]
    OpeningExcel { source: calamine::XlsxError },
    #[snafu(display("The workbook has no worksheet"))]
    EmptyExcel {},
    #[snafu(display("Worksheet {name} not found"))]
    MissingWorksheet { name: String },
    #[snafu(display("Error opening configuration {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the spreadsheet: {source}"))]
    WritingExcel { source: rust_xlsxwriter::XlsxError },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error downloading {url}: {source}"))]
    Fetching { source: reqwest::Error, url: String },
    #[snafu(display("Not a spreadsheet share link: {url}"))]
    InvalidUrl { url: String },
    #[snafu(display("{source}"))]
    Pipeline { source: PayError },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PaysheetResult<T> = Result<T, PaysheetError>;

/// The table in display form: column names, then rows of formatted cells.
pub fn summary_json(table: &Table) -> JSValue {
    let display = format::display_table(table);
    let rows: Vec<Vec<String>> = display
        .rows()
        .iter()
        .map(|r| r.iter().map(format::display_value).collect())
        .collect();
    json!({
        "columns": display.columns(),
        "rows": rows,
    })
}

/// Builds the filters from the command line. Empty texts do not filter.
pub fn filter_request(
    month: Option<u32>,
    year: Option<i32>,
    email: Option<String>,
    name: Option<String>,
) -> PaysheetResult<FilterRequest> {
    let month_filter = match month {
        Some(m) => {
            let f = MonthFilter::new(m).context(PipelineSnafu {})?;
            Some(match year {
                Some(y) => f.in_year(y),
                None => f,
            })
        }
        None if year.is_some() => whatever!("--year requires --month"),
        None => None,
    };
    Ok(FilterRequest {
        month: month_filter,
        email: email.filter(|s| !s.is_empty()),
        name: name.filter(|s| !s.is_empty()),
    })
}

fn read_input(args: &Args) -> PaysheetResult<Vec<u8>> {
    if let Some(path) = &args.input {
        info!("Attempting to read report file {:?}", path);
        return fs::read(path).context(OpeningFileSnafu { path: path.clone() });
    }
    if let Some(share_url) = &args.url {
        let url = io_remote::export_url(share_url).context(InvalidUrlSnafu {
            url: share_url.clone(),
        })?;
        return io_remote::fetch_remote(&url);
    }
    whatever!("No input: provide an input file or a spreadsheet link")
}

/// Reads and computes a report, without filtering.
pub fn upload(
    bytes: &[u8],
    worksheet: Option<&str>,
    config: &PayConfig,
) -> PaysheetResult<Processed> {
    let raw = io_xlsx::read_xlsx_bytes(bytes, worksheet)?;
    let processed = process_table(raw, &config.pay_rules(), &config.rate_table());
    for w in processed.warnings.iter() {
        match w {
            PipelineWarning::UnresolvedName { row, name } => {
                warn!("No rate for {:?} (row {}): classes paid at 0", name, row + 2)
            }
            PipelineWarning::MissingColumn(c) => debug!("Column {:?} not in the upload", c),
        }
    }
    Ok(processed)
}

fn write_output(path: &str, contents: &[u8]) -> PaysheetResult<()> {
    info!("Writing {:?}", path);
    fs::write(path, contents).context(WritingOutputSnafu { path })
}

fn check_reference(reference_path: &str, pretty_summary: &str) -> PaysheetResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_ref != pretty_summary {
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty_summary, "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    info!("Summary matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run_report(args: &Args) -> PaysheetResult<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => PayConfig::default(),
    };
    debug!("config: {:?}", config);

    let request = filter_request(
        args.month,
        args.year,
        args.email.clone(),
        args.name.clone(),
    )?;

    let bytes = read_input(args)?;
    let processed = upload(&bytes, args.excel_worksheet_name.as_deref(), &config)?;
    let table = filter_table(&processed.table, &request);

    if let Some(path) = &args.xlsx {
        let options = io_export::ExportOptions {
            highlight_threshold: config.highlight_threshold(),
        };
        let contents = io_export::export_xlsx(&table, &options)?;
        write_output(path, &contents)?;
    }

    if let Some(path) = &args.html {
        let page = io_html::render_page("Instructor reports", &table);
        write_output(path, page.as_bytes())?;
    }

    let pretty_summary =
        serde_json::to_string_pretty(&summary_json(&table)).context(ParsingJsonSnafu {})?;
    match args.out.as_deref() {
        Some("stdout") => println!("{}", pretty_summary),
        Some(path) => write_output(path, pretty_summary.as_bytes())?,
        None if args.xlsx.is_none() && args.html.is_none() => println!("{}", pretty_summary),
        None => {}
    }

    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{DataType, Reader, Xlsx};
    use pay_calc::schema::*;
    use rust_xlsxwriter::Workbook;
    use std::io::Cursor;

    fn upload_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *cell).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    fn report() -> Vec<u8> {
        upload_bytes(&[
            &[
                "Timestamp",
                "Email Address",
                "Full Name",
                "How many work meetings did you attend this month?",
                "How many admin meetings did you attend this month?",
                "How many classes did you teach this month? [Arroyo]",
                "How many classes did you teach this month? [Orchard Hills]",
                "Please list any invoices or receipts to be reimbursed.",
            ],
            &[
                "2024-08-03 09:15:00",
                "jsmith@example.com",
                "john smith",
                "2",
                "1",
                "3",
                "",
                "",
            ],
            &[
                "2024-09-01 17:00:00",
                "ann@example.com",
                "ann lee",
                "6",
                "",
                "1",
                "2",
                "$50 plus $25.50 tip",
            ],
        ])
    }

    fn config() -> PayConfig {
        parse_config(
            r#"{"baseRates": {"John Smith": 50, "Ann Lee": 40}, "ohRates": {"Ann Lee": 60}}"#,
        )
        .unwrap()
    }

    #[test]
    fn upload_and_compute() {
        let processed = upload(&report(), None, &config()).unwrap();
        let t = &processed.table;
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.get(0, FULL_NAME), Some(&Value::text("John Smith")));
        assert_eq!(t.get(0, CALCULATED_TOTAL), Some(&Value::Amount(215.0)));
        assert_eq!(
            t.get(1, CALCULATED_TOTAL),
            Some(&Value::Amount(120.0 + 40.0 + 120.0 + 75.5))
        );
        assert!(processed.unresolved_names().is_empty());
    }

    #[test]
    fn unreadable_upload() {
        let res = upload(b"not a workbook", None, &config());
        assert!(matches!(res, Err(PaysheetError::OpeningExcel { .. })));
    }

    #[test]
    fn header_only_upload() {
        let bytes = upload_bytes(&[&["Timestamp", "Full Name"]]);
        let processed = upload(&bytes, None, &config()).unwrap();
        assert!(processed.table.is_empty());
        assert!(processed.table.has_column(CALCULATED_TOTAL));
    }

    #[test]
    fn filter_and_summarize() {
        let processed = upload(&report(), None, &config()).unwrap();
        let req = filter_request(Some(8), None, Some("".to_string()), Some("SMITH".to_string()))
            .unwrap();
        assert_eq!(req.email, None);
        let t = filter_table(&processed.table, &req);
        let js = summary_json(&t);
        let rows = js["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        let columns: Vec<&str> = js["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c.as_str().unwrap())
            .collect();
        let total_idx = columns.iter().position(|c| *c == CALCULATED_TOTAL).unwrap();
        let date_idx = columns.iter().position(|c| *c == DATE).unwrap();
        assert_eq!(rows[0][total_idx], "$215.00");
        assert_eq!(rows[0][date_idx], "2024-08-03 09:15:00");
    }

    #[test]
    fn invalid_filters() {
        assert!(matches!(
            filter_request(Some(13), None, None, None),
            Err(PaysheetError::Pipeline { .. })
        ));
        assert!(filter_request(None, Some(2024), None, None).is_err());
    }

    #[test]
    fn export_round_trip() {
        let processed = upload(&report(), None, &config()).unwrap();
        let options = io_export::ExportOptions {
            highlight_threshold: 4.0,
        };
        let bytes = io_export::export_xlsx(&processed.table, &options).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let rows: Vec<&[DataType]> = range.rows().collect();
        assert_eq!(rows.len(), 3);
        let total_idx = processed.table.column_index(CALCULATED_TOTAL).unwrap();
        assert_eq!(
            rows[0][total_idx],
            DataType::String(CALCULATED_TOTAL.to_string())
        );
        assert_eq!(rows[1][total_idx], DataType::Float(215.0));
    }
}
