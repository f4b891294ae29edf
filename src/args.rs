use clap::Parser;

/// Computes the pay of the monthly instructor reports.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The report workbook (.xlsx), as exported from the report form.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (link) A shared spreadsheet link, downloaded as xlsx when no input file is given.
    #[clap(long, value_parser)]
    pub url: Option<String>,

    /// (default: the first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path, optional) The JSON configuration with the instructor rates and the meeting rates.
    /// See the manual of pay_calc for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (1-12) Only keeps the reports submitted in this month.
    #[clap(short, long, value_parser)]
    pub month: Option<u32>,

    /// Restricts the month filter to one year. Requires --month.
    #[clap(long, value_parser)]
    pub year: Option<i32>,

    /// Only keeps the reports whose email contains this text (ignoring case).
    #[clap(long, value_parser)]
    pub email: Option<String>,

    /// Only keeps the reports whose full name contains this text (ignoring case).
    #[clap(long, value_parser)]
    pub name: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the computed table will be written in JSON format to the given
    /// location. When no output at all is requested, the table is printed.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) Writes the computed table as a formatted workbook.
    #[clap(long, value_parser)]
    pub xlsx: Option<String>,

    /// (file path) Writes the computed table as an HTML page.
    #[clap(long, value_parser)]
    pub html: Option<String>,

    /// (file path) A reference file containing the expected table in JSON format. If provided, paysheet will
    /// check that the computed table matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
