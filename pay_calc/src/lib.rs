mod config;
use log::{debug, info};

pub use crate::config::*;

pub mod builder;
pub mod coerce;
pub mod filter;
pub mod format;
pub mod manual;
pub mod pay;
pub mod rates;
pub mod schema;

/// Runs the whole calculation on a freshly read table.
///
/// Arguments:
/// * `raw` the table as read from the upload, with text cells and the form
/// export headers
/// * `rules` the meeting rates
/// * `rates` the per-instructor class rates
///
/// The result always has the canonical computed columns, even when `raw` has
/// no rows. Missing columns and unknown names do not stop the calculation;
/// they are listed in the warnings.
pub fn process_table(raw: Table, rules: &PayRules, rates: &RateTable) -> Processed {
    info!(
        "process_table: {} rows, {} columns, {} base rates, {} OH rates",
        raw.num_rows(),
        raw.columns().len(),
        rates.base.len(),
        rates.oh.len()
    );
    let mut table = raw;
    schema::normalize_schema(&mut table);
    debug!("process_table: columns: {:?}", table.columns());

    let mut warnings = coerce::coerce_table(&mut table);
    warnings.extend(rates::resolve_rates(&mut table, rates));
    let pays = pay::calculate_pay(&mut table, rules);

    let grand_total: pay::PayAmount = pays.iter().map(|p| p.total()).sum();
    info!(
        "process_table: {} rows computed, total {}",
        table.num_rows(),
        format::format_currency(grand_total.0)
    );
    Processed { table, warnings }
}

/// Narrows a computed table to the rows matching the request.
///
/// The date column comes back as timestamps even if the input table was in
/// display form.
pub fn filter_table(table: &Table, request: &FilterRequest) -> Table {
    if request.is_empty() {
        return table.clone();
    }
    info!("filter_table: {:?}", request);
    let mut res = filter::apply_filters(table, request);
    coerce::normalize_dates(&mut res);
    info!(
        "filter_table: {} rows kept out of {}",
        res.num_rows(),
        table.num_rows()
    );
    res
}
