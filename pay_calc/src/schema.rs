//! Canonical column names and the renaming of form export headers.

use log::debug;

use crate::config::*;

pub const DATE: &str = "Date";
pub const EMAIL: &str = "Email";
pub const FULL_NAME: &str = "Full Name";
pub const WORK_MEETINGS: &str = "Work Meetings";
pub const ADMIN_MEETINGS: &str = "Admin Meetings";
pub const INSTRUCTOR_PROVIDED_TOTAL: &str = "Instructor Provided Total";
pub const SIDE_PROJECTS: &str = "Side Projects";
pub const INVOICES_RECEIPTS: &str = "Invoices/Receipts";
pub const TOTAL_CLASSES: &str = "Total # of Classes";
pub const RATE: &str = "Rate";
pub const OH_RATE: &str = "OH Rate";
pub const CALCULATED_TOTAL: &str = "Calculated Total Amount";

/// The venue paid at the OH rate.
pub const ORCHARD_HILLS: &str = "Orchard Hills";

/// All the class locations. Each one has its own count column.
pub const VENUES: [&str; 12] = [
    "Arroyo",
    "Myford",
    "Tustin Ranch",
    "Ladera",
    "Anaheim Hills",
    "Historic Anaheim",
    "North Tustin",
    "San Juan Capistrano",
    "Hicks Canyon",
    ORCHARD_HILLS,
    "Peters Canyon",
    "TMA",
];

/// The form asks one grid question, with one row per venue.
const CLASSES_QUESTION: &str = "How many classes did you teach this month?";

const RENAMES: [(&str, &str); 9] = [
    ("Timestamp", DATE),
    ("Email Address", EMAIL),
    ("What is your full name?", FULL_NAME),
    (
        "How many work meetings did you attend this month?",
        WORK_MEETINGS,
    ),
    (
        "How many admin meetings did you attend this month?",
        ADMIN_MEETINGS,
    ),
    (
        "What is the total amount you are requesting this month?",
        INSTRUCTOR_PROVIDED_TOTAL,
    ),
    (
        "Did you work on any side projects this month? Please list the amounts.",
        SIDE_PROJECTS,
    ),
    (
        "Please list any invoices or receipts to be reimbursed.",
        INVOICES_RECEIPTS,
    ),
    ("Invoices / Receipts", INVOICES_RECEIPTS),
];

/// The columns filled by the calculations, with their default values.
const COMPUTED_COLUMNS: [&str; 4] = [TOTAL_CLASSES, RATE, OH_RATE, CALCULATED_TOTAL];

/// The full mapping from export headers to canonical names.
pub fn rename_map() -> Vec<(String, &'static str)> {
    let mut res: Vec<(String, &'static str)> = RENAMES
        .iter()
        .map(|(old, new)| (old.to_string(), *new))
        .collect();
    for venue in VENUES.iter() {
        res.push((format!("{} [{}]", CLASSES_QUESTION, venue), *venue));
    }
    res
}

/// The columns of a normalized table built from a blank upload.
pub fn canonical_columns() -> Vec<String> {
    let mut res: Vec<String> = [
        DATE,
        EMAIL,
        FULL_NAME,
        WORK_MEETINGS,
        ADMIN_MEETINGS,
        INSTRUCTOR_PROVIDED_TOTAL,
        SIDE_PROJECTS,
        INVOICES_RECEIPTS,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    res.extend(VENUES.iter().map(|s| s.to_string()));
    res.extend(COMPUTED_COLUMNS.iter().map(|s| s.to_string()));
    res
}

fn computed_default(column: &str) -> Value {
    match column {
        CALCULATED_TOTAL => Value::Amount(0.0),
        _ => Value::Count(0),
    }
}

// Each computed column goes right after its anchor: the last venue column for
// the class total, then the previous computed column.
fn insert_position(table: &Table, column: &str) -> usize {
    let anchor = match column {
        TOTAL_CLASSES => VENUES.iter().filter_map(|v| table.column_index(v)).max(),
        RATE => table.column_index(TOTAL_CLASSES),
        OH_RATE => table.column_index(RATE),
        _ => table.column_index(OH_RATE),
    };
    anchor.map(|idx| idx + 1).unwrap_or(table.columns().len())
}

/// Renames the export headers and adds the computed columns that are missing.
///
/// Running it again on a normalized table changes nothing.
pub fn normalize_schema(table: &mut Table) {
    if table.columns().is_empty() {
        debug!("normalize_schema: no header, using the canonical columns");
        *table = Table::new(canonical_columns());
        return;
    }

    for (old, new) in rename_map() {
        if table.rename_column(old.as_str(), new) {
            debug!("normalize_schema: renamed {:?} -> {:?}", old, new);
        }
    }

    for column in COMPUTED_COLUMNS.iter() {
        if !table.has_column(column) {
            let pos = insert_position(table, column);
            debug!("normalize_schema: inserting {:?} at {}", column, pos);
            table.insert_column(pos, column, computed_default(column));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TableBuilder;

    fn raw_table() -> Table {
        let mut b = TableBuilder::new(&[
            "Timestamp",
            "Email Address",
            "Full Name",
            "How many work meetings did you attend this month?",
            "How many classes did you teach this month? [Arroyo]",
            "How many classes did you teach this month? [Orchard Hills]",
            "Notes",
        ]);
        b.add_row_simple(&["2024-08-01 10:00:00", "a@b.c", "ann", "2", "3", "1", ""])
            .unwrap();
        b.build()
    }

    #[test]
    fn renames_export_headers() {
        let mut t = raw_table();
        normalize_schema(&mut t);
        assert_eq!(
            t.columns(),
            &[
                DATE,
                EMAIL,
                FULL_NAME,
                WORK_MEETINGS,
                "Arroyo",
                ORCHARD_HILLS,
                TOTAL_CLASSES,
                RATE,
                OH_RATE,
                CALCULATED_TOTAL,
                "Notes",
            ]
        );
        assert_eq!(t.get(0, TOTAL_CLASSES), Some(&Value::Count(0)));
        assert_eq!(t.get(0, CALCULATED_TOTAL), Some(&Value::Amount(0.0)));
        assert_eq!(t.get(0, "Notes"), Some(&Value::empty()));
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut once = raw_table();
        normalize_schema(&mut once);
        let mut twice = once.clone();
        normalize_schema(&mut twice);
        assert_eq!(once.columns(), twice.columns());
        assert_eq!(once.num_rows(), twice.num_rows());
    }

    #[test]
    fn computed_columns_without_venues_are_appended() {
        let mut t = TableBuilder::new(&["Full Name"]).build();
        normalize_schema(&mut t);
        assert_eq!(
            t.columns(),
            &[FULL_NAME, TOTAL_CLASSES, RATE, OH_RATE, CALCULATED_TOTAL]
        );
    }

    #[test]
    fn existing_computed_columns_are_kept_in_place() {
        let mut t = TableBuilder::new(&[RATE, FULL_NAME]).build();
        normalize_schema(&mut t);
        assert_eq!(t.column_index(RATE), Some(0));
        assert_eq!(t.columns().iter().filter(|c| *c == RATE).count(), 1);
        assert_eq!(t.column_index(OH_RATE), Some(1));
    }

    #[test]
    fn blank_upload_gets_the_canonical_columns() {
        let mut t = Table::default();
        normalize_schema(&mut t);
        assert!(t.is_empty());
        assert_eq!(t.columns(), canonical_columns().as_slice());
    }
}
