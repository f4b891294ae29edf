use log::{debug, warn};

use crate::config::*;
use crate::pay::{orchard_hills_classes, total_classes};
use crate::schema::*;

fn has_rate(table: &Table, row: usize, column: &str) -> bool {
    table
        .get(row, column)
        .and_then(|v| v.as_f64())
        .map(|r| r != 0.0)
        .unwrap_or(false)
}

/// Sets the rates of every row from the rate table, by exact full name.
///
/// Names missing from a table keep the rate they already had (zero unless the
/// upload carried one). Rows with base classes and no rate are reported, and
/// so are rows with Orchard Hills classes and no OH rate: those classes will
/// be paid nothing.
pub fn resolve_rates(table: &mut Table, rates: &RateTable) -> Vec<PipelineWarning> {
    let mut warnings: Vec<PipelineWarning> = Vec::new();
    if !table.has_column(FULL_NAME) {
        return warnings;
    }
    for row in 0..table.num_rows() {
        let name: String = match table.get(row, FULL_NAME) {
            Some(Value::Text(s)) => s.clone(),
            _ => continue,
        };

        if let Some(rate) = rates.base_rate(&name) {
            table.set(row, RATE, Value::Amount(rate));
        }
        if let Some(rate) = rates.oh_rate(&name) {
            table.set(row, OH_RATE, Value::Amount(rate));
        }
        debug!(
            "resolve_rates: row {}: {:?} rate: {:?} oh rate: {:?}",
            row,
            name,
            table.get(row, RATE),
            table.get(row, OH_RATE)
        );

        let classes = total_classes(table, row);
        let oh_classes = orchard_hills_classes(table, row);
        let base_unpaid = classes.saturating_sub(oh_classes) > 0 && !has_rate(table, row, RATE);
        let oh_unpaid = oh_classes > 0 && !has_rate(table, row, OH_RATE);
        if base_unpaid || oh_unpaid {
            warn!(
                "resolve_rates: row {}: no rate for {:?}, classes are paid 0",
                row, name
            );
            warnings.push(PipelineWarning::UnresolvedName { row, name });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TableBuilder;
    use crate::{coerce, schema};

    fn table(rows: &[&[&str]]) -> Table {
        let mut b = TableBuilder::new(&[FULL_NAME, "Arroyo", ORCHARD_HILLS, RATE]);
        for r in rows {
            b.add_row_simple(r).unwrap();
        }
        let mut t = b.build();
        schema::normalize_schema(&mut t);
        coerce::coerce_table(&mut t);
        t
    }

    #[test]
    fn known_names_get_their_rates() {
        let mut t = table(&[&["jane doe", "2", "1", ""]]);
        let rates = RateTable::new()
            .with_base_rate("Jane Doe", 45.0)
            .with_oh_rate("Jane Doe", 60.0);
        let warnings = resolve_rates(&mut t, &rates);
        assert!(warnings.is_empty());
        assert_eq!(t.get(0, RATE), Some(&Value::Amount(45.0)));
        assert_eq!(t.get(0, OH_RATE), Some(&Value::Amount(60.0)));
    }

    #[test]
    fn lookup_is_exact() {
        let mut t = table(&[&["jane doe", "0", "0", ""]]);
        let rates = RateTable::new().with_base_rate("jane doe", 45.0);
        resolve_rates(&mut t, &rates);
        assert_eq!(t.get(0, RATE), Some(&Value::Count(0)));
    }

    #[test]
    fn unknown_names_keep_their_rate() {
        let mut t = table(&[&["new person", "3", "0", "50"], &["other", "5", "0", ""]]);
        let warnings = resolve_rates(&mut t, &RateTable::new());
        assert_eq!(t.get(0, RATE), Some(&Value::Count(50)));
        assert_eq!(
            warnings,
            vec![PipelineWarning::UnresolvedName {
                row: 1,
                name: "Other".to_string()
            }]
        );
    }

    #[test]
    fn orchard_hills_classes_need_the_oh_rate() {
        let mut t = table(&[&["oh only", "0", "2", ""], &["base only", "0", "2", ""]]);
        let rates = RateTable::new()
            .with_oh_rate("Oh Only", 60.0)
            .with_base_rate("Base Only", 40.0);
        let warnings = resolve_rates(&mut t, &rates);
        assert_eq!(
            warnings,
            vec![PipelineWarning::UnresolvedName {
                row: 1,
                name: "Base Only".to_string()
            }]
        );
    }

    #[test]
    fn base_classes_need_the_base_rate() {
        let mut t = table(&[&["mixed", "3", "2", ""]]);
        let rates = RateTable::new().with_oh_rate("Mixed", 60.0);
        let warnings = resolve_rates(&mut t, &rates);
        assert_eq!(warnings.len(), 1);

        let mut t = table(&[&["mixed", "3", "2", ""]]);
        let rates = rates.with_base_rate("Mixed", 45.0);
        assert!(resolve_rates(&mut t, &rates).is_empty());
    }
}
