use log::debug;
use std::ops::{Add, AddAssign};

use crate::coerce::{count_from_f64, MAX_COUNT};
use crate::config::*;
use crate::schema::*;

/// A currency amount being accumulated. Never rounded here.
#[derive(PartialEq, Debug, Clone, Copy, PartialOrd, Default)]
pub struct PayAmount(pub f64);

impl PayAmount {
    pub const EMPTY: PayAmount = PayAmount(0.0);
}

impl std::iter::Sum for PayAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        PayAmount(iter.map(|pa| pa.0).sum())
    }
}

impl AddAssign for PayAmount {
    fn add_assign(&mut self, rhs: PayAmount) {
        self.0 += rhs.0;
    }
}

impl Add for PayAmount {
    type Output = PayAmount;
    fn add(self: PayAmount, rhs: PayAmount) -> PayAmount {
        PayAmount(self.0 + rhs.0)
    }
}

/// The three parts of the pay of one row.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct RowPay {
    pub meetings: PayAmount,
    pub classes: PayAmount,
    pub extra: PayAmount,
}

impl RowPay {
    pub fn total(&self) -> PayAmount {
        self.meetings + self.classes + self.extra
    }
}

fn number(table: &Table, row: usize, column: &str) -> f64 {
    table
        .get(row, column)
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

fn count(table: &Table, row: usize, column: &str) -> i64 {
    match table.get(row, column) {
        Some(Value::Count(n)) => (*n).clamp(0, MAX_COUNT),
        Some(v) => v.as_f64().map(count_from_f64).unwrap_or(0),
        None => 0,
    }
}

/// Sum of the class counts over all the venue columns of the table.
pub fn total_classes(table: &Table, row: usize) -> i64 {
    VENUES
        .iter()
        .map(|v| count(table, row, v))
        .fold(0, i64::saturating_add)
}

/// Classes taught at Orchard Hills, paid at the OH rate.
pub fn orchard_hills_classes(table: &Table, row: usize) -> i64 {
    count(table, row, ORCHARD_HILLS)
}

pub fn meetings_income(table: &Table, row: usize, rules: &PayRules) -> PayAmount {
    let work = count(table, row, WORK_MEETINGS) as f64;
    let admin = count(table, row, ADMIN_MEETINGS) as f64;
    PayAmount(work * rules.work_meeting_rate + admin * rules.admin_meeting_rate)
}

/// Pay for the classes. Orchard Hills classes are paid at the OH rate, all the
/// others at the base rate.
///
/// Also stores the recomputed class total in the row.
pub fn classes_income(table: &mut Table, row: usize) -> PayAmount {
    let total = total_classes(table, row);
    table.set(row, TOTAL_CLASSES, Value::Count(total));
    let oh_classes = orchard_hills_classes(table, row);
    let rate = number(table, row, RATE);
    let oh_rate = number(table, row, OH_RATE);
    PayAmount(total.saturating_sub(oh_classes) as f64 * rate + oh_classes as f64 * oh_rate)
}

pub fn extra_income(table: &Table, row: usize) -> PayAmount {
    PayAmount(number(table, row, SIDE_PROJECTS) + number(table, row, INVOICES_RECEIPTS))
}

/// Computes the class total and the calculated total amount of every row.
///
/// Returns the detail of each row, in order.
pub fn calculate_pay(table: &mut Table, rules: &PayRules) -> Vec<RowPay> {
    let mut res: Vec<RowPay> = Vec::with_capacity(table.num_rows());
    for row in 0..table.num_rows() {
        let pay = RowPay {
            meetings: meetings_income(table, row, rules),
            classes: classes_income(table, row),
            extra: extra_income(table, row),
        };
        let mut acc = PayAmount::EMPTY;
        acc += pay.meetings;
        acc += pay.classes;
        acc += pay.extra;
        table.set(row, CALCULATED_TOTAL, Value::Amount(acc.0));
        debug!("calculate_pay: row {}: {:?} -> {}", row, pay, acc.0);
        res.push(pay);
    }
    res
}
