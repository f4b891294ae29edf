use calamine::DataType;
use chrono::{Duration, NaiveDate, NaiveDateTime};

use pay_calc::format::format_timestamp;

/// Converts an Excel serial date (days since 1899-12-30) to a timestamp.
pub fn excel_serial_to_timestamp(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::seconds(seconds))
}

/// The text of a cell, as a string-typed reader would show it.
///
/// Whole floats lose their decimal part, dates use the display format and
/// errors read as blank.
pub fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(serial) => excel_serial_to_timestamp(*serial)
            .map(|ts| format_timestamp(&ts))
            .unwrap_or_else(|| serial.to_string()),
        DataType::Empty => String::new(),
        DataType::Error(_) => String::new(),
        #[allow(unreachable_patterns)]
        _ => String::new(),
    }
}

/// The name of a header cell. Blank headers are named after their position.
pub fn header_name(cell: &DataType, idx: usize) -> String {
    let name = cell_to_string(cell).trim().to_string();
    if name.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_dates() {
        let ts = excel_serial_to_timestamp(45505.5).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-08-01 12:00:00");
        assert_eq!(excel_serial_to_timestamp(-1.0), None);
    }

    #[test]
    fn cells() {
        assert_eq!(cell_to_string(&DataType::Float(3.0)), "3");
        assert_eq!(cell_to_string(&DataType::Float(25.5)), "25.5");
        assert_eq!(cell_to_string(&DataType::Int(7)), "7");
        assert_eq!(cell_to_string(&DataType::Empty), "");
        assert_eq!(header_name(&DataType::Empty, 4), "Unnamed: 4");
        assert_eq!(
            header_name(&DataType::String(" Email Address ".to_string()), 1),
            "Email Address"
        );
    }
}
