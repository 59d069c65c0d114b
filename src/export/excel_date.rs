// src/export/excel_date.rs

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Number format applied to timestamp cells.
pub(crate) const EXCEL_DATETIME_FORMAT: &str = "dd/mm/yyyy hh:mm";

/// Excel serial number (days since 1899-12-30, fractional time of day).
pub(crate) fn to_excel_serial(dt: &NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    let days = (dt.date() - epoch).num_days() as f64;
    days + dt.time().num_seconds_from_midnight() as f64 / 86_400.0
}
