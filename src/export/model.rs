// src/export/model.rs

use crate::errors::{AppError, AppResult};
use crate::models::{Record, RecordSet};
use crate::utils::{format_glucose, format_insulin};
use serde::Serialize;

/// Header row of the report table.
pub const REPORT_HEADERS: [&str; 4] = ["Date/Time", "Glucose", "Insulin", "Notes"];

/// Flat record used by the CSV / JSON exporters.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RecordExport {
    pub timestamp: String,
    pub glucose: f64,
    pub insulin: f64,
    pub notes: String,
}

impl From<&Record> for RecordExport {
    fn from(r: &Record) -> Self {
        Self {
            timestamp: r.timestamp_str(),
            glucose: r.glucose,
            insulin: r.insulin,
            notes: r.notes.clone(),
        }
    }
}

/// Records most recent first, the order every export uses.
pub(crate) fn records_for_export(set: &RecordSet) -> AppResult<Vec<&Record>> {
    if set.is_empty() {
        return Err(AppError::EmptyExport);
    }
    Ok(set.sorted_descending())
}

pub(crate) fn record_to_row(r: &Record) -> Vec<String> {
    vec![
        r.display_timestamp(),
        format_glucose(r.glucose),
        format_insulin(r.insulin),
        r.notes.clone(),
    ]
}

/// Report table: header row followed by one row per record, most recent
/// first, timestamps as `DD/MM/YYYY HH:MM`.
///
/// An empty set yields [`AppError::EmptyExport`].
pub fn build_report_table(set: &RecordSet) -> AppResult<Vec<Vec<String>>> {
    let records = records_for_export(set)?;

    let mut table = Vec::with_capacity(records.len() + 1);
    table.push(REPORT_HEADERS.iter().map(|h| h.to_string()).collect());
    table.extend(records.into_iter().map(record_to_row));
    Ok(table)
}
