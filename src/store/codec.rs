//! CSV layout shared by every backing medium.
//!
//! Header: `Data/Hora,Glicémia (mg/dL),Insulina (U),Notas`, one row per
//! record, no positional index column.

use crate::errors::{AppError, AppResult};
use crate::models::record::STORAGE_TIMESTAMP_FORMAT;
use crate::models::record_set::COLUMNS;
use crate::models::{Record, RecordSet};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Deserialize;
use std::io::{Read, Write};

/// Timestamp shapes accepted when coercing the first column.
const TIMESTAMP_FORMATS: [&str; 6] = [
    STORAGE_TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

#[derive(Debug, Deserialize)]
struct StoredRow {
    #[serde(rename = "Data/Hora")]
    timestamp: String,
    #[serde(rename = "Glicémia (mg/dL)")]
    glucose: f64,
    #[serde(rename = "Insulina (U)", default, deserialize_with = "csv::invalid_option")]
    insulin: Option<f64>,
    #[serde(rename = "Notas", default)]
    notes: String,
}

/// Coerce a stored timestamp into a `NaiveDateTime` (second precision).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_nanosecond(0).unwrap_or(dt));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Decode a full record set. Empty input is the empty set.
pub fn decode<R: Read>(reader: R) -> AppResult<RecordSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(from_csv)?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Ok(RecordSet::new());
    }

    for col in COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(AppError::MalformedRecord {
                line: 1,
                reason: format!("missing column '{col}'"),
            });
        }
    }

    let mut records = Vec::new();

    for result in rdr.records() {
        let raw = result.map_err(from_csv)?;
        let line = raw.position().map(|p| p.line()).unwrap_or(0);

        let row: StoredRow =
            raw.deserialize(Some(&headers))
                .map_err(|e| AppError::MalformedRecord {
                    line,
                    reason: e.to_string(),
                })?;

        let timestamp =
            parse_timestamp(&row.timestamp).ok_or_else(|| AppError::MalformedRecord {
                line,
                reason: format!("unrecognised timestamp '{}'", row.timestamp),
            })?;

        records.push(Record {
            timestamp,
            glucose: row.glucose,
            insulin: row.insulin.unwrap_or(0.0),
            notes: row.notes,
        });
    }

    Ok(RecordSet::from_records(records))
}

/// Encode the whole set, header included.
pub fn encode<W: Write>(writer: W, set: &RecordSet) -> AppResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(COLUMNS)?;

    for r in set {
        wtr.write_record([
            r.timestamp_str(),
            r.glucose.to_string(),
            r.insulin.to_string(),
            r.notes.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn encode_to_string(set: &RecordSet) -> AppResult<String> {
    let mut buf = Vec::new();
    encode(&mut buf, set)?;
    String::from_utf8(buf).map_err(|e| AppError::Other(format!("CSV encoding produced invalid UTF-8: {e}")))
}

fn from_csv(e: csv::Error) -> AppError {
    if e.is_io_error() {
        return AppError::ReadFailure(e.to_string());
    }
    AppError::MalformedRecord {
        line: e.position().map(|p| p.line()).unwrap_or(0),
        reason: e.to_string(),
    }
}
