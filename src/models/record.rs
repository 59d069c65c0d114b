use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;
use std::cmp::Ordering;

/// Storage format of `timestamp` (second precision).
pub const STORAGE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used by the table and the PDF report.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// One glucose-monitoring entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub timestamp: NaiveDateTime, // ⇔ "Data/Hora"
    pub glucose: f64,             // ⇔ "Glicémia (mg/dL)"
    pub insulin: f64,             // ⇔ "Insulina (U)"
    pub notes: String,            // ⇔ "Notas"
}

impl Record {
    pub const MIN_GLUCOSE: f64 = 20.0;
    pub const MIN_INSULIN: f64 = 0.0;

    /// Build a record from user input.
    /// - `glucose` must be finite and >= 20 mg/dL
    /// - `insulin` must be finite and >= 0 U
    /// - the timestamp is truncated to whole seconds
    pub fn new(
        timestamp: NaiveDateTime,
        glucose: f64,
        insulin: f64,
        notes: impl Into<String>,
    ) -> AppResult<Self> {
        if !glucose.is_finite() || glucose < Self::MIN_GLUCOSE {
            return Err(AppError::InvalidGlucose(glucose));
        }
        if !insulin.is_finite() || insulin < Self::MIN_INSULIN {
            return Err(AppError::InvalidInsulin(insulin));
        }

        Ok(Self {
            timestamp: truncate_to_seconds(timestamp),
            glucose,
            insulin,
            notes: notes.into().trim().to_string(),
        })
    }

    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(STORAGE_TIMESTAMP_FORMAT).to_string()
    }

    pub fn display_timestamp(&self) -> String {
        self.timestamp.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
    }

    /// Total order used for every rendering: timestamp first, then the
    /// remaining fields so that duplicates sort deterministically.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.glucose.total_cmp(&other.glucose))
            .then_with(|| self.insulin.total_cmp(&other.insulin))
            .then_with(|| self.notes.cmp(&other.notes))
    }
}

/// Current local time at second precision (default for new entries).
pub fn now() -> NaiveDateTime {
    truncate_to_seconds(Local::now().naive_local())
}

fn truncate_to_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn rejects_glucose_below_minimum() {
        let err = Record::new(ts(8, 0), 19.5, 0.0, "").unwrap_err();
        assert!(matches!(err, AppError::InvalidGlucose(v) if v == 19.5));
    }

    #[test]
    fn accepts_glucose_at_minimum_without_upper_bound() {
        assert!(Record::new(ts(8, 0), 20.0, 0.0, "").is_ok());
        assert!(Record::new(ts(8, 0), 900.0, 0.0, "").is_ok());
    }

    #[test]
    fn rejects_negative_insulin_but_not_odd_steps() {
        assert!(matches!(
            Record::new(ts(8, 0), 100.0, -0.5, ""),
            Err(AppError::InvalidInsulin(_))
        ));
        // half-unit steps are only a suggestion
        assert!(Record::new(ts(8, 0), 100.0, 1.3, "").is_ok());
    }

    #[test]
    fn rejects_non_finite_values() {
        for v in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert!(matches!(
                Record::new(ts(8, 0), v, 0.0, ""),
                Err(AppError::InvalidGlucose(_))
            ));
            assert!(matches!(
                Record::new(ts(8, 0), 110.0, v, ""),
                Err(AppError::InvalidInsulin(_))
            ));
        }
    }

    #[test]
    fn truncates_sub_second_precision() {
        let precise = ts(8, 0).with_nanosecond(123_456_789).unwrap();
        let r = Record::new(precise, 100.0, 0.0, "").unwrap();
        assert_eq!(r.timestamp, ts(8, 0));
    }

    #[test]
    fn formats_timestamps() {
        let r = Record::new(ts(20, 5), 140.0, 3.0, "after dinner").unwrap();
        assert_eq!(r.timestamp_str(), "2024-01-01 20:05:00");
        assert_eq!(r.display_timestamp(), "01/01/2024 20:05");
    }

    #[test]
    fn chronological_cmp_breaks_ties_on_values() {
        let a = Record::new(ts(8, 0), 100.0, 0.0, "").unwrap();
        let b = Record::new(ts(8, 0), 120.0, 0.0, "").unwrap();
        assert_eq!(a.chronological_cmp(&b), Ordering::Less);
        assert_eq!(b.chronological_cmp(&a), Ordering::Greater);
    }
}
