// src/export/logic.rs

use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{RecordExport, records_for_export};
use crate::export::pdf_export::export_pdf;
use crate::export::xlsx::export_xlsx;
use crate::models::record;
use crate::store::RecordStore;
use crate::utils::date::resolve_range;
use crate::utils::path::{dated_report_name, expand_tilde};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::debug;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the stored readings.
    ///
    /// - `file`: output path, default `glucose_report_<today>.<ext>`
    /// - `range`: `None`, `"all"` or `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `A:B`
    ///
    /// An empty selection yields `EmptyExport` before any file is touched.
    /// Returns the written path.
    pub fn export(
        store: &dyn RecordStore,
        cfg: &Config,
        format: ExportFormat,
        file: Option<&str>,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<PathBuf> {
        let bounds = resolve_range(range)?;

        let set = store.load().within(bounds);
        let records = records_for_export(&set)?;
        debug!(format = format.as_str(), records = records.len(), "exporting");

        let generated_at = record::now();
        let path = match file {
            Some(f) => expand_tilde(f),
            None => dated_report_name(generated_at.date(), format.as_str()),
        };

        ensure_writable(&path, force)?;

        match format {
            ExportFormat::Csv => {
                let rows: Vec<RecordExport> = records.iter().map(|r| RecordExport::from(*r)).collect();
                export_csv(&rows, &path)?
            }
            ExportFormat::Json => {
                let rows: Vec<RecordExport> = records.iter().map(|r| RecordExport::from(*r)).collect();
                export_json(&rows, &path)?
            }
            ExportFormat::Xlsx => export_xlsx(&records, &path, cfg.low_threshold, cfg.high_threshold)?,
            ExportFormat::Pdf => {
                let title = build_pdf_title(&cfg.report_title, bounds);
                export_pdf(&set, &path, &title, generated_at)?
            }
        }

        Ok(path)
    }
}

/// Report title, with the selected period appended when there is one.
fn build_pdf_title(base: &str, bounds: Option<(NaiveDate, NaiveDate)>) -> String {
    match bounds {
        None => base.to_string(),
        Some((start, end)) if start == end => format!("{base} - {}", start.format("%d/%m/%Y")),
        Some((start, end)) => format!(
            "{base} - {} to {}",
            start.format("%d/%m/%Y"),
            end.format("%d/%m/%Y")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::{Record, RecordSet};
    use crate::store::CsvFileStore;
    use chrono::NaiveDateTime;
    use std::env;
    use std::fs;

    fn at(day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn seeded_store(name: &str) -> CsvFileStore {
        let path = env::temp_dir().join(format!("glucolog_export_data_{name}.csv"));
        let store = CsvFileStore::new(path);
        let set = RecordSet::new()
            .append(Record::new(at(1, 8), 110.0, 2.0, "").unwrap())
            .append(Record::new(at(2, 20), 140.0, 3.0, "after dinner").unwrap());
        store.persist(&set).unwrap();
        store
    }

    fn out(name: &str) -> PathBuf {
        let p = env::temp_dir().join(format!("glucolog_export_out_{name}"));
        fs::remove_file(&p).ok();
        p
    }

    #[test]
    fn title_mentions_period() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(build_pdf_title("Glucose Report", None), "Glucose Report");
        assert_eq!(
            build_pdf_title("Glucose Report", Some((d1, d1))),
            "Glucose Report - 01/01/2024"
        );
        assert_eq!(
            build_pdf_title("Glucose Report", Some((d1, d2))),
            "Glucose Report - 01/01/2024 to 31/01/2024"
        );
    }

    #[test]
    fn csv_export_is_most_recent_first() {
        let store = seeded_store("csv");
        let target = out("csv.csv");

        let written = ExportLogic::export(
            &store,
            &Config::default(),
            ExportFormat::Csv,
            Some(target.to_str().unwrap()),
            None,
            false,
        )
        .unwrap();

        assert_eq!(written, target);
        let content = fs::read_to_string(&target).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "timestamp,glucose,insulin,notes");
        assert_eq!(lines[1], "2024-01-02 20:00:00,140.0,3.0,after dinner");
        assert_eq!(lines[2], "2024-01-01 08:00:00,110.0,2.0,");
    }

    #[test]
    fn range_without_matches_is_empty_export() {
        let store = seeded_store("empty_range");
        let target = out("empty_range.pdf");

        let res = ExportLogic::export(
            &store,
            &Config::default(),
            ExportFormat::Pdf,
            Some(target.to_str().unwrap()),
            Some("2023"),
            true,
        );

        assert!(matches!(res, Err(AppError::EmptyExport)));
        assert!(!target.exists());
    }

    #[test]
    fn json_and_xlsx_exports_write_files() {
        let store = seeded_store("json_xlsx");

        let json = out("data.json");
        ExportLogic::export(
            &store,
            &Config::default(),
            ExportFormat::Json,
            Some(json.to_str().unwrap()),
            Some("2024-01-02"),
            false,
        )
        .unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["notes"], "after dinner");

        let xlsx = out("data.xlsx");
        ExportLogic::export(
            &store,
            &Config::default(),
            ExportFormat::Xlsx,
            Some(xlsx.to_str().unwrap()),
            None,
            false,
        )
        .unwrap();
        // xlsx is a zip container
        assert!(fs::read(&xlsx).unwrap().starts_with(b"PK"));
    }
}
