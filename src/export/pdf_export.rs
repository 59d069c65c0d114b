// src/export/pdf_export.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::build_report_table;
use crate::export::notify_export_success;
use crate::export::pdf::PdfManager;
use crate::models::RecordSet;
use crate::models::record::DISPLAY_TIMESTAMP_FORMAT;
use crate::ui::messages::info;
use chrono::NaiveDateTime;
use std::path::Path;

/// Render the report document in memory.
/// An empty set yields `EmptyExport` and no document.
pub fn render_report(set: &RecordSet, title: &str, generated_at: NaiveDateTime) -> AppResult<Vec<u8>> {
    let table = build_report_table(set)?;
    let subtitle = format!(
        "Generated on {}",
        generated_at.format(DISPLAY_TIMESTAMP_FORMAT)
    );

    let mut pdf = PdfManager::new();
    pdf.write_table(title, &subtitle, &table);
    Ok(pdf.finish())
}

pub(crate) fn export_pdf(
    set: &RecordSet,
    path: &Path,
    title: &str,
    generated_at: NaiveDateTime,
) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let bytes = render_report(set, title, generated_at)?;
    std::fs::write(path, bytes)
        .map_err(|e| AppError::Export(format!("PDF write error ({}): {e}", path.display())))?;

    notify_export_success("PDF", path, set.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_set_produces_no_document() {
        let res = render_report(&RecordSet::new(), "Glucose Report", at(21));
        assert!(matches!(res, Err(AppError::EmptyExport)));
    }

    #[test]
    fn non_empty_set_produces_pdf() {
        let set = RecordSet::new()
            .append(Record::new(at(8), 110.0, 2.0, "").unwrap())
            .append(Record::new(at(20), 140.0, 3.0, "after dinner").unwrap());

        let bytes = render_report(&set, "Glucose Report", at(21)).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        // content streams are uncompressed: rows appear most recent first
        let text = String::from_utf8_lossy(&bytes);
        let late = text.find("01/01/2024 20:00").unwrap();
        let early = text.find("01/01/2024 08:00").unwrap();
        assert!(late < early);
        assert!(text.contains("after dinner"));
        assert!(text.contains("Generated on 01/01/2024 21:00"));
    }

    #[test]
    fn empty_export_writes_no_file() {
        let path = std::env::temp_dir().join("glucolog_pdf_export_empty.pdf");
        std::fs::remove_file(&path).ok();

        let res = export_pdf(&RecordSet::new(), &path, "t", at(21));
        assert!(matches!(res, Err(AppError::EmptyExport)));
        assert!(!path.exists());
    }
}
