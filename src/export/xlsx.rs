// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::excel_date::{EXCEL_DATETIME_FORMAT, to_excel_serial};
use crate::export::model::REPORT_HEADERS;
use crate::export::notify_export_success;
use crate::models::Record;
use crate::ui::messages::info;
use crate::utils::colors::GlucoseBand;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// Width of a rendered `dd/mm/yyyy hh:mm` cell.
const TIMESTAMP_WIDTH: usize = 16;

/// XLSX with a styled header row, real date cells and auto column widths.
/// Glucose cells outside `[low, high]` are highlighted.
pub(crate) fn export_xlsx(records: &[&Record], path: &Path, low: f64, high: f64) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Readings").map_err(to_export_error)?;

    // ---------------------------
    // Header
    // ---------------------------
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x808080))
        .set_pattern(FormatPattern::Solid)
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_export_error)?;
    }

    worksheet.set_freeze_panes(1, 0).map_err(to_export_error)?;

    let mut col_widths: Vec<usize> = REPORT_HEADERS
        .iter()
        .map(|h| UnicodeWidthStr::width(*h))
        .collect();
    col_widths[0] = col_widths[0].max(TIMESTAMP_WIDTH);

    // ---------------------------
    // Rows
    // ---------------------------
    let date_fmt = cell_format().set_num_format(EXCEL_DATETIME_FORMAT);
    let glucose_fmt = cell_format().set_num_format("0.#");
    let low_fmt = glucose_fmt.clone().set_font_color(Color::Red).set_bold();
    let high_fmt = glucose_fmt.clone().set_font_color(Color::RGB(0xC65911)).set_bold();
    let insulin_fmt = cell_format().set_num_format("0.0#");
    let text_fmt = cell_format().set_align(FormatAlign::Left);

    for (i, r) in records.iter().enumerate() {
        let row = (i + 1) as u32;

        worksheet
            .write_with_format(row, 0, to_excel_serial(&r.timestamp), &date_fmt)
            .map_err(to_export_error)?;

        let gfmt = match GlucoseBand::classify(r.glucose, low, high) {
            GlucoseBand::Low => &low_fmt,
            GlucoseBand::High => &high_fmt,
            GlucoseBand::InRange => &glucose_fmt,
        };
        worksheet
            .write_with_format(row, 1, r.glucose, gfmt)
            .map_err(to_export_error)?;
        worksheet
            .write_with_format(row, 2, r.insulin, &insulin_fmt)
            .map_err(to_export_error)?;
        write_text(worksheet, row, 3, &r.notes, &text_fmt)?;

        col_widths[1] = col_widths[1].max(r.glucose.to_string().len());
        col_widths[2] = col_widths[2].max(r.insulin.to_string().len());
        col_widths[3] = col_widths[3].max(UnicodeWidthStr::width(r.notes.as_str()));
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    workbook.save(path).map_err(to_export_error)?;

    notify_export_success("XLSX", path, records.len());
    Ok(())
}

fn cell_format() -> Format {
    Format::new()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
}

fn write_text(ws: &mut Worksheet, row: u32, col: u16, s: &str, fmt: &Format) -> AppResult<()> {
    if s.is_empty() {
        ws.write_blank(row, col, fmt).map_err(to_export_error)?;
    } else {
        ws.write_with_format(row, col, s, fmt)
            .map_err(to_export_error)?;
    }
    Ok(())
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(format!("XLSX: {e}"))
}
