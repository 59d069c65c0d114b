use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

const FONT: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

/// Average Helvetica advance as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.52;

/// Single-font A4 table report: title, subtitle, then a table whose header
/// row repeats on every page.
///
/// Styling: grey header background with white bold text, centered cells,
/// black grid lines, 10pt body.
pub(crate) struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    next_id: i32,
    font_id: Ref,
    bold_id: Ref,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    font_size: f32,
    subtitle_font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let bold_id = Ref::new(4);

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            next_id: 5,
            font_id,
            bold_id,

            page_w: 595.0,
            page_h: 842.0,
            margin: 50.0,
            row_h: 20.0,

            font_size: 10.0,
            subtitle_font_size: 10.0,
            title_font_size: 16.0,
        }
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    /// Top edge of the table (below title and subtitle).
    fn table_top(&self) -> f32 {
        self.page_h - self.margin - 50.0
    }

    /// Body rows that fit on one page under the header row.
    pub fn rows_per_page(&self) -> usize {
        let usable = self.table_top() - self.margin;
        ((usable / self.row_h) as usize).saturating_sub(1).max(1)
    }

    fn write_page(&mut self, content: Content) {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);
        page.resources()
            .fonts()
            .pair(FONT, self.font_id)
            .pair(FONT_BOLD, self.bold_id);
        drop(page);

        self.pdf.stream(content_id, &content.finish());
    }

    fn draw_text(&self, content: &mut Content, font: Name, x: f32, y: f32, size: f32, text: &str) {
        content.begin_text();
        content.set_font(font, size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&to_win_ansi(text)));
        content.end_text();
    }

    /// Text centered horizontally inside `[x, x + w]`, truncated to fit.
    fn draw_centered(&self, content: &mut Content, font: Name, x: f32, y: f32, w: f32, text: &str) {
        let fitted = fit_text(text, w - 6.0, self.font_size);
        let tw = text_width(&fitted, self.font_size);
        let tx = x + ((w - tw) / 2.0).max(3.0);
        self.draw_text(content, font, tx, y + 6.5, self.font_size, &fitted);
    }

    fn draw_row(&self, content: &mut Content, y: f32, col_widths: &[f32], row: &[String], header: bool) {
        let total: f32 = col_widths.iter().sum();

        if header {
            content.save_state();
            content.set_fill_rgb(0.5, 0.5, 0.5);
            content.rect(self.margin, y, total, self.row_h);
            content.fill_nonzero();
            content.restore_state();
        }

        // grid
        content.save_state();
        content.set_stroke_rgb(0.0, 0.0, 0.0);
        content.set_line_width(0.5);
        let mut x = self.margin;
        for w in col_widths {
            content.rect(x, y, *w, self.row_h);
            x += w;
        }
        content.stroke();
        content.restore_state();

        // text
        content.save_state();
        if header {
            content.set_fill_rgb(1.0, 1.0, 1.0);
        } else {
            content.set_fill_rgb(0.0, 0.0, 0.0);
        }
        let font = if header { FONT_BOLD } else { FONT };
        let mut x = self.margin;
        for (text, w) in row.iter().zip(col_widths) {
            self.draw_centered(content, font, x, y, *w, text);
            x += w;
        }
        content.restore_state();
    }

    /// Column widths from header + content lengths, scaled to the page width.
    fn compute_col_widths(&self, header: &[String], rows: &[Vec<String>]) -> Vec<f32> {
        let mut widths: Vec<f32> = header
            .iter()
            .map(|h| text_width(h, self.font_size) + 16.0)
            .collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(text_width(cell, self.font_size) + 16.0);
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;
        if total > 0.0 {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }

        widths
    }

    fn draw_page_frame(&self, content: &mut Content, title: &str, subtitle: &str, page: usize, pages: usize) {
        content.save_state();
        content.set_fill_rgb(0.0, 0.0, 0.0);

        self.draw_text(
            content,
            FONT_BOLD,
            self.margin,
            self.page_h - self.margin,
            self.title_font_size,
            title,
        );
        self.draw_text(
            content,
            FONT,
            self.margin,
            self.page_h - self.margin - 20.0,
            self.subtitle_font_size,
            subtitle,
        );

        let pg = format!("Page {page} of {pages}");
        self.draw_text(
            content,
            FONT,
            self.page_w - self.margin - text_width(&pg, self.font_size),
            self.margin - 30.0,
            self.font_size,
            &pg,
        );

        content.restore_state();
    }

    /// Write `table` (first row = header) across as many pages as needed.
    pub fn write_table(&mut self, title: &str, subtitle: &str, table: &[Vec<String>]) {
        let Some((header, body)) = table.split_first() else {
            return;
        };

        let col_widths = self.compute_col_widths(header, body);
        let per_page = self.rows_per_page();
        let pages = body.len().div_ceil(per_page).max(1);

        for page_idx in 0..pages {
            let start = page_idx * per_page;
            let chunk = &body[start..(start + per_page).min(body.len())];

            let mut content = Content::new();
            self.draw_page_frame(&mut content, title, subtitle, page_idx + 1, pages);

            let mut y = self.table_top() - self.row_h;
            self.draw_row(&mut content, y, &col_widths, header, true);

            for row in chunk {
                y -= self.row_h;
                self.draw_row(&mut content, y, &col_widths, row, false);
            }

            self.write_page(content);
        }
    }

    /// Finish the document and return its bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        let count = self.page_refs.len() as i32;
        self.pdf
            .pages(self.pages_id)
            .kids(self.page_refs.iter().copied())
            .count(count);
        let bytes = self.pdf.finish();
        bytes.to_vec()
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_CHAR_WIDTH
}

/// Truncate with "..." so the text fits in `max_w` points.
fn fit_text(text: &str, max_w: f32, size: f32) -> String {
    if text_width(text, size) <= max_w {
        return text.to_string();
    }
    let max_chars = ((max_w / (size * AVG_CHAR_WIDTH)) as usize).saturating_sub(3);
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Map text to WinAnsi bytes (Latin-1 range kept, anything else becomes '?').
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            0x20AC => 0x80, // €
            _ => b'?',
        })
        .collect()
}
