//! Table rendering for CLI outputs.
//!
//! Widths are measured on the visible text (ANSI escapes stripped, wide
//! characters counted once per cell), columns with a `max_width` wrap.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;]*[mK]").unwrap_or_else(|e| panic!("invalid ANSI pattern: {e}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: String,
    pub align: Align,
    pub max_width: Option<usize>,
}

impl Column {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.to_string(),
            align: Align::Left,
            max_width: None,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            align: Align::Right,
            ..Self::left(header)
        }
    }

    pub fn wrap_at(mut self, width: usize) -> Self {
        self.max_width = Some(width.max(1));
        self
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    ANSI_RE.replace_all(s, "")
}

pub fn visible_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_ref())
}

fn pad(s: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(visible_width(s)));
    match align {
        Align::Left => format!("{s}{fill}"),
        Align::Right => format!("{fill}{s}"),
    }
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Split a cell into display lines, wrapping plain text when the column
    /// has a maximum width.
    fn cell_lines(&self, col: usize, cell: &str) -> Vec<String> {
        match self.columns[col].max_width {
            Some(w) if visible_width(cell) > w && strip_ansi(cell).len() == cell.len() => {
                textwrap::wrap(cell, w)
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect()
            }
            _ => vec![cell.to_string()],
        }
    }

    pub fn render(&self) -> String {
        let wrapped: Vec<Vec<Vec<String>>> = self
            .rows
            .iter()
            .map(|row| {
                (0..self.columns.len())
                    .map(|i| self.cell_lines(i, row.get(i).map(String::as_str).unwrap_or("")))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                wrapped
                    .iter()
                    .flat_map(|row| row[i].iter())
                    .map(|l| visible_width(l))
                    .chain(std::iter::once(visible_width(&col.header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();

        // Header
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(&c.header, *w, c.align))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        out.push_str(&rule.join("  "));
        out.push('\n');

        // Rows
        for row in &wrapped {
            let height = row.iter().map(Vec::len).max().unwrap_or(1);
            for line in 0..height {
                let cells: Vec<String> = row
                    .iter()
                    .enumerate()
                    .map(|(i, lines)| {
                        let text = lines.get(line).map(String::as_str).unwrap_or("");
                        pad(text, widths[i], self.columns[i].align)
                    })
                    .collect();
                out.push_str(cells.join("  ").trim_end());
                out.push('\n');
            }
        }

        out
    }
}
