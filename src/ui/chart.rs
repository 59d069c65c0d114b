//! Terminal line chart of glucose over time.
//!
//! Time runs downwards (one row per reading, oldest first), glucose runs
//! left to right. Consecutive readings are joined with a dotted segment and
//! the low/high thresholds are drawn as guide columns.

use crate::models::RecordSet;
use crate::utils::colors::GlucoseBand;
use crate::utils::format_glucose;

const MARKER: char = '●';
const SEGMENT: char = '·';
const GUIDE: char = '┊';

pub struct ChartOptions {
    /// Plot area width in characters.
    pub width: usize,
    pub low: f64,
    pub high: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 50,
            low: 70.0,
            high: 180.0,
        }
    }
}

pub fn render(set: &RecordSet, opts: &ChartOptions) -> String {
    let points = set.sorted_ascending();
    if points.is_empty() {
        return String::new();
    }

    let width = opts.width.max(10);

    let lo = points
        .iter()
        .map(|r| r.glucose)
        .fold(opts.low, f64::min);
    let mut hi = points
        .iter()
        .map(|r| r.glucose)
        .fold(opts.high, f64::max);
    if hi <= lo {
        hi = lo + 1.0;
    }

    let column = |v: f64| -> usize {
        let pos = (v - lo) / (hi - lo) * (width - 1) as f64;
        (pos.round().max(0.0) as usize).min(width - 1)
    };

    let low_col = column(opts.low);
    let high_col = column(opts.high);

    let mut out = String::new();

    // axis labels
    let lo_label = format_glucose(lo);
    let hi_label = format_glucose(hi);
    out.push_str(&format!(
        "{:<16} │ {lo_label}{hi_label:>pad$}\n",
        "mg/dL",
        pad = width.saturating_sub(lo_label.len())
    ));

    let mut prev: Option<usize> = None;

    for r in points {
        let col = column(r.glucose);
        let mut cells = vec![' '; width];
        cells[low_col] = GUIDE;
        cells[high_col] = GUIDE;

        if let Some(p) = prev {
            let (a, b) = if p < col { (p, col) } else { (col, p) };
            for c in cells.iter_mut().take(b).skip(a + 1) {
                *c = SEGMENT;
            }
        }

        let band = GlucoseBand::classify(r.glucose, opts.low, opts.high);

        let mut line = String::new();
        for (i, c) in cells.iter().enumerate() {
            if i == col {
                line.push_str(&band.paint(&MARKER.to_string()));
            } else {
                line.push(*c);
            }
        }

        out.push_str(&format!(
            "{} │ {}  {}\n",
            r.display_timestamp(),
            line,
            band.paint(&format_glucose(r.glucose))
        ));

        prev = Some(col);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use crate::utils::table::strip_ansi;
    use chrono::NaiveDate;

    fn rec(h: u32, glucose: f64) -> Record {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap();
        Record::new(ts, glucose, 0.0, "").unwrap()
    }

    #[test]
    fn empty_set_renders_nothing() {
        assert!(render(&RecordSet::new(), &ChartOptions::default()).is_empty());
    }

    #[test]
    fn rows_are_chronological_whatever_the_insertion_order() {
        let a = RecordSet::from_records(vec![rec(20, 140.0), rec(8, 110.0), rec(12, 60.0)]);
        let b = RecordSet::from_records(vec![rec(12, 60.0), rec(8, 110.0), rec(20, 140.0)]);

        let opts = ChartOptions::default();
        let out = render(&a, &opts);
        assert_eq!(out, render(&b, &opts));

        let plain = strip_ansi(&out).into_owned();
        let rows: Vec<&str> = plain.lines().skip(1).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("01/01/2024 08:00"));
        assert!(rows[1].starts_with("01/01/2024 12:00"));
        assert!(rows[2].starts_with("01/01/2024 20:00"));
        assert!(rows.iter().all(|r| r.matches(MARKER).count() == 1));
    }

    #[test]
    fn higher_values_plot_further_right() {
        let set = RecordSet::from_records(vec![rec(8, 60.0), rec(9, 250.0)]);
        let plain = strip_ansi(&render(&set, &ChartOptions::default())).into_owned();
        let rows: Vec<&str> = plain.lines().skip(1).collect();

        let pos = |s: &str| s.chars().position(|c| c == MARKER).unwrap();
        assert!(pos(rows[0]) < pos(rows[1]));
        // joined by a segment on the second row
        assert!(rows[1].contains(SEGMENT));
    }
}
