//! Path utilities: expand `~`, build default export names.

use chrono::NaiveDate;
use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// `glucose_report_YYYY-MM-DD.<ext>` in the current directory.
pub fn dated_report_name(day: NaiveDate, ext: &str) -> PathBuf {
    PathBuf::from(format!("glucose_report_{}.{ext}", day.format("%Y-%m-%d")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde("/tmp/a.csv"), PathBuf::from("/tmp/a.csv"));
        assert_eq!(expand_tilde("rel/a.csv"), PathBuf::from("rel/a.csv"));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/data.csv"), home.join("data.csv"));
        }
    }

    #[test]
    fn report_name_carries_date() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            dated_report_name(d, "pdf"),
            PathBuf::from("glucose_report_2024-03-09.pdf")
        );
    }
}
