//! Colour helpers for terminal output.

use ansi_term::{Colour, Style};

/// Where a glucose value falls relative to the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlucoseBand {
    Low,
    InRange,
    High,
}

impl GlucoseBand {
    /// `< low` → Low, `> high` → High, otherwise InRange.
    pub fn classify(value: f64, low: f64, high: f64) -> Self {
        if value < low {
            GlucoseBand::Low
        } else if value > high {
            GlucoseBand::High
        } else {
            GlucoseBand::InRange
        }
    }

    pub fn style(&self) -> Style {
        match self {
            GlucoseBand::Low => Colour::Red.bold(),
            GlucoseBand::InRange => Colour::Green.normal(),
            GlucoseBand::High => Colour::Yellow.bold(),
        }
    }

    pub fn paint(&self, text: &str) -> String {
        self.style().paint(text).to_string()
    }
}

/// Grey placeholder for empty fields.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() {
        Colour::Fixed(8).paint("-").to_string()
    } else {
        value.to_string()
    }
}

pub fn bold(value: &str) -> String {
    Style::new().bold().paint(value).to_string()
}
