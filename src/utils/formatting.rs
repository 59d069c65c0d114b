//! Number formatting shared by the terminal table, the chart and the exports.

/// Glucose: whole numbers print without decimals (`110`), others with one (`110.5`).
pub fn format_glucose(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

/// Insulin: at least one decimal (`2.0`), more only when stored (`1.25`).
pub fn format_insulin(v: f64) -> String {
    let one = format!("{v:.1}");
    if one.parse::<f64>().ok() == Some(v) {
        one
    } else {
        v.to_string()
    }
}
