use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::RecordSet;
use crate::store::RecordStore;
use crate::ui::messages::{header, info};
use crate::utils::colors::{GlucoseBand, bold, colorize_optional};
use crate::utils::date::resolve_range;
use crate::utils::table::{Column, Table};
use crate::utils::{format_glucose, format_insulin};

const NOTES_WIDTH: usize = 40;

pub fn handle(cmd: &Commands, cfg: &Config, store: &dyn RecordStore) -> AppResult<()> {
    if let Commands::List { range, asc } = cmd {
        let bounds = resolve_range(range.as_deref())?;
        let set = store.load().within(bounds);

        if set.is_empty() {
            info(format!(
                "No readings to show from {}. Start logging with `glucolog add --glucose <mg/dL>`, \
                 or see the warning above if the store could not be read.",
                store.describe()
            ));
            return Ok(());
        }

        header(format!("Readings ({})", store.describe()));
        print!("{}", render_table(&set, cfg, *asc));
        println!();
        println!("{}", summary_line(&set));
    }
    Ok(())
}

/// Full table, most recent first unless `ascending`.
pub fn render_table(set: &RecordSet, cfg: &Config, ascending: bool) -> String {
    let rows = if ascending {
        set.sorted_ascending()
    } else {
        set.sorted_descending()
    };

    let mut table = Table::new(vec![
        Column::left("Date/Time"),
        Column::right("Glucose (mg/dL)"),
        Column::right("Insulin (U)"),
        Column::left("Notes").wrap_at(NOTES_WIDTH),
    ]);

    for r in rows {
        let band = GlucoseBand::classify(r.glucose, cfg.low_threshold, cfg.high_threshold);
        table.add_row(vec![
            r.display_timestamp(),
            band.paint(&format_glucose(r.glucose)),
            format_insulin(r.insulin),
            colorize_optional(&r.notes),
        ]);
    }

    table.render()
}

fn summary_line(set: &RecordSet) -> String {
    match set.summary() {
        Some(s) => format!(
            "{} readings | avg {} mg/dL | min {} | max {} | insulin total {} U",
            bold(&s.count.to_string()),
            format_glucose((s.avg_glucose * 10.0).round() / 10.0),
            format_glucose(s.min_glucose),
            format_glucose(s.max_glucose),
            format_insulin(s.total_insulin),
        ),
        None => String::new(),
    }
}
