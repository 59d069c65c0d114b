use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::RecordStore;
use crate::ui::chart::{ChartOptions, render};
use crate::ui::messages::{header, info};
use crate::utils::date::resolve_range;

pub fn handle(cmd: &Commands, cfg: &Config, store: &dyn RecordStore) -> AppResult<()> {
    if let Commands::Chart { range } = cmd {
        let bounds = resolve_range(range.as_deref())?;
        let set = store.load().within(bounds);

        if set.is_empty() {
            info(format!(
                "No readings to plot from {}. See the warning above if the store could not be read.",
                store.describe()
            ));
            return Ok(());
        }

        let opts = ChartOptions {
            low: cfg.low_threshold,
            high: cfg.high_threshold,
            ..ChartOptions::default()
        };

        header(format!(
            "Glucose over time (guides at {} and {} mg/dL)",
            cfg.low_threshold, cfg.high_threshold
        ));
        print!("{}", render(&set, &opts));
    }
    Ok(())
}
