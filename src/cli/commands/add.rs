use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::add::AddLogic;
use crate::errors::{AppError, AppResult};
use crate::models::{Record, record};
use crate::store::RecordStore;
use crate::ui::messages::success;
use crate::utils::colors::GlucoseBand;
use crate::utils::date;
use crate::utils::time::parse_optional_time;
use crate::utils::{format_glucose, format_insulin};

/// Record a new reading (form submission).
pub fn handle(cmd: &Commands, cfg: &Config, store: &dyn RecordStore) -> AppResult<()> {
    if let Commands::Add {
        glucose,
        insulin,
        notes,
        date,
        time,
    } = cmd
    {
        //
        // 1. Resolve timestamp (defaults: today / now)
        //
        let now = record::now();

        let day = match date {
            Some(d) => date::parse_date(d).ok_or_else(|| AppError::InvalidDate(d.to_string()))?,
            None => now.date(),
        };
        let at = parse_optional_time(time.as_deref())?.unwrap_or(now.time());

        //
        // 2. Validate and build the record
        //
        let rec = Record::new(day.and_time(at), *glucose, *insulin, notes.as_str())?;
        let band = GlucoseBand::classify(rec.glucose, cfg.low_threshold, cfg.high_threshold);

        //
        // 3. Append + persist, then re-read
        //
        let summary = format!(
            "{} | glucose {} mg/dL | insulin {} U",
            rec.display_timestamp(),
            band.paint(&format_glucose(rec.glucose)),
            format_insulin(rec.insulin),
        );

        let current = AddLogic::apply(store, rec)?;

        success(format!("Reading saved to {}: {summary}", store.describe()));
        success(format!("{} readings stored", current.len()));
    }

    Ok(())
}
