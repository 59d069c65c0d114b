use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::export::ExportLogic;
use crate::store::RecordStore;
use crate::ui::messages::warning;

pub fn handle(cmd: &Commands, cfg: &Config, store: &dyn RecordStore) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        match ExportLogic::export(
            store,
            cfg,
            *format,
            file.as_deref(),
            range.as_deref(),
            *force,
        ) {
            Ok(_) => {}
            // recovered here: message, no document
            Err(AppError::EmptyExport) => {
                warning(format!(
                    "No readings to export from {} for the selected range, no file was written.",
                    store.describe()
                ));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
