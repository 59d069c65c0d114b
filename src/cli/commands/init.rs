use crate::cli::parser::Cli;
use crate::config::{Backend, Config};
use crate::errors::AppResult;
use crate::store::{self, CsvFileStore, RecordStore};
use crate::ui::messages::{info, success};
use crate::utils::path::expand_tilde;
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - for the file backend, the data file with only its header row
pub fn handle(cli: &Cli, config_path: &Path) -> AppResult<()> {
    info("Initializing glucolog…");

    let mut cfg = Config::init_all(cli.data.as_deref(), config_path, cli.test)?;
    if cli.data.is_some() {
        cfg.backend = Backend::File;
    }

    match cfg.backend {
        Backend::File => {
            let data = CsvFileStore::new(expand_tilde(&cfg.data_file));
            if data.create_if_missing()? {
                success(format!("Data file created: {}", data.describe()));
            } else {
                info(format!(
                    "Data file already present: {} ({} readings)",
                    data.describe(),
                    data.load().len()
                ));
            }
        }
        Backend::Sheet => {
            // probe only: an unreachable sheet is reported, not fatal
            let remote = store::open(&cfg)?;
            match remote.fetch() {
                Ok(set) => success(format!(
                    "Remote sheet reachable: {} ({} readings)",
                    remote.describe(),
                    set.len()
                )),
                Err(e) => info(format!("Remote sheet not reachable yet: {e}")),
            }
            remote.close()?;
        }
    }

    success("glucolog initialization completed!");
    Ok(())
}
