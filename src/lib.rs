//! glucolog library root.
//! Exposes the CLI parser, the high-level run() function and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::{Backend, Config};
use errors::AppResult;
use logging::{Verbosity, init_logging};
use std::path::Path;
use store::RecordStore;
use tracing::debug;
use utils::path::expand_tilde;

/// Central command dispatcher
///
/// `init` and `config` work on the configuration only; every other command
/// gets the one store handle of this process.
pub fn dispatch(cli: &Cli, cfg: &Config, config_path: &Path) -> AppResult<()> {
    let cmd = &cli.command;
    match cmd {
        Commands::Init => cli::commands::init::handle(cli, config_path),
        Commands::Config { .. } => cli::commands::config::handle(cmd, cfg, config_path),
        Commands::Add { .. } => with_store(cfg, |s| cli::commands::add::handle(cmd, cfg, s)),
        Commands::List { .. } => with_store(cfg, |s| cli::commands::list::handle(cmd, cfg, s)),
        Commands::Chart { .. } => with_store(cfg, |s| cli::commands::chart::handle(cmd, cfg, s)),
        Commands::Export { .. } => {
            with_store(cfg, |s| cli::commands::export::handle(cmd, cfg, s))
        }
    }
}

/// Open the configured store, run `f` against it, then close it.
fn with_store<F>(cfg: &Config, f: F) -> AppResult<()>
where
    F: FnOnce(&dyn RecordStore) -> AppResult<()>,
{
    let store = store::open(cfg)?;
    let result = f(store.as_ref());
    let closed = store.close();

    result.and(closed)
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));

    let config_path = match &cli.config_file {
        Some(p) => expand_tilde(p),
        None => Config::config_file(),
    };
    debug!(config = %config_path.display(), "loading configuration");

    let cfg = effective_config(&cli, &config_path)?;
    dispatch(&cli, &cfg, &config_path)
}

/// Configuration file merged with command line overrides.
fn effective_config(cli: &Cli, config_path: &Path) -> AppResult<Config> {
    let mut cfg = Config::load_from(config_path)?;

    if let Some(data) = &cli.data {
        cfg.backend = Backend::File;
        cfg.data_file = data.clone();
    }

    Ok(cfg)
}
