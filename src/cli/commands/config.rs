use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, header, success, warning};
use std::path::Path;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, config_path: &Path) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        if *print_config {
            header(format!("Configuration ({})", config_path.display()));
            println!("{}", redacted(cfg).to_yaml()?);
        }

        if *edit_config {
            if !config_path.exists() {
                cfg.save_to(config_path)?;
            }
            edit(config_path, editor.as_deref())?;
        }
    }

    Ok(())
}

/// Copy of the configuration safe to print.
fn redacted(cfg: &Config) -> Config {
    let mut out = cfg.clone();
    if out.sheet_token.is_some() {
        out.sheet_token = Some("********".into());
    }
    out
}

fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

/// Open the editor requested with `--editor`, falling back to the default one.
fn edit(path: &Path, requested: Option<&str>) -> AppResult<()> {
    let fallback = default_editor();
    let first = requested.map(String::from).unwrap_or_else(|| fallback.clone());

    if matches!(Command::new(&first).arg(path).status(), Ok(s) if s.success()) {
        success(format!("Configuration file edited using '{first}'"));
        return Ok(());
    }

    if first == fallback {
        error(format!("Editor '{first}' failed or is not available"));
        return Err(AppError::Config(format!("cannot run editor '{first}'")));
    }

    warning(format!(
        "Editor '{first}' not available, falling back to '{fallback}'"
    ));

    match Command::new(&fallback).arg(path).status() {
        Ok(s) if s.success() => {
            success(format!("Configuration file edited using fallback '{fallback}'"));
            Ok(())
        }
        _ => Err(AppError::Config(format!(
            "cannot run editor '{first}' nor fallback '{fallback}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_hidden_when_printing() {
        let cfg = Config {
            sheet_token: Some("secret".into()),
            ..Config::default()
        };
        let yaml = redacted(&cfg).to_yaml().unwrap();
        assert!(!yaml.contains("secret"));
        assert!(yaml.contains("********"));
    }
}
