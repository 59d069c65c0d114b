use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which backing medium holds the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local CSV file (`data_file`)
    #[default]
    File,
    /// Remote CSV sheet behind HTTP (`sheet_url`)
    Sheet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_report_title")]
    pub report_title: String,
    #[serde(default = "default_low_threshold")]
    pub low_threshold: f64,
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,
}

fn default_data_file() -> String {
    Config::data_file_path().to_string_lossy().to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_report_title() -> String {
    "Glucose Report".to_string()
}
fn default_low_threshold() -> f64 {
    70.0
}
fn default_high_threshold() -> f64 {
    180.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::File,
            data_file: default_data_file(),
            sheet_url: None,
            sheet_token: None,
            timeout_secs: default_timeout_secs(),
            report_title: default_report_title(),
            low_threshold: default_low_threshold(),
            high_threshold: default_high_threshold(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("glucolog")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".glucolog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("glucolog.conf")
    }

    /// Return the default path of the local data file
    pub fn data_file_path() -> PathBuf {
        Self::config_dir().join("glucolog.csv")
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    /// Missing fields fall back to their defaults.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = self.to_yaml()?;
        fs::write(path, yaml)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize the configuration directory and file.
    ///
    /// - `custom_data`: data file name or path; relative names live in the config dir
    /// - `is_test`: skip writing the config file
    pub fn init_all(custom_data: Option<&str>, config_path: &Path, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let data_path = match custom_data {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::data_file_path(),
        };

        // keep any existing settings (backend, sheet url, thresholds)
        let mut cfg = Self::load_from(config_path)?;
        cfg.data_file = data_path.to_string_lossy().to_string();

        if !is_test {
            cfg.save_to(config_path)?;
            success(format!("Config file: {}", config_path.display()));
        }

        Ok(cfg)
    }
}
