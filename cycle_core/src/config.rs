//! Configuration file support for CycleGuard.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/cycleguard/config.toml`.
//! Every field is optional.

use crate::{Error, Result, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub cycle: CycleConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Values offered when setup leaves a length out
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CycleConfig {
    #[serde(default = "default_period_length")]
    pub default_period_length: i32,

    #[serde(default = "default_cycle_length")]
    pub default_cycle_length: i32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            default_period_length: default_period_length(),
            default_cycle_length: default_cycle_length(),
        }
    }
}

/// CSV export configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ExportConfig {
    /// Directory export files are written to; see [`Config::export_dir`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("cycleguard")
}

fn default_period_length() -> i32 {
    DEFAULT_PERIOD_LENGTH
}

fn default_cycle_length() -> i32 {
    DEFAULT_CYCLE_LENGTH
}

fn home_dir() -> PathBuf {
    dirs::home_dir()
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("cycleguard").join("config.toml")
    }

    /// Where CSV exports go: the configured dir, else the user's documents
    /// folder, else `<data_dir>/exports`
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .dir
            .clone()
            .or_else(dirs::document_dir)
            .unwrap_or_else(|| self.data.data_dir.join("exports"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
