//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wob/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "wob";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub builder: BuilderConfig,
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

impl DataConfig {
    /// Path of the workout store inside a data directory
    pub fn store_path(data_dir: &Path) -> PathBuf {
        data_dir.join("workouts.json")
    }
}

/// Defaults applied when new intervals and exercises are created
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuilderConfig {
    #[serde(default = "default_rounds")]
    pub default_rounds: i32,

    #[serde(default = "default_rest_between_rounds")]
    pub default_rest_between_rounds_seconds: Option<i32>,

    #[serde(default = "default_effort")]
    pub default_effort: i32,

    #[serde(default = "default_seed_library")]
    pub seed_library: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_rounds: default_rounds(),
            default_rest_between_rounds_seconds: default_rest_between_rounds(),
            default_effort: default_effort(),
            seed_library: default_seed_library(),
        }
    }
}

fn home_fallback(relative: &str) -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(relative),
        None => PathBuf::from("."),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| home_fallback(".local/share"))
        .join(APP_DIR)
}

fn default_rounds() -> i32 {
    3
}

fn default_rest_between_rounds() -> Option<i32> {
    Some(60)
}

fn default_effort() -> i32 {
    crate::exercise::DEFAULT_EFFORT
}

fn default_seed_library() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.check()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject settings the builder cannot use as defaults
    fn check(&self) -> Result<()> {
        if self.builder.default_rounds < 1 {
            return Err(Error::Config(format!(
                "builder.default_rounds must be at least 1 (got {})",
                self.builder.default_rounds
            )));
        }
        if let Some(rest) = self.builder.default_rest_between_rounds_seconds {
            if rest < 0 {
                return Err(Error::Config(format!(
                    "builder.default_rest_between_rounds_seconds must not be negative (got {})",
                    rest
                )));
            }
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| home_fallback(".config"))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
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
