//! Global configuration.
//!
//! Loaded from ~/.config/shiftwatch/shiftwatch.yml or .shiftwatch.yml

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use shiftwatch::calendar::ShiftCalendar;
use shiftwatch::domain::Shift;

use super::PROJECT_CONFIG;

/// Global configuration for shiftwatch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Shift calendar, listed in display order.
    pub shifts: Vec<Shift>,

    /// Storage settings.
    pub storage: StorageConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            shifts: Shift::builtins(),
            storage: StorageConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .shiftwatch.yml in current directory
    /// 3. ~/.config/shiftwatch/shiftwatch.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(PROJECT_CONFIG);
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from {}", PROJECT_CONFIG);
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load {}: {}", PROJECT_CONFIG, e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("shiftwatch").join("shiftwatch.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.shifts.is_empty() {
            eyre::bail!("shifts must define at least one shift");
        }
        if self.storage.tasks_file.as_os_str().is_empty() {
            eyre::bail!("storage.tasks-file must not be empty");
        }
        if self.storage.completions_file.as_os_str().is_empty() {
            eyre::bail!("storage.completions-file must not be empty");
        }
        self.calendar()?;
        Ok(())
    }

    /// Build the shift calendar, checking every shift's invariants.
    pub fn calendar(&self) -> Result<ShiftCalendar> {
        ShiftCalendar::new(self.shifts.clone()).context("Invalid shift configuration")
    }
}

/// Storage settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// YAML file with task definitions.
    #[serde(rename = "tasks-file")]
    pub tasks_file: PathBuf,

    /// JSONL completion log.
    #[serde(rename = "completions-file")]
    pub completions_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let default_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shiftwatch");

        Self {
            tasks_file: default_dir.join("tasks.yml"),
            completions_file: default_dir.join("completions.jsonl"),
        }
    }
}
