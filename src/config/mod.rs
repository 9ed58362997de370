//! Configuration for the shiftwatch binary.
//!
//! A single YAML file holds the shift calendar and where task definitions
//! and the completion log live. Anything omitted falls back to built-in
//! defaults (shifts A-D, files under the platform data dir).

use eyre::Result;
use std::path::PathBuf;

pub use self::global::GlobalConfig;

mod global;

/// Project config file name, looked up in the current directory.
pub const PROJECT_CONFIG: &str = ".shiftwatch.yml";

/// Load configuration from the standard search paths.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. .shiftwatch.yml in current directory (project config)
/// 3. ~/.config/shiftwatch/shiftwatch.yml (user config)
/// 4. Default values
pub fn load_config(explicit_path: Option<&PathBuf>) -> Result<GlobalConfig> {
    let config = GlobalConfig::load(explicit_path)?;
    config.validate()?;
    Ok(config)
}
