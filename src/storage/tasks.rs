//! YAML task definition file.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::TaskDefinition;
use crate::error::{Result, ShiftwatchError};

/// Contents of a task definition file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFile {
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

impl TaskFile {
    /// Load definitions. A missing file yields an empty set.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No task file at {}, starting with no tasks", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let file = Self::from_yaml(&content)?;
        log::info!("Loaded {} tasks from {}", file.tasks.len(), path.display());
        Ok(file)
    }

    /// Parse definitions, rejecting duplicate task ids.
    ///
    /// Interval types are not checked here so one bad rule never hides the
    /// rest of the file.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: Self = serde_yaml::from_str(content)?;
        let mut seen = HashSet::new();
        for task in &file.tasks {
            if !seen.insert(task.id) {
                return Err(ShiftwatchError::Storage(format!("task id {} defined more than once", task.id)));
            }
        }
        Ok(file)
    }

    /// Write definitions as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}
