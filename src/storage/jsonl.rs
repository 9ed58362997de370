//! Append-only JSONL completion log.
//!
//! One `CompletionRecord` per line. Records are only ever appended; nothing
//! in here rewrites or deletes a line.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::domain::{CompletionRecord, TaskId};
use crate::error::{Result, ShiftwatchError};

/// Completion history backed by a JSONL file.
#[derive(Debug, Clone)]
pub struct CompletionLog {
    path: PathBuf,
}

impl CompletionLog {
    /// Open a log at `path`. The file is created on first append.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    pub fn append(&self, record: &CompletionRecord) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(record)?)?;
        log::debug!("Recorded completion of task {} at {}", record.task_id, record.completed_at);
        Ok(())
    }

    /// Read every record in file order.
    pub fn load(&self) -> Result<Vec<CompletionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: CompletionRecord = serde_json::from_str(&line).map_err(|e| {
                ShiftwatchError::Storage(format!("{} line {}: {}", self.path.display(), index + 1, e))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Records for a single task.
    pub fn for_task(&self, task_id: TaskId) -> Result<Vec<CompletionRecord>> {
        Ok(self.load()?.into_iter().filter(|r| r.task_id == task_id).collect())
    }

    /// Records for a single task, newest first. Ties keep file order.
    pub fn history(&self, task_id: TaskId) -> Result<Vec<CompletionRecord>> {
        let mut records = self.for_task(task_id)?;
        records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(records)
    }
}
