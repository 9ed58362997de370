//! Completion records
//!
//! Records are appended when a task is signed off and never rewritten.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::task::TaskId;

/// A task being signed off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub task_id: TaskId,
    pub completed_at: NaiveDateTime,
    /// Opaque user reference
    pub completed_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CompletionRecord {
    pub fn new(task_id: TaskId, completed_at: NaiveDateTime, completed_by: impl Into<String>) -> Self {
        Self {
            task_id,
            completed_at,
            completed_by: completed_by.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// The most recent record not later than `now`, whatever order `records` is in.
pub fn latest_completion<'a, I>(records: I, now: NaiveDateTime) -> Option<&'a CompletionRecord>
where
    I: IntoIterator<Item = &'a CompletionRecord>,
{
    records
        .into_iter()
        .filter(|record| record.completed_at <= now)
        .max_by_key(|record| record.completed_at)
}
