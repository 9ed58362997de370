//! Derived task status.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Where a task stands in its current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueState {
    /// Not yet due, or the current cycle is already satisfied
    Pending,
    /// Due now, deadline not yet passed
    Due,
    /// Deadline passed without a qualifying completion
    Overdue,
}

impl DueState {
    pub fn is_overdue(&self) -> bool {
        matches!(self, DueState::Overdue)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DueState::Pending => "pending",
            DueState::Due => "due",
            DueState::Overdue => "overdue",
        }
    }
}

impl fmt::Display for DueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a task at a reference instant. Recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: DueState,
    /// When the current occurrence became (or will become) due
    pub due_at: NaiveDateTime,
    /// When the following occurrence becomes due
    pub next_due_at: NaiveDateTime,
    /// Overdue strictly after this instant
    pub overdue_after: NaiveDateTime,
    /// Completion that satisfied the cycle just finished, if any
    pub satisfied_by: Option<NaiveDateTime>,
}

impl TaskStatus {
    pub fn is_overdue(&self) -> bool {
        self.state.is_overdue()
    }

    /// Time past the deadline at `now`, zero when not overdue.
    pub fn overdue_by(&self, now: NaiveDateTime) -> chrono::Duration {
        if self.is_overdue() {
            now.signed_duration_since(self.overdue_after)
        } else {
            chrono::Duration::zero()
        }
    }
}
