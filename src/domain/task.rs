//! Task definitions and per-task state
//!
//! A task definition is configuration: what the task is, how it recurs and
//! which shift it belongs to. `TaskState` pairs a definition with its
//! completion history and derives the current status on every read.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::completion::{CompletionRecord, latest_completion};
use super::rule::RecurrenceRule;
use super::shift::ShiftId;
use super::status::TaskStatus;
use crate::calendar::ShiftCalendar;
use crate::engine::DueDateCalculator;
use crate::error::{Result, ShiftwatchError};

/// Numeric task identifier; blocking lists are ordered by it
pub type TaskId = u64;

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A configured maintenance task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: TaskId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub priority: Priority,

    /// Explicitly gates the run permissive regardless of priority
    #[serde(default)]
    pub safety: bool,

    /// Kept as configured so a bad value only breaks this task
    pub interval_type: String,

    pub shift: ShiftId,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl TaskDefinition {
    pub fn new(id: TaskId, name: impl Into<String>, rule: &RecurrenceRule) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            category: String::new(),
            priority: Priority::default(),
            safety: false,
            interval_type: rule.interval.as_str().to_string(),
            shift: rule.shift_id.clone(),
            active: true,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_safety(mut self, safety: bool) -> Self {
        self.safety = safety;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Safety-relevant tasks gate the run permissive.
    pub fn is_safety_relevant(&self) -> bool {
        self.safety || self.priority == Priority::High
    }

    /// Parse the configured interval into a typed rule.
    pub fn rule(&self) -> Result<RecurrenceRule> {
        RecurrenceRule::parse(&self.interval_type, self.shift.clone())
    }
}

/// A task together with its completion history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskState {
    pub definition: TaskDefinition,
    completions: Vec<CompletionRecord>,
}

impl TaskState {
    pub fn new(definition: TaskDefinition) -> Self {
        Self {
            definition,
            completions: Vec::new(),
        }
    }

    /// Attach history; records for other tasks are rejected.
    pub fn with_completions(definition: TaskDefinition, completions: Vec<CompletionRecord>) -> Result<Self> {
        let mut state = Self::new(definition);
        for record in completions {
            state.record_completion(record)?;
        }
        Ok(state)
    }

    pub fn id(&self) -> TaskId {
        self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn shift(&self) -> &ShiftId {
        &self.definition.shift
    }

    pub fn rule(&self) -> Result<RecurrenceRule> {
        self.definition.rule()
    }

    pub fn completions(&self) -> &[CompletionRecord] {
        &self.completions
    }

    /// Append a completion. History is never rewritten.
    pub fn record_completion(&mut self, record: CompletionRecord) -> Result<()> {
        if record.task_id != self.definition.id {
            return Err(ShiftwatchError::Storage(format!(
                "completion for task {} attached to task {}",
                record.task_id, self.definition.id
            )));
        }
        self.completions.push(record);
        Ok(())
    }

    /// Most recent completion at or before `now`.
    pub fn last_completion(&self, now: NaiveDateTime) -> Option<&CompletionRecord> {
        latest_completion(&self.completions, now)
    }

    /// Status at `now`, derived from the rule, the calendar and history.
    pub fn current_status(&self, calendar: &ShiftCalendar, now: NaiveDateTime) -> Result<TaskStatus> {
        let rule = self.rule()?;
        DueDateCalculator::new(calendar).status_from_history(&rule, now, &self.completions)
    }
}
