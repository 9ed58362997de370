//! Facility snapshot
//!
//! A `Facility` is everything one evaluation needs: the shift calendar and
//! every task with its completion history, read once from storage. It is
//! immutable for the duration of an evaluation; reloading builds a new one.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::calendar::ShiftCalendar;
use crate::domain::{CompletionRecord, ShiftId, TaskDefinition, TaskId, TaskState, TaskStatus};
use crate::engine::{PermissiveDecision, RunPermissiveEvaluator, SummaryReport};
use crate::error::{Result, ShiftwatchError};
use crate::storage::{CompletionLog, TaskFile};

/// Calendar plus task states, ordered by task id
#[derive(Debug, Clone)]
pub struct Facility {
    calendar: Arc<ShiftCalendar>,
    tasks: BTreeMap<TaskId, TaskState>,
}

impl Facility {
    /// Pair definitions with their completions. Completions for unknown
    /// tasks are dropped with a warning.
    pub fn new(
        calendar: Arc<ShiftCalendar>,
        definitions: Vec<TaskDefinition>,
        completions: Vec<CompletionRecord>,
    ) -> Result<Self> {
        let mut tasks = BTreeMap::new();
        for definition in definitions {
            let id = definition.id;
            if tasks.insert(id, TaskState::new(definition)).is_some() {
                return Err(ShiftwatchError::Storage(format!("task id {} defined more than once", id)));
            }
        }

        for record in completions {
            match tasks.get_mut(&record.task_id) {
                Some(task) => task.record_completion(record)?,
                None => log::warn!("Ignoring completion for unknown task {}", record.task_id),
            }
        }

        Ok(Self { calendar, tasks })
    }

    /// Read task definitions and the completion log from disk.
    pub fn open(calendar: Arc<ShiftCalendar>, tasks_file: &Path, completions: &CompletionLog) -> Result<Self> {
        let definitions = TaskFile::load(tasks_file)?.tasks;
        Self::new(calendar, definitions, completions.load()?)
    }

    pub fn calendar(&self) -> &ShiftCalendar {
        &self.calendar
    }

    pub fn task(&self, id: TaskId) -> Result<&TaskState> {
        self.tasks.get(&id).ok_or(ShiftwatchError::TaskNotFound(id))
    }

    /// Every task, ascending by id.
    pub fn tasks(&self) -> impl Iterator<Item = &TaskState> {
        self.tasks.values()
    }

    /// Active tasks bound to `shift`.
    pub fn tasks_for_shift<'a>(&'a self, shift: &'a ShiftId) -> impl Iterator<Item = &'a TaskState> + 'a {
        self.active_tasks().filter(move |task| task.shift() == shift)
    }

    /// Active tasks that gate the run permissive.
    pub fn safety_tasks(&self) -> impl Iterator<Item = &TaskState> {
        self.active_tasks().filter(|task| task.definition.is_safety_relevant())
    }

    fn active_tasks(&self) -> impl Iterator<Item = &TaskState> {
        self.tasks.values().filter(|task| task.definition.active)
    }

    /// Status of every active task, with per-task errors kept alongside.
    pub fn statuses(&self, now: NaiveDateTime) -> Vec<(&TaskState, Result<TaskStatus>)> {
        self.active_tasks()
            .map(|task| (task, task.current_status(&self.calendar, now)))
            .collect()
    }

    /// Run permissive for `shift` over the safety-relevant tasks.
    pub fn permissive(&self, shift: &ShiftId, now: NaiveDateTime) -> PermissiveDecision {
        RunPermissiveEvaluator::new(&self.calendar).evaluate(self.safety_tasks(), shift, now)
    }

    /// Run permissive for whichever shift is running at `now`, if any.
    pub fn permissive_for_active_shift(&self, now: NaiveDateTime) -> Option<PermissiveDecision> {
        let shift = self.calendar.active_shift_at(now)?;
        Some(self.permissive(&shift.id, now))
    }

    pub fn report(&self, now: NaiveDateTime) -> SummaryReport {
        SummaryReport::build(&self.calendar, self.tasks.values(), now)
    }
}
