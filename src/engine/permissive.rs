//! Run permissive evaluation.
//!
//! Machinery for a shift may run only while none of the safety tasks bound to
//! that shift are overdue. A task that cannot be evaluated blocks as well:
//! an unreadable safety check is treated as a failed one.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::calendar::ShiftCalendar;
use crate::domain::{ShiftId, TaskId, TaskState};

/// Why a task blocks the permissive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockCause {
    Overdue { overdue_after: NaiveDateTime },
    Unevaluable { error: String },
}

/// A task holding the permissive off
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blocker {
    pub task_id: TaskId,
    pub name: String,
    pub cause: BlockCause,
}

/// Per-task evaluation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskError {
    pub task_id: TaskId,
    pub message: String,
}

/// Outcome of a permissive check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissiveDecision {
    pub shift: ShiftId,
    pub evaluated_at: NaiveDateTime,
    pub permitted: bool,
    /// Blocking task ids, ascending
    pub blocking: Vec<TaskId>,
    pub blockers: Vec<Blocker>,
    pub errors: Vec<TaskError>,
}

impl PermissiveDecision {
    /// Operator-facing explanation, naming the first blocking task.
    pub fn reason(&self) -> Option<String> {
        let first = self.blockers.first()?;
        Some(match &first.cause {
            BlockCause::Overdue { .. } => format!("Task \"{}\" is overdue", first.name),
            BlockCause::Unevaluable { error } => format!("Task \"{}\" could not be evaluated: {}", first.name, error),
        })
    }
}

/// Combines per-task status into a permit/deny decision for one shift.
#[derive(Debug, Clone, Copy)]
pub struct RunPermissiveEvaluator<'a> {
    calendar: &'a ShiftCalendar,
}

impl<'a> RunPermissiveEvaluator<'a> {
    pub fn new(calendar: &'a ShiftCalendar) -> Self {
        Self { calendar }
    }

    /// Evaluate `tasks` (the safety-relevant subset) for `active_shift` at `now`.
    ///
    /// Tasks bound to other shifts are ignored. Each task is evaluated on its
    /// own; failures are collected and counted as blocking.
    pub fn evaluate<'t, I>(&self, tasks: I, active_shift: &ShiftId, now: NaiveDateTime) -> PermissiveDecision
    where
        I: IntoIterator<Item = &'t TaskState>,
    {
        let mut blockers = Vec::new();
        let mut errors = Vec::new();

        for task in tasks.into_iter().filter(|task| task.shift() == active_shift) {
            match task.current_status(self.calendar, now) {
                Ok(status) if status.is_overdue() => {
                    tracing::debug!(task_id = task.id(), shift = %active_shift, "Task overdue, blocking permissive");
                    blockers.push(Blocker {
                        task_id: task.id(),
                        name: task.name().to_string(),
                        cause: BlockCause::Overdue {
                            overdue_after: status.overdue_after,
                        },
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(task_id = task.id(), error = %e, "Task could not be evaluated, blocking permissive");
                    errors.push(TaskError {
                        task_id: task.id(),
                        message: e.to_string(),
                    });
                    blockers.push(Blocker {
                        task_id: task.id(),
                        name: task.name().to_string(),
                        cause: BlockCause::Unevaluable { error: e.to_string() },
                    });
                }
            }
        }

        blockers.sort_by_key(|blocker| blocker.task_id);
        blockers.dedup_by_key(|blocker| blocker.task_id);
        errors.sort_by_key(|error| error.task_id);

        let blocking: Vec<TaskId> = blockers.iter().map(|blocker| blocker.task_id).collect();
        let permitted = blocking.is_empty();
        tracing::debug!(shift = %active_shift, permitted, blocking = ?blocking, "Run permissive evaluated");

        PermissiveDecision {
            shift: active_shift.clone(),
            evaluated_at: now,
            permitted,
            blocking,
            blockers,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompletionRecord, IntervalType, Priority, RecurrenceRule, TaskDefinition};
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn task(id: TaskId, interval: IntervalType, shift: &str) -> TaskState {
        let def = TaskDefinition::new(id, format!("task {}", id), &RecurrenceRule::new(interval, shift))
            .with_priority(Priority::High);
        TaskState::new(def)
    }

    #[test]
    fn test_permitted_when_nothing_overdue() {
        let calendar = ShiftCalendar::builtin();
        let tasks = vec![task(1, IntervalType::StartDaily, "A")];
        let decision = RunPermissiveEvaluator::new(&calendar).evaluate(&tasks, &"A".into(), at(6, 10, 0));
        assert!(decision.permitted);
        assert!(decision.blocking.is_empty());
        assert!(decision.reason().is_none());
    }

    #[test]
    fn test_denied_by_overdue_task_on_active_shift() {
        let calendar = ShiftCalendar::builtin();
        // Monday 15:30 A end passed; B is running now
        let tasks = vec![task(3, IntervalType::EndDaily, "B"), task(1, IntervalType::StartDaily, "B")];
        let decision = RunPermissiveEvaluator::new(&calendar).evaluate(&tasks, &"B".into(), at(7, 4, 0));
        assert!(!decision.permitted);
        assert_eq!(decision.blocking, vec![1, 3]);
        assert_eq!(decision.reason().unwrap(), "Task \"task 1\" is overdue");
    }

    #[test]
    fn test_other_shift_tasks_never_block() {
        let calendar = ShiftCalendar::builtin();
        let tasks = vec![task(1, IntervalType::StartDaily, "A"), task(2, IntervalType::StartDaily, "B")];
        // A's Monday cycle is overdue at 17:00, B's has just become due
        let decision = RunPermissiveEvaluator::new(&calendar).evaluate(&tasks, &"B".into(), at(6, 17, 0));
        assert!(decision.permitted);
        assert!(!decision.blocking.contains(&1));
    }

    #[test]
    fn test_completion_lifts_block() {
        let calendar = ShiftCalendar::builtin();
        let mut overdue = task(5, IntervalType::StartDaily, "A");
        let evaluator = RunPermissiveEvaluator::new(&calendar);
        assert!(!evaluator.evaluate([&overdue], &"A".into(), at(6, 16, 0)).permitted);

        overdue.record_completion(CompletionRecord::new(5, at(6, 15, 45), "alice")).unwrap();
        assert!(evaluator.evaluate([&overdue], &"A".into(), at(6, 16, 0)).permitted);
    }

    #[test]
    fn test_unevaluable_task_blocks() {
        let calendar = ShiftCalendar::builtin();
        let mut broken = task(4, IntervalType::StartDaily, "A");
        broken.definition.interval_type = "hourly".to_string();
        let tasks = vec![broken, task(2, IntervalType::EndDaily, "A")];

        let decision = RunPermissiveEvaluator::new(&calendar).evaluate(&tasks, &"A".into(), at(6, 10, 0));
        assert!(!decision.permitted);
        assert_eq!(decision.blocking, vec![4]);
        assert_eq!(decision.errors.len(), 1);
        assert!(decision.errors[0].message.contains("hourly"));
    }

    #[test]
    fn test_blocking_order_is_stable() {
        let calendar = ShiftCalendar::builtin();
        let tasks = vec![
            task(9, IntervalType::StartDaily, "A"),
            task(2, IntervalType::StartWeekly, "A"),
            task(5, IntervalType::EndDaily, "A"),
        ];
        let evaluator = RunPermissiveEvaluator::new(&calendar);
        let first = evaluator.evaluate(&tasks, &"A".into(), at(8, 16, 0));
        let second = evaluator.evaluate(tasks.iter().rev(), &"A".into(), at(8, 16, 0));
        assert_eq!(first.blocking, vec![2, 5, 9]);
        assert_eq!(first, second);
    }
}
