//! Summary report over a task snapshot.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::permissive::TaskError;
use crate::calendar::ShiftCalendar;
use crate::domain::{DueState, ShiftId, TaskId, TaskState};

/// One overdue task in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueEntry {
    pub task_id: TaskId,
    pub name: String,
    pub shift: ShiftId,
    pub category: String,
    pub overdue_since: NaiveDateTime,
    /// Whole hours past the deadline
    pub hours_overdue: i64,
    pub days_overdue: i64,
}

/// Counts by state plus the overdue list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub total: usize,
    pub pending: usize,
    pub due: usize,
    pub overdue: usize,
    pub overdue_tasks: Vec<OverdueEntry>,
    pub errors: Vec<TaskError>,
}

impl SummaryReport {
    /// Build the report for active tasks at `now`. A task that fails to
    /// evaluate is listed under `errors` and the rest are still reported.
    pub fn build<'t, I>(calendar: &ShiftCalendar, tasks: I, now: NaiveDateTime) -> Self
    where
        I: IntoIterator<Item = &'t TaskState>,
    {
        let mut report = Self::default();

        for task in tasks.into_iter().filter(|task| task.definition.active) {
            report.total += 1;
            let status = match task.current_status(calendar, now) {
                Ok(status) => status,
                Err(e) => {
                    log::warn!("Skipping task {} in report: {}", task.id(), e);
                    report.errors.push(TaskError {
                        task_id: task.id(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            match status.state {
                DueState::Pending => report.pending += 1,
                DueState::Due => report.due += 1,
                DueState::Overdue => {
                    report.overdue += 1;
                    let hours_overdue = status.overdue_by(now).num_hours();
                    report.overdue_tasks.push(OverdueEntry {
                        task_id: task.id(),
                        name: task.name().to_string(),
                        shift: task.shift().clone(),
                        category: task.definition.category.clone(),
                        overdue_since: status.overdue_after,
                        hours_overdue,
                        days_overdue: hours_overdue / 24,
                    });
                }
            }
        }

        report.overdue_tasks.sort_by_key(|entry| entry.task_id);
        report.errors.sort_by_key(|error| error.task_id);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IntervalType, RecurrenceRule, TaskDefinition};
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn task(id: TaskId, interval: IntervalType, shift: &str) -> TaskState {
        TaskState::new(TaskDefinition::new(id, format!("task {}", id), &RecurrenceRule::new(interval, shift)))
    }

    #[test]
    fn test_counts_and_overdue_hours() {
        let calendar = ShiftCalendar::builtin();
        let tasks = vec![
            // weekly A start: overdue since Monday 15:30
            task(2, IntervalType::StartWeekly, "A"),
            // daily A end: pending during Wednesday's shift
            task(1, IntervalType::EndDaily, "A"),
            // daily A start: due during Wednesday's shift
            task(3, IntervalType::StartDaily, "A"),
        ];
        let report = SummaryReport::build(&calendar, &tasks, at(8, 10, 0));

        assert_eq!(report.total, 3);
        assert_eq!(report.pending, 1);
        assert_eq!(report.due, 1);
        assert_eq!(report.overdue, 1);
        let entry = &report.overdue_tasks[0];
        assert_eq!(entry.task_id, 2);
        assert_eq!(entry.overdue_since, at(6, 15, 30));
        assert_eq!(entry.hours_overdue, 42);
        assert_eq!(entry.days_overdue, 1);
    }

    #[test]
    fn test_inactive_tasks_are_skipped() {
        let calendar = ShiftCalendar::builtin();
        let mut retired = task(1, IntervalType::StartWeekly, "A");
        retired.definition.active = false;
        let report = SummaryReport::build(&calendar, [&retired], at(8, 10, 0));
        assert_eq!(report.total, 0);
        assert!(report.overdue_tasks.is_empty());
    }

    #[test]
    fn test_broken_task_does_not_abort_report() {
        let calendar = ShiftCalendar::builtin();
        let tasks = vec![task(1, IntervalType::StartDaily, "Z"), task(2, IntervalType::StartWeekly, "A")];
        let report = SummaryReport::build(&calendar, &tasks, at(8, 10, 0));
        assert_eq!(report.total, 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].task_id, 1);
        assert_eq!(report.overdue, 1);
    }
}
