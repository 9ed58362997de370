//! Due-date and run permissive integration tests
//!
//! Exercises the public engine against the standard A-D shift pattern.
//! 2025-01-06 is a Monday.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use shiftwatch::calendar::ShiftCalendar;
use shiftwatch::domain::{
    CompletionRecord, DueState, IntervalType, Priority, RecurrenceRule, Shift, ShiftId, TaskDefinition, TaskState,
};
use shiftwatch::engine::{DueDateCalculator, RunPermissiveEvaluator};
use shiftwatch::error::Result;

fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap().and_hms_opt(h, m, s).unwrap()
}

fn safety_task(id: u64, interval: IntervalType, shift: &str) -> TaskState {
    let definition = TaskDefinition::new(id, format!("check {}", id), &RecurrenceRule::new(interval, shift))
        .with_priority(Priority::High);
    TaskState::new(definition)
}

#[test]
fn test_day_shift_occurrence_stays_on_one_day() -> Result<()> {
    let calendar = ShiftCalendar::builtin();
    let a = ShiftId::from("A");
    for day in 6..=9 {
        let occurrence = calendar.occurrence_containing_or_after(&a, at(day, 1, 0, 0))?;
        assert_eq!(occurrence.start.date(), occurrence.end.date());
        assert_eq!(occurrence.start, at(day, 4, 30, 0));
    }
    Ok(())
}

#[test]
fn test_overnight_occurrence_ends_next_day() -> Result<()> {
    let monday_only = Shift::new(
        "Late",
        vec![Weekday::Mon],
        NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
        NaiveTime::from_hms_opt(3, 30, 0).unwrap(),
    )?;
    let calendar = ShiftCalendar::new(vec![monday_only])?;

    let occurrence = calendar.occurrence_containing_or_after(&"Late".into(), at(6, 12, 0, 0))?;
    assert_eq!(occurrence.start, at(6, 16, 30, 0));
    assert_eq!(occurrence.end, at(7, 3, 30, 0));

    // Tuesday 02:00 is still inside Monday's occurrence
    let running = calendar.occurrence_containing_or_after(&"Late".into(), at(7, 2, 0, 0))?;
    assert_eq!(running, occurrence);
    Ok(())
}

#[test]
fn test_start_daily_transitions_on_monday() -> Result<()> {
    let calendar = ShiftCalendar::builtin();
    let calculator = DueDateCalculator::new(&calendar);
    let rule = RecurrenceRule::new(IntervalType::StartDaily, "A");

    assert_eq!(calculator.status(&rule, at(6, 4, 29, 59), None)?.state, DueState::Pending);
    assert_eq!(calculator.status(&rule, at(6, 4, 30, 0), None)?.state, DueState::Due);
    assert_eq!(calculator.status(&rule, at(6, 15, 30, 0), None)?.state, DueState::Due);
    assert_eq!(calculator.status(&rule, at(6, 15, 30, 1), None)?.state, DueState::Overdue);
    Ok(())
}

#[test]
fn test_stale_completion_never_clears_overdue() -> Result<()> {
    let calendar = ShiftCalendar::builtin();
    let mut task = safety_task(1, IntervalType::StartDaily, "A");
    task.record_completion(CompletionRecord::new(1, at(5, 9, 0, 0), "sunday crew"))?;

    let status = task.current_status(&calendar, at(7, 3, 0, 0))?;
    assert_eq!(status.state, DueState::Overdue);
    assert_eq!(status.overdue_after, at(6, 15, 30, 0));
    Ok(())
}

#[test]
fn test_weekly_single_completion_satisfies_week() -> Result<()> {
    let calendar = ShiftCalendar::builtin();
    let calculator = DueDateCalculator::new(&calendar);

    for interval in [IntervalType::StartWeekly, IntervalType::EndWeekly] {
        let rule = RecurrenceRule::new(interval, "A");
        let done = Some(at(7, 10, 0, 0));
        for day in 7..=12 {
            let status = calculator.status(&rule, at(day, 12, 0, 0), done)?;
            assert_eq!(status.state, DueState::Pending, "{} on day {}", interval, day);
            assert_eq!(status.satisfied_by, done);
        }
        // the next week is due again on its own schedule
        let next_week = calculator.status(&rule, at(13, 12, 0, 0), done)?;
        assert_ne!(next_week.satisfied_by, done);
    }
    Ok(())
}

#[test]
fn test_weekly_completion_early_in_iso_week_counts() -> Result<()> {
    let calendar = ShiftCalendar::builtin();
    let calculator = DueDateCalculator::new(&calendar);
    // (interval, shift, completed, now, next due)
    let cases = [
        (IntervalType::StartWeekly, "A", at(6, 3, 0, 0), at(6, 16, 0, 0), at(13, 4, 30, 0)),
        (IntervalType::EndWeekly, "A", at(6, 0, 30, 0), at(9, 16, 0, 0), at(16, 15, 30, 0)),
        (IntervalType::StartWeekly, "B", at(6, 10, 0, 0), at(7, 12, 0, 0), at(13, 16, 30, 0)),
        (IntervalType::EndWeekly, "B", at(7, 12, 0, 0), at(10, 12, 0, 0), at(17, 3, 30, 0)),
        (IntervalType::StartWeekly, "C", at(8, 9, 0, 0), at(10, 18, 0, 0), at(17, 5, 0, 0)),
        (IntervalType::EndWeekly, "C", at(8, 9, 0, 0), at(12, 18, 0, 0), at(19, 17, 0, 0)),
        (IntervalType::StartWeekly, "D", at(6, 2, 0, 0), at(11, 12, 0, 0), at(17, 17, 0, 0)),
        (IntervalType::EndWeekly, "D", at(7, 10, 0, 0), at(9, 12, 0, 0), at(20, 5, 0, 0)),
        // Sunday night's tail has ended, the completion still covers the week
        (IntervalType::EndWeekly, "D", at(7, 10, 0, 0), at(13, 6, 0, 0), at(20, 5, 0, 0)),
    ];

    for (interval, shift, done, now, next_due) in cases {
        let status = calculator.status(&RecurrenceRule::new(interval, shift), now, Some(done))?;
        assert_eq!(status.state, DueState::Pending, "{} {} at {}", interval, shift, now);
        assert_eq!(status.due_at, next_due, "{} {} at {}", interval, shift, now);
        assert_eq!(status.satisfied_by, Some(done));
    }
    Ok(())
}

#[test]
fn test_weekly_due_instant_ignores_active_day_count() -> Result<()> {
    let calendar = ShiftCalendar::builtin();
    let calculator = DueDateCalculator::new(&calendar);

    let start = calculator.status(&RecurrenceRule::new(IntervalType::StartWeekly, "A"), at(8, 12, 0, 0), None)?;
    assert_eq!(start.due_at, at(6, 4, 30, 0));
    assert_eq!(start.next_due_at, at(13, 4, 30, 0));

    let end = calculator.status(&RecurrenceRule::new(IntervalType::EndWeekly, "A"), at(8, 12, 0, 0), None)?;
    assert_eq!(end.state, DueState::Pending);
    assert_eq!(end.due_at, at(9, 15, 30, 0));
    Ok(())
}

#[test]
fn test_identical_inputs_identical_status() -> Result<()> {
    let calendar = ShiftCalendar::builtin();
    let calculator = DueDateCalculator::new(&calendar);
    let rule = RecurrenceRule::new(IntervalType::EndDaily, "B");
    let now = at(7, 2, 0, 0);
    let last = Some(at(5, 23, 0, 0));

    assert_eq!(calculator.status(&rule, now, last)?, calculator.status(&rule, now, last)?);
    Ok(())
}

#[test]
fn test_permissive_only_counts_active_shift_tasks() -> Result<()> {
    let calendar = ShiftCalendar::builtin();
    let evaluator = RunPermissiveEvaluator::new(&calendar);
    let tasks = vec![
        safety_task(4, IntervalType::StartDaily, "A"),
        safety_task(2, IntervalType::StartDaily, "B"),
        safety_task(9, IntervalType::EndDaily, "A"),
    ];

    // Tuesday 02:00: B's Monday start task is still only due, A's Monday tasks are overdue
    let b = evaluator.evaluate(&tasks, &"B".into(), at(7, 2, 0, 0));
    assert!(b.permitted);
    assert!(b.blocking.is_empty());

    // Tuesday 16:00: A's Tuesday tasks overdue
    let a = evaluator.evaluate(&tasks, &"A".into(), at(7, 16, 0, 0));
    assert!(!a.permitted);
    assert_eq!(a.blocking, vec![4, 9]);
    assert_eq!(a.reason().as_deref(), Some("Task \"check 4\" is overdue"));
    Ok(())
}

#[test]
fn test_blocking_order_is_stable() {
    let calendar = ShiftCalendar::builtin();
    let evaluator = RunPermissiveEvaluator::new(&calendar);
    let mut tasks: Vec<TaskState> = [7, 3, 11, 5]
        .into_iter()
        .map(|id| safety_task(id, IntervalType::StartDaily, "C"))
        .collect();
    let now = at(11, 18, 0, 0); // Saturday evening

    let first = evaluator.evaluate(&tasks, &"C".into(), now);
    let second = evaluator.evaluate(&tasks, &"C".into(), now);
    tasks.reverse();
    let reversed = evaluator.evaluate(&tasks, &"C".into(), now);

    assert_eq!(first.blocking, vec![3, 5, 7, 11]);
    assert_eq!(first, second);
    assert_eq!(first.blocking, reversed.blocking);
}
