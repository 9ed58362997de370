//! Due-date calculation.
//!
//! Status is recomputed from first principles on every call:
//!
//! 1. Find the cycle whose window contains `now` (see [`CycleFinder`]).
//! 2. If the latest completion falls inside that window the cycle is
//!    satisfied and the task is Pending for the next one.
//! 3. Otherwise compare `now` with the cycle's due instant and deadline:
//!    before due is Pending, up to and including the deadline is Due, strictly
//!    after is Overdue. There is no grace period after the deadline.
//! 4. Between daily cycles (days the shift does not run) the task is Pending
//!    for the next cycle.
//!
//! Weekly cycles open at Monday 00:00, usually well before their due instant.
//! Until the week's first shift starts a missed previous week is still
//! reported as Overdue, and a completion from that previous week still shows
//! as what satisfied it.

use chrono::NaiveDateTime;

use super::cycle::{Cycle, CycleFinder};
use crate::calendar::ShiftCalendar;
use crate::domain::{CompletionRecord, DueState, RecurrenceRule, Shift, TaskStatus, latest_completion};
use crate::error::{Result, ShiftwatchError};

/// Maps (rule, calendar, now, last completion) to a `TaskStatus`.
#[derive(Debug, Clone, Copy)]
pub struct DueDateCalculator<'a> {
    calendar: &'a ShiftCalendar,
}

impl<'a> DueDateCalculator<'a> {
    pub fn new(calendar: &'a ShiftCalendar) -> Self {
        Self { calendar }
    }

    /// Status given the most recent completion instant (or `None` if never completed).
    pub fn status(
        &self,
        rule: &RecurrenceRule,
        now: NaiveDateTime,
        last_completion: Option<NaiveDateTime>,
    ) -> Result<TaskStatus> {
        let shift = self.calendar.resolve(&rule.shift_id)?;
        status_for_shift(rule, shift, now, last_completion)
    }

    /// Status from a full completion history in any order.
    pub fn status_from_history(
        &self,
        rule: &RecurrenceRule,
        now: NaiveDateTime,
        completions: &[CompletionRecord],
    ) -> Result<TaskStatus> {
        let last = latest_completion(completions, now).map(|record| record.completed_at);
        self.status(rule, now, last)
    }
}

/// Status of `rule` against an already resolved shift.
pub fn status_for_shift(
    rule: &RecurrenceRule,
    shift: &Shift,
    now: NaiveDateTime,
    last_completion: Option<NaiveDateTime>,
) -> Result<TaskStatus> {
    if rule.shift_id != shift.id {
        return Err(ShiftwatchError::InvalidRule(format!(
            "rule bound to shift {} evaluated against shift {}",
            rule.shift_id, shift.id
        )));
    }

    let finder = CycleFinder::new(shift, rule.interval);
    let exhausted = || ShiftwatchError::InvalidShift(format!("shift {} has no active days", shift.id));
    // a completion later than `now` has not happened yet
    let completed = last_completion.filter(|instant| *instant <= now);

    let Some(cycle) = finder.current(now) else {
        let next = finder.upcoming(now).ok_or_else(exhausted)?;
        let after = finder.following(&next).ok_or_else(exhausted)?;
        return Ok(pending_for(&next, &after, None));
    };

    let next = finder.following(&cycle).ok_or_else(exhausted)?;

    if let Some(done) = completed.filter(|instant| cycle.contains(*instant)) {
        let after = finder.following(&next).ok_or_else(exhausted)?;
        return Ok(pending_for(&next, &after, Some(done)));
    }

    if now < cycle.due_at {
        if let Some(previous) = finder.preceding(&cycle).filter(|previous| now < previous.lapses_at) {
            if let Some(done) = completed.filter(|instant| previous.contains(*instant)) {
                return Ok(pending_for(&cycle, &next, Some(done)));
            }
            if now > previous.deadline {
                return Ok(TaskStatus {
                    state: DueState::Overdue,
                    due_at: previous.due_at,
                    next_due_at: cycle.due_at,
                    overdue_after: previous.deadline,
                    satisfied_by: None,
                });
            }
        }
    }

    let state = if now < cycle.due_at {
        DueState::Pending
    } else if now <= cycle.deadline {
        DueState::Due
    } else {
        DueState::Overdue
    };

    Ok(TaskStatus {
        state,
        due_at: cycle.due_at,
        next_due_at: next.due_at,
        overdue_after: cycle.deadline,
        satisfied_by: None,
    })
}

fn pending_for(cycle: &Cycle, following: &Cycle, satisfied_by: Option<NaiveDateTime>) -> TaskStatus {
    TaskStatus {
        state: DueState::Pending,
        due_at: cycle.due_at,
        next_due_at: following.due_at,
        overdue_after: cycle.deadline,
        satisfied_by,
    }
}
