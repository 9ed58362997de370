//! Recurrence cycles.
//!
//! Every interval type splits time into non-overlapping cycles:
//! - daily types: one cycle per active day, `[occ.start, occ.start + 1 day)`
//! - weekly types: one cycle per ISO week, `[Mon 00:00, next Mon 00:00)`,
//!   stretched past either Monday while an overnight Sunday occurrence that
//!   anchors a cycle is still running
//!
//! Daily cycles leave gaps on days the shift does not run; weekly cycles are
//! contiguous. A missed weekly cycle stays overdue until the first shift of
//! the following week starts.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::{Boundary, Cadence, IntervalType, Occurrence, Shift, week_monday};

/// One recurrence window of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    /// Completions from here on count for this cycle
    pub opens_at: NaiveDateTime,
    pub due_at: NaiveDateTime,
    /// Overdue strictly after this instant
    pub deadline: NaiveDateTime,
    /// Start of the span belonging to the next cycle (or to a gap)
    pub closes_at: NaiveDateTime,
    /// A missed cycle is still reported until this instant
    pub lapses_at: NaiveDateTime,
}

impl Cycle {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.opens_at <= instant && instant < self.closes_at
    }
}

/// Walks the cycles of one interval type over one shift.
///
/// Every lookup returns `None` for a shift with no active days and at the
/// edges of the representable calendar.
#[derive(Debug, Clone, Copy)]
pub struct CycleFinder<'a> {
    shift: &'a Shift,
    interval: IntervalType,
}

impl<'a> CycleFinder<'a> {
    pub fn new(shift: &'a Shift, interval: IntervalType) -> Self {
        Self { shift, interval }
    }

    /// The cycle whose window contains `now`. Daily rules return `None` on
    /// days the shift does not run.
    pub fn current(&self, now: NaiveDateTime) -> Option<Cycle> {
        match self.interval.cadence() {
            Cadence::Daily => self.daily(self.daily_anchor(now)?).filter(|cycle| cycle.contains(now)),
            Cadence::Weekly => {
                let monday = week_monday(now.date())?;
                match self.weekly(monday)? {
                    cycle if cycle.opens_at <= now => Some(cycle),
                    _ => self.weekly(monday.checked_sub_days(Days::new(7))?),
                }
            }
        }
    }

    /// The first cycle opening strictly after `now`.
    pub fn upcoming(&self, now: NaiveDateTime) -> Option<Cycle> {
        match self.interval.cadence() {
            Cadence::Daily => self.first_daily_from(self.daily_anchor(now)?.succ_opt()?),
            Cadence::Weekly => {
                let current = self.current(now)?;
                self.following(&current)
            }
        }
    }

    /// The cycle after `cycle`.
    pub fn following(&self, cycle: &Cycle) -> Option<Cycle> {
        let anchor = cycle.opens_at.date();
        match self.interval.cadence() {
            Cadence::Daily => self.first_daily_from(anchor.succ_opt()?),
            Cadence::Weekly => self.weekly(week_monday(anchor)?.checked_add_days(Days::new(7))?),
        }
    }

    /// The cycle before `cycle`.
    pub fn preceding(&self, cycle: &Cycle) -> Option<Cycle> {
        let anchor = cycle.opens_at.date();
        match self.interval.cadence() {
            Cadence::Daily => (1..=7)
                .map_while(|offset| anchor.checked_sub_days(Days::new(offset)))
                .find_map(|date| self.daily(date)),
            Cadence::Weekly => self.weekly(week_monday(anchor)?.checked_sub_days(Days::new(7))?),
        }
    }

    /// Calendar day whose occurrence would own `now`.
    fn daily_anchor(&self, now: NaiveDateTime) -> Option<NaiveDate> {
        Some(now.checked_sub_signed(self.shift.start_offset())?.date())
    }

    fn first_daily_from(&self, date: NaiveDate) -> Option<Cycle> {
        (0..7)
            .map_while(|offset| date.checked_add_days(Days::new(offset)))
            .find_map(|date| self.daily(date))
    }

    fn daily(&self, date: NaiveDate) -> Option<Cycle> {
        let occurrence = self.shift.occurrence_on(date)?;
        let closes_at = occurrence.start.checked_add_days(Days::new(1))?;
        Some(Cycle {
            opens_at: occurrence.start,
            due_at: self.interval.boundary().of(&occurrence),
            deadline: occurrence.end,
            closes_at,
            lapses_at: closes_at,
        })
    }

    fn weekly(&self, monday: NaiveDate) -> Option<Cycle> {
        let previous_monday = monday.checked_sub_days(Days::new(7))?;
        let next_monday = monday.checked_add_days(Days::new(7))?;
        let anchor = self.weekly_anchor(monday)?;
        let previous = self.weekly_anchor(previous_monday)?;
        let next_first = self.first_of_week(next_monday)?;

        Some(Cycle {
            opens_at: midnight(monday).max(previous.end),
            due_at: self.interval.boundary().of(&anchor),
            deadline: anchor.end,
            closes_at: midnight(next_monday).max(anchor.end),
            lapses_at: next_first.start,
        })
    }

    /// The occurrence a weekly cycle is due on: the week's first shift for
    /// start rules, its last shift for end rules.
    fn weekly_anchor(&self, monday: NaiveDate) -> Option<Occurrence> {
        match self.interval.boundary() {
            Boundary::Start => self.first_of_week(monday),
            Boundary::End => self.shift.occurrence_on(self.shift.last_active_day_of_week(monday)?),
        }
    }

    fn first_of_week(&self, monday: NaiveDate) -> Option<Occurrence> {
        self.shift.occurrence_on(self.shift.first_active_day_of_week(monday)?)
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
