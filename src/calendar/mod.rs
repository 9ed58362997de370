//! Shift calendar
//!
//! The calendar is the facility's immutable set of shift definitions. It
//! resolves shift ids, answers occurrence questions for a named shift and
//! works out which shift is running at a given instant.
//!
//! Reconfiguration never mutates a calendar in place; `SharedCalendar` swaps
//! whole snapshots so in-flight evaluations keep the one they started with.

mod shared;

pub use shared::SharedCalendar;

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{Occurrence, Shift, ShiftId};
use crate::error::{Result, ShiftwatchError};

/// Validated shift definitions, kept in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCalendar {
    shifts: Vec<Shift>,
}

impl ShiftCalendar {
    /// Build a calendar, rejecting invalid shifts and duplicate ids.
    pub fn new(shifts: Vec<Shift>) -> Result<Self> {
        let mut seen = HashSet::new();
        for shift in &shifts {
            shift.validate()?;
            if !seen.insert(shift.id.clone()) {
                return Err(ShiftwatchError::InvalidShift(format!("shift {} defined more than once", shift.id)));
            }
        }

        let mut shifts = shifts;
        shifts.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.id.cmp(&b.id)));
        log::debug!("Shift calendar built with {} shifts", shifts.len());
        Ok(Self { shifts })
    }

    /// The standard A–D calendar.
    pub fn builtin() -> Self {
        Self {
            shifts: Shift::builtins(),
        }
    }

    /// Shifts in display order.
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    /// Look up a shift by id.
    pub fn resolve(&self, id: &ShiftId) -> Result<&Shift> {
        self.shifts
            .iter()
            .find(|shift| &shift.id == id)
            .ok_or_else(|| ShiftwatchError::UnknownShift(id.clone()))
    }

    /// Is the shift scheduled to start on `date`?
    pub fn is_active_on(&self, id: &ShiftId, date: NaiveDate) -> Result<bool> {
        Ok(self.occurrence_on(id, date)?.is_some())
    }

    pub fn occurrence_on(&self, id: &ShiftId, date: NaiveDate) -> Result<Option<Occurrence>> {
        Ok(self.resolve(id)?.occurrence_on(date))
    }

    /// The occurrence of `id` running at `reference`, or the next one to start.
    pub fn occurrence_containing_or_after(&self, id: &ShiftId, reference: NaiveDateTime) -> Result<Occurrence> {
        let shift = self.resolve(id)?;
        shift
            .occurrence_containing_or_after(reference)
            .ok_or_else(|| no_active_days(shift))
    }

    /// Earliest active day in the ISO week containing `reference`.
    pub fn first_active_day_of_week(&self, id: &ShiftId, reference: NaiveDateTime) -> Result<NaiveDate> {
        let shift = self.resolve(id)?;
        shift
            .first_active_day_of_week(reference.date())
            .ok_or_else(|| no_active_days(shift))
    }

    /// Latest active day in the ISO week containing `reference`.
    pub fn last_active_day_of_week(&self, id: &ShiftId, reference: NaiveDateTime) -> Result<NaiveDate> {
        let shift = self.resolve(id)?;
        shift
            .last_active_day_of_week(reference.date())
            .ok_or_else(|| no_active_days(shift))
    }

    /// The first shift, in display order, with an occurrence running at `instant`.
    pub fn active_shift_at(&self, instant: NaiveDateTime) -> Option<&Shift> {
        self.shifts
            .iter()
            .find(|shift| shift.occurrence_containing(instant).is_some())
    }
}

impl Default for ShiftCalendar {
    fn default() -> Self {
        Self::builtin()
    }
}

fn no_active_days(shift: &Shift) -> ShiftwatchError {
    ShiftwatchError::InvalidShift(format!("shift {} has no active days", shift.id))
}
