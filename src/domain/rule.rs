//! Recurrence rules
//!
//! A rule binds a task to the start or end of a shift, repeating either on
//! every day the shift runs or once per ISO week.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::shift::{Occurrence, ShiftId};
use crate::error::{Result, ShiftwatchError};

/// The four recurrence patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalType {
    /// Due at the start of every shift occurrence
    #[serde(rename = "start_shift_daily")]
    StartDaily,
    /// Due at the start of the first shift of each week
    #[serde(rename = "start_shift_weekly")]
    StartWeekly,
    /// Due at the end of every shift occurrence
    #[serde(rename = "end_shift_daily")]
    EndDaily,
    /// Due at the end of the last shift of each week
    #[serde(rename = "end_shift_weekly")]
    EndWeekly,
}

/// Which edge of a shift occurrence a rule is due on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl Boundary {
    pub fn of(&self, occurrence: &Occurrence) -> chrono::NaiveDateTime {
        match self {
            Boundary::Start => occurrence.start,
            Boundary::End => occurrence.end,
        }
    }
}

/// How often a rule produces a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Daily,
    Weekly,
}

impl IntervalType {
    pub const ALL: [IntervalType; 4] = [
        IntervalType::StartDaily,
        IntervalType::StartWeekly,
        IntervalType::EndDaily,
        IntervalType::EndWeekly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalType::StartDaily => "start_shift_daily",
            IntervalType::StartWeekly => "start_shift_weekly",
            IntervalType::EndDaily => "end_shift_daily",
            IntervalType::EndWeekly => "end_shift_weekly",
        }
    }

    pub fn boundary(&self) -> Boundary {
        match self {
            IntervalType::StartDaily | IntervalType::StartWeekly => Boundary::Start,
            IntervalType::EndDaily | IntervalType::EndWeekly => Boundary::End,
        }
    }

    pub fn cadence(&self) -> Cadence {
        match self {
            IntervalType::StartDaily | IntervalType::EndDaily => Cadence::Daily,
            IntervalType::StartWeekly | IntervalType::EndWeekly => Cadence::Weekly,
        }
    }
}

impl FromStr for IntervalType {
    type Err = ShiftwatchError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        IntervalType::ALL
            .into_iter()
            .find(|interval| interval.as_str() == wanted)
            .ok_or_else(|| ShiftwatchError::InvalidRule(format!("unrecognised interval type '{}'", s)))
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a task recurs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub interval: IntervalType,
    /// Looked up in the calendar at evaluation time
    pub shift_id: ShiftId,
}

impl RecurrenceRule {
    pub fn new(interval: IntervalType, shift_id: impl Into<ShiftId>) -> Self {
        Self {
            interval,
            shift_id: shift_id.into(),
        }
    }

    /// Build a rule from its configured spelling.
    pub fn parse(interval_type: &str, shift_id: impl Into<ShiftId>) -> Result<Self> {
        Ok(Self::new(interval_type.parse()?, shift_id))
    }
}
