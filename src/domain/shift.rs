//! Shift definitions and occurrence arithmetic
//!
//! A shift runs on a set of weekdays between a start and an end time-of-day.
//! When the end is earlier than the start the shift is overnight and each
//! occurrence closes on the calendar day after the one it is anchored on.
//! All instants are facility-local `NaiveDateTime`s.

use std::fmt;

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftwatchError};

/// Anchor days scanned when looking for the occurrence containing or following
/// an instant: the day before (overnight tail) plus eight days ahead.
pub const OCCURRENCE_SEARCH_DAYS: u64 = 9;

/// Identifier of a shift ("A", "B", ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShiftId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ShiftId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named recurring work period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,

    /// Weekdays the shift starts on
    #[serde(rename = "days")]
    pub active_days: Vec<Weekday>,

    #[serde(rename = "start", with = "hhmm")]
    pub start_time: NaiveTime,

    /// May be earlier than `start_time` for an overnight shift
    #[serde(rename = "end", with = "hhmm")]
    pub end_time: NaiveTime,

    #[serde(rename = "order", default)]
    pub display_order: u32,
}

/// One concrete run of a shift
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub shift_id: ShiftId,
    /// Calendar day the occurrence is anchored on (its start date)
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Occurrence {
    /// Half-open containment: the end instant belongs to whatever follows.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Monday of the ISO week containing `date`, `None` before the first representable Monday.
pub fn week_monday(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

impl Shift {
    /// Create a validated shift.
    pub fn new(
        id: impl Into<ShiftId>,
        active_days: Vec<Weekday>,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self> {
        let shift = Self {
            id: id.into(),
            active_days,
            start_time,
            end_time,
            display_order: 0,
        };
        shift.validate()?;
        Ok(shift)
    }

    /// Set the listing order.
    pub fn with_order(mut self, display_order: u32) -> Self {
        self.display_order = display_order;
        self
    }

    /// The facility's standard four-shift pattern.
    pub fn builtins() -> Vec<Shift> {
        use Weekday::*;

        let mon_thu = vec![Mon, Tue, Wed, Thu];
        let fri_sun = vec![Fri, Sat, Sun];
        vec![
            Self::builtin("A", mon_thu.clone(), (4, 30), (15, 30), 1),
            Self::builtin("B", mon_thu, (16, 30), (3, 30), 2),
            Self::builtin("C", fri_sun.clone(), (5, 0), (17, 0), 3),
            Self::builtin("D", fri_sun, (17, 0), (5, 0), 4),
        ]
    }

    fn builtin(id: &str, active_days: Vec<Weekday>, start: (u32, u32), end: (u32, u32), order: u32) -> Self {
        // literal inputs, always in range
        let at = |(h, m): (u32, u32)| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
        Self {
            id: ShiftId::from(id),
            active_days,
            start_time: at(start),
            end_time: at(end),
            display_order: order,
        }
    }

    /// Check the shift invariants.
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(ShiftwatchError::InvalidShift("shift id must not be empty".to_string()));
        }
        if self.start_time == self.end_time {
            return Err(ShiftwatchError::InvalidShift(format!(
                "shift {} starts and ends at {}",
                self.id,
                self.start_time.format("%H:%M")
            )));
        }
        if self.active_days.is_empty() {
            return Err(ShiftwatchError::InvalidShift(format!("shift {} has no active days", self.id)));
        }
        Ok(())
    }

    pub fn is_overnight(&self) -> bool {
        self.end_time < self.start_time
    }

    pub fn is_active_on(&self, weekday: Weekday) -> bool {
        self.active_days.contains(&weekday)
    }

    /// Length of one occurrence.
    pub fn duration(&self) -> Duration {
        let span = self.end_time.signed_duration_since(self.start_time);
        if self.is_overnight() { span + Duration::days(1) } else { span }
    }

    /// Offset of the start time from midnight.
    pub fn start_offset(&self) -> Duration {
        Duration::seconds(i64::from(self.start_time.num_seconds_from_midnight()))
    }

    /// The occurrence anchored on `date`, if the shift runs that weekday.
    pub fn occurrence_on(&self, date: NaiveDate) -> Option<Occurrence> {
        if !self.is_active_on(date.weekday()) {
            return None;
        }
        let end_date = if self.is_overnight() { date.succ_opt()? } else { date };
        Some(Occurrence {
            shift_id: self.id.clone(),
            date,
            start: date.and_time(self.start_time),
            end: end_date.and_time(self.end_time),
        })
    }

    /// The occurrence running at `reference`, or else the next one to start.
    ///
    /// Occurrences never overlap, so the first one (in anchor order) ending
    /// after `reference` is the answer.
    pub fn occurrence_containing_or_after(&self, reference: NaiveDateTime) -> Option<Occurrence> {
        let first_anchor = reference.date().pred_opt()?;
        (0..OCCURRENCE_SEARCH_DAYS)
            .map_while(|offset| first_anchor.checked_add_days(Days::new(offset)))
            .filter_map(|anchor| self.occurrence_on(anchor))
            .find(|occurrence| occurrence.end > reference)
    }

    /// The occurrence running at `instant`, if any.
    pub fn occurrence_containing(&self, instant: NaiveDateTime) -> Option<Occurrence> {
        self.occurrence_containing_or_after(instant)
            .filter(|occurrence| occurrence.start <= instant)
    }

    /// Anchor date of the occurrence running at `instant`, else its calendar date.
    pub fn shift_date(&self, instant: NaiveDateTime) -> NaiveDate {
        self.occurrence_containing(instant)
            .map(|occurrence| occurrence.date)
            .unwrap_or_else(|| instant.date())
    }

    /// Earliest active day within the ISO week containing `reference`.
    pub fn first_active_day_of_week(&self, reference: NaiveDate) -> Option<NaiveDate> {
        let monday = week_monday(reference)?;
        (0..7)
            .map_while(|offset| monday.checked_add_days(Days::new(offset)))
            .find(|date| self.is_active_on(date.weekday()))
    }

    /// Latest active day within the ISO week containing `reference`.
    pub fn last_active_day_of_week(&self, reference: NaiveDate) -> Option<NaiveDate> {
        let monday = week_monday(reference)?;
        (0..7)
            .rev()
            .filter_map(|offset| monday.checked_add_days(Days::new(offset)))
            .find(|date| self.is_active_on(date.weekday()))
    }
}

/// `"HH:MM"` (de)serialization for shift times, matching how shift tables are
/// written by hand.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT)
            .map_err(|e| D::Error::custom(format!("invalid time '{}': {}", raw, e)))
    }
}
