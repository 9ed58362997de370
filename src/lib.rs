//! Shiftwatch - shift-based maintenance due dates and run permissives
//!
//! A facility runs named shifts (some crossing midnight) on fixed weekdays.
//! Maintenance tasks recur at the start or end of a shift, daily or weekly.
//! From the shift calendar, each task's completion history and a given
//! instant, shiftwatch derives whether each task is Pending, Due or Overdue
//! and whether a shift may run.

pub mod calendar;
pub mod domain;
pub mod engine;
pub mod error;
pub mod facility;
pub mod storage;

pub use error::{Result, ShiftwatchError};
