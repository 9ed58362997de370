//! Evaluation engine.
//!
//! This module provides:
//! - **Cycles**: how each interval type divides time into recurrence windows.
//! - **DueDateCalculator**: Pending/Due/Overdue for one task at one instant.
//! - **RunPermissiveEvaluator**: permit/deny for the active shift.
//! - **SummaryReport**: counts and the overdue list for a whole snapshot.
//!
//! Nothing here reads the clock or touches storage; every call takes `now`
//! explicitly and returns a fresh value, so the same inputs always give the
//! same answer and evaluations can run concurrently without locking.

mod cycle;
mod due;
mod permissive;
mod report;

pub use cycle::{Cycle, CycleFinder};
pub use due::{DueDateCalculator, status_for_shift};
pub use permissive::{BlockCause, Blocker, PermissiveDecision, RunPermissiveEvaluator, TaskError};
pub use report::{OverdueEntry, SummaryReport};
