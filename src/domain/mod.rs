//! Domain types for shiftwatch
//!
//! This module contains all core domain types:
//! - Shift: a named recurring work period and its occurrence arithmetic
//! - RecurrenceRule: interval type bound to a shift
//! - CompletionRecord: append-only record of a task being done
//! - TaskStatus: derived Pending/Due/Overdue view, never persisted
//! - TaskState: a task definition together with its completion history

pub mod completion;
pub mod rule;
pub mod shift;
pub mod status;
pub mod task;

pub use completion::{CompletionRecord, latest_completion};
pub use rule::{Boundary, Cadence, IntervalType, RecurrenceRule};
pub use shift::{Occurrence, Shift, ShiftId, week_monday};
pub use status::{DueState, TaskStatus};
pub use task::{Priority, TaskDefinition, TaskId, TaskState};
