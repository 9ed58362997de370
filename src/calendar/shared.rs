//! Atomically replaceable calendar snapshot.

use std::sync::{Arc, RwLock};

use super::ShiftCalendar;
use crate::error::{Result, ShiftwatchError};

/// Holds the current calendar; readers get an `Arc` they can keep using
/// while a reload swaps in a new one.
#[derive(Debug)]
pub struct SharedCalendar {
    current: RwLock<Arc<ShiftCalendar>>,
}

impl SharedCalendar {
    pub fn new(calendar: ShiftCalendar) -> Self {
        Self {
            current: RwLock::new(Arc::new(calendar)),
        }
    }

    /// The calendar in force right now.
    pub fn snapshot(&self) -> Result<Arc<ShiftCalendar>> {
        let current = self.current.read().map_err(|e| ShiftwatchError::Storage(e.to_string()))?;
        Ok(Arc::clone(&current))
    }

    /// Swap in a new calendar, returning the one it replaced.
    pub fn replace(&self, calendar: ShiftCalendar) -> Result<Arc<ShiftCalendar>> {
        let mut current = self.current.write().map_err(|e| ShiftwatchError::Storage(e.to_string()))?;
        log::info!("Replacing shift calendar ({} shifts)", calendar.len());
        Ok(std::mem::replace(&mut *current, Arc::new(calendar)))
    }
}

impl Default for SharedCalendar {
    fn default() -> Self {
        Self::new(ShiftCalendar::builtin())
    }
}
