//! Error types for shiftwatch
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::domain::{ShiftId, TaskId};

/// All error types that can occur in shiftwatch
#[derive(Debug, Error)]
pub enum ShiftwatchError {
    /// A rule or lookup names a shift the calendar does not define
    #[error("Unknown shift: {0}")]
    UnknownShift(ShiftId),

    /// Interval type string is not one of the recognised recurrence patterns
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// Shift definition violates its invariants
    #[error("Invalid shift: {0}")]
    InvalidShift(String),

    /// Task not present in the loaded definitions
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for shiftwatch operations
pub type Result<T> = std::result::Result<T, ShiftwatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_shift_error() {
        let err = ShiftwatchError::UnknownShift(ShiftId::from("E"));
        assert_eq!(err.to_string(), "Unknown shift: E");
    }

    #[test]
    fn test_invalid_rule_error() {
        let err = ShiftwatchError::InvalidRule("unrecognised interval type 'hourly'".to_string());
        assert_eq!(err.to_string(), "Invalid rule: unrecognised interval type 'hourly'");
    }

    #[test]
    fn test_invalid_shift_error() {
        let err = ShiftwatchError::InvalidShift("shift A starts and ends at 04:30".to_string());
        assert_eq!(err.to_string(), "Invalid shift: shift A starts and ends at 04:30");
    }

    #[test]
    fn test_task_not_found_error() {
        let err = ShiftwatchError::TaskNotFound(42);
        assert_eq!(err.to_string(), "Task not found: 42");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ShiftwatchError = io_err.into();
        assert!(matches!(err, ShiftwatchError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: ShiftwatchError = json_err.into();
        assert!(matches!(err, ShiftwatchError::Json(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("{not: a list}").unwrap_err();
        let err: ShiftwatchError = yaml_err.into();
        assert!(matches!(err, ShiftwatchError::Yaml(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(ShiftwatchError::Storage("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
