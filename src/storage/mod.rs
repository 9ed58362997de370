//! Storage layer for shiftwatch - file-backed task definitions and completions.
//!
//! The engine never writes here. These stores only produce the snapshot the
//! engine evaluates:
//! - `TaskFile`: task definitions in YAML
//! - `CompletionLog`: append-only JSONL of completion records

mod jsonl;
mod tasks;

pub use jsonl::CompletionLog;
pub use tasks::TaskFile;
