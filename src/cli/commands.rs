//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - shifts: list the shift calendar
//! - active-shift: which shift is running
//! - status: per-task due state
//! - permissive: run permissive for a shift
//! - report: summary with overdue tasks
//! - complete: record a completion
//! - history: completions of one task, newest first

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shiftwatch::domain::TaskId;

/// Accepted `--at` formats, tried in order.
const INSTANT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Shiftwatch - shift-based maintenance due dates and run permissives
#[derive(Parser, Debug)]
#[command(name = "shiftwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Evaluate at this facility-local time instead of now ("YYYY-MM-DD HH:MM[:SS]")
    #[arg(long, global = true, value_parser = parse_instant)]
    pub at: Option<NaiveDateTime>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the configured shifts
    Shifts,

    /// Show which shift is running
    ActiveShift,

    /// Show the due state of every active task
    Status {
        /// Only tasks bound to this shift
        #[arg(short, long)]
        shift: Option<String>,
    },

    /// Decide the run permissive for a shift (exit code 2 when denied)
    Permissive {
        /// Shift to evaluate; defaults to the shift running at the evaluation time
        #[arg(short, long)]
        shift: Option<String>,
    },

    /// Summary counts and overdue tasks
    Report,

    /// Record a task completion
    Complete {
        /// Task ID that was completed
        task_id: TaskId,

        /// Who performed the task
        #[arg(short, long)]
        by: String,

        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List the recorded completions of a task, newest first
    History {
        /// Task ID to list
        task_id: TaskId,
    },
}

/// Parse a facility-local timestamp.
pub fn parse_instant(input: &str) -> Result<NaiveDateTime, String> {
    let input = input.trim();
    INSTANT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| format!("invalid time '{}', expected YYYY-MM-DD HH:MM[:SS]", input))
}
