//! CLI module for shiftwatch - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for inspecting the shift
//! calendar, task status, run permissives and recording completions.

pub mod commands;

pub use commands::Cli;
