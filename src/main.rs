use chrono::NaiveDateTime;
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::GlobalConfig;

use shiftwatch::calendar::ShiftCalendar;
use shiftwatch::domain::{CompletionRecord, DueState, ShiftId, TaskId};
use shiftwatch::facility::Facility;
use shiftwatch::storage::CompletionLog;

/// Exit code when the run permissive is denied.
const EXIT_DENIED: i32 = 2;

const TIME_FORMAT: &str = "%a %Y-%m-%d %H:%M";

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shiftwatch")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("shiftwatch.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Everything a command handler needs.
struct AppContext {
    config: GlobalConfig,
    calendar: Arc<ShiftCalendar>,
    now: NaiveDateTime,
}

impl AppContext {
    fn open_log(&self) -> Result<CompletionLog> {
        CompletionLog::new(&self.config.storage.completions_file).context("Failed to open completion log")
    }

    fn facility(&self) -> Result<Facility> {
        let log = self.open_log()?;
        Facility::open(self.calendar.clone(), &self.config.storage.tasks_file, &log)
            .context("Failed to load tasks and completions")
    }
}

/// Run the selected command, returning the process exit code.
fn run_application(cli: &Cli, config: GlobalConfig) -> Result<i32> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let calendar = Arc::new(config.calendar()?);
    let now = cli.at.unwrap_or_else(|| chrono::Local::now().naive_local());
    info!("Evaluating at {}", now);
    let ctx = AppContext { config, calendar, now };

    match &cli.command {
        Commands::Shifts => handle_shifts_command(&ctx),
        Commands::ActiveShift => handle_active_shift_command(&ctx),
        Commands::Status { shift } => handle_status_command(shift.as_deref(), &ctx),
        Commands::Permissive { shift } => handle_permissive_command(shift.as_deref(), &ctx),
        Commands::Report => handle_report_command(&ctx),
        Commands::Complete { task_id, by, note } => handle_complete_command(*task_id, by, note.as_deref(), &ctx),
        Commands::History { task_id } => handle_history_command(*task_id, &ctx),
    }
}

fn handle_shifts_command(ctx: &AppContext) -> Result<i32> {
    info!("Listing {} shifts", ctx.calendar.len());
    for shift in ctx.calendar.shifts() {
        let days: Vec<String> = shift.active_days.iter().map(|d| d.to_string()).collect();
        let overnight = if shift.is_overnight() { " (overnight)".dimmed().to_string() } else { String::new() };
        println!(
            "{} {}-{} {}{}",
            shift.id.to_string().bold(),
            shift.start_time.format("%H:%M"),
            shift.end_time.format("%H:%M"),
            days.join(","),
            overnight
        );
    }
    Ok(0)
}

fn handle_active_shift_command(ctx: &AppContext) -> Result<i32> {
    match ctx.calendar.active_shift_at(ctx.now) {
        Some(shift) => {
            let occurrence = ctx.calendar.occurrence_containing_or_after(&shift.id, ctx.now)?;
            println!(
                "{} {} (until {})",
                "Active shift:".green(),
                shift.id.to_string().bold(),
                occurrence.end.format(TIME_FORMAT)
            );
        }
        None => println!("{} at {}", "No shift running".yellow(), ctx.now.format(TIME_FORMAT)),
    }
    Ok(0)
}

fn handle_status_command(shift: Option<&str>, ctx: &AppContext) -> Result<i32> {
    let facility = ctx.facility()?;
    let filter = shift.map(ShiftId::from);
    if let Some(id) = &filter {
        ctx.calendar.resolve(id)?;
    }

    info!("Showing status (shift filter: {:?})", filter);
    for (task, status) in facility.statuses(ctx.now) {
        if filter.as_ref().is_some_and(|id| task.shift() != id) {
            continue;
        }
        let label = format!("#{} {} [{}]", task.id(), task.name(), task.shift());
        match status {
            Ok(status) => {
                let state = match status.state {
                    DueState::Pending => status.state.as_str().green(),
                    DueState::Due => status.state.as_str().yellow(),
                    DueState::Overdue => status.state.as_str().red().bold(),
                };
                println!(
                    "{:<8} {} due {} next {}",
                    state,
                    label,
                    status.due_at.format(TIME_FORMAT),
                    status.next_due_at.format(TIME_FORMAT)
                );
            }
            Err(e) => println!("{:<8} {} {}", "error".red(), label, e),
        }
    }
    Ok(0)
}

fn handle_permissive_command(shift: Option<&str>, ctx: &AppContext) -> Result<i32> {
    let shift = match shift {
        Some(id) => ctx.calendar.resolve(&ShiftId::from(id))?.id.clone(),
        None => match ctx.calendar.active_shift_at(ctx.now) {
            Some(active) => active.id.clone(),
            None => {
                println!("{} at {}", "No shift running".yellow(), ctx.now.format(TIME_FORMAT));
                return Ok(0);
            }
        },
    };

    let decision = ctx.facility()?.permissive(&shift, ctx.now);
    info!(
        "Permissive for shift {}: permitted={} blocking={:?}",
        decision.shift, decision.permitted, decision.blocking
    );

    if decision.permitted {
        println!("{} shift {} may run", "PERMITTED".green().bold(), decision.shift);
        return Ok(0);
    }

    println!("{} shift {}", "DENIED".red().bold(), decision.shift);
    if let Some(reason) = decision.reason() {
        println!("  {}", reason);
    }
    for blocker in decision.blockers.iter().skip(1) {
        println!("  also blocking: #{} {}", blocker.task_id, blocker.name);
    }
    Ok(EXIT_DENIED)
}

fn handle_report_command(ctx: &AppContext) -> Result<i32> {
    let report = ctx.facility()?.report(ctx.now);
    info!("Report: {} tasks, {} overdue", report.total, report.overdue);

    println!("{} {}", "Report at".cyan(), ctx.now.format(TIME_FORMAT));
    println!(
        "  total {}  pending {}  due {}  overdue {}",
        report.total,
        report.pending.to_string().green(),
        report.due.to_string().yellow(),
        report.overdue.to_string().red()
    );
    for entry in &report.overdue_tasks {
        println!(
            "  {} #{} {} [{}] {}h ({}d) since {}",
            "OVERDUE".red(),
            entry.task_id,
            entry.name,
            entry.shift,
            entry.hours_overdue,
            entry.days_overdue,
            entry.overdue_since.format(TIME_FORMAT)
        );
    }
    for error in &report.errors {
        println!("  {} #{} {}", "ERROR".red(), error.task_id, error.message);
    }
    Ok(0)
}

fn handle_complete_command(task_id: TaskId, by: &str, note: Option<&str>, ctx: &AppContext) -> Result<i32> {
    let facility = ctx.facility()?;
    let task = facility.task(task_id)?;

    let mut record = CompletionRecord::new(task_id, ctx.now, by);
    if let Some(note) = note {
        record = record.with_note(note);
    }
    ctx.open_log()?.append(&record).context("Failed to record completion")?;

    info!("Task {} completed by {} at {}", task_id, by, ctx.now);
    println!(
        "{} #{} {} by {} at {}",
        "Completed:".green(),
        task_id,
        task.name(),
        by,
        ctx.now.format(TIME_FORMAT)
    );
    Ok(0)
}

fn handle_history_command(task_id: TaskId, ctx: &AppContext) -> Result<i32> {
    let facility = ctx.facility()?;
    let task = facility.task(task_id)?;
    let history = ctx.open_log()?.history(task_id).context("Failed to read completion history")?;
    info!("Task {} has {} recorded completions", task_id, history.len());

    println!("{} #{} {} [{}]", "History:".cyan(), task_id, task.name(), task.shift());
    if history.is_empty() {
        println!("  {}", "never completed".yellow());
    }
    for record in &history {
        let note = record.note.as_deref().map(|n| format!(" ({})", n)).unwrap_or_default();
        println!(
            "  {} by {}{}",
            record.completed_at.format(TIME_FORMAT),
            record.completed_by.bold(),
            note.dimmed()
        );
    }
    Ok(0)
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = config::load_config(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    let code = run_application(&cli, config).context("Application failed")?;
    if code != 0 {
        process::exit(code);
    }

    Ok(())
}
