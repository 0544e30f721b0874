use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{day_label, slot_time, BatchId, ScheduleEntry};
use timetable::{
    build_source, Catalog, DisplayRegion, Notifier, Schedule, ScheduleReport, Scheduler,
    SourceKind, TimetableController, ViewOutcome,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Catalog TOML; the built-in catalog is used when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a batch's week as an HTML table.
    Render {
        #[arg(long, default_value = "")]
        batch: String,
        #[arg(long, default_value_t = SourceKind::Sample, value_parser = parse_source)]
        source: SourceKind,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the scheduler and print the placed classes.
    Schedule {
        #[arg(long)]
        seed: Option<u64>,
        /// Only print this batch.
        #[arg(long)]
        batch: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

fn parse_source(raw: &str) -> Result<SourceKind, String> {
    raw.parse().map_err(|e: timetable::TimetableError| e.to_string())
}

struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Writes rendered markup to `out`, keeping the first write failure.
struct WriterRegion<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> WriterRegion<W> {
    fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn finish(mut self) -> io::Result<()> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.out.flush()
    }
}

impl<W: Write> DisplayRegion for WriterRegion<W> {
    fn replace_contents(&mut self, markup: String) {
        if let Err(error) = writeln!(self.out, "{markup}") {
            self.error.get_or_insert(error);
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = Catalog::load_or_builtin(cli.catalog.as_deref()).context("failed to load catalog")?;

    match cli.command {
        Command::Render {
            batch,
            source,
            seed,
        } => {
            let source = build_source(source, &catalog, seed);
            let mut region = WriterRegion::new(io::stdout().lock());
            let outcome = TimetableController::new(source.as_ref()).view(
                &BatchId::new(batch),
                &mut StderrNotifier,
                &mut region,
            );
            region.finish().context("failed to write timetable to stdout")?;
            if !matches!(outcome, ViewOutcome::Rendered { .. }) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Schedule { seed, batch, json } => {
            let run = run_schedule(&catalog, seed, batch.map(BatchId::new))?;
            let entries = run.entries();

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    let subject = catalog
                        .subject(entry.subject_id)
                        .map_or("?", |s| s.subject_name.as_str());
                    let teacher = catalog
                        .teacher(entry.teacher_id)
                        .map_or("?", |t| t.name.as_str());
                    println!(
                        "batch={} {} period={} ({}) {} - {}",
                        entry.batch_id,
                        day_label(entry.day),
                        entry.slot,
                        slot_time(entry.slot).unwrap_or(""),
                        subject,
                        teacher,
                    );
                }
            }
            eprintln!(
                "placed={} skipped_no_teacher={} failed_no_slot={}",
                run.report.placed, run.report.skipped_no_teacher, run.report.failed_no_slot
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

struct ScheduleRun {
    schedule: Schedule,
    report: ScheduleReport,
    batch_id: Option<BatchId>,
}

impl ScheduleRun {
    fn entries(&self) -> Vec<&ScheduleEntry> {
        match &self.batch_id {
            Some(batch_id) => self.schedule.for_batch(batch_id),
            None => self.schedule.entries().iter().collect(),
        }
    }
}

/// Schedules every batch, or regenerates only `batch_id` on top of a full
/// run. The report covers only what the last run placed.
fn run_schedule(catalog: &Catalog, seed: Option<u64>, batch_id: Option<BatchId>) -> Result<ScheduleRun> {
    let mut scheduler = Scheduler::seeded(catalog, seed);
    let (schedule, report) = scheduler.schedule_all();

    let Some(batch_id) = batch_id else {
        return Ok(ScheduleRun {
            schedule,
            report,
            batch_id: None,
        });
    };

    let (schedule, report) = scheduler
        .schedule_batch(&schedule, &batch_id)
        .with_context(|| format!("failed to schedule batch '{batch_id}'"))?;
    Ok(ScheduleRun {
        schedule,
        report,
        batch_id: Some(batch_id),
    })
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
