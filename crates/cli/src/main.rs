//! Command-line front end for the renewal deadline engine.
//!
//! Usage:
//!     renewal deadlines 2015-03-01 --foreign
//!     renewal reminders 2015-03-01 --offsets 90,30,7
//!     renewal fees combined --classes 2 --foreign
//!     renewal record mark.json --today 2024-01-01

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use ilegalflow_advisor::{advise_set, explain_deadline, summarize_deadlines, ActionAdvice};
use ilegalflow_calendar::{parse_date, Clock, SystemClock};
use ilegalflow_deadlines::{compute_deadlines_from_date, deadlines_for_record};
use ilegalflow_fees::FeeSchedule;
use ilegalflow_model::{RenewalCostEstimate, RenewalType, TrademarkDeadlineSet, TrademarkRecord};
use ilegalflow_reminders::{ReminderPolicy, ReminderSchedule};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "renewal")]
#[command(about = "Compute trademark renewal deadlines, reminders and fees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Evaluate as of this date instead of the system clock (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statutory deadlines and the recommended next action
    Deadlines {
        /// Registration date
        registration_date: String,

        /// Mark was registered through a foreign (Madrid Protocol) basis
        #[arg(long)]
        foreign: bool,
    },

    /// Show reminder dates for the next major deadline
    Reminders {
        /// Registration date
        registration_date: String,

        /// Mark was registered through a foreign (Madrid Protocol) basis
        #[arg(long)]
        foreign: bool,

        /// Days-before offsets (comma-separated); defaults to the standard table
        #[arg(long, value_delimiter = ',')]
        offsets: Option<Vec<u32>>,
    },

    /// Estimate government fees for a filing
    Fees {
        /// section8, section71, renewal or combined
        renewal_type: RenewalType,

        /// Number of Nice classes
        #[arg(short, long, default_value = "1")]
        classes: u32,

        /// Mark was registered through a foreign (Madrid Protocol) basis
        #[arg(long)]
        foreign: bool,

        /// Include the late filing surcharge
        #[arg(long)]
        overdue: bool,

        /// JSON file overriding the default fee schedule
        #[arg(long)]
        fee_schedule: Option<PathBuf>,
    },

    /// Deadlines and a combined estimate for a trademark record (JSON file)
    Record {
        /// Path to the record
        path: PathBuf,

        /// JSON file overriding the default fee schedule
        #[arg(long)]
        fee_schedule: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct DeadlineReport {
    deadlines: TrademarkDeadlineSet,
    advice: ActionAdvice,
    summary: String,
}

#[derive(Serialize)]
struct RecordReport<'a> {
    record: &'a TrademarkRecord,
    #[serde(flatten)]
    report: DeadlineReport,
    estimate: RenewalCostEstimate,
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays parseable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ilegalflow=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let today = cli.today.unwrap_or_else(|| SystemClock.today());
    tracing::debug!(%today, "Evaluating deadlines");

    match cli.command {
        Commands::Deadlines {
            registration_date,
            foreign,
        } => {
            run_deadlines(&registration_date, foreign, today, cli.format)?;
        }
        Commands::Reminders {
            registration_date,
            foreign,
            offsets,
        } => {
            let policy = offsets
                .map(ReminderPolicy::with_offsets)
                .unwrap_or_default();
            run_reminders(&registration_date, foreign, &policy, today, cli.format)?;
        }
        Commands::Fees {
            renewal_type,
            classes,
            foreign,
            overdue,
            fee_schedule,
        } => {
            let schedule = load_fee_schedule(fee_schedule.as_deref())?;
            let estimate = schedule.estimate(classes, renewal_type, foreign, overdue);
            print_estimate(&estimate, cli.format)?;
        }
        Commands::Record { path, fee_schedule } => {
            let schedule = load_fee_schedule(fee_schedule.as_deref())?;
            run_record(&path, &schedule, today, cli.format)?;
        }
    }

    Ok(())
}

fn load_fee_schedule(path: Option<&Path>) -> Result<FeeSchedule> {
    let Some(path) = path else {
        return Ok(FeeSchedule::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fee schedule {}", path.display()))?;
    let schedule: FeeSchedule = serde_json::from_str(&text)
        .with_context(|| format!("Invalid fee schedule {}", path.display()))?;
    schedule
        .validate()
        .with_context(|| format!("Rejected fee schedule {}", path.display()))?;
    tracing::info!(path = %path.display(), "Loaded fee schedule");
    Ok(schedule)
}

fn deadline_report(deadlines: TrademarkDeadlineSet) -> DeadlineReport {
    DeadlineReport {
        advice: advise_set(&deadlines),
        summary: summarize_deadlines(&deadlines),
        deadlines,
    }
}

fn run_deadlines(
    registration_date: &str,
    foreign: bool,
    today: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    let registration = parse_date(registration_date).context("Invalid registration date")?;
    let report = deadline_report(compute_deadlines_from_date(registration, foreign, today));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Registered: {} | As of: {}", registration, today);
            println!("---");
            print_deadlines(&report);
        }
    }

    Ok(())
}

fn print_deadlines(report: &DeadlineReport) {
    for deadline in report.deadlines.iter() {
        let explanation = explain_deadline(deadline);
        println!(
            "\n{} ({}): {} [{} / {}]",
            deadline.kind,
            deadline.date,
            explanation.summary,
            deadline.status(),
            deadline.urgency_level()
        );
        println!("   {}", explanation.detail);
    }

    println!("\n---");
    println!("{}", report.summary);
    println!("Next action: {}", report.advice.next_action);
    for action in &report.advice.recommended_actions {
        println!("   - {}", action);
    }
}

fn run_reminders(
    registration_date: &str,
    foreign: bool,
    policy: &ReminderPolicy,
    today: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    let registration = parse_date(registration_date).context("Invalid registration date")?;
    let deadlines = compute_deadlines_from_date(registration, foreign, today);

    let Some(next) = deadlines.next_major_deadline else {
        println!("No upcoming deadlines.");
        return Ok(());
    };

    let schedule: ReminderSchedule = policy.build(&next);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&schedule)?),
        OutputFormat::Text => {
            println!(
                "Reminders for {} due {} ({} days remaining)",
                next.kind, next.date, next.days_remaining
            );
            println!("---");
            if schedule.is_empty() {
                println!("No reminders left to send.");
            }
            for reminder in &schedule.reminders {
                println!(
                    "{}  ({} days before)",
                    reminder.trigger_date, reminder.days_before
                );
            }
        }
    }

    Ok(())
}

fn print_estimate(estimate: &RenewalCostEstimate, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(estimate)?),
        OutputFormat::Text => {
            for note in &estimate.notes {
                println!("{}", note);
            }
            println!("---");
            println!("Total: ${}", estimate.total_estimate);
        }
    }
    Ok(())
}

fn run_record(
    path: &Path,
    schedule: &FeeSchedule,
    today: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record {}", path.display()))?;
    let record: TrademarkRecord = serde_json::from_str(&text)
        .with_context(|| format!("Invalid trademark record {}", path.display()))?;

    let report = deadline_report(deadlines_for_record(&record, today));
    let is_overdue = report
        .deadlines
        .next_major_deadline
        .is_some_and(|d| d.is_overdue());
    let estimate = schedule.estimate(
        record.class_count(),
        RenewalType::Combined,
        record.is_foreign_based,
        is_overdue,
    );

    match format {
        OutputFormat::Json => {
            let out = RecordReport {
                record: &record,
                report,
                estimate,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!(
                "{} (Serial: {}) | As of: {}",
                record.mark_text, record.serial_number, today
            );
            println!("   Status: {:?}", record.status);
            if !record.classes.is_empty() {
                println!("   Classes: {:?}", record.classes);
            }
            println!("---");
            print_deadlines(&report);
            println!("\nCombined filing estimate:");
            print_estimate(&estimate, format)?;
        }
    }

    Ok(())
}
