use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use academy_graduation::config::Settings;
use academy_graduation::models::{Student, Track};
use academy_graduation::snapshot::{write_json, Snapshot};
use academy_graduation::{eligibility, promotion, report};

#[derive(Parser)]
#[command(name = "academy-graduation")]
#[command(about = "Belt graduation eligibility and promotion for academy students", long_about = None)]
struct Cli {
    /// Directory holding belts, students and attendance tables
    #[arg(long, global = true, env = "ACADEMY_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    as_of: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List belt ranks in promotion order
    Ledger {
        #[arg(long, value_parser = parse_track)]
        track: Option<Track>,
    },
    /// Explain whether one student can be promoted
    Check {
        #[arg(long)]
        student: Uuid,
    },
    /// List eligible students grouped by target belt
    Eligible {
        #[arg(long)]
        academy: Option<Uuid>,
    },
    /// Generate a markdown graduation review
    Report {
        #[arg(long)]
        academy: Option<Uuid>,
        #[arg(long, default_value = "graduation-report.md")]
        out: PathBuf,
    },
    /// Emit the promoted student record as JSON
    Promote {
        #[arg(long)]
        student: Uuid,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Emit the student record with one more stripe as JSON
    Stripe {
        #[arg(long)]
        student: Uuid,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn parse_track(raw: &str) -> Result<Track, String> {
    match raw.to_ascii_lowercase().as_str() {
        "adult" => Ok(Track::Adult),
        "kids" => Ok(Track::Kids),
        other => Err(format!("unknown track `{other}` (expected adult or kids)")),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "academy_graduation=info".into());
    let log_format =
        std::env::var("GRADUATION_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.data_dir, cli.as_of.as_deref())?;
    let snapshot = Snapshot::load(&settings.data_dir)
        .with_context(|| format!("failed to load snapshot from {}", settings.data_dir.display()))?;

    match cli.command {
        Commands::Ledger { track } => {
            for belt in snapshot.ledger.sorted_by_rank(track) {
                println!(
                    "{:>4}  {:<6} {} (id {})",
                    belt.rank, belt.track, belt.name, belt.id
                );
            }
        }
        Commands::Check { student } => {
            let student = require_student(&snapshot, student)?;
            let verdict = eligibility::evaluate(
                student,
                &snapshot.ledger,
                &snapshot.attendance,
                settings.as_of,
            );
            let target = verdict
                .next_belt
                .as_ref()
                .map(|belt| format!("{} ({})", belt.name, belt.track))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{}: {} -> {}",
                student.display_name(),
                if verdict.eligible { "eligible" } else { "not eligible" },
                target
            );
            println!("{}", verdict.reason);
        }
        Commands::Eligible { academy } => {
            let students = scoped_students(&snapshot, academy);
            let groups = report::group_eligible_by_target_rank(
                &students,
                &snapshot.ledger,
                &snapshot.attendance,
                settings.as_of,
            );

            if groups.is_empty() {
                println!("No students are ready for their next belt.");
                return Ok(());
            }

            for (belt_name, entries) in &groups {
                println!("{belt_name}:");
                for entry in entries {
                    println!(
                        "- {} ({}): {}",
                        entry.student.display_name(),
                        entry.current_belt.name,
                        entry.reason
                    );
                }
            }
        }
        Commands::Report { academy, out } => {
            let students = scoped_students(&snapshot, academy);
            let groups = report::group_eligible_by_target_rank(
                &students,
                &snapshot.ledger,
                &snapshot.attendance,
                settings.as_of,
            );
            let academy_label = academy.map(|id| id.to_string());
            let rendered = report::build_report(
                academy_label.as_deref(),
                settings.as_of,
                &groups,
                students.len(),
            );
            std::fs::write(&out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Promote { student, out } => {
            let student = require_student(&snapshot, student)?;
            let verdict = eligibility::evaluate(
                student,
                &snapshot.ledger,
                &snapshot.attendance,
                settings.as_of,
            );
            let promoted = promotion::apply_promotion(student, &verdict, settings.as_of)
                .inspect_err(|err| tracing::error!(student_id = %student.id, error = %err, "promotion refused"))?;
            write_json(&promoted, out.as_deref())?;
        }
        Commands::Stripe { student, out } => {
            let student = require_student(&snapshot, student)?;
            let updated = promotion::award_stripe(student)?;
            write_json(&updated, out.as_deref())?;
        }
    }

    Ok(())
}

fn require_student(snapshot: &Snapshot, id: Uuid) -> anyhow::Result<&Student> {
    snapshot
        .find_student(id)
        .with_context(|| format!("student {id} not found in snapshot"))
}

fn scoped_students(snapshot: &Snapshot, academy: Option<Uuid>) -> Vec<Student> {
    snapshot
        .students
        .iter()
        .filter(|student| academy.map_or(true, |id| student.academy_id == id))
        .cloned()
        .collect()
}

