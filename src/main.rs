use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use dsa_tracker::{Config, Tracker, calendar, codec, ui};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dsa-tracker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard (default)
    Status {
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every day of the plan
    Plan,
    /// Record problems solved for a day
    Solve {
        /// Day number
        day: u32,
        /// Problems solved so far that day
        count: String,
    },
    /// Mark a day complete
    Complete {
        /// Day number
        day: u32,
    },
    /// Mark a day not complete
    Reopen {
        /// Day number
        day: u32,
    },
    /// Choose day 1 of the challenge
    Start {
        /// Start date as YYYY-MM-DD in IST; defaults to today
        date: Option<String>,
    },
    /// Export progress to a JSON file
    Export {
        /// Output path; defaults to dsa-progress-<date>.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace progress with an exported JSON file
    Import {
        /// Path to the export file
        path: PathBuf,
    },
    /// Delete all progress and the start date
    Reset,
    /// Interactive dashboard that refreshes at midnight IST
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dsa_tracker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let mut tracker = Tracker::open(&config)?;
    let now = Utc::now();

    match cli.command.unwrap_or(Commands::Status { json: false }) {
        Commands::Status { json } => {
            let stats = tracker.statistics(now);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", ui::render_dashboard(&stats, tracker.plan()));
            }
        }
        Commands::Plan => {
            let stats = tracker.statistics(now);
            print!(
                "{}",
                ui::render_plan(
                    tracker.plan(),
                    &tracker.state().progress,
                    stats.current_day,
                    ui::DEFAULT_WIDTH,
                )
            );
        }
        Commands::Solve { day, count } => {
            let count = dsa_tracker::progress::parse_problem_count(&count);
            let progress = tracker.set_problems_solved(day, count, now)?;
            println!("{}", ui::describe_update(day, &progress));
        }
        Commands::Complete { day } => {
            let progress = tracker.set_completed(day, true, now)?;
            println!("{}", ui::describe_update(day, &progress));
        }
        Commands::Reopen { day } => {
            let progress = tracker.set_completed(day, false, now)?;
            println!("{}", ui::describe_update(day, &progress));
        }
        Commands::Start { date } => {
            let day = match date {
                Some(key) => calendar::parse_date_key(&key)
                    .with_context(|| format!("Invalid date {key:?}, expected YYYY-MM-DD"))?,
                None => calendar::civil_date(now),
            };
            tracker.set_start_date(calendar::start_of_civil_day(day))?;
            println!("Challenge starts on {day}");
        }
        Commands::Export { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(codec::export_file_name(now)));
            tracker.export_to(&path, now)?;
            println!("Exported progress to {}", path.display());
        }
        Commands::Import { path } => {
            tracker.import_from(&path)?;
            println!(
                "Imported {} from {}",
                ui::plural(tracker.state().progress.len() as u32, "day"),
                path.display(),
            );
        }
        Commands::Reset => {
            tracker.reset()?;
            println!("Progress cleared");
        }
        Commands::Watch => {
            dsa_tracker::app::session::run(tracker).await?;
        }
    }

    Ok(())
}
