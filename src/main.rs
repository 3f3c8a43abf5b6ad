use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

mod db;
mod error;
mod gap;
mod metrics;
mod models;
mod report;
mod score;
mod tiers;
mod window;

use models::ScoringInput;
use report::PeriodRecord;

#[derive(Parser)]
#[command(name = "chapter-scorecard")]
#[command(about = "Member performance scoring and next-tier gap reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Score one member for a period and list what the next tiers need
    Report {
        #[arg(long)]
        email: String,
        /// Any day inside the target month; defaults to the latest record
        #[arg(long)]
        period: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score every month of the last six for one member
    History {
        #[arg(long)]
        email: String,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score a JSON scoring input without a database
    Evaluate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect().await?;
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Report {
            email,
            period,
            format,
            out,
        } => {
            let pool = connect().await?;
            let member = db::fetch_member_by_email(&pool, &email)
                .await?
                .with_context(|| format!("no member with email {email}"))?;
            let records = db::fetch_performance_records(&pool, member.id).await?;
            let record = report::select_record(&records, period).cloned();

            let training_count = match record
                .as_ref()
                .and_then(|record| metrics::normalize_date(record.targeted_date.as_deref()))
            {
                Some(target_date) => {
                    let (start, end) = window::training_window(target_date);
                    db::count_training_events(&pool, member.id, start, end).await?
                }
                None => 0,
            };

            log::info!(
                "scoring {} with {} stored records, {training_count} trainings",
                member.email,
                records.len()
            );
            let input = ScoringInput {
                member,
                record,
                training_count,
            };
            let report = report::build_report(&input, today);
            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&report)?,
                Format::Markdown => report::render_markdown(&report),
            };
            emit(&rendered, out.as_deref())?;
        }
        Commands::History { email, format, out } => {
            let pool = connect().await?;
            let member = db::fetch_member_by_email(&pool, &email)
                .await?
                .with_context(|| format!("no member with email {email}"))?;
            let records = db::fetch_performance_records(&pool, member.id).await?;

            let mut periods = Vec::new();
            for (target_date, record) in report::history_candidates(&records, today) {
                let (start, end) = window::training_window(target_date);
                let training_count = db::count_training_events(&pool, member.id, start, end).await?;
                periods.push(PeriodRecord {
                    record: record.clone(),
                    training_count,
                });
            }

            log::info!("building history for {} from {} months", member.email, periods.len());
            let history = report::build_history(&member, &periods, today);
            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&history)?,
                Format::Markdown => report::render_history_markdown(&history),
            };
            emit(&rendered, out.as_deref())?;
        }
        Commands::Evaluate { input, format, out } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("failed reading {}", input.display()))?;
            let scoring_input: ScoringInput = serde_json::from_str(&raw)
                .with_context(|| format!("failed parsing {}", input.display()))?;

            let report = report::build_report(&scoring_input, today);
            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&report)?,
                Format::Markdown => report::render_markdown(&report),
            };
            emit(&rendered, out.as_deref())?;
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

fn emit(rendered: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed writing {}", path.display()))?;
            println!("Report written to {}.", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
