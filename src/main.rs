use crate::batch::BatchRunner;
use crate::db::connection::{init_db, Database};
use crate::db::runs::get_recent_runs;
use crate::gemini::GeminiClient;
use crate::processor::ResponseProcessor;
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod batch;
mod config;
mod db;
mod domain;
mod errors;
mod gemini;
mod processor;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "listing_rewriter")]
#[command(about = "Rewrites property listings with Gemini and stores summaries and reviews")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Extra TOML config layered over config/default.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides database.path)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Show verbose debug output")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite listings in id order, one transaction per listing
    Rewrite {
        /// Property ID to start processing from
        #[arg(long, default_value_t = 0)]
        start_from: i64,

        /// Number of properties fetched per batch
        #[arg(long, default_value_t = 10)]
        batch_size: usize,
    },
    /// Show recent rewrite runs
    Runs {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    let db_path = cli.database.clone().unwrap_or_else(|| cfg.database.path.clone());

    let mut db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    init_db(&mut db).context("Database initialization failed")?;

    match cli.command {
        Commands::Rewrite {
            start_from,
            batch_size,
        } => {
            let api_key = cfg.gemini.require_api_key()?;

            let client = GeminiClient::new(
                api_key,
                &cfg.gemini.model,
                &cfg.gemini.base_url,
                cfg.gemini.timeout(),
            )
            .context("Failed to build Gemini client")?;
            info!(endpoint = %client.endpoint(), model = %cfg.gemini.model, "Gemini client ready");

            let processor = ResponseProcessor::new(&client, cfg.retry.policy());
            info!(policy = ?processor.policy(), "Retry policy");

            println!(
                "Starting property rewrite process from ID {start_from} with batch size {batch_size}..."
            );

            let report = BatchRunner::new(&mut db, processor)
                .run(start_from, batch_size)
                .context("Rewrite run aborted")?;

            println!("\n{report}");
        }
        Commands::Runs { limit } => {
            let runs = db.with_conn(|conn| get_recent_runs(conn, limit))?;

            if runs.is_empty() {
                println!("No rewrite runs recorded.");
            }
            for run in runs {
                let started = Utc
                    .timestamp_opt(run.started_at, 0)
                    .single()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| run.started_at.to_string());
                let status = match (run.finished_at, run.success) {
                    (None, _) => "running/aborted".to_string(),
                    (Some(_), true) => "ok".to_string(),
                    (Some(_), false) => format!(
                        "failed: {}",
                        run.error_message.as_deref().unwrap_or("unknown error")
                    ),
                };

                println!(
                    "#{} started {} from id {} (batch {}): processed {}, errors {} [{}]",
                    run.id,
                    started,
                    run.start_from,
                    run.batch_size,
                    run.processed.unwrap_or(0),
                    run.failed.unwrap_or(0),
                    status
                );
            }
        }
    }

    Ok(())
}
