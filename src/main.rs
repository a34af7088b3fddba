//! Gauntlet CLI: seed round 1, evaluate submissions, dispatch round 2.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gauntlet::config::Config;
use gauntlet::payload::TaskTemplate;
use gauntlet::roster::{RosterSource, SqliteRoster, SubmissionList};
use gauntlet::round::{advance_all, select_advancing, Dispatcher};
use gauntlet::verify::Evaluator;

#[derive(Parser)]
#[command(name = "gauntlet", about = "Multi-round coding-challenge dispatcher and verifier")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Post the round-1 task to every row of the submission file.
    Round1,
    /// Check every roster entry's license and published page.
    Evaluate,
    /// Evaluate, select the advancing participants, and post the round-2 task.
    Round2,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let cli = Cli::parse();

    match cli.command {
        Command::Round1 => round1(&config).await,
        Command::Evaluate => evaluate(&config).await,
        Command::Round2 => round2(&config).await,
    }
}

async fn round1(config: &Config) -> anyhow::Result<()> {
    let entries = SubmissionList::new(&config.submission_csv)
        .load()
        .await
        .with_context(|| {
            format!(
                "failed to read submission list {}",
                config.submission_csv.display()
            )
        })?;
    tracing::info!(count = entries.len(), "dispatching round 1");

    let results = Dispatcher::new(config)
        .dispatch(entries, TaskTemplate::SalesSummary)
        .await;

    let delivered = results.iter().filter(|(_, o)| o.succeeded).count();
    tracing::info!(delivered, total = results.len(), "round 1 dispatch complete");
    Ok(())
}

async fn evaluate(config: &Config) -> anyhow::Result<()> {
    let roster = SqliteRoster::open(&config.db_path)
        .with_context(|| format!("failed to open roster {}", config.db_path.display()))?;
    let entries = roster.load().await.context("failed to load roster")?;
    tracing::info!(count = entries.len(), "evaluating roster");

    let verdicts = Evaluator::new().evaluate_roster(&entries).await;

    let passed = verdicts
        .iter()
        .filter(|v| v.license.pass && v.page.pass)
        .count();
    tracing::info!(passed, total = verdicts.len(), "evaluation complete");
    Ok(())
}

async fn round2(config: &Config) -> anyhow::Result<()> {
    let roster = SqliteRoster::open(&config.db_path)
        .with_context(|| format!("failed to open roster {}", config.db_path.display()))?;
    let entries = roster.load().await.context("failed to load roster")?;

    let verdicts = Evaluator::new().evaluate_roster(&entries).await;
    let survivors = select_advancing(entries, &verdicts, advance_all);
    tracing::info!(count = survivors.len(), "dispatching round 2");

    let results = Dispatcher::new(config)
        .dispatch(survivors, TaskTemplate::ResultsChart)
        .await;

    for (entry, outcome) in &results {
        if outcome.succeeded {
            if let Err(e) = roster.record_round(&entry.participant_id, 2).await {
                tracing::warn!(participant = %entry.participant_id, error = %e, "failed to record round");
            }
        }
    }

    let delivered = results.iter().filter(|(_, o)| o.succeeded).count();
    tracing::info!(delivered, total = results.len(), "round 2 dispatch complete");
    Ok(())
}
