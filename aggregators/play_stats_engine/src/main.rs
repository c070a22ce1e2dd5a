use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use play_stats_engine::{
    config::StatsConfig,
    leaderboard::LeaderboardAggregator,
    report::Report,
    store::{JsonMatchStore, JsonPlayerDirectory},
    utils::non_empty_arg,
};

/// Builds the top-15 player leaderboards of a tournament category.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tournament identifier
    #[arg(value_parser = non_empty_arg)]
    tournament_id: String,

    /// Category to rank within the tournament
    #[arg(value_parser = non_empty_arg)]
    categoria: String,
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = StatsConfig::from_env();

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.processing.worker_threads)
        .build_global()
        .context("Failed to start worker pool")?;

    let store = JsonMatchStore::new(&config.sources.matches_dir);
    let directory = JsonPlayerDirectory::open(&config.sources.players_file)
        .context("Failed to load player directory")?;

    let aggregation = LeaderboardAggregator::new(&store, &directory)
        .with_progress(config.processing.show_progress)
        .aggregate(&cli.tournament_id, &cli.categoria)
        .with_context(|| {
            format!(
                "Failed to aggregate tournament {} / {}",
                cli.tournament_id, cli.categoria
            )
        })?;

    for diagnostic in &aggregation.diagnostics {
        warn!("{}", diagnostic);
    }
    aggregation.metrics.log_summary();

    let report = Report::build(&aggregation, Utc::now());
    let path = report
        .write_to(&config.output.report_dir)
        .context("Failed to write report")?;

    info!(
        "Report for {} players written to {:?}",
        report.metadata.total_players, path
    );
    println!("{}", path.display());

    Ok(())
}
