use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use play_stats_engine::{
    accumulator::aggregate_match,
    comparison::MatchComparison,
    config::StatsConfig,
    store::{JsonMatchStore, MatchStore},
    utils::non_empty_arg,
};

/// Prints local vs visitor totals for a single match.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Match identifier
    #[arg(value_parser = non_empty_arg)]
    match_id: String,

    /// Print the comparison as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = StatsConfig::from_env();
    let store = JsonMatchStore::new(&config.sources.matches_dir);

    let record = store
        .find_match(&cli.match_id)
        .context("Failed to load matches")?
        .ok_or_else(|| anyhow::anyhow!("Match {} not found", cli.match_id))?;

    let snapshot = aggregate_match(&record);
    for diagnostic in &snapshot.diagnostics {
        warn!("{}", diagnostic);
    }

    let comparison = MatchComparison::from_snapshot(&snapshot);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        print!("{}", comparison);
    }

    Ok(())
}
