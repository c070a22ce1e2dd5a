use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

use crate::accumulator::MatchSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationMetrics {
    pub matches_found: usize,
    pub matches_empty: usize,
    pub plays_ingested: usize,
    pub plays_skipped: usize,
    pub diagnostics: usize,
    pub players_merged: usize,
    pub elapsed_ms: u64,
}

impl AggregationMetrics {
    pub fn matches_aggregated(&self) -> usize {
        self.matches_found - self.matches_empty
    }

    pub fn record_match(&mut self, snapshot: &MatchSnapshot) {
        self.plays_ingested += snapshot.plays_ingested;
        self.plays_skipped += snapshot.plays_skipped();
        self.diagnostics += snapshot.diagnostics.len();
    }

    pub fn log_summary(&self) {
        info!(
            "Aggregated {}/{} matches ({} empty), {} plays ingested, {} skipped, {} diagnostics, {} players in {} ms",
            self.matches_aggregated(),
            self.matches_found,
            self.matches_empty,
            self.plays_ingested,
            self.plays_skipped,
            self.diagnostics,
            self.players_merged,
            self.elapsed_ms
        );
    }
}

/// Wall-clock timer for a run.
pub struct RunTimer {
    start_time: Instant,
}

impl RunTimer {
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn finish(self, metrics: &mut AggregationMetrics) {
        metrics.elapsed_ms = self.elapsed().as_millis() as u64;
    }
}
