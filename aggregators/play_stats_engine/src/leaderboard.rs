use indicatif::{ParallelProgressIterator, ProgressStyle};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::accumulator::{aggregate_match, MatchSnapshot, PlayerStatLine};
use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::metrics::{AggregationMetrics, RunTimer};
use crate::store::{MatchStore, PlayerDirectory};
use crate::types::{MatchRecord, PlayerId, PlayerIdentity};
use crate::utils::or_placeholder;

/// Display identity of a ranked player; missing values are "N/A".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub name: String,
    pub number: String,
    pub team: String,
    pub document_id: String,
}

impl ResolvedIdentity {
    pub fn resolve(line: &PlayerStatLine, identity: Option<&PlayerIdentity>) -> Self {
        let team_id = line.team.as_ref().map(|t| t.id.as_str());
        let roster = identity.and_then(|p| p.roster_entry_for(team_id));

        let name = identity.map(|p| p.name.as_str()).or(line.name.as_deref());
        let number = roster.and_then(|r| r.number).or(line.number).map(|n| n.to_string());
        let team = roster
            .map(|r| r.team.name.as_str())
            .or(line.team.as_ref().map(|t| t.name.as_str()));
        let document_id = identity.and_then(|p| p.document_id.as_deref());

        Self {
            name: or_placeholder(name),
            number: or_placeholder(number.as_deref()),
            team: or_placeholder(team),
            document_id: or_placeholder(document_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardPlayer {
    pub identity: ResolvedIdentity,
    pub stats: PlayerStatLine,
}

#[derive(Debug, Clone)]
pub struct TournamentAggregation {
    pub tournament_id: String,
    pub categoria: String,
    /// Ordered by player id.
    pub players: Vec<LeaderboardPlayer>,
    pub diagnostics: Vec<Diagnostic>,
    pub metrics: AggregationMetrics,
}

/// Directory lookups made once per player id for a run.
struct IdentityCache<'a> {
    directory: &'a dyn PlayerDirectory,
    resolved: HashMap<PlayerId, Option<PlayerIdentity>>,
}

impl<'a> IdentityCache<'a> {
    fn new(directory: &'a dyn PlayerDirectory) -> Self {
        Self {
            directory,
            resolved: HashMap::new(),
        }
    }

    fn get(&mut self, player_id: &str) -> Result<Option<&PlayerIdentity>> {
        if !self.resolved.contains_key(player_id) {
            let identity = self.directory.lookup_player(player_id)?;
            if identity.is_none() {
                debug!("No directory entry for player {}", player_id);
            }
            self.resolved.insert(player_id.to_string(), identity);
        }
        Ok(self.resolved.get(player_id).and_then(|p| p.as_ref()))
    }
}

/// Sums player lines by player id. Blank lines are dropped.
pub fn merge_snapshots(snapshots: &[MatchSnapshot]) -> BTreeMap<PlayerId, PlayerStatLine> {
    let mut merged: BTreeMap<PlayerId, PlayerStatLine> = BTreeMap::new();
    for snapshot in snapshots {
        for (player_id, line) in &snapshot.players {
            if line.is_blank() {
                continue;
            }
            merged
                .entry(player_id.clone())
                .and_modify(|total| total.merge(line))
                .or_insert_with(|| line.clone());
        }
    }
    merged
}

/// Merges per-match player lines across a tournament category.
pub struct LeaderboardAggregator<'a> {
    store: &'a dyn MatchStore,
    directory: &'a dyn PlayerDirectory,
    show_progress: bool,
}

impl<'a> LeaderboardAggregator<'a> {
    pub fn new(store: &'a dyn MatchStore, directory: &'a dyn PlayerDirectory) -> Self {
        Self {
            store,
            directory,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn aggregate(&self, tournament_id: &str, categoria: &str) -> Result<TournamentAggregation> {
        let timer = RunTimer::start();
        let matches = self.store.matches_for(tournament_id, categoria)?;
        info!(
            "Found {} matches for tournament {} / {}",
            matches.len(),
            tournament_id,
            categoria
        );

        let playable: Vec<&MatchRecord> = matches.iter().filter(|m| !m.plays.is_empty()).collect();
        let mut metrics = AggregationMetrics {
            matches_found: matches.len(),
            matches_empty: matches.len() - playable.len(),
            ..Default::default()
        };

        let snapshots = self.accumulate_all(&playable)?;
        for snapshot in &snapshots {
            metrics.record_match(snapshot);
        }
        let diagnostics: Vec<Diagnostic> = snapshots
            .iter()
            .flat_map(|s| s.diagnostics.iter().cloned())
            .collect();

        let merged = merge_snapshots(&snapshots);
        let mut cache = IdentityCache::new(self.directory);
        let mut players = Vec::with_capacity(merged.len());
        for (player_id, stats) in merged {
            let identity = ResolvedIdentity::resolve(&stats, cache.get(&player_id)?);
            players.push(LeaderboardPlayer { identity, stats });
        }

        metrics.players_merged = players.len();
        timer.finish(&mut metrics);

        Ok(TournamentAggregation {
            tournament_id: tournament_id.to_string(),
            categoria: categoria.to_string(),
            players,
            diagnostics,
            metrics,
        })
    }

    /// One independent fold per match, fanned out over the rayon pool.
    fn accumulate_all(&self, matches: &[&MatchRecord]) -> Result<Vec<MatchSnapshot>> {
        if !self.show_progress {
            return Ok(matches.par_iter().map(|m| aggregate_match(m)).collect());
        }

        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} matches aggregated ({eta})")?;
        Ok(matches
            .par_iter()
            .progress_with_style(style)
            .map(|m| aggregate_match(m))
            .collect())
    }
}
