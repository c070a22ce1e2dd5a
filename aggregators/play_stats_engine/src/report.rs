use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::accumulator::PlayerStatLine;
use crate::error::{Result, StatsError};
use crate::leaderboard::{LeaderboardPlayer, TournamentAggregation};
use crate::utils::sanitize_for_filename;

pub const LEADERBOARD_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Points,
    PassCompletions,
    PassTouchdowns,
    ReceptionsTotal,
    ReceptionTouchdowns,
    Tackles,
    Interceptions,
    Sacks,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Points,
        Metric::PassCompletions,
        Metric::PassTouchdowns,
        Metric::ReceptionsTotal,
        Metric::ReceptionTouchdowns,
        Metric::Tackles,
        Metric::Interceptions,
        Metric::Sacks,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::Points => "points",
            Metric::PassCompletions => "pass_completions",
            Metric::PassTouchdowns => "pass_touchdowns",
            Metric::ReceptionsTotal => "receptions_total",
            Metric::ReceptionTouchdowns => "reception_touchdowns",
            Metric::Tackles => "tackles",
            Metric::Interceptions => "interceptions",
            Metric::Sacks => "sacks",
        }
    }

    pub fn value(self, line: &PlayerStatLine) -> u32 {
        match self {
            Metric::Points => line.points,
            Metric::PassCompletions => line.passing.completions,
            Metric::PassTouchdowns => line.passing.touchdowns,
            Metric::ReceptionsTotal => line.receptions.total,
            Metric::ReceptionTouchdowns => line.receptions.touchdowns,
            Metric::Tackles => line.defense.tackles,
            Metric::Interceptions => line.defense.interceptions,
            Metric::Sacks => line.defense.sacks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub position: usize,
    pub name: String,
    pub number: String,
    pub team: String,
    pub document_id: String,
    pub value: u32,
}

/// Players with a positive value for `metric`, best first, at most `limit`.
/// Ties are broken by player id, ascending.
pub fn rank(players: &[LeaderboardPlayer], metric: Metric, limit: usize) -> Vec<RankedEntry> {
    let mut candidates: Vec<(&LeaderboardPlayer, u32)> = players
        .iter()
        .map(|p| (p, metric.value(&p.stats)))
        .filter(|(_, value)| *value > 0)
        .collect();

    candidates.sort_by(|(a, a_value), (b, b_value)| {
        b_value.cmp(a_value).then_with(|| a.stats.id.cmp(&b.stats.id))
    });

    candidates
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (player, value))| RankedEntry {
            position: i + 1,
            name: player.identity.name.clone(),
            number: player.identity.number.clone(),
            team: player.identity.team.clone(),
            document_id: player.identity.document_id.clone(),
            value,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rankings {
    pub points: Vec<RankedEntry>,
    pub pass_completions: Vec<RankedEntry>,
    pub pass_touchdowns: Vec<RankedEntry>,
    pub receptions_total: Vec<RankedEntry>,
    pub reception_touchdowns: Vec<RankedEntry>,
    pub tackles: Vec<RankedEntry>,
    pub interceptions: Vec<RankedEntry>,
    pub sacks: Vec<RankedEntry>,
}

impl Rankings {
    pub fn build(players: &[LeaderboardPlayer]) -> Self {
        let top = |metric| rank(players, metric, LEADERBOARD_SIZE);
        Self {
            points: top(Metric::Points),
            pass_completions: top(Metric::PassCompletions),
            pass_touchdowns: top(Metric::PassTouchdowns),
            receptions_total: top(Metric::ReceptionsTotal),
            reception_touchdowns: top(Metric::ReceptionTouchdowns),
            tackles: top(Metric::Tackles),
            interceptions: top(Metric::Interceptions),
            sacks: top(Metric::Sacks),
        }
    }

    pub fn get(&self, metric: Metric) -> &[RankedEntry] {
        match metric {
            Metric::Points => &self.points,
            Metric::PassCompletions => &self.pass_completions,
            Metric::PassTouchdowns => &self.pass_touchdowns,
            Metric::ReceptionsTotal => &self.receptions_total,
            Metric::ReceptionTouchdowns => &self.reception_touchdowns,
            Metric::Tackles => &self.tackles,
            Metric::Interceptions => &self.interceptions,
            Metric::Sacks => &self.sacks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub tournament_id: String,
    pub categoria: String,
    pub generated_at: DateTime<Utc>,
    pub total_players: usize,
}

/// The JSON report artifact: metadata plus top-N rankings per metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub rankings: Rankings,
}

impl Report {
    pub fn build(aggregation: &TournamentAggregation, generated_at: DateTime<Utc>) -> Self {
        Self {
            metadata: ReportMetadata {
                tournament_id: aggregation.tournament_id.clone(),
                categoria: aggregation.categoria.clone(),
                generated_at,
                total_players: aggregation.players.len(),
            },
            rankings: Rankings::build(&aggregation.players),
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "leaderboard_{}_{}_{}.json",
            sanitize_for_filename(&self.metadata.tournament_id),
            sanitize_for_filename(&self.metadata.categoria),
            self.metadata.generated_at.format("%Y%m%dT%H%M%SZ")
        )
    }

    /// Writes the report into `dir` under a timestamped name.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| StatsError::io(dir, e))?;
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| StatsError::io(&path, e))?;
        info!("Wrote report to {:?}", path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::ResolvedIdentity;
    use crate::metrics::AggregationMetrics;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn player(id: &str, points: u32, tackles: u32) -> LeaderboardPlayer {
        let mut stats = PlayerStatLine::new(id);
        stats.points = points;
        stats.defense.tackles = tackles;
        LeaderboardPlayer {
            identity: ResolvedIdentity {
                name: format!("Player {}", id),
                number: "N/A".to_string(),
                team: "N/A".to_string(),
                document_id: "N/A".to_string(),
            },
            stats,
        }
    }

    fn aggregation(players: Vec<LeaderboardPlayer>) -> TournamentAggregation {
        TournamentAggregation {
            tournament_id: "t1".to_string(),
            categoria: "varonil".to_string(),
            players,
            diagnostics: Vec::new(),
            metrics: AggregationMetrics::default(),
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 4, 18, 30, 0).unwrap()
    }

    #[test]
    fn test_rank_filters_sorts_and_positions() {
        let players = vec![player("a", 6, 0), player("b", 0, 3), player("c", 12, 1), player("d", 7, 0)];
        let ranked = rank(&players, Metric::Points, LEADERBOARD_SIZE);

        let summary: Vec<_> = ranked.iter().map(|r| (r.position, r.name.as_str(), r.value)).collect();
        assert_eq!(
            summary,
            vec![(1, "Player c", 12), (2, "Player d", 7), (3, "Player a", 6)]
        );
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let players: Vec<_> = (0..40).map(|i| player(&format!("p{:02}", i), i + 1, 0)).collect();
        let ranked = rank(&players, Metric::Points, LEADERBOARD_SIZE);
        assert_eq!(ranked.len(), 15);
        assert_eq!(ranked[0].value, 40);
        assert_eq!(ranked[14].value, 26);
        assert!(ranked.windows(2).all(|w| w[0].value >= w[1].value));
        assert!(ranked.iter().all(|r| r.value > 0));
    }

    #[test]
    fn test_rank_ties_break_on_player_id() {
        let players = vec![player("zed", 6, 0), player("amy", 6, 0), player("kim", 6, 0)];
        let names: Vec<_> = rank(&players, Metric::Points, LEADERBOARD_SIZE)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Player amy", "Player kim", "Player zed"]);
    }

    #[test]
    fn test_empty_report_shape() {
        let report = Report::build(&aggregation(Vec::new()), generated_at());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["metadata"]["tournamentId"], "t1");
        assert_eq!(json["metadata"]["categoria"], "varonil");
        assert_eq!(json["metadata"]["generatedAt"], "2024-05-04T18:30:00Z");
        assert_eq!(json["metadata"]["totalPlayers"], 0);
        for metric in Metric::ALL {
            assert_eq!(json["rankings"][metric.key()], serde_json::json!([]));
        }
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let report = Report::build(&aggregation(vec![player("a", 6, 2)]), generated_at());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["rankings"]["tackles"][0],
            serde_json::json!({
                "position": 1,
                "name": "Player a",
                "number": "N/A",
                "team": "N/A",
                "documentId": "N/A",
                "value": 2
            })
        );
        assert_eq!(report.rankings.get(Metric::Sacks).len(), 0);
        assert_eq!(report.metadata.total_players, 1);
    }

    #[test]
    fn test_write_to_uses_timestamped_name() {
        let dir = tempdir().unwrap();
        let mut aggregation = aggregation(vec![player("a", 6, 0)]);
        aggregation.categoria = "sub 17".to_string();
        let report = Report::build(&aggregation, generated_at());

        let path = report.write_to(&dir.path().join("reports")).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "leaderboard_t1_sub_17_20240504T183000Z.json"
        );
        let written: Report = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, report);
    }
}
