use serde::Serialize;
use std::fmt;

use crate::accumulator::{MatchSnapshot, PlayerStatLine, TeamSnapshot};
use crate::utils::NOT_AVAILABLE;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub local: String,
    pub visitor: String,
}

/// Side-by-side view of one match's team totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchComparison {
    pub match_id: String,
    pub local_team: String,
    pub visitor_team: String,
    pub rows: Vec<ComparisonRow>,
    pub players: Vec<PlayerStatLine>,
}

fn team_rows(local: &TeamSnapshot, visitor: &TeamSnapshot) -> Vec<ComparisonRow> {
    let counters: [(&'static str, fn(&TeamSnapshot) -> u32); 12] = [
        ("Points", |t| t.stats.points),
        ("Pass attempts", |t| t.stats.passing.attempts),
        ("Pass completions", |t| t.stats.passing.completions),
        ("Pass touchdowns", |t| t.stats.passing.touchdowns),
        ("Run attempts", |t| t.stats.rushing.attempts),
        ("Run touchdowns", |t| t.stats.rushing.touchdowns),
        ("Tackles", |t| t.stats.defense.tackles),
        ("Interceptions", |t| t.stats.defense.interceptions),
        ("Sacks", |t| t.stats.defense.sacks),
        ("1pt conversions", |t| t.stats.conversions.one_point),
        ("2pt conversions", |t| t.stats.conversions.two_point),
        ("Safeties", |t| t.stats.safeties),
    ];

    let mut rows: Vec<ComparisonRow> = counters
        .into_iter()
        .map(|(label, get)| ComparisonRow {
            label,
            local: get(local).to_string(),
            visitor: get(visitor).to_string(),
        })
        .collect();
    rows.insert(
        4,
        ComparisonRow {
            label: "Completion %",
            local: format!("{:.1}", local.completion_percentage),
            visitor: format!("{:.1}", visitor.completion_percentage),
        },
    );
    rows
}

impl MatchComparison {
    pub fn from_snapshot(snapshot: &MatchSnapshot) -> Self {
        Self {
            match_id: snapshot.match_id.clone(),
            local_team: snapshot.local.team.name.clone(),
            visitor_team: snapshot.visitor.team.name.clone(),
            rows: team_rows(&snapshot.local, &snapshot.visitor),
            players: snapshot.players.values().cloned().collect(),
        }
    }

    pub fn row(&self, label: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

impl fmt::Display for MatchComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Match {}", self.match_id)?;
        writeln!(f, "{:<18} {:>14} {:>14}", "", self.local_team, self.visitor_team)?;
        for row in &self.rows {
            writeln!(f, "{:<18} {:>14} {:>14}", row.label, row.local, row.visitor)?;
        }

        if !self.players.is_empty() {
            writeln!(f)?;
            writeln!(f, "{:<12} {:<14} {:>4} {:>7} {:>6} {:>5} {:>4} {:>4} {:>4} {:>4}",
                "Player", "Team", "Pts", "Comp", "Pct", "PTD", "Rec", "Tkl", "Int", "Sck")?;
            for p in &self.players {
                writeln!(
                    f,
                    "{:<12} {:<14} {:>4} {:>7} {:>6.1} {:>5} {:>4} {:>4} {:>4} {:>4}",
                    p.id,
                    p.team.as_ref().map(|t| t.name.as_str()).unwrap_or(NOT_AVAILABLE),
                    p.points,
                    format!("{}/{}", p.passing.completions, p.passing.attempts),
                    p.completion_percentage(),
                    p.passing.touchdowns,
                    p.receptions.total,
                    p.defense.tackles,
                    p.defense.interceptions,
                    p.defense.sacks
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::aggregate_plays;
    use crate::types::{Play, PlayType, TeamRef};

    fn snapshot() -> MatchSnapshot {
        aggregate_plays(
            "m1",
            &TeamRef::new("loc", "Lobos"),
            &TeamRef::new("vis", "Halcones"),
            &[
                Play::new(1, PlayType::PassComplete, "loc").with_primary("qb").with_secondary("wr"),
                Play::new(2, PlayType::PassIncomplete, "loc").with_primary("qb"),
                Play::new(3, PlayType::Safety, "loc"),
            ],
        )
    }

    #[test]
    fn test_rows_put_teams_side_by_side() {
        let comparison = MatchComparison::from_snapshot(&snapshot());
        assert_eq!(comparison.local_team, "Lobos");
        assert_eq!(comparison.visitor_team, "Halcones");

        let points = comparison.row("Points").unwrap();
        assert_eq!((points.local.as_str(), points.visitor.as_str()), ("0", "2"));
        let completion = comparison.row("Completion %").unwrap();
        assert_eq!(completion.local, "50.0");
        assert_eq!(completion.visitor, "0.0");
        assert_eq!(comparison.rows.len(), 13);
        assert_eq!(comparison.players.len(), 2);
    }

    #[test]
    fn test_display_lists_players() {
        let text = MatchComparison::from_snapshot(&snapshot()).to_string();
        assert!(text.starts_with("Match m1\n"));
        assert!(text.contains("Safeties"));
        assert!(text.contains("1/2"));
        let qb_row = text.lines().find(|l| l.starts_with("qb ")).unwrap();
        assert!(qb_row.contains("50.0"), "{}", qb_row);
    }
}
