use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::attribution::{resolve, Category, Credit};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::types::{MatchRecord, Play, PlayerId, Side, TeamRef};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassingLine {
    pub attempts: u32,
    pub completions: u32,
    pub touchdowns: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RushingLine {
    pub attempts: u32,
    pub touchdowns: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DefenseLine {
    pub tackles: u32,
    pub interceptions: u32,
    pub sacks: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionLine {
    pub one_point: u32,
    pub two_point: u32,
}

/// Per-match totals for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamStatLine {
    pub passing: PassingLine,
    pub rushing: RushingLine,
    pub defense: DefenseLine,
    pub conversions: ConversionLine,
    pub safeties: u32,
    pub points: u32,
}

impl TeamStatLine {
    fn apply(&mut self, category: Category, delta: u32) {
        match category {
            Category::PassAttempt => self.passing.attempts += delta,
            Category::PassCompletion => self.passing.completions += delta,
            Category::PassTouchdown => self.passing.touchdowns += delta,
            Category::RunAttempt => self.rushing.attempts += delta,
            Category::RunTouchdown => self.rushing.touchdowns += delta,
            Category::Interception => self.defense.interceptions += delta,
            Category::Sack => self.defense.sacks += delta,
            Category::Tackle => self.defense.tackles += delta,
            Category::ConversionOnePoint => self.conversions.one_point += delta,
            Category::ConversionTwoPoint => self.conversions.two_point += delta,
            Category::Safety => self.safeties += delta,
            Category::Points => self.points += delta,
            Category::Reception | Category::ReceptionTouchdown | Category::ConversionCatch => {}
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReceivingLine {
    pub total: u32,
    pub touchdowns: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerConversionLine {
    pub thrown: u32,
    pub caught: u32,
}

/// Totals for one player, scoped to a match or merged across matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStatLine {
    pub id: PlayerId,
    pub name: Option<String>,
    pub number: Option<u32>,
    /// Team of the earliest play (by sequence number) that credited the player.
    pub team: Option<TeamRef>,
    pub points: u32,
    pub passing: PassingLine,
    pub receptions: ReceivingLine,
    pub defense: DefenseLine,
    pub conversions: PlayerConversionLine,
}

impl PlayerStatLine {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            number: None,
            team: None,
            points: 0,
            passing: PassingLine::default(),
            receptions: ReceivingLine::default(),
            defense: DefenseLine::default(),
            conversions: PlayerConversionLine::default(),
        }
    }

    /// Whether a credit of this category lands on a player counter.
    pub fn tracks(category: Category) -> bool {
        !matches!(
            category,
            Category::RunAttempt | Category::RunTouchdown | Category::Safety
        )
    }

    fn apply(&mut self, category: Category, delta: u32) {
        match category {
            Category::PassAttempt => self.passing.attempts += delta,
            Category::PassCompletion => self.passing.completions += delta,
            Category::PassTouchdown => self.passing.touchdowns += delta,
            Category::Reception => self.receptions.total += delta,
            Category::ReceptionTouchdown => self.receptions.touchdowns += delta,
            Category::Interception => self.defense.interceptions += delta,
            Category::Sack => self.defense.sacks += delta,
            Category::Tackle => self.defense.tackles += delta,
            Category::ConversionOnePoint | Category::ConversionTwoPoint => self.conversions.thrown += delta,
            Category::ConversionCatch => self.conversions.caught += delta,
            Category::Points => self.points += delta,
            Category::RunAttempt | Category::RunTouchdown | Category::Safety => {}
        }
    }

    /// Adds every counter of `other`. Identity fields are only filled in
    /// where this line has none.
    pub fn merge(&mut self, other: &PlayerStatLine) {
        self.points += other.points;
        self.passing.attempts += other.passing.attempts;
        self.passing.completions += other.passing.completions;
        self.passing.touchdowns += other.passing.touchdowns;
        self.receptions.total += other.receptions.total;
        self.receptions.touchdowns += other.receptions.touchdowns;
        self.defense.tackles += other.defense.tackles;
        self.defense.interceptions += other.defense.interceptions;
        self.defense.sacks += other.defense.sacks;
        self.conversions.thrown += other.conversions.thrown;
        self.conversions.caught += other.conversions.caught;

        if self.name.is_none() {
            self.name = other.name.clone();
        }
        if self.number.is_none() {
            self.number = other.number;
        }
        if self.team.is_none() {
            self.team = other.team.clone();
        }
    }

    pub fn is_blank(&self) -> bool {
        self.points == 0
            && self.passing == PassingLine::default()
            && self.receptions == ReceivingLine::default()
            && self.defense == DefenseLine::default()
            && self.conversions == PlayerConversionLine::default()
    }

    pub fn completion_percentage(&self) -> f64 {
        completion_percentage(&self.passing)
    }
}

/// Completions over attempts as a percentage, 0 when nothing was thrown.
pub fn completion_percentage(passing: &PassingLine) -> f64 {
    if passing.attempts == 0 {
        0.0
    } else {
        passing.completions as f64 * 100.0 / passing.attempts as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSnapshot {
    pub team: TeamRef,
    pub stats: TeamStatLine,
    pub completion_percentage: f64,
}

impl TeamSnapshot {
    fn new(team: &TeamRef, stats: TeamStatLine) -> Self {
        Self {
            team: team.clone(),
            stats,
            completion_percentage: completion_percentage(&stats.passing),
        }
    }
}

/// Immutable view of a match's totals.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    pub match_id: String,
    pub local: TeamSnapshot,
    pub visitor: TeamSnapshot,
    pub players: BTreeMap<PlayerId, PlayerStatLine>,
    pub diagnostics: Vec<Diagnostic>,
    pub plays_ingested: usize,
}

impl MatchSnapshot {
    pub fn plays_skipped(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_skip()).count()
    }
}

/// Folds a match's play log into team and player stat lines.
pub struct StatAccumulator {
    local: TeamRef,
    visitor: TeamRef,
    local_line: TeamStatLine,
    visitor_line: TeamStatLine,
    players: BTreeMap<PlayerId, PlayerStatLine>,
    /// Lowest (sequence number, side) each player was credited on.
    team_tags: HashMap<PlayerId, (i64, Side)>,
    seen: HashMap<i64, Vec<Play>>,
    diagnostics: Diagnostics,
    match_id: String,
    plays_ingested: usize,
}

impl StatAccumulator {
    pub fn new(match_id: &str, local: &TeamRef, visitor: &TeamRef) -> Self {
        Self {
            local: local.clone(),
            visitor: visitor.clone(),
            local_line: TeamStatLine::default(),
            visitor_line: TeamStatLine::default(),
            players: BTreeMap::new(),
            team_tags: HashMap::new(),
            seen: HashMap::new(),
            diagnostics: Diagnostics::new(match_id),
            match_id: match_id.to_string(),
            plays_ingested: 0,
        }
    }

    pub fn for_match(record: &MatchRecord) -> Self {
        Self::new(&record.id, &record.local_team, &record.visitor_team)
    }

    pub fn ingest(&mut self, play: &Play) {
        let sequence = play.sequence_number;
        let same_sequence = self.seen.entry(sequence).or_default();
        if same_sequence.contains(play) {
            self.diagnostics.record(sequence, DiagnosticKind::DuplicatePlay);
            return;
        }
        let reused = !same_sequence.is_empty();
        same_sequence.push(play.clone());
        if reused {
            self.diagnostics.record(sequence, DiagnosticKind::SequenceReused);
        }

        let attribution = match resolve(play, &self.local, &self.visitor) {
            Ok(attribution) => attribution,
            Err(reason) => {
                self.diagnostics.record(sequence, DiagnosticKind::Rejected(reason));
                return;
            }
        };

        let derived = attribution.points();
        if play.outcome.points != 0 && i64::from(play.outcome.points) != i64::from(derived) {
            self.diagnostics.record(
                sequence,
                DiagnosticKind::PointsMismatch {
                    recorded: play.outcome.points,
                    derived,
                },
            );
        }

        for credit in attribution.credits {
            self.apply(sequence, credit);
        }
        self.plays_ingested += 1;
    }

    fn team(&self, side: Side) -> &TeamRef {
        match side {
            Side::Local => &self.local,
            Side::Visitor => &self.visitor,
        }
    }

    fn apply(&mut self, sequence: i64, credit: Credit) {
        let line = match credit.side {
            Side::Local => &mut self.local_line,
            Side::Visitor => &mut self.visitor_line,
        };
        line.apply(credit.category, credit.delta);

        let Some(player_id) = credit.player else {
            return;
        };
        if !PlayerStatLine::tracks(credit.category) {
            return;
        }
        let tag = (sequence, credit.side);
        self.team_tags
            .entry(player_id.clone())
            .and_modify(|current| *current = (*current).min(tag))
            .or_insert(tag);
        self.players
            .entry(player_id)
            .or_insert_with_key(|id| PlayerStatLine::new(id))
            .apply(credit.category, credit.delta);
    }

    fn tagged_players(&self) -> BTreeMap<PlayerId, PlayerStatLine> {
        let mut players = self.players.clone();
        for (player_id, (_, side)) in &self.team_tags {
            if let Some(player) = players.get_mut(player_id) {
                player.team = Some(self.team(*side).clone());
            }
        }
        players
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            match_id: self.match_id.clone(),
            local: TeamSnapshot::new(&self.local, self.local_line),
            visitor: TeamSnapshot::new(&self.visitor, self.visitor_line),
            players: self.tagged_players(),
            diagnostics: self.diagnostics.sorted(),
            plays_ingested: self.plays_ingested,
        }
    }
}

/// Pure fold of a play list; no state survives between calls.
pub fn aggregate_plays(match_id: &str, local: &TeamRef, visitor: &TeamRef, plays: &[Play]) -> MatchSnapshot {
    let mut accumulator = StatAccumulator::new(match_id, local, visitor);
    for play in plays {
        accumulator.ingest(play);
    }
    accumulator.snapshot()
}

pub fn aggregate_match(record: &MatchRecord) -> MatchSnapshot {
    aggregate_plays(&record.id, &record.local_team, &record.visitor_team, &record.plays)
}
