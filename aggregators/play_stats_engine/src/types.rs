use serde::{Deserialize, Serialize};
use std::fmt;

pub type PlayerId = String;

/// Reference to one of the two teams of a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
}

impl TeamRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Local,
    Visitor,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Local => Side::Visitor,
            Side::Visitor => Side::Local,
        }
    }
}

/// Closed set of recorded play types.
///
/// Tags outside the set, and absent or null tags, are kept as `Unrecognized`
/// so a single bad record decodes and gets diagnosed instead of failing the
/// whole match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum PlayType {
    PassComplete,
    PassIncomplete,
    Run,
    Interception,
    Sack,
    Tackle,
    Touchdown,
    Conversion1Pt,
    Conversion2Pt,
    Safety,
    Unrecognized(String),
}

impl PlayType {
    pub fn as_str(&self) -> &str {
        match self {
            PlayType::PassComplete => "pass_complete",
            PlayType::PassIncomplete => "pass_incomplete",
            PlayType::Run => "run",
            PlayType::Interception => "interception",
            PlayType::Sack => "sack",
            PlayType::Tackle => "tackle",
            PlayType::Touchdown => "touchdown",
            PlayType::Conversion1Pt => "conversion_1pt",
            PlayType::Conversion2Pt => "conversion_2pt",
            PlayType::Safety => "safety",
            PlayType::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for PlayType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "pass_complete" => PlayType::PassComplete,
            "pass_incomplete" => PlayType::PassIncomplete,
            "run" => PlayType::Run,
            "interception" => PlayType::Interception,
            "sack" => PlayType::Sack,
            "tackle" => PlayType::Tackle,
            "touchdown" => PlayType::Touchdown,
            "conversion_1pt" => PlayType::Conversion1Pt,
            "conversion_2pt" => PlayType::Conversion2Pt,
            "safety" => PlayType::Safety,
            _ => PlayType::Unrecognized(tag),
        }
    }
}

impl From<Option<String>> for PlayType {
    fn from(tag: Option<String>) -> Self {
        tag.map(PlayType::from).unwrap_or_default()
    }
}

impl Default for PlayType {
    fn default() -> Self {
        PlayType::Unrecognized(String::new())
    }
}

impl From<PlayType> for String {
    fn from(play_type: PlayType) -> Self {
        play_type.as_str().to_string()
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Outcome {
    pub is_touchdown: bool,
    pub points: i32,
    pub is_interception: bool,
    pub is_sack: bool,
}

/// Informational only; never used in aggregation math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GameClock {
    pub period: u8,
    pub minute: u8,
    pub second: u8,
}

/// One recorded event within a match's play log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub sequence_number: i64,
    #[serde(default)]
    pub play_type: PlayType,
    #[serde(default)]
    pub possessing_team: Option<String>,
    #[serde(default)]
    pub primary_player: Option<PlayerId>,
    #[serde(default)]
    pub secondary_player: Option<PlayerId>,
    #[serde(default)]
    pub touchdown_player: Option<PlayerId>,
    #[serde(default)]
    pub outcome: Outcome,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub game_clock: GameClock,
}

impl Play {
    pub fn new(sequence_number: i64, play_type: PlayType, possessing_team: &str) -> Self {
        Self {
            sequence_number,
            play_type,
            possessing_team: Some(possessing_team.to_string()),
            primary_player: None,
            secondary_player: None,
            touchdown_player: None,
            outcome: Outcome::default(),
            description: String::new(),
            game_clock: GameClock::default(),
        }
    }

    pub fn with_primary(mut self, player: &str) -> Self {
        self.primary_player = Some(player.to_string());
        self
    }

    pub fn with_secondary(mut self, player: &str) -> Self {
        self.secondary_player = Some(player.to_string());
        self
    }

    pub fn with_touchdown_player(mut self, player: &str) -> Self {
        self.touchdown_player = Some(player.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Marks the play as a touchdown worth 6 points.
    pub fn scoring_touchdown(mut self) -> Self {
        self.outcome.is_touchdown = true;
        self.outcome.points = 6;
        self
    }

    pub fn with_points(mut self, points: i32) -> Self {
        self.outcome.points = points;
        self
    }
}

/// A match as handed over by the match store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub local_team: TeamRef,
    pub visitor_team: TeamRef,
    pub torneo: String,
    pub categoria: String,
    #[serde(default)]
    pub plays: Vec<Play>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub team: TeamRef,
    #[serde(default)]
    pub number: Option<u32>,
}

/// Player identity as held by the player directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

impl PlayerIdentity {
    /// Roster entry for `team_id`, falling back to the first listed team.
    pub fn roster_entry_for(&self, team_id: Option<&str>) -> Option<&RosterEntry> {
        team_id
            .and_then(|id| self.roster.iter().find(|entry| entry.team.id == id))
            .or_else(|| self.roster.first())
    }
}
