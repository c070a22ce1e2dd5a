use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, StatsError};
use crate::types::{MatchRecord, PlayerIdentity};

/// Read-only source of recorded matches.
pub trait MatchStore: Sync {
    /// All matches of a tournament within one category.
    fn matches_for(&self, tournament_id: &str, categoria: &str) -> Result<Vec<MatchRecord>>;

    fn find_match(&self, match_id: &str) -> Result<Option<MatchRecord>>;
}

pub trait PlayerDirectory: Sync {
    /// `Ok(None)` when the directory has no entry for the id.
    fn lookup_player(&self, player_id: &str) -> Result<Option<PlayerIdentity>>;
}

fn in_filter(record: &MatchRecord, tournament_id: &str, categoria: &str) -> bool {
    record.torneo == tournament_id && record.categoria == categoria
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMatchStore {
    matches: Vec<MatchRecord>,
}

impl InMemoryMatchStore {
    pub fn new(matches: Vec<MatchRecord>) -> Self {
        Self { matches }
    }
}

impl MatchStore for InMemoryMatchStore {
    fn matches_for(&self, tournament_id: &str, categoria: &str) -> Result<Vec<MatchRecord>> {
        Ok(self
            .matches
            .iter()
            .filter(|m| in_filter(m, tournament_id, categoria))
            .cloned()
            .collect())
    }

    fn find_match(&self, match_id: &str) -> Result<Option<MatchRecord>> {
        Ok(self.matches.iter().find(|m| m.id == match_id).cloned())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPlayerDirectory {
    players: HashMap<String, PlayerIdentity>,
}

impl InMemoryPlayerDirectory {
    pub fn new(players: Vec<PlayerIdentity>) -> Self {
        Self {
            players: players.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }
}

impl PlayerDirectory for InMemoryPlayerDirectory {
    fn lookup_player(&self, player_id: &str) -> Result<Option<PlayerIdentity>> {
        Ok(self.players.get(player_id).cloned())
    }
}

/// A file holds either a single match object or an array of them. Decoded
/// element by element so field errors keep their message.
fn parse_matches(value: Value) -> serde_json::Result<Vec<MatchRecord>> {
    match value {
        Value::Array(items) => items.into_iter().map(serde_json::from_value).collect(),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| StatsError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Match store backed by a directory of `*.json` match files.
#[derive(Debug, Clone)]
pub struct JsonMatchStore {
    dir: PathBuf,
}

impl JsonMatchStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load_all(&self) -> Result<Vec<MatchRecord>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            StatsError::MatchStore(format!("cannot read match directory {:?}: {}", self.dir, e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StatsError::io(&self.dir, e))?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                files.push(path);
            }
        }
        // Directory order is platform dependent.
        files.sort();

        let mut matches = Vec::new();
        for path in files {
            let records = read_json::<Value>(&path)
                .and_then(|value| parse_matches(value).map_err(StatsError::from))
                .map_err(|e| StatsError::MatchStore(format!("failed to load {:?}: {}", path, e)))?;
            matches.extend(records);
            debug!("Loaded match file {:?}", path);
        }

        info!("Loaded {} matches from {:?}", matches.len(), self.dir);
        Ok(matches)
    }
}

impl MatchStore for JsonMatchStore {
    fn matches_for(&self, tournament_id: &str, categoria: &str) -> Result<Vec<MatchRecord>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|m| in_filter(m, tournament_id, categoria))
            .collect())
    }

    fn find_match(&self, match_id: &str) -> Result<Option<MatchRecord>> {
        Ok(self.load_all()?.into_iter().find(|m| m.id == match_id))
    }
}

/// Player directory loaded once from a JSON array of identities.
#[derive(Debug, Clone)]
pub struct JsonPlayerDirectory {
    inner: InMemoryPlayerDirectory,
}

impl JsonPlayerDirectory {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let players: Vec<PlayerIdentity> = read_json(path).map_err(|e| {
            StatsError::PlayerDirectory(format!("failed to load {:?}: {}", path, e))
        })?;
        info!("Loaded {} player identities from {:?}", players.len(), path);
        Ok(Self {
            inner: InMemoryPlayerDirectory::new(players),
        })
    }
}

impl PlayerDirectory for JsonPlayerDirectory {
    fn lookup_player(&self, player_id: &str) -> Result<Option<PlayerIdentity>> {
        self.inner.lookup_player(player_id)
    }
}
