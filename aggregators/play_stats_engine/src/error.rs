use std::path::PathBuf;

/// Infrastructure failures. Any of these aborts a report run.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Match store error: {0}")]
    MatchStore(String),
    #[error("Player directory error: {0}")]
    PlayerDirectory(String),
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Progress bar template error: {0}")]
    Progress(#[from] indicatif::style::TemplateError),
}

impl StatsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StatsError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
