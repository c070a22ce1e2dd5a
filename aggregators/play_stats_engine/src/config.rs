use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    pub matches_dir: PathBuf,
    pub players_file: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            matches_dir: PathBuf::from("data/matches"),
            players_file: PathBuf::from("data/players.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    pub report_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("reports"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessingConfig {
    pub worker_threads: usize,
    pub show_progress: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsConfig {
    pub sources: SourceConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl StatsConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("STATS_MATCHES_DIR") {
            config.sources.matches_dir = PathBuf::from(dir);
        }
        if let Ok(file) = env::var("STATS_PLAYERS_FILE") {
            config.sources.players_file = PathBuf::from(file);
        }
        if let Ok(dir) = env::var("STATS_OUTPUT_DIR") {
            config.output.report_dir = PathBuf::from(dir);
        }
        if let Some(threads) = env::var("STATS_WORKER_THREADS")
            .ok()
            .and_then(|t| t.parse::<usize>().ok())
            .filter(|t| *t > 0)
        {
            config.processing.worker_threads = threads;
        }
        if let Some(show) = env::var("STATS_SHOW_PROGRESS").ok().as_deref().and_then(parse_bool) {
            config.processing.show_progress = show;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "STATS_MATCHES_DIR",
        "STATS_PLAYERS_FILE",
        "STATS_OUTPUT_DIR",
        "STATS_WORKER_THREADS",
        "STATS_SHOW_PROGRESS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        clear_env();
        let config = StatsConfig::from_env();
        assert_eq!(config, StatsConfig::default());
        assert_eq!(config.sources.matches_dir, PathBuf::from("data/matches"));
        assert!(config.processing.worker_threads >= 1);
        assert!(config.processing.show_progress);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("STATS_MATCHES_DIR", "/tmp/matches");
        env::set_var("STATS_OUTPUT_DIR", "/tmp/out");
        env::set_var("STATS_WORKER_THREADS", "3");
        env::set_var("STATS_SHOW_PROGRESS", "off");

        let config = StatsConfig::from_env();
        clear_env();

        assert_eq!(config.sources.matches_dir, PathBuf::from("/tmp/matches"));
        assert_eq!(config.sources.players_file, PathBuf::from("data/players.json"));
        assert_eq!(config.output.report_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.processing.worker_threads, 3);
        assert!(!config.processing.show_progress);
    }

    #[test]
    #[serial]
    fn test_bad_values_keep_defaults() {
        clear_env();
        env::set_var("STATS_WORKER_THREADS", "lots");
        env::set_var("STATS_SHOW_PROGRESS", "maybe");

        let config = StatsConfig::from_env();
        clear_env();

        assert_eq!(config.processing, ProcessingConfig::default());
    }
}
