pub mod accumulator;
pub mod attribution;
pub mod comparison;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod leaderboard;
pub mod metrics;
pub mod report;
pub mod store;
pub mod types;
pub mod utils;

pub use error::{Result, StatsError};
