//! Engine configuration with environment overrides.
//!
//! | Variable             | Field                | Default |
//! |----------------------|----------------------|---------|
//! | `CHESS_TT_MB`        | `tt_size_mb`         | 16      |
//! | `CHESS_MOVE_TIME_MS` | `move_time_ms`       | 5000    |
//! | `CHESS_MAX_DEPTH`    | `max_depth`          | 64      |
//! | `CHESS_QS_PLY`       | `quiescence_max_ply` | 8       |
//!
//! Absent or unparseable values fall back to the default.

use crate::search::iterative_deepening::SearchConfig;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub tt_size_mb: usize,
    pub move_time_ms: u64,
    pub max_depth: u8,
    pub quiescence_max_ply: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tt_size_mb: 16,
            move_time_ms: 5000,
            max_depth: 64,
            quiescence_max_ply: 8,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            tt_size_mb: parse_or(&lookup, "CHESS_TT_MB", defaults.tt_size_mb),
            move_time_ms: parse_or(&lookup, "CHESS_MOVE_TIME_MS", defaults.move_time_ms),
            max_depth: parse_or(&lookup, "CHESS_MAX_DEPTH", defaults.max_depth),
            quiescence_max_ply: parse_or(&lookup, "CHESS_QS_PLY", defaults.quiescence_max_ply),
        }
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.max_depth,
            movetime_ms: Some(self.move_time_ms),
            max_nodes: None,
            quiescence_max_ply: self.quiescence_max_ply,
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup(name)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
