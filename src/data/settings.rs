//! User settings
//!
//! Stored as RON so they can be hand-edited.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::progression::MAX_RANK;

/// Default rank a player is working toward
pub const DEFAULT_TARGET_RANK: u32 = 2_500;

/// Default rank table location, relative to the working directory
pub const DEFAULT_TABLE_PATH: &str = "rank_table.csv";

/// Persistent preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rank table CSV (`rank,cumulativeExp`)
    pub table_path: PathBuf,
    /// Rank shown in the target readout
    pub target_rank: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            target_rank: DEFAULT_TARGET_RANK,
        }
    }
}

impl Settings {
    /// Replace the target rank, clamped into the table's range
    pub fn with_target_rank(mut self, rank: u32) -> Self {
        self.target_rank = clamp_target_rank(rank);
        self
    }
}

/// Clamp a requested target rank into 1..=MAX_RANK
pub fn clamp_target_rank(rank: u32) -> u32 {
    rank.clamp(1, MAX_RANK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.target_rank, 2500);
        assert_eq!(settings.table_path, PathBuf::from("rank_table.csv"));
    }

    #[test]
    fn test_target_rank_clamped() {
        assert_eq!(clamp_target_rank(0), 1);
        assert_eq!(clamp_target_rank(3000), 3000);
        assert_eq!(clamp_target_rank(50_000), MAX_RANK);
        assert_eq!(Settings::default().with_target_rank(0).target_rank, 1);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let settings: Settings = ron::from_str("(target_rank: 1800)").unwrap();
        assert_eq!(settings.target_rank, 1800);
        assert_eq!(settings.table_path, PathBuf::from(DEFAULT_TABLE_PATH));
    }
}
