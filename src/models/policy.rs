//! Duplicate-round policy.

use serde::{Deserialize, Serialize};

/// Which of a player's rounds count when they post more than one in the same
/// event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Every round is ranked as its own entry.
    #[default]
    KeepAll,

    /// Only the player's lowest gross score is ranked.
    BestPerPlayer,

    /// Only the player's most recently submitted round is ranked.
    LatestPerPlayer,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::KeepAll => write!(f, "keep_all"),
            DuplicatePolicy::BestPerPlayer => write!(f, "best_per_player"),
            DuplicatePolicy::LatestPerPlayer => write!(f, "latest_per_player"),
        }
    }
}
