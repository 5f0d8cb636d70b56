//! Local round and award store.
//!
//! Stands in for the remote data store the application talks to:
//! - `rounds.jsonl`: every submitted round, derived fields included
//! - `awards.jsonl`: every granted badge and trophy

mod jsonl;

pub use jsonl::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Award, PlayerId, Round};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn rounds_path(&self) -> PathBuf {
        self.data_dir.join("rounds.jsonl")
    }

    pub fn awards_path(&self) -> PathBuf {
        self.data_dir.join("awards.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Flat round and award collections on disk.
#[derive(Debug, Clone)]
pub struct RoundStore {
    config: StorageConfig,
}

impl RoundStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// All rounds, in stored order.
    pub fn load_rounds(&self) -> Result<Vec<Round>, StorageError> {
        JsonlReader::new(self.config.rounds_path()).read_all()
    }

    /// Replace the round collection in a single write.
    pub fn replace_rounds(&self, rounds: &[Round]) -> Result<usize, StorageError> {
        JsonlWriter::new(self.config.rounds_path()).write_all(rounds)
    }

    pub fn load_awards(&self) -> Result<Vec<Award>, StorageError> {
        JsonlReader::new(self.config.awards_path()).read_all()
    }

    pub fn awards_for_player(&self, player_id: &PlayerId) -> Result<Vec<Award>, StorageError> {
        JsonlReader::<Award>::new(self.config.awards_path())
            .read_where(|a| &a.player_id == player_id)
    }

    /// Append newly granted awards. Awards are never rewritten.
    pub fn append_awards(&self, awards: &[Award]) -> Result<usize, StorageError> {
        let writer = JsonlWriter::new(self.config.awards_path());
        for award in awards {
            writer.append(award)?;
        }
        Ok(awards.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AwardKind, EntityId};
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.rounds_path(), PathBuf::from("/data/rounds.jsonl"));
        assert_eq!(config.awards_path(), PathBuf::from("/data/awards.jsonl"));
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_round_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = RoundStore::new(StorageConfig::new(temp_dir.path().to_path_buf()));
        assert!(store.load_rounds().unwrap().is_empty());

        let mut round = Round::new(EntityId::from("p1"), None, None, Some("Links".into()), 18)
            .with_score(79, 72);
        round.rank = Some(1);
        round.points = 10;

        store.replace_rounds(&[round.clone()]).unwrap();
        assert_eq!(store.load_rounds().unwrap(), vec![round]);
    }

    #[test]
    fn test_awards_are_appended_and_filtered_by_player() {
        let temp_dir = TempDir::new().unwrap();
        let store = RoundStore::new(StorageConfig::new(temp_dir.path().to_path_buf()));
        let now = Utc::now();

        store
            .append_awards(&[
                Award::new(AwardKind::Break90, EntityId::from("p1"), EntityId::from("r1"), now),
                Award::new(AwardKind::FirstRound, EntityId::from("p2"), EntityId::from("r2"), now),
            ])
            .unwrap();
        store
            .append_awards(&[Award::new(
                AwardKind::MajorDay,
                EntityId::from("p1"),
                EntityId::from("r3"),
                now,
            )])
            .unwrap();

        assert_eq!(store.load_awards().unwrap().len(), 3);
        let mine = store.awards_for_player(&EntityId::from("p1")).unwrap();
        let keys: Vec<_> = mine.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["break_90", "major_day"]);
    }
}
