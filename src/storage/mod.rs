//! Read-only dataset storage.
//!
//! The data directory holds the two tables exported upstream:
//! - `matches.jsonl`: one bout per line
//! - `rankings.jsonl`: one final placement per line

pub mod jsonl;

use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::{MatchRecord, RankingRecord, RecordId};
use jsonl::JsonlReader;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
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

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join("matches.jsonl")
    }

    pub fn rankings_path(&self) -> PathBuf {
        self.data_dir.join("rankings.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// The immutable match and ranking tables.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub matches: Vec<MatchRecord>,
    pub rankings: Vec<RankingRecord>,
}

impl Dataset {
    /// Build a dataset. Every match row is kept: the same pair can meet twice
    /// on one day under the same phase label. A fencer places once per
    /// competition, so repeated placement rows are dropped.
    pub fn new(matches: Vec<MatchRecord>, rankings: Vec<RankingRecord>) -> Self {
        Self {
            matches,
            rankings: dedup_by_id(rankings, RankingRecord::id),
        }
    }

    /// Load both tables from the data directory.
    pub fn load(config: &StorageConfig) -> Result<Self, StorageError> {
        if !config.data_dir.exists() {
            return Err(StorageError::PathNotFound(config.data_dir.clone()));
        }

        let matches = JsonlReader::new(config.matches_path()).read_all()?;
        let rankings = JsonlReader::new(config.rankings_path()).read_all()?;
        let dataset = Self::new(matches, rankings);

        info!(
            "Loaded {} matches and {} rankings from {:?}",
            dataset.matches.len(),
            dataset.rankings.len(),
            config.data_dir
        );
        Ok(dataset)
    }

    pub fn has_fencer(&self, name: &str) -> bool {
        self.matches.iter().any(|m| m.involves(name))
            || self.rankings.iter().any(|r| r.fencer == name)
    }
}

fn dedup_by_id<T>(rows: Vec<T>, id: impl Fn(&T) -> RecordId) -> Vec<T> {
    let before = rows.len();
    let mut seen = HashSet::new();
    let kept: Vec<T> = rows
        .into_iter()
        .filter(|row| seen.insert(id(row).as_str().to_string()))
        .collect();

    if kept.len() < before {
        warn!("Dropped {} duplicate placement rows", before - kept.len());
    }
    kept
}
