//! JSONL (JSON Lines) reader.
//!
//! The upstream export writes one JSON object per line. The dataset is
//! read-only here, so there is no writer.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::StorageError;

/// Typed reader over one JSONL file.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every parsable line.
    ///
    /// A missing file reads as empty. Blank lines are skipped; lines that
    /// fail to parse are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.exists() {
            debug!("No file at {:?}, reading as empty", self.path);
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entities = Vec::new();
        let mut skipped = 0usize;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    skipped += 1;
                    warn!("Failed to parse line {} in {:?}: {}", i + 1, self.path, e);
                }
            }
        }

        debug!(
            "Read {} entities from {:?} ({} skipped)",
            entities.len(),
            self.path,
            skipped
        );
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchRecord;
    use std::fs;
    use tempfile::TempDir;

    const ALICE_BEA: &str = r#"{"date":"2023-11-04","season":2024,"competition":"CN Paris","competition_type":"CN","category":"U20 H","phase":"Poule 1","fencer_a":"Alice","fencer_b":"Bea","touches_a":5,"touches_b":3,"winner":"Alice"}"#;

    #[test]
    fn test_read_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("matches.jsonl");
        fs::write(&path, format!("{}\n\n{}\n", ALICE_BEA, ALICE_BEA)).unwrap();

        let reader: JsonlReader<MatchRecord> = JsonlReader::new(path);
        let records = reader.read_all().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fencer_a, "Alice");
        assert_eq!(records[0].touches_b, Some(3));
        assert_eq!(records[0].winner.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_bad_lines_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("matches.jsonl");
        fs::write(&path, format!("not json\n{}\n{{\"date\":1}}\n", ALICE_BEA)).unwrap();

        let reader: JsonlReader<MatchRecord> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<MatchRecord> =
            JsonlReader::new(temp_dir.path().join("nonexistent.jsonl"));

        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }
}
