//! Best-score records per player
//!
//! One entry per player name, kept sorted by score (highest first). The host
//! owns where the JSON lives; `load`/`save` are plain file helpers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RecordsError;
use crate::sim::Rank;

/// A single player's best run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub score: u64,
    /// Rank reached by the best score
    pub rank: Rank,
}

/// Result of submitting a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Whether the score replaced (or created) the player's record
    pub is_new_record: bool,
    /// Best score before this submission
    pub previous_best: Option<u64>,
    /// 1-based leaderboard position after the submission
    pub position: usize,
}

/// Leaderboard of personal bests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecords {
    entries: Vec<PlayerRecord>,
}

impl PlayerRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run; only a higher score replaces a player's best
    pub fn submit(&mut self, name: &str, score: u64) -> Result<SubmitOutcome, RecordsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RecordsError::EmptyName);
        }
        if score == 0 {
            return Err(RecordsError::ZeroScore);
        }

        let previous_best = self.best_for(name);
        let is_new_record = previous_best.is_none_or(|best| score > best);
        if is_new_record {
            let record = PlayerRecord {
                name: name.to_string(),
                score,
                rank: Rank::from_score(score),
            };
            match self.entries.iter_mut().find(|e| e.name == name) {
                Some(existing) => *existing = record,
                None => self.entries.push(record),
            }
            self.sort();
            log::info!("New record for {}: {}", name, score);
        }

        let position = self.position_of(name).unwrap_or(self.entries.len());
        Ok(SubmitOutcome {
            is_new_record,
            previous_best,
            position,
        })
    }

    /// Best score for a player, if any
    pub fn best_for(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.name == name.trim())
            .map(|e| e.score)
    }

    /// 1-based leaderboard position of a player
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name.trim())
            .map(|i| i + 1)
    }

    /// All records, highest score first
    pub fn entries(&self) -> &[PlayerRecord] {
        &self.entries
    }

    /// The first `n` records
    pub fn top(&self, n: usize) -> &[PlayerRecord] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Stable sort: ties keep submission order
    fn sort(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
    }

    pub fn to_json(&self) -> Result<String, RecordsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordsError> {
        let mut records: PlayerRecords = serde_json::from_str(json)?;
        records.sort();
        Ok(records)
    }

    /// Load from a JSON file; a missing file yields an empty leaderboard
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordsError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let records = Self::from_json(&json)?;
                log::info!("Loaded {} records from {}", records.len(), path.display());
                Ok(records)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No records at {}, starting fresh", path.display());
                Ok(Self::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Records saved ({} entries) to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_submission_is_new_record() {
        let mut records = PlayerRecords::new();
        let outcome = records.submit("ann", 500).unwrap();
        assert!(outcome.is_new_record);
        assert_eq!(outcome.previous_best, None);
        assert_eq!(outcome.position, 1);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let mut records = PlayerRecords::new();
        records.submit("ann", 500).unwrap();
        let outcome = records.submit("ann", 300).unwrap();
        assert!(!outcome.is_new_record);
        assert_eq!(outcome.previous_best, Some(500));
        assert_eq!(records.best_for("ann"), Some(500));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_higher_score_replaces_and_reorders() {
        let mut records = PlayerRecords::new();
        records.submit("ann", 500).unwrap();
        records.submit("bob", 800).unwrap();
        assert_eq!(records.position_of("ann"), Some(2));

        let outcome = records.submit("ann", 1600).unwrap();
        assert!(outcome.is_new_record);
        assert_eq!(outcome.position, 1);
        assert_eq!(records.entries()[0].rank, Rank::Approve);
        assert_eq!(records.top(1)[0].name, "ann");
        assert_eq!(records.top(10).len(), 2);
    }

    #[test]
    fn test_rejects_invalid_submissions() {
        let mut records = PlayerRecords::new();
        assert!(matches!(
            records.submit("   ", 100),
            Err(RecordsError::EmptyName)
        ));
        assert!(matches!(
            records.submit("ann", 0),
            Err(RecordsError::ZeroScore)
        ));
        assert!(records.is_empty());
    }

    #[test]
    fn test_from_json_sorts_entries() {
        let json = r#"{"entries":[
            {"name":"a","score":10,"rank":"Sybil"},
            {"name":"b","score":3000,"rank":"Gmpc"}
        ]}"#;
        let records = PlayerRecords::from_json(json).unwrap();
        assert_eq!(records.entries()[0].name, "b");
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "secret_jump_records_{}.json",
            std::process::id()
        ));
        let mut records = PlayerRecords::new();
        records.submit("ann", 7200).unwrap();
        records.save(&path).unwrap();

        let loaded = PlayerRecords::load(&path).unwrap();
        assert_eq!(loaded, records);
        assert_eq!(loaded.entries()[0].rank, Rank::Parasol);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let path = std::env::temp_dir().join("secret_jump_records_missing_0.json");
        let _ = std::fs::remove_file(&path);
        assert!(PlayerRecords::load(&path).unwrap().is_empty());
    }
}
