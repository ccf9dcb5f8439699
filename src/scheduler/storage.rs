//! Persistence and in-memory store for card scheduling state
//!
//! The whole schedule lives in one JSON document:
//! ```text
//! {
//!   "version": 1,
//!   "cards": {
//!     "card-1": { "easeFactor": 2.6, "intervalDays": 6, ... }
//!   }
//! }
//! ```
//! Files written before the version marker existed hold the bare card
//! map; they load as version 0 and are rewritten in the current format
//! on the next save.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::algorithm::{next_review, ReviewOutcome};
use super::config::SchedulerConfig;
use super::models::{CardRecord, CardStatus, ReviewStats, StateDocument};

/// Current schema version of the state document
pub const STATE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt state: {0}")]
    CorruptState(String),

    #[error("Unknown card: {0}")]
    UnknownCard(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// In-memory store of per-card scheduling records.
///
/// The store is loaded once, mutated in memory, and written back as a
/// whole document. It never touches the clock; every operation that
/// depends on time takes an explicit timestamp.
#[derive(Debug, Clone, Default)]
pub struct CardStateStore {
    cards: BTreeMap<String, CardRecord>,
}

impl CardStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from a state file.
    ///
    /// A missing or empty file yields an empty store. A file that exists
    /// but cannot be parsed is an error; the file is left untouched so
    /// nothing is lost by a failed load.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No state file at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| SchedulerError::CorruptState(format!("{}: {}", path.display(), e)))?;

        let mut cards: BTreeMap<String, CardRecord> = match value.get("version") {
            Some(marker) => {
                let version = marker.as_u64().ok_or_else(|| {
                    SchedulerError::CorruptState("version marker is not an integer".to_string())
                })?;
                if version > STATE_VERSION as u64 {
                    return Err(SchedulerError::CorruptState(format!(
                        "state version {} is newer than supported version {}",
                        version, STATE_VERSION
                    )));
                }
                let document: StateDocument = serde_json::from_value(value)
                    .map_err(|e| SchedulerError::CorruptState(e.to_string()))?;
                document.cards
            }
            None => {
                // Version 0: bare map from card id to record
                let cards = serde_json::from_value(value)
                    .map_err(|e| SchedulerError::CorruptState(e.to_string()))?;
                log::info!(
                    "Upgrading state file {} from version 0",
                    path.display()
                );
                cards
            }
        };

        for (id, record) in cards.iter_mut() {
            if record.due_at.is_some() != record.last_reviewed_at.is_some() {
                return Err(SchedulerError::CorruptState(format!(
                    "card {} has a due date and review date out of sync",
                    id
                )));
            }
            record.id = id.clone();
        }

        log::debug!("Loaded {} card records from {}", cards.len(), path.display());
        Ok(Self { cards })
    }

    /// Save the store atomically (write to .tmp then rename).
    ///
    /// On failure the in-memory store is unchanged and stays usable, so
    /// the caller can retry against another destination.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let document = StateDocument {
            version: STATE_VERSION,
            cards: self.cards.clone(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| SchedulerError::CorruptState(e.to_string()))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;

        log::debug!("Saved {} card records to {}", self.cards.len(), path.display());
        Ok(())
    }

    /// Ensure a record exists for the given card, creating a fresh one if
    /// the card has never been seen. Existing records are left alone.
    pub fn register_card(&mut self, id: &str, config: &SchedulerConfig) -> &CardRecord {
        self.cards
            .entry(id.to_string())
            .or_insert_with(|| CardRecord::new(id, config))
    }

    pub fn get(&self, id: &str) -> Option<&CardRecord> {
        self.cards.get(id)
    }

    /// Iterate all records in card id order
    pub fn records(&self) -> impl Iterator<Item = &CardRecord> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All cards due at the given time, oldest due date first, with
    /// never-reviewed cards ahead of everything. Ties break by card id.
    pub fn due_cards(&self, as_of: DateTime<Utc>) -> Vec<&CardRecord> {
        let mut due: Vec<&CardRecord> = self
            .cards
            .values()
            .filter(|record| record.is_due(as_of))
            .collect();

        due.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.id.cmp(&b.id)));
        due
    }

    /// Apply one graded review to a card and return the updated record.
    ///
    /// The store is only mutated in memory; call [`save`](Self::save) to
    /// persist. Fails with `UnknownCard` if the card has no record yet.
    pub fn record_review(
        &mut self,
        card_id: &str,
        quality: i32,
        reviewed_at: DateTime<Utc>,
        config: &SchedulerConfig,
    ) -> Result<&CardRecord> {
        let record = self
            .cards
            .get_mut(card_id)
            .ok_or_else(|| SchedulerError::UnknownCard(card_id.to_string()))?;

        let ReviewOutcome {
            repetitions,
            interval_days,
            ease_factor,
            due_at,
        } = next_review(record, quality, reviewed_at, config);

        record.repetitions = repetitions;
        record.interval_days = interval_days;
        record.ease_factor = ease_factor;
        record.due_at = Some(due_at);
        record.last_reviewed_at = Some(reviewed_at);

        Ok(record)
    }

    /// Drop all card state. The caller is responsible for confirming the
    /// operation and for persisting the now-empty store.
    pub fn reset(&mut self) {
        self.cards.clear();
    }

    /// Aggregate counts over the store at the given time
    pub fn stats(&self, as_of: DateTime<Utc>) -> ReviewStats {
        let mut stats = ReviewStats::default();
        stats.total_cards = self.cards.len();

        let mut ease_sum = 0.0f32;
        for record in self.cards.values() {
            match record.status() {
                CardStatus::New => stats.new_cards += 1,
                CardStatus::Scheduled => stats.scheduled_cards += 1,
            }
            ease_sum += record.ease_factor;

            if record.is_due(as_of) {
                stats.due_cards += 1;
            } else if let Some(due_at) = record.due_at {
                stats.next_due_at = match stats.next_due_at {
                    Some(next) if next <= due_at => Some(next),
                    _ => Some(due_at),
                };
            }
        }

        if !self.cards.is_empty() {
            stats.average_ease_factor = Some(ease_sum / self.cards.len() as f32);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, d, 0, 0, 0).unwrap()
    }

    fn state_path(temp: &TempDir) -> PathBuf {
        temp.path().join("state.json")
    }

    fn store_with_card(id: &str) -> CardStateStore {
        let mut store = CardStateStore::new();
        store.register_card(id, &SchedulerConfig::default());
        store
    }

    #[test]
    fn test_load_missing_file_gives_empty_store() {
        let temp = TempDir::new().unwrap();
        let store = CardStateStore::load(&state_path(&temp)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_empty_file_gives_empty_store() {
        let temp = TempDir::new().unwrap();
        let path = state_path(&temp);
        fs::write(&path, "").unwrap();

        let store = CardStateStore::load(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_first_review_schedules_one_day_out() {
        let config = SchedulerConfig::default();
        let mut store = store_with_card("card-1");

        let record = store.record_review("card-1", 5, day(1), &config).unwrap();

        assert_eq!(record.repetitions, 1);
        assert_eq!(record.interval_days, 1);
        assert_eq!(record.due_at, Some(day(2)));
        assert_eq!(record.last_reviewed_at, Some(day(1)));
    }

    #[test]
    fn test_second_review_schedules_six_days_out() {
        let config = SchedulerConfig::default();
        let mut store = store_with_card("card-1");

        store.record_review("card-1", 5, day(1), &config).unwrap();
        let record = store.record_review("card-1", 5, day(2), &config).unwrap();

        assert_eq!(record.repetitions, 2);
        assert_eq!(record.interval_days, 6);
        assert_eq!(record.due_at, Some(day(8)));
    }

    #[test]
    fn test_failed_review_resets_to_relearn_interval() {
        let config = SchedulerConfig::default();
        let mut store = store_with_card("card-1");

        store.record_review("card-1", 5, day(1), &config).unwrap();
        store.record_review("card-1", 5, day(2), &config).unwrap();
        let record = store.record_review("card-1", 2, day(8), &config).unwrap();

        assert_eq!(record.repetitions, 0);
        assert_eq!(record.interval_days, 1);
        assert_eq!(record.due_at, Some(day(9)));
        // Two perfect reviews raised the ease to 2.7; the failure costs 0.2
        assert!((record.ease_factor - 2.5).abs() < 1e-3);
        assert!(record.ease_factor >= config.minimum_ease_factor);
    }

    #[test]
    fn test_review_unknown_card_fails() {
        let config = SchedulerConfig::default();
        let mut store = CardStateStore::new();

        let result = store.record_review("missing", 4, day(1), &config);
        assert!(matches!(result, Err(SchedulerError::UnknownCard(id)) if id == "missing"));
    }

    #[test]
    fn test_register_existing_card_keeps_state() {
        let config = SchedulerConfig::default();
        let mut store = store_with_card("card-1");
        store.record_review("card-1", 5, day(1), &config).unwrap();

        store.register_card("card-1", &config);

        let record = store.get("card-1").unwrap();
        assert_eq!(record.repetitions, 1);
        assert_eq!(record.due_at, Some(day(2)));
    }

    #[test]
    fn test_due_cards_sorted_oldest_first() {
        let config = SchedulerConfig::default();
        let mut store = CardStateStore::new();
        for id in ["card-a", "card-b", "card-c"] {
            store.register_card(id, &config);
        }

        // Due on Jan 1, Jan 3 and Jan 2 respectively
        let dec_31 = Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap();
        store.record_review("card-a", 5, dec_31, &config).unwrap();
        store.record_review("card-b", 5, day(2), &config).unwrap();
        store.record_review("card-c", 5, day(1), &config).unwrap();

        let due = store.due_cards(day(5));
        let ids: Vec<&str> = due.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["card-a", "card-c", "card-b"]);
        assert_eq!(due[0].due_at, Some(day(1)));
        assert_eq!(due[1].due_at, Some(day(2)));
        assert_eq!(due[2].due_at, Some(day(3)));
    }

    #[test]
    fn test_never_reviewed_cards_come_first() {
        let config = SchedulerConfig::default();
        let mut store = CardStateStore::new();
        store.register_card("zz-new", &config);
        store.register_card("aa-old", &config);
        store.record_review("aa-old", 5, day(1), &config).unwrap();

        let due = store.due_cards(day(10));
        let ids: Vec<&str> = due.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["zz-new", "aa-old"]);
    }

    #[test]
    fn test_due_cards_excludes_future_cards() {
        let config = SchedulerConfig::default();
        let mut store = store_with_card("card-1");
        store.record_review("card-1", 5, day(1), &config).unwrap();

        // Due on Jan 2, so not due on Jan 1 but due from Jan 2 on
        assert!(store.due_cards(day(1)).is_empty());
        assert_eq!(store.due_cards(day(2)).len(), 1);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = state_path(&temp);
        let config = SchedulerConfig::default();

        let mut store = store_with_card("card-1");
        store.register_card("card-2", &config);
        store.record_review("card-1", 4, day(3), &config).unwrap();
        store.save(&path).unwrap();

        let loaded = CardStateStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);

        let original = store.get("card-1").unwrap();
        let restored = loaded.get("card-1").unwrap();
        assert_eq!(restored.id, "card-1");
        assert_eq!(restored.repetitions, original.repetitions);
        assert_eq!(restored.interval_days, original.interval_days);
        assert_eq!(restored.ease_factor, original.ease_factor);
        assert_eq!(restored.due_at, original.due_at);
        assert_eq!(restored.last_reviewed_at, original.last_reviewed_at);

        let untouched = loaded.get("card-2").unwrap();
        assert_eq!(untouched.due_at, None);
        assert_eq!(untouched.last_reviewed_at, None);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = state_path(&temp);

        store_with_card("card-1").save(&path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_saved_document_carries_version_marker() {
        let temp = TempDir::new().unwrap();
        let path = state_path(&temp);

        store_with_card("card-1").save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["version"], STATE_VERSION);
        assert!(value["cards"]["card-1"].is_object());
        // The id lives in the map key, not in the record
        assert!(value["cards"]["card-1"].get("id").is_none());
    }

    #[test]
    fn test_version_zero_bare_map_still_loads() {
        let temp = TempDir::new().unwrap();
        let path = state_path(&temp);
        fs::write(
            &path,
            r#"{"card-1": {"easeFactor": 2.2, "intervalDays": 6, "repetitions": 2,
                "dueAt": "2026-01-08T00:00:00Z", "lastReviewedAt": "2026-01-02T00:00:00Z"}}"#,
        )
        .unwrap();

        let store = CardStateStore::load(&path).unwrap();
        let record = store.get("card-1").unwrap();
        assert_eq!(record.id, "card-1");
        assert_eq!(record.interval_days, 6);
        assert_eq!(record.due_at, Some(day(8)));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = state_path(&temp);
        fs::write(&path, r#"{"version": 99, "cards": {}}"#).unwrap();

        let result = CardStateStore::load(&path);
        assert!(matches!(result, Err(SchedulerError::CorruptState(_))));
    }

    #[test]
    fn test_malformed_json_is_rejected_and_untouched() {
        let temp = TempDir::new().unwrap();
        let path = state_path(&temp);
        fs::write(&path, "{ this is not json").unwrap();

        let result = CardStateStore::load(&path);
        assert!(matches!(result, Err(SchedulerError::CorruptState(_))));

        // The broken file must survive the failed load
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ this is not json");
    }

    #[test]
    fn test_record_missing_required_field_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = state_path(&temp);
        fs::write(
            &path,
            r#"{"version": 1, "cards": {"card-1": {"intervalDays": 3, "repetitions": 1}}}"#,
        )
        .unwrap();

        let result = CardStateStore::load(&path);
        assert!(matches!(result, Err(SchedulerError::CorruptState(_))));
    }

    #[test]
    fn test_out_of_sync_timestamps_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = state_path(&temp);
        fs::write(
            &path,
            r#"{"version": 1, "cards": {"card-1": {"easeFactor": 2.5, "intervalDays": 1,
                "repetitions": 1, "dueAt": "2026-01-02T00:00:00Z"}}}"#,
        )
        .unwrap();

        let result = CardStateStore::load(&path);
        assert!(matches!(result, Err(SchedulerError::CorruptState(_))));
    }

    #[test]
    fn test_reset_clears_everything() {
        let temp = TempDir::new().unwrap();
        let path = state_path(&temp);
        let config = SchedulerConfig::default();

        let mut store = store_with_card("card-1");
        store.record_review("card-1", 5, day(1), &config).unwrap();
        store.reset();
        assert!(store.is_empty());

        store.save(&path).unwrap();
        let loaded = CardStateStore::load(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_stats_counts_by_status() {
        let config = SchedulerConfig::default();
        let mut store = CardStateStore::new();
        store.register_card("new-1", &config);
        store.register_card("due-1", &config);
        store.register_card("future-1", &config);
        store.record_review("due-1", 5, day(1), &config).unwrap();
        store.record_review("future-1", 5, day(4), &config).unwrap();

        let stats = store.stats(day(3));
        assert_eq!(stats.total_cards, 3);
        assert_eq!(stats.new_cards, 1);
        assert_eq!(stats.scheduled_cards, 2);
        // The new card and the one due Jan 2
        assert_eq!(stats.due_cards, 2);
        assert_eq!(stats.next_due_at, Some(day(5)));
        // One record at the initial 2.5, two raised to 2.6 by the passes
        let average = stats.average_ease_factor.unwrap();
        assert!((average - 7.7 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_stats_empty_store() {
        let stats = CardStateStore::new().stats(day(1));
        assert_eq!(stats.total_cards, 0);
        assert_eq!(stats.due_cards, 0);
        assert_eq!(stats.average_ease_factor, None);
        assert_eq!(stats.next_due_at, None);
    }
}
