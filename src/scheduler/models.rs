//! Data models for card scheduling state

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::SchedulerConfig;

/// Logical state of a card in the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never reviewed
    New,
    /// Has review history and a due date
    Scheduled,
}

/// Scheduling state for a single card.
///
/// The card id doubles as the key in the persisted state document, so it
/// is not serialized with the record itself; the store fills it back in
/// on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    #[serde(skip)]
    pub id: String,
    /// SM-2 ease factor, never below the configured floor
    pub ease_factor: f32,
    /// Current interval in days
    pub interval_days: u32,
    /// Consecutive successful reviews since the last failure
    pub repetitions: u32,
    /// When the card next becomes eligible for review
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    /// When the card was last reviewed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl CardRecord {
    pub fn new(id: &str, config: &SchedulerConfig) -> Self {
        Self {
            id: id.to_string(),
            ease_factor: config.initial_ease_factor,
            interval_days: config.first_interval_days,
            repetitions: 0,
            due_at: None,
            last_reviewed_at: None,
        }
    }

    pub fn status(&self) -> CardStatus {
        if self.last_reviewed_at.is_none() {
            CardStatus::New
        } else {
            CardStatus::Scheduled
        }
    }

    /// Check whether the card is eligible for review at the given time.
    /// Cards with no history are always due.
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        match self.due_at {
            Some(due_at) => due_at <= as_of,
            None => true,
        }
    }
}

/// Top-level persisted state document.
///
/// Legacy files written before the version marker existed are a bare map
/// from card id to record; the store upgrades those on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    pub version: u32,
    #[serde(default)]
    pub cards: BTreeMap<String, CardRecord>,
}

/// Aggregate schedule statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub scheduled_cards: usize,
    pub due_cards: usize,
    /// Mean ease factor across all records, None for an empty store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_ease_factor: Option<f32>,
    /// Earliest upcoming due date strictly after the reference time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_at: Option<DateTime<Utc>>,
}

impl Default for ReviewStats {
    fn default() -> Self {
        Self {
            total_cards: 0,
            new_cards: 0,
            scheduled_cards: 0,
            due_cards: 0,
            average_ease_factor: None,
            next_due_at: None,
        }
    }
}
