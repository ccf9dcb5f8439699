//! Data models for card content

use serde::{Deserialize, Serialize};

/// A single piece of reviewable content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Stable identifier, also the key into the schedule state
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A named collection of cards loaded from a deck file.
///
/// The deck is content only; scheduling state lives elsewhere and the
/// two are joined by card id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(default)]
    pub name: String,
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
