//! Deck file loading
//!
//! A deck file is JSON, either an object with a name and a card list or
//! a bare array of cards:
//! ```text
//! { "name": "Rust basics", "cards": [ { "id": "card-1", ... } ] }
//! [ { "id": "card-1", "front": "...", "back": "..." } ]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

use super::models::{Card, Deck};

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deck parse error: {0}")]
    Parse(String),

    #[error("Duplicate card id: {0}")]
    DuplicateCard(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;

/// Load a deck from a JSON file.
///
/// Card ids must be unique within the deck; a duplicate is an error
/// because two cards would otherwise share one schedule record.
pub fn load_deck(path: &Path) -> Result<Deck> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| DeckError::Parse(format!("{}: {}", path.display(), e)))?;

    let mut deck = if value.is_array() {
        let cards: Vec<Card> =
            serde_json::from_value(value).map_err(|e| DeckError::Parse(e.to_string()))?;
        Deck {
            name: String::new(),
            cards,
        }
    } else {
        serde_json::from_value(value).map_err(|e| DeckError::Parse(e.to_string()))?
    };

    if deck.name.is_empty() {
        deck.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "deck".to_string());
    }

    let mut seen = HashSet::new();
    for card in &deck.cards {
        if !seen.insert(card.id.as_str()) {
            return Err(DeckError::DuplicateCard(card.id.clone()));
        }
    }

    log::debug!("Loaded {} cards from {}", deck.cards.len(), path.display());
    Ok(deck)
}
