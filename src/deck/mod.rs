//! Card content decks
//!
//! Decks hold the front/back text of cards and nothing else. The
//! scheduler only ever sees card ids, so deck edits and schedule state
//! stay independent.

pub mod models;
pub mod storage;

pub use models::{Card, Deck};
pub use storage::{load_deck, DeckError};
