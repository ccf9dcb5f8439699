//! Core library for mnemo, a spaced repetition review scheduler.
//!
//! The scheduler keeps one small JSON document of per-card SM-2 state
//! and advances it deterministically from graded reviews. Card content
//! lives in separate deck files; the two sides only share card ids.

pub mod config;
pub mod deck;
pub mod scheduler;

pub use config::AppConfig;
pub use deck::{Card, Deck, DeckError};
pub use scheduler::{CardRecord, CardStateStore, SchedulerConfig, SchedulerError};
