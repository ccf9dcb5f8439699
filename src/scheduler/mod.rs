//! Spaced repetition review scheduling
//!
//! This module provides:
//! - SM-2 interval computation with explicit timestamps
//! - An in-memory store of per-card scheduling records
//! - Atomic whole-document persistence with schema versioning

pub mod algorithm;
pub mod config;
pub mod models;
pub mod storage;

pub use algorithm::{format_interval, next_review, preview_intervals, ReviewOutcome};
pub use config::SchedulerConfig;
pub use models::{CardRecord, CardStatus, ReviewStats, StateDocument};
pub use storage::{CardStateStore, SchedulerError, STATE_VERSION};
