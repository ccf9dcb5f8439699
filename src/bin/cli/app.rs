use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

use mnemo_lib::config::AppConfig;
use mnemo_lib::deck::{self, Deck};
use mnemo_lib::scheduler::{CardStateStore, SchedulerConfig};

/// Shared application state for CLI commands
pub struct App {
    pub deck: Deck,
    pub store: CardStateStore,
    pub scheduler_config: SchedulerConfig,
    pub state_path: PathBuf,
}

impl App {
    /// Resolve paths from flags and the config file, then load the deck
    /// and the schedule state. Deck cards without a schedule record are
    /// registered in memory; they reach the state file once a command
    /// saves the store.
    pub fn new(
        config_path: Option<&Path>,
        deck_path: Option<&Path>,
        state_path: Option<&Path>,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => AppConfig::load_default().context("Failed to load config")?,
        };
        let AppConfig {
            deck_path: config_deck,
            state_path: config_state,
            scheduler,
        } = config;

        let deck_path = match deck_path.map(Path::to_path_buf).or(config_deck) {
            Some(path) => path,
            None => bail!("No deck file given. Pass --deck or set deck_path in the config file."),
        };

        let state_path = state_path
            .map(Path::to_path_buf)
            .or(config_state)
            .or_else(AppConfig::default_state_path)
            .context("Failed to determine a state file location")?;

        let deck = deck::load_deck(&deck_path)
            .with_context(|| format!("Failed to load deck from {}", deck_path.display()))?;

        let mut store = CardStateStore::load(&state_path).with_context(|| {
            format!("Failed to load schedule state from {}", state_path.display())
        })?;

        let known = store.len();
        for card in &deck.cards {
            store.register_card(&card.id, &scheduler);
        }
        if store.len() > known {
            log::debug!("Registered {} new cards from the deck", store.len() - known);
        }

        Ok(Self {
            deck,
            store,
            scheduler_config: scheduler,
            state_path,
        })
    }

    /// Persist the schedule state to its file
    pub fn save_store(&self) -> Result<()> {
        self.store.save(&self.state_path).with_context(|| {
            format!(
                "Failed to save schedule state to {}",
                self.state_path.display()
            )
        })
    }

    /// Card ids due for review, oldest first. Records whose card is gone
    /// from the deck are skipped; their state stays untouched.
    pub fn due_session(&self, as_of: DateTime<Utc>, limit: Option<usize>) -> Vec<String> {
        let mut session: Vec<String> = Vec::new();
        for record in self.store.due_cards(as_of) {
            if self.deck.contains(&record.id) {
                session.push(record.id.clone());
            } else {
                log::warn!("Skipping state record with no matching card: {}", record.id);
            }
        }
        if let Some(limit) = limit {
            session.truncate(limit);
        }
        session
    }

    /// Count state records whose card is gone from the deck. They are
    /// kept on disk so history survives deck edits.
    pub fn orphaned_records(&self) -> usize {
        self.store
            .records()
            .filter(|record| !self.deck.contains(&record.id))
            .count()
    }
}
