use anyhow::Result;
use chrono::{DateTime, Utc};

use mnemo_lib::scheduler::format_interval;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, as_of: DateTime<Utc>, format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let mut output = Vec::new();
            for card in &app.deck.cards {
                let record = app.store.get(&card.id);
                output.push(serde_json::json!({
                    "id": card.id,
                    "front": card.front,
                    "tags": card.tags,
                    "status": record.map(|r| r.status()),
                    "repetitions": record.map(|r| r.repetitions),
                    "easeFactor": record.map(|r| r.ease_factor),
                    "intervalDays": record.map(|r| r.interval_days),
                    "dueAt": record.and_then(|r| r.due_at),
                }));
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} ({} cards)", app.deck.name, app.deck.len());

            for card in &app.deck.cards {
                let Some(record) = app.store.get(&card.id) else {
                    continue;
                };
                let interval = if record.last_reviewed_at.is_none() {
                    "-".to_string()
                } else {
                    format_interval(record.interval_days)
                };
                let label = terminal::format_due(record.due_at, as_of, use_color);
                println!(
                    "  {:<24} {:>5.2}  x{:<3} {:>4}  {}",
                    card.id, record.ease_factor, record.repetitions, interval, label
                );
            }

            let orphaned = app.orphaned_records();
            if orphaned > 0 {
                println!("  ({} state records have no matching card)", orphaned);
            }
        }
    }

    Ok(())
}
