use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(
    app: &App,
    as_of: DateTime<Utc>,
    limit: Option<usize>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let due = app.store.due_cards(as_of);
    let total = due.len();
    let shown = match limit {
        Some(n) => &due[..n.min(total)],
        None => &due[..],
    };

    match format {
        OutputFormat::Json => {
            let mut output = Vec::new();
            for record in shown {
                let card = app.deck.get(&record.id);
                output.push(serde_json::json!({
                    "id": record.id,
                    "front": card.map(|c| c.front.as_str()),
                    "dueAt": record.due_at,
                    "intervalDays": record.interval_days,
                    "repetitions": record.repetitions,
                    "easeFactor": record.ease_factor,
                }));
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if shown.is_empty() {
                println!("No cards due.");
                return Ok(());
            }

            for record in shown {
                let front = match app.deck.get(&record.id) {
                    Some(card) => terminal::truncate(&card.front, 48),
                    None => "(content missing)".to_string(),
                };
                let label = terminal::format_due(record.due_at, as_of, use_color);
                println!("{:<24} {:<48}  {}", record.id, front, label);
            }
            if shown.len() < total {
                println!("... and {} more", total - shown.len());
            }
        }
    }

    Ok(())
}
