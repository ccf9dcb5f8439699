use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, as_of: DateTime<Utc>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = app.store.stats(as_of);
    let orphaned = app.orphaned_records();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deck": app.deck.name,
                "totalCards": stats.total_cards,
                "newCards": stats.new_cards,
                "scheduledCards": stats.scheduled_cards,
                "dueCards": stats.due_cards,
                "averageEaseFactor": stats.average_ease_factor,
                "nextDueAt": stats.next_due_at,
                "orphanedRecords": orphaned,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deck: {} ({} cards)", app.deck.name, app.deck.len());
            println!("New:       {}", stats.new_cards);
            println!("Scheduled: {}", stats.scheduled_cards);

            let due_color = if stats.due_cards > 0 {
                Color::YELLOW
            } else {
                Color::GREEN
            };
            println!(
                "Due now:   {}",
                terminal::paint(&stats.due_cards.to_string(), due_color, use_color)
            );

            match stats.average_ease_factor {
                Some(ease) => println!("Avg ease:  {:.2}", ease),
                None => println!("Avg ease:  -"),
            }

            match stats.next_due_at {
                Some(next) => println!(
                    "Next due:  {}",
                    terminal::format_due(Some(next), as_of, use_color)
                ),
                None => println!("Next due:  -"),
            }

            if orphaned > 0 {
                println!("Orphaned:  {} state records with no matching card", orphaned);
            }
        }
    }

    Ok(())
}
