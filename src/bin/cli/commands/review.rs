//! Interactive review session
//!
//! Walks the due queue oldest-first: show the front, reveal the back,
//! take a 0-5 grade, reschedule. State is saved after every graded card
//! so an interrupted session loses nothing.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::Utc;

use mnemo_lib::scheduler::{format_interval, preview_intervals};

use crate::app::App;
use crate::render::terminal::{self, Color};

pub fn run(mut app: App, limit: Option<usize>, use_color: bool) -> Result<()> {
    let session_start = Utc::now();
    let session = app.due_session(session_start, limit);

    if session.is_empty() {
        println!("No cards due.");
        return Ok(());
    }

    println!("{} cards to review.", session.len());
    println!();

    let mut reviewed = 0usize;
    let mut passed = 0usize;

    for (index, card_id) in session.iter().enumerate() {
        let Some(card) = app.deck.get(card_id) else {
            continue;
        };

        let header = format!("[{}/{}] {}", index + 1, session.len(), card_id);
        println!("{}", terminal::paint(&header, Color::BOLD, use_color));
        println!("  {}", card.front);

        print!("  (enter to reveal) ");
        io::stdout().flush()?;
        if read_line()?.is_none() {
            break;
        }
        println!("  {}", terminal::paint(&card.back, Color::GREEN, use_color));

        if let Some(record) = app.store.get(card_id) {
            let preview = preview_intervals(record, session_start, &app.scheduler_config);
            let hint = format!(
                "0-2: {}   3: {}   4: {}   5: {}",
                format_interval(preview[0]),
                format_interval(preview[3]),
                format_interval(preview[4]),
                format_interval(preview[5]),
            );
            println!("  {}", terminal::paint(&hint, Color::DIM, use_color));
        }

        let quality = match prompt_quality()? {
            Grade::Quality(quality) => quality,
            Grade::Skip => {
                println!();
                continue;
            }
            Grade::Quit => {
                println!("Session ended early.");
                break;
            }
        };

        let interval_days = app
            .store
            .record_review(card_id, quality, Utc::now(), &app.scheduler_config)?
            .interval_days;
        app.save_store()?;

        println!("  Next review in {}", format_interval(interval_days));
        println!();

        reviewed += 1;
        if quality >= app.scheduler_config.passing_threshold {
            passed += 1;
        }
    }

    println!("Reviewed {} cards, {} passed.", reviewed, passed);
    Ok(())
}

/// One answer to the grade prompt
enum Grade {
    Quality(i32),
    Skip,
    Quit,
}

/// Read a quality rating from stdin. Skipping leaves the card scheduled
/// as it was; quitting (or a closed stdin) ends the session.
fn prompt_quality() -> Result<Grade> {
    loop {
        print!("  Grade (0-5, s to skip, q to quit): ");
        io::stdout().flush()?;

        let Some(line) = read_line()? else {
            return Ok(Grade::Quit);
        };
        match line.as_str() {
            "q" | "quit" => return Ok(Grade::Quit),
            "s" | "skip" => return Ok(Grade::Skip),
            _ => match line.parse::<i32>() {
                Ok(quality @ 0..=5) => return Ok(Grade::Quality(quality)),
                _ => println!("  Enter a number from 0 to 5."),
            },
        }
    }
}

/// Read one trimmed line from stdin, or None at end of input
fn read_line() -> Result<Option<String>> {
    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim().to_string()))
    }
}
