use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(mut app: App, yes: bool, format: &OutputFormat) -> Result<()> {
    let total = app.store.len();

    if !yes {
        print!("Clear schedule state for {} cards? [y/N] ", total);
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let answer = line.trim().to_lowercase();
        if answer != "y" && answer != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    app.store.reset();
    app.save_store()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "clearedRecords": total });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Cleared schedule state for {} cards.", total);
        }
    }

    Ok(())
}
