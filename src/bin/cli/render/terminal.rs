use chrono::{DateTime, Utc};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap text in a color code when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Describe a due date relative to a reference time: "new" for cards
/// without one, then "3d overdue", "due today" or "in 3d" by date.
pub fn format_due(due_at: Option<DateTime<Utc>>, as_of: DateTime<Utc>, use_color: bool) -> String {
    let Some(due_at) = due_at else {
        return paint("new", Color::CYAN, use_color);
    };

    let days = (as_of.date_naive() - due_at.date_naive()).num_days();
    if days > 0 {
        paint(&format!("{}d overdue", days), Color::RED, use_color)
    } else if days == 0 {
        paint("due today", Color::YELLOW, use_color)
    } else {
        paint(&format!("in {}d", -days), Color::GREEN, use_color)
    }
}

/// Truncate text to a display width, appending an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
