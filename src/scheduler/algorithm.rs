//! SM-2 review interval computation
//!
//! Pure functions implementing the SuperMemo 2 scheduling rules. The
//! review timestamp is always an explicit argument, so the same inputs
//! give the same outputs regardless of when the computation runs.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but recognized after seeing the answer
//! - 2: Incorrect, but the answer felt close
//! - 3: Correct with serious difficulty
//! - 4: Correct after hesitation
//! - 5: Perfect recall
//!
//! Ratings below the configured passing threshold count as a failure and
//! put the card back on the short relearn interval.

use chrono::{DateTime, Duration, Utc};

use super::config::SchedulerConfig;
use super::models::CardRecord;

/// Result of grading a single review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub repetitions: u32,
    pub interval_days: u32,
    pub ease_factor: f32,
    pub due_at: DateTime<Utc>,
}

/// Compute the next scheduling state for a card after one graded review.
///
/// # Arguments
/// * `record` - Current scheduling state
/// * `quality` - Quality rating (0-5, clamped)
/// * `reviewed_at` - When the review happened
/// * `config` - Scheduling parameters
pub fn next_review(
    record: &CardRecord,
    quality: i32,
    reviewed_at: DateTime<Utc>,
    config: &SchedulerConfig,
) -> ReviewOutcome {
    // Clamp quality to the valid range
    let quality = quality.clamp(0, 5);

    let mut ease_factor = record.ease_factor;
    let repetitions;
    let interval_days;

    if quality >= config.passing_threshold {
        // Successful recall
        repetitions = record.repetitions + 1;

        // Update ease factor based on quality
        // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
        ease_factor += 0.1 - (5 - quality) as f32 * (0.08 + (5 - quality) as f32 * 0.02);
        ease_factor = ease_factor.max(config.minimum_ease_factor);

        interval_days = match repetitions {
            1 => config.first_interval_days,
            2 => config.second_interval_days,
            _ => ((record.interval_days as f32 * ease_factor).round() as u32).max(1),
        };
    } else {
        // Failed recall: back to the relearn interval
        repetitions = 0;
        interval_days = config.relearn_interval_days;
        ease_factor = (ease_factor - config.failure_ease_penalty).max(config.minimum_ease_factor);
    }

    let due_at = reviewed_at + Duration::days(interval_days as i64);

    ReviewOutcome {
        repetitions,
        interval_days,
        ease_factor,
        due_at,
    }
}

/// Compute the interval each quality rating would produce, indexed by
/// rating. Used to show the learner what each answer costs before they
/// grade themselves.
pub fn preview_intervals(
    record: &CardRecord,
    reviewed_at: DateTime<Utc>,
    config: &SchedulerConfig,
) -> [u32; 6] {
    let mut intervals = [0u32; 6];
    for (quality, slot) in intervals.iter_mut().enumerate() {
        *slot = next_review(record, quality as i32, reviewed_at, config).interval_days;
    }
    intervals
}

/// Format an interval in days as a short human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days == 1 {
        "1d".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        let weeks = days / 7;
        if weeks == 1 {
            "1w".to_string()
        } else {
            format!("{}w", weeks)
        }
    } else if days < 365 {
        let months = days / 30;
        if months == 1 {
            "1mo".to_string()
        } else {
            format!("{}mo", months)
        }
    } else {
        let years = days / 365;
        if years == 1 {
            "1y".to_string()
        } else {
            format!("{}y", years)
        }
    }
}
