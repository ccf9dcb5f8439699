//! Tunable scheduling parameters

use serde::{Deserialize, Serialize};

/// Parameters controlling interval growth and failure handling.
///
/// Defaults follow the standard SM-2 constants. All fields can be
/// overridden individually from the config file; anything left out keeps
/// its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Lowest quality rating that counts as a successful recall (default 3)
    #[serde(default = "default_passing_threshold")]
    pub passing_threshold: i32,
    /// Floor for the ease factor (default 1.3)
    #[serde(default = "default_minimum_ease_factor")]
    pub minimum_ease_factor: f32,
    /// Ease factor assigned to cards with no review history (default 2.5)
    #[serde(default = "default_initial_ease_factor")]
    pub initial_ease_factor: f32,
    /// Flat ease deduction applied on a failed review (default 0.2)
    #[serde(default = "default_failure_ease_penalty")]
    pub failure_ease_penalty: f32,
    /// Interval after the first successful review, in days (default 1)
    #[serde(default = "default_first_interval_days")]
    pub first_interval_days: u32,
    /// Interval after the second consecutive success, in days (default 6)
    #[serde(default = "default_second_interval_days")]
    pub second_interval_days: u32,
    /// Interval assigned after a failed review, in days (default 1)
    #[serde(default = "default_relearn_interval_days")]
    pub relearn_interval_days: u32,
}

fn default_passing_threshold() -> i32 {
    3
}

fn default_minimum_ease_factor() -> f32 {
    1.3
}

fn default_initial_ease_factor() -> f32 {
    2.5
}

fn default_failure_ease_penalty() -> f32 {
    0.2
}

fn default_first_interval_days() -> u32 {
    1
}

fn default_second_interval_days() -> u32 {
    6
}

fn default_relearn_interval_days() -> u32 {
    1
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            passing_threshold: default_passing_threshold(),
            minimum_ease_factor: default_minimum_ease_factor(),
            initial_ease_factor: default_initial_ease_factor(),
            failure_ease_penalty: default_failure_ease_penalty(),
            first_interval_days: default_first_interval_days(),
            second_interval_days: default_second_interval_days(),
            relearn_interval_days: default_relearn_interval_days(),
        }
    }
}
