//! Utility functions and structures shared by the engine and the planner.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Statistics about one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStatistics {
    pub iterations: u32,
    pub runtime: Duration,
    pub initial_cost: i64,
    pub best_cost: i64,
    pub routes_used: usize,
    /// Improving local search moves applied, repair included
    pub moves_applied: usize,
    pub cancelled: bool,
}

impl SearchStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Iterations: {}
- Runtime: {}
- Initial Cost: {} m
- Best Cost: {} m
- Routes Used: {}
- Moves Applied: {}
- Cancelled: {}",
            self.iterations,
            format_duration(self.runtime),
            self.initial_cost,
            self.best_cost,
            self.routes_used,
            self.moves_applied,
            self.cancelled
        )
    }
}

/// Round to two decimals for presentation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
