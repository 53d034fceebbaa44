//! Raw solver output: one node sequence per vehicle.

use crate::utils::SearchStatistics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of one engine run.
///
/// `routes[v]` is the sequence of problem node indices driven by vehicle `v`,
/// including the depot (node 0) at both ends. A route without any non-depot
/// node means the vehicle is unused.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Solution {
    pub routes: Vec<Vec<usize>>,
    pub success: bool,
    /// Total arc cost in metres
    pub objective: i64,
    pub statistics: Option<SearchStatistics>,
}

impl Solution {
    /// A successful solution.
    pub fn new(routes: Vec<Vec<usize>>, objective: i64) -> Self {
        Solution {
            routes,
            success: true,
            objective,
            statistics: None,
        }
    }

    /// The engine found no feasible assignment.
    pub fn failed() -> Self {
        Solution::default()
    }

    /// Attach search statistics.
    pub fn with_statistics(mut self, statistics: SearchStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    /// Number of vehicles that visit at least one stop.
    pub fn used_vehicle_count(&self) -> usize {
        self.routes
            .iter()
            .filter(|route| route.iter().any(|&node| node != 0))
            .count()
    }

    /// All non-depot nodes in visiting order, vehicle by vehicle.
    pub fn visited_nodes(&self) -> Vec<usize> {
        self.routes
            .iter()
            .flat_map(|route| route.iter().copied().filter(|&node| node != 0))
            .collect()
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Success: {}", self.success)?;
        writeln!(f, "  Objective: {} m", self.objective)?;
        writeln!(f, "  Vehicles used: {}", self.used_vehicle_count())?;

        for (i, route) in self.routes.iter().enumerate() {
            writeln!(f, "  Vehicle {}: {:?}", i, route)?;
        }

        Ok(())
    }
}
