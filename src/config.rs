//! Configuration parameters for route planning and the search.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the planner tries to minimise. Selects the construction heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationType {
    #[default]
    Distance,
    Time,
    Cost,
}

/// Construction heuristic producing the first feasible route set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstSolutionStrategy {
    /// Extend each route with the cheapest feasible arc from its last node.
    CheapestArc,
    /// Extend each route with the feasible arc to the most demanding stop.
    MostConstrainedArc,
    /// Clarke-Wright savings.
    Savings,
}

impl From<OptimizationType> for FirstSolutionStrategy {
    fn from(objective: OptimizationType) -> Self {
        match objective {
            OptimizationType::Distance => FirstSolutionStrategy::CheapestArc,
            OptimizationType::Time => FirstSolutionStrategy::MostConstrainedArc,
            OptimizationType::Cost => FirstSolutionStrategy::Savings,
        }
    }
}

/// Request-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Enable the route-duration dimension
    pub use_time_windows: bool,
    /// Average bus speed used to derive travel times
    pub average_speed_kmh: f64,
    /// Time spent at each pickup point
    pub service_time_seconds: i64,
    /// Permitted waiting time per arc in the duration dimension
    pub slack_time_seconds: i64,
    /// Upper bound on a single route's duration
    pub max_route_duration_seconds: i64,
    /// Objective selecting the construction heuristic
    pub optimization_type: OptimizationType,
    /// Wall-clock budget for one solve
    pub time_limit_seconds: u64,
    /// Stop the search early after this many non-improving iterations
    pub max_iterations_without_improvement: u32,
    /// Seed for the search's random choices
    pub seed: u64,
    /// Cost per kilometre, in currency minor units
    pub cost_per_km: f64,
    /// Cost per transported student, in currency minor units
    pub cost_per_student: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            use_time_windows: false,
            average_speed_kmh: 30.0,
            service_time_seconds: 60,
            slack_time_seconds: 300,
            max_route_duration_seconds: 7200,
            optimization_type: OptimizationType::Distance,
            time_limit_seconds: 30,
            max_iterations_without_improvement: 2000,
            seed: 42,
            cost_per_km: 10_000.0,
            cost_per_student: 5_000.0,
        }
    }
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Settings::default()
    }

    /// Enable or disable the duration dimension.
    pub fn with_time_windows(mut self, enabled: bool) -> Self {
        self.use_time_windows = enabled;
        self
    }

    /// Set the average speed.
    pub fn with_average_speed_kmh(mut self, speed: f64) -> Self {
        self.average_speed_kmh = speed;
        self
    }

    /// Set the service time per stop.
    pub fn with_service_time_seconds(mut self, seconds: i64) -> Self {
        self.service_time_seconds = seconds;
        self
    }

    /// Set the slack of the duration dimension.
    pub fn with_slack_time_seconds(mut self, seconds: i64) -> Self {
        self.slack_time_seconds = seconds;
        self
    }

    /// Set the maximum route duration.
    pub fn with_max_route_duration_seconds(mut self, seconds: i64) -> Self {
        self.max_route_duration_seconds = seconds;
        self
    }

    /// Set the optimisation objective.
    pub fn with_optimization_type(mut self, objective: OptimizationType) -> Self {
        self.optimization_type = objective;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit_seconds(mut self, seconds: u64) -> Self {
        self.time_limit_seconds = seconds;
        self
    }

    /// Set the maximum iterations without improvement.
    pub fn with_max_iterations_without_improvement(mut self, iterations: u32) -> Self {
        self.max_iterations_without_improvement = iterations;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the cost constants used for route estimates.
    pub fn with_cost_rates(mut self, per_km: f64, per_student: f64) -> Self {
        self.cost_per_km = per_km;
        self.cost_per_student = per_student;
        self
    }

    /// Search parameters handed to the routing engine.
    pub fn search_parameters(&self) -> SearchParameters {
        SearchParameters {
            first_solution_strategy: self.optimization_type.into(),
            time_limit: Duration::from_secs(self.time_limit_seconds),
            max_iterations_without_improvement: self.max_iterations_without_improvement,
            seed: self.seed,
            penalty_factor: SearchParameters::DEFAULT_PENALTY_FACTOR,
        }
    }
}

/// Parameters controlling one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub first_solution_strategy: FirstSolutionStrategy,
    pub time_limit: Duration,
    pub max_iterations_without_improvement: u32,
    pub seed: u64,
    /// Scales the guided local search penalty weight
    pub penalty_factor: f64,
}

impl SearchParameters {
    pub const DEFAULT_PENALTY_FACTOR: f64 = 0.1;
}

impl Default for SearchParameters {
    fn default() -> Self {
        Settings::default().search_parameters()
    }
}
