//! # School Routes
//!
//! Assigns school-bus pickup stops to a fleet of vehicles and orders each
//! vehicle's stops into a route that respects seat capacity and, optionally,
//! a maximum route duration, minimising travel distance.
//!
//! The pipeline is: [`ProblemBuilder`] gathers students, pickup points,
//! vehicles and the school location and runs the feasibility pre-checks; a
//! [`RoutingEngine`] solves the capacitated vehicle routing problem; the
//! [`SolutionDecoder`] maps the raw routes back to stops and students; and
//! [`RoutePlanner`] sequences the three and reports every outcome as a
//! [`RouteSuggestionResponse`].
//!
//! The default engine builds a first solution with a construction heuristic
//! chosen by the optimisation objective and improves it by guided local search
//! within a wall-clock time limit.

pub mod builder;
pub mod config;
pub mod decoder;
pub mod demand;
pub mod dispatch;
pub mod distance;
pub mod engine;
pub mod error;
pub mod model;
pub mod planner;
pub mod problem;
pub mod response;
pub mod solution;
pub mod source;
pub mod utils;

pub use crate::builder::ProblemBuilder;
pub use crate::config::{FirstSolutionStrategy, OptimizationType, SearchParameters, Settings};
pub use crate::decoder::SolutionDecoder;
pub use crate::dispatch::{SolveDispatcher, Submission};
pub use crate::engine::{CancellationToken, GuidedLocalSearchEngine, RoutingEngine};
pub use crate::error::{DataSourceError, FailureKind, PlanningError};
pub use crate::model::{Location, PickupPoint, Status, Student, Vehicle};
pub use crate::planner::RoutePlanner;
pub use crate::problem::Problem;
pub use crate::response::{RouteSuggestion, RouteSuggestionResponse, StopSuggestion};
pub use crate::solution::Solution;
pub use crate::source::{RoutingDataSource, RoutingSnapshot};
