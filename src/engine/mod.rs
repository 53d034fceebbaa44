//! Routing engine capability and its default guided-local-search backend.
//!
//! The rest of the crate only sees [`RoutingEngine`], [`Problem`] and
//! [`Solution`]; the index space, cost model and search state stay inside
//! this module.

pub mod construction;
pub mod guided;
pub mod index_manager;
pub mod local_search;
pub mod model;

pub use guided::CancellationToken;

use log::{debug, info, warn};

use crate::config::SearchParameters;
use crate::problem::Problem;
use crate::solution::Solution;

use self::construction::initial_solution;
use self::guided::GuidedLocalSearch;
use self::model::RoutingModel;

/// Solves a routing problem.
///
/// Implementations own no state across calls and must be safe to share
/// between threads. Failing to find a feasible assignment is reported through
/// [`Solution::success`], never by panicking.
pub trait RoutingEngine: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Solve with the problem's own settings.
    fn solve(&self, problem: &Problem) -> Solution {
        self.solve_with_cancellation(problem, &CancellationToken::new())
    }

    /// Solve, stopping early once `token` is cancelled.
    fn solve_with_cancellation(&self, problem: &Problem, token: &CancellationToken) -> Solution;
}

/// Construction heuristic followed by guided local search under a time limit.
///
/// Reports no solution only when some stop fits no vehicle, or when the
/// search stops before any route set fits the fleet.
#[derive(Debug, Clone, Default)]
pub struct GuidedLocalSearchEngine {
    parameters: Option<SearchParameters>,
}

impl GuidedLocalSearchEngine {
    pub fn new() -> Self {
        GuidedLocalSearchEngine::default()
    }

    /// Use fixed search parameters instead of deriving them from each
    /// problem's settings.
    pub fn with_parameters(parameters: SearchParameters) -> Self {
        GuidedLocalSearchEngine {
            parameters: Some(parameters),
        }
    }

    fn parameters_for(&self, problem: &Problem) -> SearchParameters {
        self.parameters
            .clone()
            .unwrap_or_else(|| problem.settings.search_parameters())
    }
}

impl RoutingEngine for GuidedLocalSearchEngine {
    fn name(&self) -> &'static str {
        "guided-local-search"
    }

    fn solve_with_cancellation(&self, problem: &Problem, token: &CancellationToken) -> Solution {
        let params = self.parameters_for(problem);
        let model = RoutingModel::new(problem);
        let manager = model.manager();

        info!(
            "Solving {} stop(s) with {} vehicle(s) using {:?} (time limit {:?})",
            model.stop_count(),
            model.vehicle_count(),
            params.first_solution_strategy,
            params.time_limit
        );

        // Capacity and duration only grow along a route, so a stop no vehicle
        // can serve on its own cannot be served at all.
        let unservable = manager.pickup_point_ids(
            &(0..model.stop_count())
                .filter(|&stop| !model.fits_any_vehicle(&[stop]))
                .collect::<Vec<_>>(),
        );
        if !unservable.is_empty() {
            warn!(
                "Pickup point(s) {:?} cannot be served by any vehicle",
                unservable
            );
            return Solution::failed();
        }

        let initial = initial_solution(&model, params.first_solution_strategy);
        let outcome = GuidedLocalSearch::new(&model, &params).run(initial, token.clone());
        debug!("{}", outcome.statistics.format());

        if !outcome.feasible {
            return Solution::failed().with_statistics(outcome.statistics);
        }

        for (vehicle, stops) in outcome.routes.iter().enumerate() {
            debug!(
                "Vehicle {}: pickup points {:?}",
                vehicle,
                manager.pickup_point_ids(stops)
            );
        }

        let routes = outcome
            .routes
            .iter()
            .enumerate()
            .map(|(vehicle, stops)| manager.to_nodes(vehicle, stops))
            .collect();

        Solution::new(routes, outcome.cost).with_statistics(outcome.statistics)
    }
}
