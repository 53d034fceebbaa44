//! Orchestration: prepare the problem, solve it, decode the routes, and turn
//! every failure into a uniform response.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use log::{error, info, warn};

use crate::builder::ProblemBuilder;
use crate::config::Settings;
use crate::decoder::SolutionDecoder;
use crate::engine::{CancellationToken, RoutingEngine};
use crate::error::PlanningError;
use crate::response::{RouteSuggestion, RouteSuggestionResponse};
use crate::source::RoutingDataSource;
use crate::utils::format_duration;

/// Entry point for route suggestion requests.
pub struct RoutePlanner<S, E>
where
    S: RoutingDataSource,
    E: RoutingEngine,
{
    source: S,
    engine: E,
    builder: ProblemBuilder,
}

impl<S, E> RoutePlanner<S, E>
where
    S: RoutingDataSource,
    E: RoutingEngine,
{
    pub fn new(source: S, engine: E, settings: Settings) -> Self {
        RoutePlanner {
            source,
            engine,
            builder: ProblemBuilder::new(settings),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        self.builder.settings()
    }

    /// Suggest routes for the whole fleet.
    pub fn generate_route_suggestions(&self) -> RouteSuggestionResponse {
        self.generate_with_cancellation(&CancellationToken::new())
    }

    /// Suggest routes, letting the caller stop the search early. A cancelled
    /// search still returns the best routes found so far.
    pub fn generate_with_cancellation(&self, token: &CancellationToken) -> RouteSuggestionResponse {
        let started_at = Instant::now();
        info!("Generating route suggestions with {}", self.engine.name());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.plan(token)))
            .unwrap_or_else(|payload| {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(PlanningError::Unexpected(detail))
            });

        match outcome {
            Ok(routes) => {
                info!(
                    "Generated {} route(s) in {}",
                    routes.len(),
                    format_duration(started_at.elapsed())
                );
                RouteSuggestionResponse::success(routes)
            }
            Err(err @ PlanningError::Unexpected(_)) => {
                error!("Route generation failed: {:?}", err);
                RouteSuggestionResponse::failure(&err)
            }
            Err(err) => {
                warn!("Route generation rejected: {}", err);
                RouteSuggestionResponse::failure(&err)
            }
        }
    }

    /// Re-plan around an existing route.
    ///
    /// Regenerates the full solution; stops already served are not held
    /// fixed.
    pub fn optimize_existing_route(&self, route_id: u64) -> RouteSuggestionResponse {
        info!(
            "Optimizing existing route {} by full regeneration",
            route_id
        );
        self.generate_route_suggestions()
    }

    fn plan(&self, token: &CancellationToken) -> Result<Vec<RouteSuggestion>, PlanningError> {
        let problem = self.builder.from_source(&self.source)?;

        let solution = self.engine.solve_with_cancellation(&problem, token);
        if !solution.success {
            let searched = solution
                .statistics
                .as_ref()
                .map_or_else(|| "before searching".to_string(), |stats| {
                    format!("after searching for {}", format_duration(stats.runtime))
                });
            return Err(PlanningError::SolverFailure(format!(
                "no assignment satisfies the vehicle constraints ({})",
                searched
            )));
        }

        SolutionDecoder::new(&problem).decode(&solution)
    }
}
