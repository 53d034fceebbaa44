//! Runs solves on a dedicated worker pool so request threads never block on
//! the search.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use log::debug;

use crate::engine::{CancellationToken, RoutingEngine};
use crate::error::PlanningError;
use crate::planner::RoutePlanner;
use crate::response::RouteSuggestionResponse;
use crate::source::RoutingDataSource;

/// A solve running in the background.
pub struct Submission {
    receiver: Receiver<RouteSuggestionResponse>,
    token: CancellationToken,
}

impl Submission {
    /// Block until the response is ready.
    pub fn wait(self) -> RouteSuggestionResponse {
        self.receiver.recv().unwrap_or_else(|_| {
            RouteSuggestionResponse::failure(&PlanningError::Unexpected(
                "solve worker exited without a response".to_string(),
            ))
        })
    }

    /// Stop the search early; the response carries the best routes so far.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Worker pool dedicated to route generation.
pub struct SolveDispatcher {
    pool: rayon::ThreadPool,
}

impl SolveDispatcher {
    /// Create a pool with `threads` workers.
    pub fn new(threads: usize) -> Result<Self, PlanningError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("route-solver-{}", i))
            .build()
            .map_err(|err| PlanningError::Unexpected(err.to_string()))?;
        Ok(SolveDispatcher { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queue a full route generation.
    pub fn submit<S, E>(&self, planner: Arc<RoutePlanner<S, E>>) -> Submission
    where
        S: RoutingDataSource + 'static,
        E: RoutingEngine + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let token = CancellationToken::new();
        let worker_token = token.clone();

        self.pool.spawn(move || {
            let response = planner.generate_with_cancellation(&worker_token);
            if sender.send(response).is_err() {
                debug!("Route generation finished after its submitter went away");
            }
        });

        Submission { receiver, token }
    }
}
