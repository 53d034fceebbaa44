//! Local search operators used inside the guided local search.

pub mod relocate;
pub mod swap;
pub mod two_opt;
pub mod two_opt_star;
pub mod utils;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::guided::{Penalties, Termination};
use super::model::RoutingModel;

/// Value of a route set under an optional arc-penalty term.
///
/// With `lambda == 0` this is the plain travel cost. With a positive
/// `excess_weight` infeasible routes are admitted and every unit of capacity
/// or duration overshoot costs `excess_weight`; otherwise moves must keep
/// every route feasible.
pub struct Objective<'a> {
    pub model: &'a RoutingModel,
    penalties: Option<&'a Penalties>,
    lambda: f64,
    excess_weight: f64,
}

impl<'a> Objective<'a> {
    /// Plain travel cost.
    pub fn plain(model: &'a RoutingModel) -> Self {
        Objective {
            model,
            penalties: None,
            lambda: 0.0,
            excess_weight: 0.0,
        }
    }

    /// Travel cost augmented with `lambda` times the arc penalties.
    pub fn guided(model: &'a RoutingModel, penalties: &'a Penalties, lambda: f64) -> Self {
        Objective {
            model,
            penalties: Some(penalties),
            lambda,
            excess_weight: 0.0,
        }
    }

    /// Admit infeasible routes, charging `weight` per unit of overshoot.
    pub fn with_excess_weight(mut self, weight: f64) -> Self {
        self.excess_weight = weight;
        self
    }

    /// Whether a candidate route may be evaluated at all.
    pub fn admits(&self, vehicle: usize, stops: &[usize]) -> bool {
        self.excess_weight > 0.0 || self.model.is_feasible(vehicle, stops)
    }

    /// Augmented value of one route.
    pub fn route_value(&self, vehicle: usize, stops: &[usize]) -> f64 {
        if stops.is_empty() {
            return 0.0;
        }
        let mut value = self.model.route_cost(vehicle, stops) as f64;
        if let Some(penalties) = self.penalties.filter(|_| self.lambda > 0.0) {
            let penalty: u64 = self
                .model
                .route_arcs(vehicle, stops)
                .map(|(from, to)| u64::from(penalties.get(from, to)))
                .sum();
            value += self.lambda * penalty as f64;
        }
        if self.excess_weight > 0.0 {
            value += self.excess_weight * self.model.route_excess(vehicle, stops) as f64;
        }
        value
    }
}

/// Manages the descent to a local optimum.
pub struct LocalSearch {
    rng: ChaCha8Rng,
    /// Number of improving moves applied so far
    pub moves_applied: usize,
}

impl LocalSearch {
    /// Create a new local search instance.
    pub fn new(seed: u64) -> Self {
        LocalSearch {
            rng: ChaCha8Rng::seed_from_u64(seed),
            moves_applied: 0,
        }
    }

    /// Apply improving moves until none is left or the search must stop.
    ///
    /// Unless the objective admits infeasible routes, every accepted move
    /// keeps all routes feasible.
    pub fn descend(
        &mut self,
        routes: &mut [Vec<usize>],
        objective: &Objective<'_>,
        termination: &Termination,
    ) {
        let mut improvement = true;
        while improvement && !termination.is_reached() {
            improvement = false;

            improvement |= self.relocate_neighborhood(routes, objective);
            improvement |= self.swap_neighborhood(routes, objective);
            improvement |= self.two_opt_neighborhood(routes, objective);
            improvement |= self.two_opt_star_neighborhood(routes, objective);
        }
    }
}
