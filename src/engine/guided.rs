//! Guided local search: penalise the most costly arcs of each local optimum
//! so the descent escapes it, and keep the best solution seen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};

use super::local_search::{LocalSearch, Objective};
use super::model::RoutingModel;
use crate::config::SearchParameters;
use crate::utils::SearchStatistics;

/// Cooperative stop flag shared between a caller and a running search.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    is_stopped: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken::default()
    }

    /// Ask the search to stop and return its best solution so far.
    pub fn cancel(&self) {
        self.is_stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_stopped.load(Ordering::Relaxed)
    }
}

/// Wall-clock deadline plus cancellation.
pub struct Termination {
    /// `None` when the time limit is too large to represent
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl Termination {
    pub fn new(time_limit: Duration, token: CancellationToken) -> Self {
        Termination {
            deadline: Instant::now().checked_add(time_limit),
            token,
        }
    }

    pub fn is_reached(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Penalty counters for directed node-to-node arcs.
#[derive(Debug, Clone)]
pub struct Penalties {
    size: usize,
    counts: Vec<u32>,
}

impl Penalties {
    pub fn new(size: usize) -> Self {
        Penalties {
            size,
            counts: vec![0; size * size],
        }
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> u32 {
        self.counts[from * self.size + to]
    }

    fn increment(&mut self, from: usize, to: usize) {
        let count = &mut self.counts[from * self.size + to];
        *count = count.saturating_add(1);
    }
}

/// Best routes found and how the search went.
pub struct SearchOutcome {
    pub routes: Vec<Vec<usize>>,
    pub cost: i64,
    /// `false` when the search stopped before any route set fit the fleet
    pub feasible: bool,
    pub statistics: SearchStatistics,
}

/// Overshoot weight never grows past this.
const MAX_EXCESS_WEIGHT: f64 = 1e12;

/// Guided local search over a fixed model.
pub struct GuidedLocalSearch<'a> {
    model: &'a RoutingModel,
    params: &'a SearchParameters,
}

impl<'a> GuidedLocalSearch<'a> {
    pub fn new(model: &'a RoutingModel, params: &'a SearchParameters) -> Self {
        GuidedLocalSearch { model, params }
    }

    /// Improve an initial solution until the time limit, the iteration limit
    /// or cancellation. An infeasible start is first driven to feasibility;
    /// if that does not succeed before the search must stop, the outcome is
    /// marked infeasible.
    pub fn run(&self, initial: Vec<Vec<usize>>, token: CancellationToken) -> SearchOutcome {
        let start_time = Instant::now();
        let termination = Termination::new(self.params.time_limit, token);
        let initial_cost = self.model.solution_cost(&initial);

        let mut local_search = LocalSearch::new(self.params.seed);
        let mut current = initial;
        let mut iterations = 0u32;

        if !self.model.is_solution_feasible(&current) {
            iterations += self.restore_feasibility(&mut current, &mut local_search, &termination);
        }

        if !self.model.is_solution_feasible(&current) {
            warn!(
                "No feasible routes before the search stopped; overshoot {:?}",
                self.model.excess_by_dimension(&current)
            );
            let cost = self.model.solution_cost(&current);
            return SearchOutcome {
                statistics: SearchStatistics {
                    iterations,
                    runtime: start_time.elapsed(),
                    initial_cost,
                    best_cost: cost,
                    routes_used: current.iter().filter(|stops| !stops.is_empty()).count(),
                    moves_applied: local_search.moves_applied,
                    cancelled: termination.is_cancelled(),
                },
                routes: current,
                cost,
                feasible: false,
            };
        }

        local_search.descend(&mut current, &Objective::plain(self.model), &termination);

        let mut best = current.clone();
        let mut best_cost = self.model.solution_cost(&best);
        let lambda = self.lambda(&current, best_cost);

        let mut penalties = Penalties::new(self.model.node_count());
        let mut iterations_without_improvement = 0u32;

        while self.model.stop_count() > 1
            && !termination.is_reached()
            && iterations_without_improvement < self.params.max_iterations_without_improvement
        {
            iterations += 1;

            self.penalize_max_utility_arcs(&current, &mut penalties);
            let objective = Objective::guided(self.model, &penalties, lambda);
            local_search.descend(&mut current, &objective, &termination);

            let cost = self.model.solution_cost(&current);
            if cost < best_cost {
                debug!("GLS iteration {}: new best cost {} m", iterations, cost);
                best = current.clone();
                best_cost = cost;
                iterations_without_improvement = 0;
            } else {
                iterations_without_improvement += 1;
            }
        }

        let statistics = SearchStatistics {
            iterations,
            runtime: start_time.elapsed(),
            initial_cost,
            best_cost,
            routes_used: best.iter().filter(|stops| !stops.is_empty()).count(),
            moves_applied: local_search.moves_applied,
            cancelled: termination.is_cancelled(),
        };

        SearchOutcome {
            routes: best,
            cost: best_cost,
            feasible: true,
            statistics,
        }
    }

    /// Penalty weight per unit of arc penalty: a fraction of the mean arc cost.
    fn lambda(&self, routes: &[Vec<usize>], cost: i64) -> f64 {
        let arc_count: usize = routes
            .iter()
            .filter(|stops| !stops.is_empty())
            .map(|stops| stops.len() + 1)
            .sum();
        self.params.penalty_factor * cost as f64 / arc_count.max(1) as f64
    }

    /// Descend on cost plus weighted overshoot, doubling the weight and
    /// penalising arcs after every round that ends infeasible. Returns the
    /// number of rounds.
    fn restore_feasibility(
        &self,
        routes: &mut [Vec<usize>],
        local_search: &mut LocalSearch,
        termination: &Termination,
    ) -> u32 {
        let cost = self.model.solution_cost(routes);
        let lambda = self.lambda(routes, cost);
        let mut weight = (lambda / self.params.penalty_factor).max(1.0);
        let mut penalties = Penalties::new(self.model.node_count());
        let mut rounds = 0u32;

        loop {
            rounds += 1;
            let objective =
                Objective::guided(self.model, &penalties, lambda).with_excess_weight(weight);
            local_search.descend(routes, &objective, termination);

            if self.model.is_solution_feasible(routes) {
                debug!("Feasible after {} repair round(s)", rounds);
                return rounds;
            }
            if termination.is_reached() {
                return rounds;
            }

            weight = (weight * 2.0).min(MAX_EXCESS_WEIGHT);
            self.penalize_max_utility_arcs(routes, &mut penalties);
        }
    }

    /// Increment the penalty of every arc with maximal utility
    /// `cost / (1 + penalty)` in the current solution.
    fn penalize_max_utility_arcs(&self, routes: &[Vec<usize>], penalties: &mut Penalties) {
        let arcs: Vec<(usize, usize, f64)> = routes
            .iter()
            .enumerate()
            .filter(|(_, stops)| !stops.is_empty())
            .flat_map(|(vehicle, stops)| self.model.route_arcs(vehicle, stops))
            .map(|(from, to)| {
                let utility = self.model.arc_cost(from, to) as f64
                    / (1.0 + f64::from(penalties.get(from, to)));
                (from, to, utility)
            })
            .collect();

        let max_utility = arcs
            .iter()
            .map(|&(_, _, utility)| utility)
            .fold(f64::NEG_INFINITY, f64::max);

        for &(from, to, utility) in &arcs {
            if utility >= max_utility {
                penalties.increment(from, to);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::model::{Location, PickupPoint, Student, Vehicle};
    use crate::problem::Problem;

    /// Stops with demands 2, 2, 3, 3 on a line; two five-seat buses.
    fn tight_model() -> RoutingModel {
        let points = (1..=4)
            .map(|i| PickupPoint::new(i, 0.0, 0.01 * i as f64, "stop"))
            .collect();
        let students = [1, 1, 2, 2, 3, 3, 3, 4, 4, 4]
            .iter()
            .enumerate()
            .map(|(id, &point)| Student::new(id as u64 + 1, point))
            .collect();
        RoutingModel::new(&Problem::new(
            Location::new(0.0, 0.0),
            points,
            students,
            vec![Vehicle::new(1, 5), Vehicle::new(2, 5)],
            Settings::default(),
        ))
    }

    fn params(time_limit: Duration) -> SearchParameters {
        SearchParameters {
            time_limit,
            max_iterations_without_improvement: 20,
            ..SearchParameters::default()
        }
    }

    #[test]
    fn overloaded_start_is_repaired() {
        let model = tight_model();
        let params = params(Duration::from_secs(5));
        // Seven students on the first bus
        let outcome = GuidedLocalSearch::new(&model, &params)
            .run(vec![vec![0, 1, 2], vec![3]], CancellationToken::new());

        assert!(outcome.feasible);
        assert!(model.is_solution_feasible(&outcome.routes));
        assert_eq!(outcome.routes.iter().map(Vec::len).sum::<usize>(), 4);
        assert!(outcome.statistics.moves_applied > 0);
    }

    #[test]
    fn overloaded_start_without_time_stays_infeasible() {
        let model = tight_model();
        let params = params(Duration::ZERO);
        let outcome = GuidedLocalSearch::new(&model, &params)
            .run(vec![vec![0, 1, 2], vec![3]], CancellationToken::new());

        assert!(!outcome.feasible);
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let token = CancellationToken::new();
        let termination = Termination::new(Duration::from_secs(60), token.clone());
        assert!(!termination.is_reached());

        token.cancel();
        assert!(termination.is_reached());
        assert!(termination.is_cancelled());
    }

    #[test]
    fn unrepresentable_time_limit_never_expires() {
        let termination = Termination::new(Duration::MAX, CancellationToken::new());
        assert!(!termination.is_reached());
    }

    #[test]
    fn zero_time_limit_terminates_immediately() {
        let termination = Termination::new(Duration::ZERO, CancellationToken::new());
        assert!(termination.is_reached());
    }

    #[test]
    fn penalties_saturate() {
        let mut penalties = Penalties::new(2);
        penalties.increment(0, 1);
        penalties.increment(0, 1);
        assert_eq!(penalties.get(0, 1), 2);
        assert_eq!(penalties.get(1, 0), 0);
    }
}
