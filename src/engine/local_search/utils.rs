//! Utility functions for local search operations.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::Objective;

/// Moves must improve the objective by more than this to be applied.
pub const IMPROVEMENT_EPSILON: f64 = 1e-6;

/// Positions `0..n` in random order.
pub fn shuffled_indices(rng: &mut ChaCha8Rng, n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
}

/// Objective change when one route is replaced, or `None` if the objective
/// does not admit the new route.
pub fn single_route_delta(
    objective: &Objective<'_>,
    vehicle: usize,
    old_route: &[usize],
    new_route: &[usize],
) -> Option<f64> {
    if !objective.admits(vehicle, new_route) {
        return None;
    }
    Some(objective.route_value(vehicle, new_route) - objective.route_value(vehicle, old_route))
}

/// Objective change when two different routes are replaced together.
pub fn route_pair_delta(
    objective: &Objective<'_>,
    (v1, old1, new1): (usize, &[usize], &[usize]),
    (v2, old2, new2): (usize, &[usize], &[usize]),
) -> Option<f64> {
    if !objective.admits(v1, new1) || !objective.admits(v2, new2) {
        return None;
    }
    let before = objective.route_value(v1, old1) + objective.route_value(v2, old2);
    let after = objective.route_value(v1, new1) + objective.route_value(v2, new2);
    Some(after - before)
}

/// Whether a delta counts as an improvement.
pub fn improves(delta: Option<f64>) -> bool {
    matches!(delta, Some(d) if d < -IMPROVEMENT_EPSILON)
}
