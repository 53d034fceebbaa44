//! 2-Opt neighborhood for local search (intra-route).

use super::utils::{improves, shuffled_indices, single_route_delta};
use super::{LocalSearch, Objective};

impl LocalSearch {
    /// Reverse a segment of a single route.
    pub fn two_opt_neighborhood(&mut self, routes: &mut [Vec<usize>], objective: &Objective<'_>) -> bool {
        let route_order = shuffled_indices(&mut self.rng, routes.len());

        for &r_idx in &route_order {
            let n = routes[r_idx].len();
            if n < 3 {
                // Reversing fewer than three stops only mirrors the tour
                continue;
            }

            let positions = shuffled_indices(&mut self.rng, n - 1);
            for &i in &positions {
                for j in i + 1..n {
                    let mut candidate = routes[r_idx].clone();
                    candidate[i..=j].reverse();

                    if improves(single_route_delta(
                        objective,
                        r_idx,
                        &routes[r_idx],
                        &candidate,
                    )) {
                        routes[r_idx] = candidate;
                        self.moves_applied += 1;
                        return true;
                    }
                }
            }
        }

        false
    }
}
