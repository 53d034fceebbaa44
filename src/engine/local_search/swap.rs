//! Swap neighborhood for local search.

use super::utils::{improves, route_pair_delta, shuffled_indices, single_route_delta};
use super::{LocalSearch, Objective};

impl LocalSearch {
    /// Exchange the positions of two stops, within one route or across two.
    pub fn swap_neighborhood(&mut self, routes: &mut [Vec<usize>], objective: &Objective<'_>) -> bool {
        let route_order = shuffled_indices(&mut self.rng, routes.len());

        for &r1 in &route_order {
            let positions = shuffled_indices(&mut self.rng, routes[r1].len());

            for &p1 in &positions {
                for r2 in r1..routes.len() {
                    let start = if r2 == r1 { p1 + 1 } else { 0 };

                    for p2 in start..routes[r2].len() {
                        if self.evaluate_swap(routes, objective, (r1, p1), (r2, p2)) {
                            self.apply_swap(routes, (r1, p1), (r2, p2));
                            self.moves_applied += 1;
                            return true;
                        }
                    }
                }
            }
        }

        false
    }

    /// Whether swapping the two stops improves the objective feasibly.
    fn evaluate_swap(
        &self,
        routes: &[Vec<usize>],
        objective: &Objective<'_>,
        (r1, p1): (usize, usize),
        (r2, p2): (usize, usize),
    ) -> bool {
        if r1 == r2 {
            let mut candidate = routes[r1].clone();
            candidate.swap(p1, p2);
            return improves(single_route_delta(objective, r1, &routes[r1], &candidate));
        }

        let mut first = routes[r1].clone();
        let mut second = routes[r2].clone();
        std::mem::swap(&mut first[p1], &mut second[p2]);

        improves(route_pair_delta(
            objective,
            (r1, &routes[r1], &first),
            (r2, &routes[r2], &second),
        ))
    }

    /// Apply a Swap move.
    fn apply_swap(&self, routes: &mut [Vec<usize>], (r1, p1): (usize, usize), (r2, p2): (usize, usize)) {
        if r1 == r2 {
            routes[r1].swap(p1, p2);
        } else {
            let stop = routes[r1][p1];
            routes[r1][p1] = routes[r2][p2];
            routes[r2][p2] = stop;
        }
    }
}
