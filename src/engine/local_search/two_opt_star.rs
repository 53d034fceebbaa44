//! 2-Opt* neighborhood for local search (inter-route tail exchange).

use super::utils::{improves, route_pair_delta, shuffled_indices};
use super::{LocalSearch, Objective};

impl LocalSearch {
    /// Exchange the tails of two routes.
    pub fn two_opt_star_neighborhood(
        &mut self,
        routes: &mut [Vec<usize>],
        objective: &Objective<'_>,
    ) -> bool {
        let route_order = shuffled_indices(&mut self.rng, routes.len());

        for (k, &r1) in route_order.iter().enumerate() {
            for &r2 in &route_order[k + 1..] {
                if routes[r1].is_empty() && routes[r2].is_empty() {
                    continue;
                }

                if let Some((first, second)) = self.find_tail_exchange(routes, objective, r1, r2) {
                    routes[r1] = first;
                    routes[r2] = second;
                    self.moves_applied += 1;
                    return true;
                }
            }
        }

        false
    }

    /// First improving cut pair for routes `r1` and `r2`.
    fn find_tail_exchange(
        &self,
        routes: &[Vec<usize>],
        objective: &Objective<'_>,
        r1: usize,
        r2: usize,
    ) -> Option<(Vec<usize>, Vec<usize>)> {
        let (n1, n2) = (routes[r1].len(), routes[r2].len());

        for i in 0..=n1 {
            for j in 0..=n2 {
                // Exchanging nothing or everything leaves the routes as they are
                if (i == n1 && j == n2) || (i == 0 && j == 0) {
                    continue;
                }

                let first: Vec<usize> = routes[r1][..i]
                    .iter()
                    .chain(&routes[r2][j..])
                    .copied()
                    .collect();
                let second: Vec<usize> = routes[r2][..j]
                    .iter()
                    .chain(&routes[r1][i..])
                    .copied()
                    .collect();

                let delta = route_pair_delta(
                    objective,
                    (r1, &routes[r1], &first),
                    (r2, &routes[r2], &second),
                );
                if improves(delta) {
                    return Some((first, second));
                }
            }
        }

        None
    }
}
