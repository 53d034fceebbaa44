//! Relocate neighborhood for local search.

use super::utils::{improves, route_pair_delta, shuffled_indices, single_route_delta};
use super::{LocalSearch, Objective};

impl LocalSearch {
    /// Move a single stop to a better position, in its own route or another
    /// vehicle's route (possibly an unused one).
    pub fn relocate_neighborhood(
        &mut self,
        routes: &mut [Vec<usize>],
        objective: &Objective<'_>,
    ) -> bool {
        let route_order = shuffled_indices(&mut self.rng, routes.len());

        for &r1 in &route_order {
            if routes[r1].is_empty() {
                continue;
            }

            let positions = shuffled_indices(&mut self.rng, routes[r1].len());
            for &pos in &positions {
                if let Some((r2, insert_pos)) = self.find_relocation(routes, objective, r1, pos) {
                    self.apply_relocate(routes, r1, pos, r2, insert_pos);
                    self.moves_applied += 1;
                    return true;
                }
            }
        }

        false
    }

    /// First improving destination for the stop at `routes[r1][pos]`.
    ///
    /// The returned insert position refers to the destination route after the
    /// stop has been removed from its origin.
    fn find_relocation(
        &self,
        routes: &[Vec<usize>],
        objective: &Objective<'_>,
        r1: usize,
        pos: usize,
    ) -> Option<(usize, usize)> {
        let stop = routes[r1][pos];
        let mut reduced = routes[r1].clone();
        reduced.remove(pos);

        // Same route, different position
        for insert_pos in 0..=reduced.len() {
            if insert_pos == pos {
                continue;
            }
            let mut candidate = reduced.clone();
            candidate.insert(insert_pos, stop);
            if improves(single_route_delta(objective, r1, &routes[r1], &candidate)) {
                return Some((r1, insert_pos));
            }
        }

        for (r2, target) in routes.iter().enumerate() {
            if r2 == r1 {
                continue;
            }
            for insert_pos in 0..=target.len() {
                let mut candidate = target.clone();
                candidate.insert(insert_pos, stop);
                let delta = route_pair_delta(
                    objective,
                    (r1, &routes[r1], &reduced),
                    (r2, target, &candidate),
                );
                if improves(delta) {
                    return Some((r2, insert_pos));
                }
            }
        }

        None
    }

    /// Apply a Relocate move.
    fn apply_relocate(
        &self,
        routes: &mut [Vec<usize>],
        r1: usize,
        pos: usize,
        r2: usize,
        insert_pos: usize,
    ) {
        let stop = routes[r1].remove(pos);
        routes[r2].insert(insert_pos, stop);
    }
}
