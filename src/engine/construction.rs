//! First-solution construction heuristics.
//!
//! Each heuristic returns one stop sequence per vehicle. Stops a heuristic
//! cannot place are handed to cheapest-insertion repair; stops no vehicle has
//! room for are placed where they overload the fleet least, leaving the
//! search to restore feasibility.

use itertools::Itertools;
use log::debug;

use super::model::RoutingModel;
use crate::config::FirstSolutionStrategy;

const STRATEGIES: [FirstSolutionStrategy; 3] = [
    FirstSolutionStrategy::CheapestArc,
    FirstSolutionStrategy::MostConstrainedArc,
    FirstSolutionStrategy::Savings,
];

/// Starting routes for the search: the preferred strategy's routes if they
/// are feasible, otherwise the first feasible alternative, otherwise the
/// preferred strategy's overloaded routes.
pub fn initial_solution(model: &RoutingModel, preferred: FirstSolutionStrategy) -> Vec<Vec<usize>> {
    let routes = construct(model, preferred);
    if model.is_solution_feasible(&routes) {
        return routes;
    }

    for strategy in STRATEGIES.into_iter().filter(|&s| s != preferred) {
        let alternative = construct(model, strategy);
        if model.is_solution_feasible(&alternative) {
            debug!("{:?} overloaded the fleet; starting from {:?}", preferred, strategy);
            return alternative;
        }
    }

    debug!("No construction is feasible; starting from overloaded routes");
    routes
}

/// Assign every stop to some vehicle. The routes are feasible unless some stop
/// fits nowhere.
pub fn construct(model: &RoutingModel, strategy: FirstSolutionStrategy) -> Vec<Vec<usize>> {
    let mut routes = match strategy {
        FirstSolutionStrategy::CheapestArc => path_construction(model, ArcSelector::Cheapest),
        FirstSolutionStrategy::MostConstrainedArc => {
            path_construction(model, ArcSelector::MostConstrained)
        }
        FirstSolutionStrategy::Savings => savings(model),
    };

    let mut placed = vec![false; model.stop_count()];
    for &stop in routes.iter().flatten() {
        placed[stop] = true;
    }
    let unassigned: Vec<usize> = (0..model.stop_count()).filter(|&s| !placed[s]).collect();

    if !unassigned.is_empty() {
        debug!(
            "{:?} left {} stop(s) unassigned; repairing by cheapest insertion",
            strategy,
            unassigned.len()
        );
    }

    insert_remaining(model, &mut routes, unassigned);
    routes
}

/// How a path-building heuristic picks the next arc.
#[derive(Debug, Clone, Copy)]
enum ArcSelector {
    /// Lowest arc cost
    Cheapest,
    /// Highest demand at the arc's head, then lowest arc cost
    MostConstrained,
}

/// Vehicle order for path building: largest capacity first, then fleet order.
fn vehicles_by_capacity(model: &RoutingModel) -> Vec<usize> {
    (0..model.vehicle_count())
        .sorted_by_key(|&v| std::cmp::Reverse(model.capacity(v)))
        .collect()
}

/// Grow one route per vehicle from the depot, always extending from the last
/// node by the best feasible arc until no unvisited stop fits.
fn path_construction(model: &RoutingModel, selector: ArcSelector) -> Vec<Vec<usize>> {
    let mut routes = vec![Vec::new(); model.vehicle_count()];
    let mut visited = vec![false; model.stop_count()];

    for vehicle in vehicles_by_capacity(model) {
        let mut route: Vec<usize> = Vec::new();

        loop {
            let last_node = route
                .last()
                .map_or(0, |&stop| model.manager().node(stop));

            let next = (0..model.stop_count())
                .filter(|&stop| !visited[stop])
                .filter(|&stop| {
                    route.push(stop);
                    let feasible = model.is_feasible(vehicle, &route);
                    route.pop();
                    feasible
                })
                .min_by_key(|&stop| {
                    let cost = model.arc_cost(last_node, model.manager().node(stop));
                    match selector {
                        ArcSelector::Cheapest => (0, cost, stop),
                        ArcSelector::MostConstrained => (-model.demand(stop), cost, stop),
                    }
                });

            match next {
                Some(stop) => {
                    visited[stop] = true;
                    route.push(stop);
                }
                None => break,
            }
        }

        routes[vehicle] = route;
    }

    routes
}

/// Clarke-Wright savings for a heterogeneous fleet.
///
/// Routes are merged while some vehicle could still drive the merged route;
/// the merged routes are then matched to vehicles, most loaded first, each
/// taking the smallest free vehicle it fits.
fn savings(model: &RoutingModel) -> Vec<Vec<usize>> {
    let n = model.stop_count();

    let pairs: Vec<(i64, usize, usize)> = (0..n)
        .tuple_combinations()
        .map(|(i, j)| {
            let saving = model.depot_cost(i) + model.depot_cost(j) - model.stop_cost(i, j);
            (saving, i, j)
        })
        .filter(|&(saving, _, _)| saving > 0)
        .sorted_by(|a, b| b.0.cmp(&a.0).then((a.1, a.2).cmp(&(b.1, b.2))))
        .collect();

    let mut route_of: Vec<usize> = (0..n).collect();
    let mut members: Vec<Vec<usize>> = (0..n)
        .map(|stop| {
            if model.fits_any_vehicle(&[stop]) {
                vec![stop]
            } else {
                Vec::new()
            }
        })
        .collect();

    for &(_, i, j) in &pairs {
        let (ri, rj) = (route_of[i], route_of[j]);
        if ri == rj || members[ri].is_empty() || members[rj].is_empty() {
            continue;
        }

        let i_at_end = members[ri].last() == Some(&i);
        let i_at_start = members[ri].first() == Some(&i);
        let j_at_start = members[rj].first() == Some(&j);
        let j_at_end = members[rj].last() == Some(&j);

        let merged: Vec<usize> = if i_at_end && j_at_start {
            members[ri].iter().chain(&members[rj]).copied().collect()
        } else if j_at_end && i_at_start {
            members[rj].iter().chain(&members[ri]).copied().collect()
        } else if i_at_end && j_at_end {
            members[ri].iter().chain(members[rj].iter().rev()).copied().collect()
        } else if i_at_start && j_at_start {
            members[ri].iter().rev().chain(&members[rj]).copied().collect()
        } else {
            continue;
        };

        if !model.fits_any_vehicle(&merged) {
            continue;
        }

        for &stop in &merged {
            route_of[stop] = ri;
        }
        members[ri] = merged;
        members[rj].clear();
    }

    assign_to_vehicles(model, members)
}

/// Give each route the smallest free vehicle that can drive it.
fn assign_to_vehicles(model: &RoutingModel, candidates: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    let mut routes = vec![Vec::new(); model.vehicle_count()];
    let mut free: Vec<usize> = (0..model.vehicle_count())
        .sorted_by_key(|&v| (model.capacity(v), v))
        .collect();

    let candidates = candidates
        .into_iter()
        .filter(|stops| !stops.is_empty())
        .sorted_by_key(|stops| std::cmp::Reverse(model.route_load(stops)));

    for stops in candidates {
        if let Some(slot) = free
            .iter()
            .position(|&vehicle| model.is_feasible(vehicle, &stops))
        {
            let vehicle = free.remove(slot);
            routes[vehicle] = stops;
        }
    }

    routes
}

/// Insert each unassigned stop, most demanding first, at its cheapest feasible
/// position across all vehicles. A stop without any feasible position goes
/// where it adds the least overshoot, then the least cost.
fn insert_remaining(model: &RoutingModel, routes: &mut [Vec<usize>], unassigned: Vec<usize>) {
    let ordered = unassigned
        .into_iter()
        .sorted_by_key(|&stop| (std::cmp::Reverse(model.demand(stop)), stop));

    for stop in ordered {
        let mut best: Option<((i64, i64), usize, usize)> = None;

        for (vehicle, stops) in routes.iter().enumerate() {
            let current_cost = model.route_cost(vehicle, stops);
            let current_excess = model.route_excess(vehicle, stops);
            for pos in 0..=stops.len() {
                let mut candidate = stops.clone();
                candidate.insert(pos, stop);
                let key = (
                    model.route_excess(vehicle, &candidate) - current_excess,
                    model.route_cost(vehicle, &candidate) - current_cost,
                );
                if best.map_or(true, |(best_key, _, _)| key < best_key) {
                    best = Some((key, vehicle, pos));
                }
            }
        }

        if let Some(((excess, _), vehicle, pos)) = best {
            if excess > 0 {
                debug!("Stop {} overloads vehicle {} by {}", stop, vehicle, excess);
            }
            routes[vehicle].insert(pos, stop);
        }
    }
}
