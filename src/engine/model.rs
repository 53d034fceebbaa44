//! Immutable cost, demand and dimension model the search evaluates against.

use super::index_manager::IndexManager;
use crate::distance::DistanceMatrix;
use crate::problem::Problem;
use itertools::Itertools;

/// A cumulative per-vehicle quantity tracked along a route.
///
/// The cumul starts at zero at the vehicle's start and grows by
/// `transit(from, to)` on every arc; it must stay within `[0, capacity]`.
/// Transits are never negative, so the cumul peaks at the vehicle's end.
#[derive(Debug, Clone)]
pub struct Dimension {
    pub name: &'static str,
    transits: DistanceMatrix,
    capacities: Vec<i64>,
}

impl Dimension {
    /// Create a dimension with one upper bound per vehicle.
    pub fn new(name: &'static str, transits: DistanceMatrix, capacities: Vec<i64>) -> Self {
        Dimension {
            name,
            transits,
            capacities,
        }
    }

    /// Dimension whose transit is the quantity picked up at the origin node.
    pub fn unary(name: &'static str, values: &[i64], capacities: Vec<i64>) -> Self {
        let transits = DistanceMatrix::from_fn(values.len(), |from, _| values[from]);
        Dimension::new(name, transits, capacities)
    }

    pub fn capacity(&self, vehicle: usize) -> i64 {
        self.capacities.get(vehicle).copied().unwrap_or(0)
    }

    /// Whether the node sequence keeps every cumul within the vehicle's bound.
    pub fn fits(&self, vehicle: usize, arcs: impl Iterator<Item = (usize, usize)>) -> bool {
        let capacity = self.capacity(vehicle);
        let mut cumul = 0i64;
        for (from, to) in arcs {
            cumul += self.transits.get(from, to);
            if cumul < 0 || cumul > capacity {
                return false;
            }
        }
        true
    }

    /// How far the peak cumul overshoots the vehicle's bound; zero when the
    /// sequence fits.
    pub fn excess(&self, vehicle: usize, arcs: impl Iterator<Item = (usize, usize)>) -> i64 {
        let peak = arcs
            .scan(0i64, |cumul, (from, to)| {
                *cumul += self.transits.get(from, to);
                Some(*cumul)
            })
            .max()
            .unwrap_or(0);
        (peak - self.capacity(vehicle)).max(0)
    }
}

/// Search model built fresh for every solve.
#[derive(Debug, Clone)]
pub struct RoutingModel {
    manager: IndexManager,
    costs: DistanceMatrix,
    demands: Vec<i64>,
    capacity: Dimension,
    time: Option<Dimension>,
}

impl RoutingModel {
    /// Build the model: metre costs, a capacity dimension and, when the
    /// problem enables it, a route-duration dimension.
    pub fn new(problem: &Problem) -> Self {
        let manager = IndexManager::new(problem);
        let locations = problem.locations();
        let costs = DistanceMatrix::meters(&locations);
        let capacity = Dimension::unary(
            "capacity",
            &problem.demands,
            problem.vehicle_capacities.clone(),
        );
        let time = problem.time_windows.map(|config| {
            Dimension::new(
                "time",
                DistanceMatrix::transit_seconds(&locations, &problem.distance_model),
                vec![config.max_route_duration_seconds; problem.vehicle_count()],
            )
        });

        RoutingModel {
            manager,
            costs,
            demands: problem.demands.clone(),
            capacity,
            time,
        }
    }

    pub fn manager(&self) -> &IndexManager {
        &self.manager
    }

    pub fn stop_count(&self) -> usize {
        self.manager.stop_count()
    }

    pub fn vehicle_count(&self) -> usize {
        self.manager.vehicle_count()
    }

    /// Number of problem nodes, depot included.
    pub fn node_count(&self) -> usize {
        self.costs.size()
    }

    /// Cost in metres between two problem nodes.
    #[inline]
    pub fn arc_cost(&self, from_node: usize, to_node: usize) -> i64 {
        self.costs.get(from_node, to_node)
    }

    /// Cost between two stop indices.
    pub fn stop_cost(&self, from: usize, to: usize) -> i64 {
        self.arc_cost(self.manager.node(from), self.manager.node(to))
    }

    /// Cost from the depot to a stop index.
    pub fn depot_cost(&self, stop: usize) -> i64 {
        self.arc_cost(0, self.manager.node(stop))
    }

    /// Demand at a stop index.
    pub fn demand(&self, stop: usize) -> i64 {
        self.demands[self.manager.node(stop)]
    }

    /// Seat capacity of a vehicle.
    pub fn capacity(&self, vehicle: usize) -> i64 {
        self.capacity.capacity(vehicle)
    }

    /// The capacity dimension followed by the optional time dimension.
    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        std::iter::once(&self.capacity).chain(self.time.iter())
    }

    /// Node-level arcs of a route, from the vehicle's start to its end.
    pub fn route_arcs<'a>(
        &'a self,
        vehicle: usize,
        stops: &'a [usize],
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        std::iter::once(self.manager.start(vehicle))
            .chain(stops.iter().copied())
            .chain(std::iter::once(self.manager.end(vehicle)))
            .map(move |index| self.manager.node(index))
            .tuple_windows()
    }

    /// Total cost of a route, zero when the vehicle is unused.
    pub fn route_cost(&self, vehicle: usize, stops: &[usize]) -> i64 {
        if stops.is_empty() {
            return 0;
        }
        self.route_arcs(vehicle, stops)
            .map(|(from, to)| self.arc_cost(from, to))
            .sum()
    }

    /// Seats taken on a route.
    pub fn route_load(&self, stops: &[usize]) -> i64 {
        stops.iter().map(|&stop| self.demand(stop)).sum()
    }

    /// Whether a route satisfies every dimension for the vehicle.
    pub fn is_feasible(&self, vehicle: usize, stops: &[usize]) -> bool {
        if stops.is_empty() {
            return true;
        }
        self.dimensions()
            .all(|dimension| dimension.fits(vehicle, self.route_arcs(vehicle, stops)))
    }

    /// Summed overshoot of every dimension; zero exactly when the route is
    /// feasible.
    pub fn route_excess(&self, vehicle: usize, stops: &[usize]) -> i64 {
        if stops.is_empty() {
            return 0;
        }
        self.dimensions()
            .map(|dimension| dimension.excess(vehicle, self.route_arcs(vehicle, stops)))
            .sum()
    }

    /// Overshoot of the whole solution per dimension, by name.
    pub fn excess_by_dimension(&self, routes: &[Vec<usize>]) -> Vec<(&'static str, i64)> {
        self.dimensions()
            .map(|dimension| {
                let excess = routes
                    .iter()
                    .enumerate()
                    .filter(|(_, stops)| !stops.is_empty())
                    .map(|(vehicle, stops)| dimension.excess(vehicle, self.route_arcs(vehicle, stops)))
                    .sum();
                (dimension.name, excess)
            })
            .collect()
    }

    /// Whether every route is feasible for its vehicle.
    pub fn is_solution_feasible(&self, routes: &[Vec<usize>]) -> bool {
        routes
            .iter()
            .enumerate()
            .all(|(vehicle, stops)| self.is_feasible(vehicle, stops))
    }

    /// Whether some vehicle could drive the route.
    pub fn fits_any_vehicle(&self, stops: &[usize]) -> bool {
        (0..self.vehicle_count()).any(|vehicle| self.is_feasible(vehicle, stops))
    }

    /// Total cost of all routes.
    pub fn solution_cost(&self, routes: &[Vec<usize>]) -> i64 {
        routes
            .iter()
            .enumerate()
            .map(|(vehicle, stops)| self.route_cost(vehicle, stops))
            .sum()
    }
}
