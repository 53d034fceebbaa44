//! Mapping between the solver's index space and problem nodes.

use crate::problem::Problem;

/// Solver index layout: stops first (`0..stop_count`), then one start and one
/// end index per vehicle. Start and end indices all map to the depot node.
#[derive(Debug, Clone)]
pub struct IndexManager {
    stop_count: usize,
    vehicle_count: usize,
    index_to_node: Vec<usize>,
    pickup_point_ids: Vec<Option<u64>>,
}

impl IndexManager {
    /// Build the mapping for a problem.
    pub fn new(problem: &Problem) -> Self {
        let stop_count = problem.pickup_points.len();
        let vehicle_count = problem.vehicle_count();

        let mut index_to_node: Vec<usize> = (1..=stop_count).collect();
        index_to_node.extend(std::iter::repeat(0).take(2 * vehicle_count));

        let pickup_point_ids = index_to_node
            .iter()
            .map(|&node| problem.pickup_point(node).map(|p| p.id))
            .collect();

        IndexManager {
            stop_count,
            vehicle_count,
            index_to_node,
            pickup_point_ids,
        }
    }

    /// Number of stop indices.
    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    /// Total size of the index space.
    pub fn len(&self) -> usize {
        self.index_to_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_node.is_empty()
    }

    /// Start index of a vehicle.
    pub fn start(&self, vehicle: usize) -> usize {
        self.stop_count + vehicle
    }

    /// End index of a vehicle.
    pub fn end(&self, vehicle: usize) -> usize {
        self.stop_count + self.vehicle_count + vehicle
    }

    /// Whether the index is a vehicle start or end.
    pub fn is_depot(&self, index: usize) -> bool {
        index >= self.stop_count
    }

    /// Problem node behind a solver index.
    pub fn node(&self, index: usize) -> usize {
        self.index_to_node[index]
    }

    /// Pickup point ID served at a solver index.
    pub fn pickup_point_id(&self, index: usize) -> Option<u64> {
        self.pickup_point_ids.get(index).copied().flatten()
    }

    /// Pickup point IDs along a vehicle's stop indices.
    pub fn pickup_point_ids(&self, stops: &[usize]) -> Vec<u64> {
        stops
            .iter()
            .filter_map(|&index| self.pickup_point_id(index))
            .collect()
    }

    /// Problem node sequence for a vehicle's stop indices, depot at both ends.
    pub fn to_nodes(&self, vehicle: usize, stops: &[usize]) -> Vec<usize> {
        std::iter::once(self.start(vehicle))
            .chain(stops.iter().copied())
            .chain(std::iter::once(self.end(vehicle)))
            .map(|index| self.node(index))
            .collect()
    }
}
