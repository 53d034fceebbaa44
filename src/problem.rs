//! Routing problem definition: depot, stops, demands and fleet.

use crate::config::Settings;
use crate::demand::node_demands;
use crate::distance::DistanceModel;
use crate::model::{Location, PickupPoint, Student, Vehicle};
use serde::{Deserialize, Serialize};

/// Bounds of the optional route-duration dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowConfig {
    pub service_time_seconds: i64,
    /// Waiting allowed at a stop. Accepted for completeness; routes carry only
    /// upper duration bounds, so waiting never makes a route feasible and the
    /// engine plans without it.
    pub slack_seconds: i64,
    pub max_route_duration_seconds: i64,
}

/// A single-depot, multi-vehicle routing problem.
///
/// Node 0 is the school; node `i > 0` is `pickup_points[i - 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub depot: Location,
    pub pickup_points: Vec<PickupPoint>,
    /// Participating students only
    pub students: Vec<Student>,
    /// Vehicles in fleet order; vehicle `v` has capacity `vehicle_capacities[v]`
    pub vehicles: Vec<Vehicle>,
    pub demands: Vec<i64>,
    pub vehicle_capacities: Vec<i64>,
    pub distance_model: DistanceModel,
    pub time_windows: Option<TimeWindowConfig>,
    pub settings: Settings,
}

impl Problem {
    /// Assemble a problem. Callers are expected to have filtered the inputs to
    /// the participating entities.
    pub fn new(
        depot: Location,
        pickup_points: Vec<PickupPoint>,
        students: Vec<Student>,
        vehicles: Vec<Vehicle>,
        settings: Settings,
    ) -> Self {
        let demands = node_demands(&pickup_points, &students);
        let vehicle_capacities = vehicles.iter().map(|v| i64::from(v.capacity)).collect();
        let distance_model =
            DistanceModel::new(settings.average_speed_kmh, settings.service_time_seconds);
        let time_windows = settings.use_time_windows.then(|| TimeWindowConfig {
            service_time_seconds: settings.service_time_seconds,
            slack_seconds: settings.slack_time_seconds,
            max_route_duration_seconds: settings.max_route_duration_seconds,
        });

        Problem {
            depot,
            pickup_points,
            students,
            vehicles,
            demands,
            vehicle_capacities,
            distance_model,
            time_windows,
            settings,
        }
    }

    /// Number of nodes including the depot.
    pub fn node_count(&self) -> usize {
        self.pickup_points.len() + 1
    }

    /// Number of vehicles in the fleet.
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Locations of every node, depot first.
    pub fn locations(&self) -> Vec<Location> {
        std::iter::once(self.depot)
            .chain(self.pickup_points.iter().map(PickupPoint::location))
            .collect()
    }

    /// Location of a node.
    pub fn location(&self, node: usize) -> Option<Location> {
        if node == 0 {
            Some(self.depot)
        } else {
            self.pickup_point(node).map(PickupPoint::location)
        }
    }

    /// Pickup point behind a non-depot node.
    pub fn pickup_point(&self, node: usize) -> Option<&PickupPoint> {
        node.checked_sub(1).and_then(|i| self.pickup_points.get(i))
    }

    pub fn total_demand(&self) -> i64 {
        self.demands.iter().sum()
    }

    pub fn total_capacity(&self) -> i64 {
        self.vehicle_capacities.iter().sum()
    }

    pub fn max_demand(&self) -> i64 {
        self.demands.iter().copied().max().unwrap_or(0)
    }

    pub fn max_capacity(&self) -> i64 {
        self.vehicle_capacities.iter().copied().max().unwrap_or(0)
    }
}
