//! Great-circle distances and travel times between depot and pickup points.

use crate::model::Location;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two locations.
pub fn haversine_km(a: Location, b: Location) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Converts distances into travel times at a constant average speed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistanceModel {
    pub average_speed_kmh: f64,
    pub service_time_seconds: i64,
}

impl DistanceModel {
    /// Create a new distance model.
    pub fn new(average_speed_kmh: f64, service_time_seconds: i64) -> Self {
        DistanceModel {
            average_speed_kmh,
            service_time_seconds,
        }
    }

    /// Distance in kilometres.
    pub fn distance_km(&self, a: Location, b: Location) -> f64 {
        haversine_km(a, b)
    }

    /// Pure driving time in seconds.
    pub fn travel_time_seconds(&self, a: Location, b: Location) -> f64 {
        haversine_km(a, b) / self.average_speed_kmh * 3600.0
    }
}

/// Immutable square matrix of integer costs over the node space
/// `{depot, stop_1, .., stop_n}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<i64>,
}

impl DistanceMatrix {
    /// Integer metres between every pair of locations; zero on the diagonal.
    pub fn meters(locations: &[Location]) -> Self {
        Self::build(locations, |a, b| (haversine_km(a, b) * 1000.0).round() as i64)
    }

    /// Transit seconds for the time dimension. Arriving at any node other than
    /// the depot (index 0) adds the service time.
    pub fn transit_seconds(locations: &[Location], model: &DistanceModel) -> Self {
        let mut matrix = Self::build(locations, |a, b| {
            model.travel_time_seconds(a, b).round() as i64
        });

        for from in 0..matrix.size {
            for to in 1..matrix.size {
                if from != to {
                    matrix.values[from * matrix.size + to] += model.service_time_seconds;
                }
            }
        }

        matrix
    }

    /// Build a matrix from an arbitrary arc function.
    pub fn from_fn<F>(size: usize, mut arc: F) -> Self
    where
        F: FnMut(usize, usize) -> i64,
    {
        let mut values = vec![0; size * size];
        for from in 0..size {
            for to in 0..size {
                if from != to {
                    values[from * size + to] = arc(from, to);
                }
            }
        }
        DistanceMatrix { size, values }
    }

    fn build<F>(locations: &[Location], arc: F) -> Self
    where
        F: Fn(Location, Location) -> i64,
    {
        Self::from_fn(locations.len(), |from, to| {
            arc(locations[from], locations[to])
        })
    }

    /// Cost of the arc `from -> to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.values[from * self.size + to]
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.size
    }
}
