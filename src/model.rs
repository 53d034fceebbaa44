//! Business entities consumed by the planner: students, pickup points, vehicles
//! and the school depot.

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Create a new location.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
        }
    }
}

/// Lifecycle status shared by students, pickup points and vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

/// A place where students wait for the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPoint {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
}

impl PickupPoint {
    /// Create an active pickup point.
    pub fn new(id: u64, latitude: f64, longitude: f64, description: &str) -> Self {
        PickupPoint {
            id,
            latitude,
            longitude,
            description: description.to_string(),
            status: Status::Active,
        }
    }

    /// The point's position.
    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }
}

/// A student who may ride the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub pickup_point_id: Option<u64>,
    #[serde(default)]
    pub status: Status,
}

impl Student {
    /// Create an active student assigned to a pickup point.
    pub fn new(id: u64, pickup_point_id: u64) -> Self {
        Student {
            id,
            first_name: String::new(),
            last_name: String::new(),
            pickup_point_id: Some(pickup_point_id),
            status: Status::Active,
        }
    }

    /// Set the student's name.
    pub fn with_name(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self.last_name = last_name.to_string();
        self
    }

    /// Only active students with a pickup point take part in planning.
    pub fn participates(&self) -> bool {
        self.status == Status::Active && self.pickup_point_id.is_some()
    }
}

/// A bus with a fixed number of seats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: u64,
    #[serde(default)]
    pub license_plate: String,
    pub capacity: u32,
    #[serde(default)]
    pub status: Status,
}

impl Vehicle {
    /// Create an active vehicle.
    pub fn new(id: u64, capacity: u32) -> Self {
        Vehicle {
            id,
            license_plate: String::new(),
            capacity,
            status: Status::Active,
        }
    }

    /// Set the license plate.
    pub fn with_license_plate(mut self, plate: &str) -> Self {
        self.license_plate = plate.to_string();
        self
    }
}
