//! Read-only collaborator queries and an in-memory snapshot implementing them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DataSourceError;
use crate::model::{Location, PickupPoint, Status, Student, Vehicle};

/// Queries the planner needs from the persistence layer.
pub trait RoutingDataSource: Send + Sync {
    /// Active students that have a pickup point.
    fn active_students(&self) -> Result<Vec<Student>, DataSourceError>;

    /// Active pickup points.
    fn active_pickup_points(&self) -> Result<Vec<PickupPoint>, DataSourceError>;

    /// Vehicles available for service.
    fn available_vehicles(&self) -> Result<Vec<Vehicle>, DataSourceError>;

    /// The school, used as depot.
    fn school_location(&self) -> Result<Location, DataSourceError>;
}

/// A point-in-time copy of everything a plan needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingSnapshot {
    pub school_location: Option<Location>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub pickup_points: Vec<PickupPoint>,
    #[serde(default)]
    pub students: Vec<Student>,
}

impl RoutingSnapshot {
    /// Create a snapshot.
    pub fn new(
        school_location: Location,
        vehicles: Vec<Vehicle>,
        pickup_points: Vec<PickupPoint>,
        students: Vec<Student>,
    ) -> Self {
        RoutingSnapshot {
            school_location: Some(school_location),
            vehicles,
            pickup_points,
            students,
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DataSourceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| DataSourceError {
            query: "snapshot",
            message: format!("{}: {}", path.display(), err),
        })?;
        serde_json::from_str(&content).map_err(|err| DataSourceError {
            query: "snapshot",
            message: format!("{}: {}", path.display(), err),
        })
    }
}

impl RoutingDataSource for RoutingSnapshot {
    fn active_students(&self) -> Result<Vec<Student>, DataSourceError> {
        Ok(self
            .students
            .iter()
            .filter(|student| student.participates())
            .cloned()
            .collect())
    }

    fn active_pickup_points(&self) -> Result<Vec<PickupPoint>, DataSourceError> {
        Ok(self
            .pickup_points
            .iter()
            .filter(|point| point.status == Status::Active)
            .cloned()
            .collect())
    }

    fn available_vehicles(&self) -> Result<Vec<Vehicle>, DataSourceError> {
        Ok(self
            .vehicles
            .iter()
            .filter(|vehicle| vehicle.status == Status::Active)
            .cloned()
            .collect())
    }

    fn school_location(&self) -> Result<Location, DataSourceError> {
        self.school_location.ok_or_else(|| DataSourceError {
            query: "school_location",
            message: "no school location configured".to_string(),
        })
    }
}
