//! Gathers planning data, runs the feasibility pre-checks and assembles a
//! [`Problem`].
//!
//! Pre-checks run in a fixed order and stop at the first failure:
//! settings, students, pickup points, vehicles, unique pickup point ids,
//! aggregate capacity, single stop capacity.

use std::collections::HashSet;

use log::{info, warn};

use crate::config::Settings;
use crate::error::PlanningError;
use crate::model::{Location, PickupPoint, Student, Vehicle};
use crate::problem::Problem;
use crate::source::RoutingDataSource;

/// Builds validated problems from collaborator data.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    settings: Settings,
}

impl ProblemBuilder {
    pub fn new(settings: Settings) -> Self {
        ProblemBuilder { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Query the data source and build a problem.
    pub fn from_source<S: RoutingDataSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Problem, PlanningError> {
        let students = source.active_students()?;
        let pickup_points = source.active_pickup_points()?;
        let vehicles = source.available_vehicles()?;
        let depot = source.school_location()?;

        self.build(depot, pickup_points, students, vehicles)
    }

    /// Validate the inputs and assemble a problem.
    pub fn build(
        &self,
        depot: Location,
        pickup_points: Vec<PickupPoint>,
        students: Vec<Student>,
        vehicles: Vec<Vehicle>,
    ) -> Result<Problem, PlanningError> {
        self.validate_settings()?;

        let students: Vec<Student> = students.into_iter().filter(Student::participates).collect();
        if students.is_empty() {
            return Err(PlanningError::InsufficientData(
                "no active students with an assigned pickup point".to_string(),
            ));
        }
        if pickup_points.is_empty() {
            return Err(PlanningError::InsufficientData(
                "no active pickup points".to_string(),
            ));
        }
        if vehicles.is_empty() {
            return Err(PlanningError::InsufficientData(
                "no available vehicles".to_string(),
            ));
        }

        let mut point_ids: HashSet<u64> = HashSet::with_capacity(pickup_points.len());
        if let Some(duplicate) = pickup_points.iter().find(|p| !point_ids.insert(p.id)) {
            return Err(PlanningError::InsufficientData(format!(
                "pickup point {} appears more than once",
                duplicate.id
            )));
        }

        let (students, stranded): (Vec<Student>, Vec<Student>) = students
            .into_iter()
            .partition(|s| s.pickup_point_id.is_some_and(|id| point_ids.contains(&id)));
        if !stranded.is_empty() {
            warn!(
                "Ignoring {} student(s) assigned to inactive or unknown pickup points",
                stranded.len()
            );
        }
        if students.is_empty() {
            return Err(PlanningError::InsufficientData(
                "no students are assigned to an active pickup point".to_string(),
            ));
        }

        let problem = Problem::new(
            depot,
            pickup_points,
            students,
            vehicles,
            self.settings.clone(),
        );

        check_total_capacity(&problem)?;
        check_stop_capacity(&problem)?;

        info!(
            "Prepared problem: {} students, {} pickup points, {} vehicles ({} seats)",
            problem.total_demand(),
            problem.pickup_points.len(),
            problem.vehicle_count(),
            problem.total_capacity()
        );

        Ok(problem)
    }

    fn validate_settings(&self) -> Result<(), PlanningError> {
        let speed = self.settings.average_speed_kmh;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlanningError::InvalidSettings(format!(
                "average speed must be positive, got {} km/h",
                speed
            )));
        }
        Ok(())
    }
}

/// Aggregate demand must fit in the aggregate fleet.
fn check_total_capacity(problem: &Problem) -> Result<(), PlanningError> {
    let total_demand = problem.total_demand();
    let total_capacity = problem.total_capacity();
    if total_demand <= total_capacity {
        return Ok(());
    }

    let deficit = total_demand - total_capacity;
    let max_capacity = problem.max_capacity();
    let per_vehicle = max_capacity.max(1);
    let extra_vehicles = (deficit + per_vehicle - 1) / per_vehicle;

    Err(PlanningError::InfeasibleCapacity {
        total_demand,
        total_capacity,
        deficit,
        extra_vehicles,
        max_capacity,
    })
}

/// A stop's students always ride together, so the busiest stop must fit in
/// the largest vehicle.
fn check_stop_capacity(problem: &Problem) -> Result<(), PlanningError> {
    let max_capacity = problem.max_capacity();
    let busiest = problem
        .demands
        .iter()
        .enumerate()
        .skip(1)
        .max_by_key(|&(node, &demand)| (demand, std::cmp::Reverse(node)));

    match busiest {
        Some((node, &demand)) if demand > max_capacity => Err(PlanningError::InfeasibleStop {
            pickup_point_id: problem.pickup_point(node).map_or(0, |p| p.id),
            demand,
            max_capacity,
        }),
        _ => Ok(()),
    }
}
