//! Maps raw per-vehicle node sequences back to pickup points, students and
//! vehicles.

use std::collections::HashMap;

use itertools::Itertools;

use crate::distance::haversine_km;
use crate::error::PlanningError;
use crate::model::{Location, Student};
use crate::problem::Problem;
use crate::response::{RouteSuggestion, StopSuggestion, StudentSummary};
use crate::solution::Solution;
use crate::utils::round2;

/// Decodes solutions of one problem.
pub struct SolutionDecoder<'a> {
    problem: &'a Problem,
    students_by_point: HashMap<u64, Vec<&'a Student>>,
}

impl<'a> SolutionDecoder<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        let students_by_point = problem
            .students
            .iter()
            .filter(|student| student.participates())
            .filter_map(|student| student.pickup_point_id.map(|id| (id, student)))
            .into_group_map();

        SolutionDecoder {
            problem,
            students_by_point,
        }
    }

    /// One suggestion per used vehicle, in fleet order.
    pub fn decode(&self, solution: &Solution) -> Result<Vec<RouteSuggestion>, PlanningError> {
        if !solution.success {
            return Err(PlanningError::SolverFailure(
                "the routing engine returned no assignment".to_string(),
            ));
        }
        if solution.routes.len() > self.problem.vehicle_count() {
            return Err(PlanningError::Unexpected(format!(
                "solution has {} routes for {} vehicles",
                solution.routes.len(),
                self.problem.vehicle_count()
            )));
        }

        let mut suggestions = Vec::new();
        for (vehicle, nodes) in solution.routes.iter().enumerate() {
            if let Some(suggestion) = self.decode_route(vehicle, nodes)? {
                suggestions.push(suggestion);
            }
        }
        Ok(suggestions)
    }

    /// Decode one vehicle's route; `None` when it visits no stop.
    fn decode_route(
        &self,
        vehicle_index: usize,
        nodes: &[usize],
    ) -> Result<Option<RouteSuggestion>, PlanningError> {
        let vehicle = &self.problem.vehicles[vehicle_index];
        let settings = &self.problem.settings;

        let mut stops = Vec::new();
        let mut assigned_students = Vec::new();
        let mut previous: Location = self.problem.depot;
        let mut total_distance = 0.0;

        for &node in nodes.iter().filter(|&&node| node != 0) {
            let point = self.problem.pickup_point(node).ok_or_else(|| {
                PlanningError::Unexpected(format!("route references unknown node {}", node))
            })?;

            let leg = haversine_km(previous, point.location());
            total_distance += leg;
            previous = point.location();

            let students: Vec<StudentSummary> = self
                .students_by_point
                .get(&point.id)
                .map(|riders| riders.iter().map(|s| summarize(s)).collect())
                .unwrap_or_default();
            assigned_students.extend(students.iter().cloned());

            stops.push(StopSuggestion {
                pickup_point_id: point.id,
                description: point.description.clone(),
                latitude: point.latitude,
                longitude: point.longitude,
                sequence_order: stops.len() as u32 + 1,
                student_count: students.len() as u32,
                distance_from_previous_km: round2(leg),
                students,
            });
        }

        if stops.is_empty() {
            return Ok(None);
        }

        let total_students = assigned_students.len() as u32;
        let total_distance_km = round2(total_distance);
        let utilization_pct = if vehicle.capacity == 0 {
            0.0
        } else {
            round2(f64::from(total_students) / f64::from(vehicle.capacity) * 100.0)
        };

        Ok(Some(RouteSuggestion {
            vehicle_id: vehicle.id,
            license_plate: vehicle.license_plate.clone(),
            capacity: vehicle.capacity,
            assigned_students,
            utilization_pct,
            total_students,
            total_distance_km,
            return_to_depot_km: round2(haversine_km(previous, self.problem.depot)),
            estimated_cost: round2(
                total_distance_km * settings.cost_per_km
                    + f64::from(total_students) * settings.cost_per_student,
            ),
            pickup_points: stops,
        }))
    }
}

fn summarize(student: &Student) -> StudentSummary {
    StudentSummary {
        id: student.id,
        first_name: student.first_name.clone(),
        last_name: student.last_name.clone(),
    }
}
