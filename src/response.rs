//! Response documents returned to collaborators.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{FailureKind, PlanningError};

/// Student riding the bus, as shown in a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
}

/// One stop of a suggested route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSuggestion {
    pub pickup_point_id: u64,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Visiting order, starting at 1
    pub sequence_order: u32,
    pub student_count: u32,
    pub distance_from_previous_km: f64,
    pub students: Vec<StudentSummary>,
}

/// A vehicle's suggested route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSuggestion {
    pub vehicle_id: u64,
    pub license_plate: String,
    pub capacity: u32,
    /// Students in boarding order
    pub assigned_students: Vec<StudentSummary>,
    pub utilization_pct: f64,
    pub total_students: u32,
    /// Depot to the last stop, through every stop
    pub total_distance_km: f64,
    /// Last stop back to the school
    pub return_to_depot_km: f64,
    pub estimated_cost: f64,
    pub pickup_points: Vec<StopSuggestion>,
}

/// Uniform answer to a planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSuggestionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    pub generated_at: Timestamp,
    pub total_routes: usize,
    pub routes: Vec<RouteSuggestion>,
}

impl RouteSuggestionResponse {
    /// Successful response carrying the routes.
    pub fn success(routes: Vec<RouteSuggestion>) -> Self {
        RouteSuggestionResponse {
            success: true,
            message: format!("Generated {} route suggestion(s)", routes.len()),
            failure: None,
            generated_at: Timestamp::now(),
            total_routes: routes.len(),
            routes,
        }
    }

    /// Failed response. Unexpected faults get a generic message; their details
    /// belong in the logs.
    pub fn failure(error: &PlanningError) -> Self {
        let message = match error {
            PlanningError::Unexpected(_) => {
                "An unexpected error occurred while generating route suggestions".to_string()
            }
            other => other.to_string(),
        };

        RouteSuggestionResponse {
            success: false,
            message,
            failure: Some(error.kind()),
            generated_at: Timestamp::now(),
            total_routes: 0,
            routes: Vec::new(),
        }
    }
}
