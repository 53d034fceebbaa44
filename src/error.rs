//! Planning failures. Every variant is an expected business outcome except
//! [`PlanningError::Unexpected`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag identifying the kind of a planning failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    InsufficientData,
    InfeasibleCapacity,
    InfeasibleStop,
    InvalidSettings,
    SolverFailure,
    UnexpectedError,
}

/// Errors raised while preparing, solving or decoding a routing problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error(
        "Not enough seats: {total_demand} students but only {total_capacity} seats available. \
         Short by {deficit} seats; at least {extra_vehicles} more vehicle(s) with capacity \
         {max_capacity} are needed"
    )]
    InfeasibleCapacity {
        total_demand: i64,
        total_capacity: i64,
        deficit: i64,
        extra_vehicles: i64,
        max_capacity: i64,
    },

    #[error(
        "Pickup point {pickup_point_id} has {demand} students but the largest vehicle only \
         seats {max_capacity}; a stop cannot be split across vehicles"
    )]
    InfeasibleStop {
        pickup_point_id: u64,
        demand: i64,
        max_capacity: i64,
    },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("No feasible routes found: {0}")]
    SolverFailure(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PlanningError {
    /// The failure's kind.
    pub fn kind(&self) -> FailureKind {
        match self {
            PlanningError::InsufficientData(_) => FailureKind::InsufficientData,
            PlanningError::InfeasibleCapacity { .. } => FailureKind::InfeasibleCapacity,
            PlanningError::InfeasibleStop { .. } => FailureKind::InfeasibleStop,
            PlanningError::InvalidSettings(_) => FailureKind::InvalidSettings,
            PlanningError::SolverFailure(_) => FailureKind::SolverFailure,
            PlanningError::Unexpected(_) => FailureKind::UnexpectedError,
        }
    }
}

/// A collaborator could not answer a read query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("data source query `{query}` failed: {message}")]
pub struct DataSourceError {
    pub query: &'static str,
    pub message: String,
}

impl From<DataSourceError> for PlanningError {
    fn from(err: DataSourceError) -> Self {
        PlanningError::Unexpected(err.to_string())
    }
}
