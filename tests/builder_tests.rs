//! Tests for problem preparation and the feasibility pre-checks.

use school_routes::{
    FailureKind, Location, PickupPoint, PlanningError, ProblemBuilder, Settings, Status, Student,
    Vehicle,
};

fn depot() -> Location {
    Location::new(0.0, 0.0)
}

/// `count` students waiting at pickup point `point_id`, ids starting at `first_id`.
fn students_at(point_id: u64, first_id: u64, count: u64) -> Vec<Student> {
    (first_id..first_id + count)
        .map(|id| Student::new(id, point_id))
        .collect()
}

#[test]
fn test_builds_problem_with_depot_first() {
    let builder = ProblemBuilder::new(Settings::default());
    let points = vec![
        PickupPoint::new(10, 0.0, 0.01, "north"),
        PickupPoint::new(20, 0.0, 0.02, "south"),
    ];
    let mut students = students_at(10, 1, 2);
    students.extend(students_at(20, 3, 3));

    let problem = builder
        .build(depot(), points, students, vec![Vehicle::new(1, 10)])
        .expect("feasible problem");

    assert_eq!(problem.node_count(), 3);
    assert_eq!(problem.demands, vec![0, 2, 3]);
    assert_eq!(problem.vehicle_capacities, vec![10]);
    assert_eq!(problem.pickup_point(2).map(|p| p.id), Some(20));
    assert!(problem.time_windows.is_none());
}

#[test]
fn test_no_students_is_insufficient_data() {
    let builder = ProblemBuilder::new(Settings::default());
    let err = builder
        .build(
            depot(),
            vec![PickupPoint::new(1, 0.0, 0.01, "a")],
            Vec::new(),
            vec![Vehicle::new(1, 4)],
        )
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::InsufficientData);
    assert!(err.to_string().contains("students"));
}

#[test]
fn test_inactive_students_do_not_count() {
    let builder = ProblemBuilder::new(Settings::default());
    let mut student = Student::new(1, 1);
    student.status = Status::Inactive;

    let err = builder
        .build(
            depot(),
            vec![PickupPoint::new(1, 0.0, 0.01, "a")],
            vec![student],
            vec![Vehicle::new(1, 4)],
        )
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::InsufficientData);
}

#[test]
fn test_no_pickup_points_is_insufficient_data() {
    let builder = ProblemBuilder::new(Settings::default());
    let err = builder
        .build(depot(), Vec::new(), students_at(1, 1, 2), vec![Vehicle::new(1, 4)])
        .unwrap_err();

    assert_eq!(
        err,
        PlanningError::InsufficientData("no active pickup points".to_string())
    );
}

#[test]
fn test_no_vehicles_is_insufficient_data() {
    let builder = ProblemBuilder::new(Settings::default());
    let err = builder
        .build(
            depot(),
            vec![PickupPoint::new(1, 0.0, 0.01, "a")],
            students_at(1, 1, 2),
            Vec::new(),
        )
        .unwrap_err();

    assert_eq!(
        err,
        PlanningError::InsufficientData("no available vehicles".to_string())
    );
}

#[test]
fn test_total_demand_above_capacity() {
    let builder = ProblemBuilder::new(Settings::default());
    let points = vec![
        PickupPoint::new(1, 0.0, 0.01, "a"),
        PickupPoint::new(2, 0.0, 0.02, "b"),
    ];
    let mut students = students_at(1, 1, 5);
    students.extend(students_at(2, 6, 5));

    let err = builder
        .build(
            depot(),
            points,
            students,
            vec![Vehicle::new(1, 3), Vehicle::new(2, 3)],
        )
        .unwrap_err();

    assert_eq!(
        err,
        PlanningError::InfeasibleCapacity {
            total_demand: 10,
            total_capacity: 6,
            deficit: 4,
            extra_vehicles: 2,
            max_capacity: 3,
        }
    );
    let message = err.to_string();
    assert!(message.contains("Short by 4 seats"));
    assert!(message.contains("at least 2 more vehicle(s) with capacity 3"));
}

#[test]
fn test_stop_demand_above_largest_vehicle() {
    let builder = ProblemBuilder::new(Settings::default());
    let err = builder
        .build(
            depot(),
            vec![PickupPoint::new(7, 0.0, 0.01, "crowded")],
            students_at(7, 1, 4),
            vec![Vehicle::new(1, 2), Vehicle::new(2, 2)],
        )
        .unwrap_err();

    assert_eq!(
        err,
        PlanningError::InfeasibleStop {
            pickup_point_id: 7,
            demand: 4,
            max_capacity: 2,
        }
    );
}

#[test]
fn test_students_at_unknown_points_are_ignored() {
    let builder = ProblemBuilder::new(Settings::default());
    let mut students = students_at(1, 1, 2);
    students.extend(students_at(99, 3, 10));

    let problem = builder
        .build(
            depot(),
            vec![PickupPoint::new(1, 0.0, 0.01, "a")],
            students,
            vec![Vehicle::new(1, 2)],
        )
        .expect("stranded students are ignored");

    assert_eq!(problem.total_demand(), 2);
    assert_eq!(problem.students.len(), 2);
}

#[test]
fn test_non_positive_speed_is_rejected() {
    let builder = ProblemBuilder::new(Settings::default().with_average_speed_kmh(0.0));
    let err = builder
        .build(
            depot(),
            vec![PickupPoint::new(1, 0.0, 0.01, "a")],
            students_at(1, 1, 1),
            vec![Vehicle::new(1, 2)],
        )
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::InvalidSettings);
}

#[test]
fn test_time_window_settings_reach_the_problem() {
    let settings = Settings::default()
        .with_time_windows(true)
        .with_max_route_duration_seconds(1800)
        .with_slack_time_seconds(120);
    let problem = ProblemBuilder::new(settings)
        .build(
            depot(),
            vec![PickupPoint::new(1, 0.0, 0.01, "a")],
            students_at(1, 1, 1),
            vec![Vehicle::new(1, 2)],
        )
        .expect("feasible problem");

    let config = problem.time_windows.expect("time dimension enabled");
    assert_eq!(config.max_route_duration_seconds, 1800);
    assert_eq!(config.slack_seconds, 120);
}

#[test]
fn test_duplicate_pickup_point_ids_are_rejected() {
    let builder = ProblemBuilder::new(Settings::default());
    let err = builder
        .build(
            depot(),
            vec![
                PickupPoint::new(5, 0.0, 0.01, "a"),
                PickupPoint::new(5, 0.0, 0.02, "a again"),
            ],
            students_at(5, 1, 3),
            vec![Vehicle::new(1, 4)],
        )
        .unwrap_err();

    assert_eq!(
        err,
        PlanningError::InsufficientData("pickup point 5 appears more than once".to_string())
    );
}
