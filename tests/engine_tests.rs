//! Tests for the default routing engine on small synthetic instances.

use std::collections::HashSet;
use std::time::Duration;

use school_routes::{
    CancellationToken, FirstSolutionStrategy, GuidedLocalSearchEngine, Location, PickupPoint,
    Problem, RoutingEngine, SearchParameters, Settings, Solution, Student, Vehicle,
};

/// Stops on a `rows x cols` grid north-east of the school, each with
/// `riders` students.
fn grid_problem(rows: u64, cols: u64, riders: u64, capacities: &[u32], settings: Settings) -> Problem {
    let mut points = Vec::new();
    let mut students = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let id = r * cols + c + 1;
            points.push(PickupPoint::new(
                id,
                0.005 * (r + 1) as f64,
                0.005 * (c + 1) as f64,
                &format!("stop {}", id),
            ));
            for k in 0..riders {
                students.push(Student::new(id * 100 + k, id));
            }
        }
    }
    let vehicles = capacities
        .iter()
        .enumerate()
        .map(|(i, &cap)| Vehicle::new(i as u64 + 1, cap))
        .collect();

    Problem::new(Location::new(0.0, 0.0), points, students, vehicles, settings)
}

fn fast_parameters(strategy: FirstSolutionStrategy) -> SearchParameters {
    SearchParameters {
        first_solution_strategy: strategy,
        time_limit: Duration::from_secs(2),
        max_iterations_without_improvement: 50,
        ..SearchParameters::default()
    }
}

fn assert_valid(problem: &Problem, solution: &Solution) {
    assert!(solution.success);
    assert_eq!(solution.routes.len(), problem.vehicle_count());

    let visited = solution.visited_nodes();
    let unique: HashSet<usize> = visited.iter().copied().collect();
    assert_eq!(visited.len(), unique.len(), "a stop is visited twice");
    assert_eq!(unique, (1..problem.node_count()).collect::<HashSet<_>>());

    for (vehicle, route) in solution.routes.iter().enumerate() {
        assert_eq!(route.first(), Some(&0));
        assert_eq!(route.last(), Some(&0));
        let load: i64 = route.iter().map(|&node| problem.demands[node]).sum();
        assert!(
            load <= problem.vehicle_capacities[vehicle],
            "vehicle {} carries {} over capacity {}",
            vehicle,
            load,
            problem.vehicle_capacities[vehicle]
        );
    }
}

#[test]
fn test_every_strategy_serves_every_stop() {
    let problem = grid_problem(3, 3, 2, &[8, 8, 8], Settings::default());

    for strategy in [
        FirstSolutionStrategy::CheapestArc,
        FirstSolutionStrategy::MostConstrainedArc,
        FirstSolutionStrategy::Savings,
    ] {
        let engine = GuidedLocalSearchEngine::with_parameters(fast_parameters(strategy));
        let solution = engine.solve(&problem);
        assert_valid(&problem, &solution);
        assert!(solution.objective > 0);
    }
}

#[test]
fn test_single_stop_single_vehicle() {
    let problem = grid_problem(1, 1, 3, &[4], Settings::default());
    let solution = GuidedLocalSearchEngine::new().solve(&problem);

    assert_valid(&problem, &solution);
    assert_eq!(solution.routes, vec![vec![0, 1, 0]]);
}

#[test]
fn test_unused_vehicle_has_empty_route() {
    let problem = grid_problem(1, 2, 1, &[10, 10], Settings::default());
    let engine =
        GuidedLocalSearchEngine::with_parameters(fast_parameters(FirstSolutionStrategy::Savings));
    let solution = engine.solve(&problem);

    assert_valid(&problem, &solution);
    assert_eq!(solution.used_vehicle_count(), 1);
}

#[test]
fn test_route_duration_limit_is_respected() {
    let settings = Settings::default()
        .with_time_windows(true)
        .with_average_speed_kmh(30.0)
        .with_service_time_seconds(60)
        .with_max_route_duration_seconds(480);
    let problem = grid_problem(2, 2, 1, &[10, 10, 10, 10], settings);
    let engine =
        GuidedLocalSearchEngine::with_parameters(fast_parameters(FirstSolutionStrategy::CheapestArc));
    let solution = engine.solve(&problem);

    assert_valid(&problem, &solution);
    // One vehicle could seat everyone but not within eight minutes
    assert!(solution.used_vehicle_count() >= 2);

    let locations = problem.locations();
    for route in &solution.routes {
        let seconds: f64 = route
            .windows(2)
            .map(|arc| {
                let travel = problem
                    .distance_model
                    .travel_time_seconds(locations[arc[0]], locations[arc[1]]);
                let service = if arc[1] != 0 { 60.0 } else { 0.0 };
                travel + service
            })
            .sum();
        assert!(seconds <= 480.0 + 5.0, "route takes {} s", seconds);
    }
}

#[test]
fn test_unreachable_duration_limit_fails() {
    let settings = Settings::default()
        .with_time_windows(true)
        .with_max_route_duration_seconds(10);
    let problem = grid_problem(1, 2, 1, &[5, 5], settings);
    let solution = GuidedLocalSearchEngine::new().solve(&problem);

    assert!(!solution.success);
    assert!(solution.routes.is_empty());
}

#[test]
fn test_cancelled_search_returns_best_so_far() {
    let problem = grid_problem(4, 4, 1, &[6, 6, 6], Settings::default());
    let engine = GuidedLocalSearchEngine::with_parameters(SearchParameters {
        time_limit: Duration::from_secs(600),
        max_iterations_without_improvement: u32::MAX,
        ..SearchParameters::default()
    });

    let token = CancellationToken::new();
    token.cancel();
    let solution = engine.solve_with_cancellation(&problem, &token);

    assert_valid(&problem, &solution);
    let statistics = solution.statistics.expect("statistics are attached");
    assert!(statistics.cancelled);
    assert!(statistics.best_cost <= statistics.initial_cost);
}

#[test]
fn test_same_seed_same_routes() {
    let problem = grid_problem(3, 3, 1, &[5, 5], Settings::default());
    let engine = GuidedLocalSearchEngine::with_parameters(SearchParameters {
        seed: 7,
        ..fast_parameters(FirstSolutionStrategy::CheapestArc)
    });

    let first = engine.solve(&problem);
    let second = engine.solve(&problem);
    assert_eq!(first.routes, second.routes);
    assert_eq!(first.objective, second.objective);
}
