//! Benchmarks for route construction and guided local search.

#[cfg(feature = "bench")]
extern crate criterion;

#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use school_routes::engine::construction::construct;
use school_routes::engine::model::RoutingModel;
use school_routes::{
    FirstSolutionStrategy, GuidedLocalSearchEngine, Location, PickupPoint, Problem, RoutingEngine,
    SearchParameters, Settings, Student, Vehicle,
};
use std::time::Duration;

/// Create a benchmark problem with `size` stops on a grid around the school.
fn create_benchmark_problem(size: usize) -> Problem {
    let grid_size = (size as f64).sqrt().ceil() as usize;
    let mut points = Vec::new();
    let mut students = Vec::new();

    for i in 1..=size {
        let row = (i - 1) / grid_size;
        let col = (i - 1) % grid_size;
        let id = i as u64;
        points.push(PickupPoint::new(
            id,
            row as f64 * 0.004,
            col as f64 * 0.004,
            "grid stop",
        ));
        students.push(Student::new(id * 10, id));
        if i % 2 == 0 {
            students.push(Student::new(id * 10 + 1, id));
        }
    }

    let fleet = (size / 8).max(1);
    let vehicles = (1..=fleet as u64).map(|id| Vehicle::new(id, 16)).collect();

    Problem::new(
        Location::new(-0.01, -0.01),
        points,
        students,
        vehicles,
        Settings::default(),
    )
}

#[cfg(feature = "bench")]
fn benchmark_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for size in [50, 100, 200].iter() {
        let problem = create_benchmark_problem(*size);
        let model = RoutingModel::new(&problem);

        for strategy in [
            FirstSolutionStrategy::CheapestArc,
            FirstSolutionStrategy::Savings,
        ] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", strategy), size),
                size,
                |b, _| b.iter(|| construct(&model, strategy)),
            );
        }
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("guided_local_search");
    group.measurement_time(Duration::from_secs(30));

    for size in [50, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let problem = create_benchmark_problem(size);
            let engine = GuidedLocalSearchEngine::with_parameters(SearchParameters {
                time_limit: Duration::from_secs(5),
                max_iterations_without_improvement: 200,
                ..SearchParameters::default()
            });

            b.iter(|| engine.solve(&problem));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(benches, benchmark_construction, benchmark_search);

#[cfg(feature = "bench")]
criterion_main!(benches);
