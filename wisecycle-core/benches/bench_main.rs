use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use wisecycle_core::prelude::*;
use wisecycle_core::{EdgeDirection, Weighting};

const SIZE: usize = 60;

/// Square grid of two-way streets, one record per row and per column
#[allow(clippy::cast_precision_loss)]
fn grid_records() -> Vec<RouteRecord> {
    let point = |row: usize, col: usize| {
        format!("[{}, {}]", 144.9 + col as f64 * 1e-3, -37.8 - row as f64 * 1e-3)
    };
    let line = |points: Vec<String>| {
        format!(r#"{{"type": "MultiLineString", "coordinates": [[{}]]}}"#, points.join(", "))
    };

    let rows = (0..SIZE).map(|row| line((0..SIZE).map(|col| point(row, col)).collect()));
    let cols = (0..SIZE).map(|col| line((0..SIZE).map(|row| point(row, col)).collect()));
    rows.chain(cols)
        .map(|geometry| RouteRecord::new("On-Road Bike Lane", "Both", "Existing", geometry))
        .collect()
}

fn config() -> NetworkConfig {
    NetworkConfig {
        edge_direction: EdgeDirection::Both,
        weighting: Weighting::Haversine,
        ..NetworkConfig::default()
    }
}

fn bench_build(c: &mut Criterion) {
    let records = grid_records();
    let config = config();
    c.bench_function("build_route_graph", |b| {
        b.iter(|| build_route_graph(black_box(&records), &config));
    });
}

fn bench_shortest_path(c: &mut Criterion) {
    let graph = build_route_graph(&grid_records(), &config());
    let origin = Coordinate::new(-37.8, 144.9).unwrap();
    let destination = graph.coordinates().last().unwrap();

    c.bench_function("shortest_path_corner_to_corner", |b| {
        b.iter(|| shortest_path(&graph, black_box(origin), black_box(destination)));
    });
}

fn bench_find_route(c: &mut Criterion) {
    let graph = build_route_graph(&grid_records(), &config());
    let planner = RoutePlanner::new(graph, AttachmentConfig::default());
    let origin = Coordinate::new(-37.80005, 144.90005).unwrap();
    let destination = Coordinate::new(-37.85, 144.95).unwrap();

    c.bench_function("find_route_with_attachment", |b| {
        b.iter(|| planner.find_route(black_box(origin), black_box(destination)));
    });
}

criterion_group!(benches, bench_build, bench_shortest_path, bench_find_route);
criterion_main!(benches);
