use itertools::Itertools;
use log::{info, trace, warn};
use rayon::prelude::*;

use super::config::{EdgeDirection, NetworkConfig};
use super::geometry::parse_coordinates;
use crate::{Coordinate, Error, RouteGraph, RouteRecord, Weight};

/// Builds the route network from `records`.
///
/// Every consecutive point pair of a record's primary line becomes a directed
/// edge in the record's point order, plus the reverse edge when
/// `config.edge_direction` is [`EdgeDirection::Both`]. Records whose geometry
/// cannot be parsed are logged and skipped. Geometries are decoded in
/// parallel, but edges are inserted in record order, so identical input
/// always yields an identical graph.
pub fn build_route_graph(records: &[RouteRecord], config: &NetworkConfig) -> RouteGraph {
    let lines: Vec<Option<Vec<Coordinate>>> = records
        .par_iter()
        .enumerate()
        .map(|(idx, record)| match parse_coordinates(&record.geometry) {
            Ok(line) => Some(line),
            Err(e) => {
                warn!(
                    "Skipping route record {idx} ({} / {}): {e}",
                    record.name, record.direction
                );
                None
            }
        })
        .collect();

    let mut graph = RouteGraph::with_precision(config.key_precision);
    let tally = insert_lines(&mut graph, &lines, config.edge_direction, |from, to| {
        config.weighting.weight(from, to)
    });

    info!(
        "Route network built from {} of {} records ({} skipped, {} rejected): \
        {} vertices, {} edges",
        tally.used,
        records.len(),
        tally.skipped,
        tally.rejected,
        graph.vertex_count(),
        graph.edge_count()
    );
    graph
}

/// Per-record outcome counts of a build
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct BuildTally {
    used: usize,
    /// Geometry could not be parsed
    skipped: usize,
    /// A segment was refused after earlier ones went in
    rejected: usize,
}

fn insert_lines(
    graph: &mut RouteGraph,
    lines: &[Option<Vec<Coordinate>>],
    direction: EdgeDirection,
    weight: impl Fn(Coordinate, Coordinate) -> Weight,
) -> BuildTally {
    let mut tally = BuildTally::default();

    for (idx, line) in lines.iter().enumerate() {
        let Some(line) = line else {
            tally.skipped += 1;
            continue;
        };
        match add_line(graph, line, direction, &weight) {
            Ok(()) => tally.used += 1,
            Err(e) => {
                warn!("Route record {idx} rejected part way through: {e}");
                tally.rejected += 1;
            }
        }
    }
    tally
}

fn add_line(
    graph: &mut RouteGraph,
    line: &[Coordinate],
    direction: EdgeDirection,
    weight: &impl Fn(Coordinate, Coordinate) -> Weight,
) -> Result<(), Error> {
    for (&from, &to) in line.iter().tuple_windows() {
        let weight = weight(from, to);
        graph.add_segment(from, to, weight)?;
        if direction == EdgeDirection::Both {
            graph.add_segment(to, from, weight)?;
        }
        trace!("Added edge from {from} to {to}");
    }
    Ok(())
}
