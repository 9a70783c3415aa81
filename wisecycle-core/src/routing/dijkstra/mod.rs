mod state;

use std::collections::BinaryHeap;

use hashbrown::HashMap;
use petgraph::visit::EdgeRef;

use self::state::State;
use super::common::{Endpoint, RoutingError, RoutingResult};
use super::path::Path;
use crate::{Coordinate, RouteGraph, VertexId, Weight};

/// Dijkstra's algorithm for the minimum-weight directed path between two
/// network coordinates.
///
/// Among several equal-cost paths any one may be returned.
///
/// # Errors
///
/// [`RoutingError::NodeNotFound`] if either coordinate is not a vertex,
/// [`RoutingError::Unreachable`] if no directed path joins them
pub fn shortest_path(
    graph: &RouteGraph,
    origin: Coordinate,
    destination: Coordinate,
) -> RoutingResult<Path> {
    let start = graph.vertex(origin).ok_or(RoutingError::NodeNotFound {
        endpoint: Endpoint::Origin,
        coordinate: origin,
    })?;
    let target = graph
        .vertex(destination)
        .ok_or(RoutingError::NodeNotFound {
            endpoint: Endpoint::Destination,
            coordinate: destination,
        })?;

    if start == target {
        return Ok(Path::trivial(graph.key(origin)));
    }

    // Estimate capacity based on graph size
    let estimated_nodes = graph.vertex_count().min(1000);
    let mut distances: HashMap<VertexId, Weight> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<VertexId, VertexId> = HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            return Ok(reconstruct(graph, &predecessors, start, target, cost));
        }

        // Skip stale heap entries
        if distances.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        for edge in graph.edges(node) {
            let next = edge.target();
            let next_cost = cost + edge.weight().weight;

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                    predecessors.insert(next, node);
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, node);
                    }
                }
            }
        }
    }

    Err(RoutingError::Unreachable {
        origin,
        destination,
    })
}

/// Follows predecessors backward from `target` to `start`
fn reconstruct(
    graph: &RouteGraph,
    predecessors: &HashMap<VertexId, VertexId>,
    start: VertexId,
    target: VertexId,
    cost: Weight,
) -> Path {
    let mut nodes = vec![target];
    let mut current = target;
    while current != start {
        match predecessors.get(&current) {
            Some(&prev) => {
                nodes.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    nodes.reverse();

    let coordinates = nodes
        .into_iter()
        .filter_map(|node| graph.coordinate(node))
        .collect();
    Path::new(coordinates, cost)
}
