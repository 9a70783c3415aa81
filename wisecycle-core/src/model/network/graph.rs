//! Directed route graph keyed by coordinate
//!
//! Vertices are identified by their [`Coordinate`] after the graph's key
//! function has been applied (exact by default, optionally rounded to a fixed
//! number of decimal places). Every insertion and lookup goes through the same
//! key function, so network and attached coordinates share one representation.

use std::fmt;

use hashbrown::HashMap;
use log::{debug, trace};
use petgraph::graph::{DiGraph, EdgeIndex, Edges, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use rstar::RTree;
use rstar::primitives::GeomWithData;
use serde::Serialize;

use super::components::{EdgeKind, NodeOrigin, RouteEdge, RouteNode};
use crate::{Coordinate, Error, VertexId, Weight};

/// R-tree entry: `[lon, lat]` position of a network vertex
type IndexedVertex = GeomWithData<[f64; 2], NodeIndex>;

/// Size summary of a [`RouteGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub vertices: usize,
    pub edges: usize,
    pub attached_vertices: usize,
    pub connector_edges: usize,
}

/// Directed weighted route network
#[derive(Clone, Default)]
pub struct RouteGraph {
    pub(crate) graph: DiGraph<RouteNode, RouteEdge>,
    vertices: HashMap<Coordinate, NodeIndex>,
    /// Network vertices only; attached vertices never serve as anchors
    rtree: RTree<IndexedVertex>,
    precision: Option<u32>,
    attached: Vec<NodeIndex>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph whose vertex keys are rounded to `precision`
    /// decimal places (`None` keeps exact coordinates)
    pub fn with_precision(precision: Option<u32>) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    /// Canonical vertex key for `coordinate`
    pub fn key(&self, coordinate: Coordinate) -> Coordinate {
        match self.precision {
            Some(decimals) => coordinate.rounded(decimals),
            None => coordinate,
        }
    }

    pub fn vertex(&self, coordinate: Coordinate) -> Option<VertexId> {
        self.vertices.get(&self.key(coordinate)).copied()
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.vertex(coordinate).is_some()
    }

    pub fn coordinate(&self, vertex: VertexId) -> Option<Coordinate> {
        self.graph.node_weight(vertex).map(|node| node.coordinate)
    }

    pub fn node(&self, vertex: VertexId) -> Option<&RouteNode> {
        self.graph.node_weight(vertex)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            vertices: self.vertex_count(),
            edges: self.edge_count(),
            attached_vertices: self.attached.len(),
            connector_edges: self
                .graph
                .edge_weights()
                .filter(|edge| edge.kind == EdgeKind::Connector)
                .count(),
        }
    }

    /// All vertex coordinates in insertion order
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.graph.node_weights().map(|node| node.coordinate)
    }

    /// All edges as `(from, to, weight)` in insertion order
    pub fn edge_list(&self) -> Vec<(Coordinate, Coordinate, Weight)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].coordinate,
                    self.graph[edge.target()].coordinate,
                    edge.weight().weight,
                )
            })
            .collect()
    }

    /// Outgoing edges of `vertex`
    pub fn edges(&self, vertex: VertexId) -> Edges<'_, RouteEdge, Directed> {
        self.graph.edges(vertex)
    }

    /// Number of incoming plus outgoing edges of `vertex`
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.graph.edges_directed(vertex, Direction::Outgoing).count()
            + self.graph.edges_directed(vertex, Direction::Incoming).count()
    }

    /// Returns the vertex for `coordinate`, inserting it if absent.
    /// The origin of an existing vertex is never changed.
    pub fn insert_vertex(&mut self, coordinate: Coordinate, origin: NodeOrigin) -> VertexId {
        let key = self.key(coordinate);
        if let Some(&existing) = self.vertices.get(&key) {
            return existing;
        }

        let vertex = self.graph.add_node(RouteNode {
            coordinate: key,
            origin,
        });
        self.vertices.insert(key, vertex);

        match origin {
            NodeOrigin::Network => self
                .rtree
                .insert(GeomWithData::new([key.lon(), key.lat()], vertex)),
            NodeOrigin::Attached => self.attached.push(vertex),
        }
        vertex
    }

    /// Adds the directed segment `from -> to`.
    ///
    /// Both endpoints become network vertices. A repeated segment overwrites
    /// the previous weight instead of adding a parallel edge. A segment whose
    /// endpoints share a key adds the vertex but no self-loop, and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWeight`] if `weight` is not finite and positive
    pub fn add_segment(
        &mut self,
        from: Coordinate,
        to: Coordinate,
        weight: Weight,
    ) -> Result<Option<EdgeIndex>, Error> {
        check_weight(from, to, weight)?;

        let source = self.insert_vertex(from, NodeOrigin::Network);
        let target = self.insert_vertex(to, NodeOrigin::Network);
        if source == target {
            trace!("Skipping zero-length segment at {from}");
            return Ok(None);
        }

        self.link(
            source,
            target,
            RouteEdge {
                weight,
                kind: EdgeKind::Segment,
            },
        )
        .map(Some)
    }

    /// Inserts or overwrites the edge `source -> target`
    pub(crate) fn link(
        &mut self,
        source: VertexId,
        target: VertexId,
        edge: RouteEdge,
    ) -> Result<EdgeIndex, Error> {
        if let (Some(from), Some(to)) = (self.coordinate(source), self.coordinate(target)) {
            check_weight(from, to, edge.weight)?;
        }
        Ok(self.graph.update_edge(source, target, edge))
    }

    /// Network vertex closest to `coordinate` in planar lon/lat distance.
    /// Returns `None` if the network has no vertices.
    pub fn nearest_network_vertex(&self, coordinate: Coordinate) -> Option<VertexId> {
        let key = self.key(coordinate);
        self.rtree
            .nearest_neighbor(&[key.lon(), key.lat()])
            .map(|entry| entry.data)
    }

    /// Drops every attached vertex and connector edge, returning how many
    /// vertices were removed.
    ///
    /// Network vertices keep their ids, since attachment only ever appends.
    pub fn detach_all(&mut self) -> usize {
        let removed = self.attached.len();
        if removed == 0 {
            return 0;
        }

        let mut rebuilt = Self::with_precision(self.precision);
        for node in self.graph.node_weights() {
            if node.origin == NodeOrigin::Network {
                rebuilt.insert_vertex(node.coordinate, NodeOrigin::Network);
            }
        }
        for edge in self.graph.edge_references() {
            if edge.weight().kind != EdgeKind::Segment {
                continue;
            }
            let source = rebuilt.vertices[&self.graph[edge.source()].coordinate];
            let target = rebuilt.vertices[&self.graph[edge.target()].coordinate];
            rebuilt.graph.update_edge(source, target, *edge.weight());
        }

        debug!(
            "Detached {removed} vertices, {} vertices and {} edges remain",
            rebuilt.vertex_count(),
            rebuilt.edge_count()
        );
        *self = rebuilt;
        removed
    }
}

fn check_weight(from: Coordinate, to: Coordinate, weight: Weight) -> Result<(), Error> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidWeight { from, to, weight })
    }
}

impl fmt::Debug for RouteGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGraph")
            .field("precision", &self.precision)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
