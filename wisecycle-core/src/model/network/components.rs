//! Route network components - vertices and edges

use crate::{Coordinate, Weight};

/// Where a vertex came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOrigin {
    /// Endpoint of a segment from the route records
    Network,
    /// Inserted at query time by endpoint attachment
    Attached,
}

/// Where an edge came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Consecutive point pair of a route geometry
    Segment,
    /// Link between an attached vertex and its anchor
    Connector,
}

/// Route graph vertex
#[derive(Debug, Clone)]
pub struct RouteNode {
    pub coordinate: Coordinate,
    pub origin: NodeOrigin,
}

/// Route graph edge
#[derive(Debug, Clone, Copy)]
pub struct RouteEdge {
    /// Traversal cost, finite and > 0
    pub weight: Weight,
    pub kind: EdgeKind,
}
