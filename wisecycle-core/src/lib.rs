//! Route network construction and shortest-path queries for cycling
//! networks described as line geometries.
//!
//! The network is built once from [`RouteRecord`]s, then queried through a
//! [`RoutePlanner`], which attaches ad hoc endpoints (typed coordinates or
//! geocoded addresses) before running Dijkstra over the directed graph.

pub mod error;
pub mod export;
pub mod geocode;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use export::network_layer;
pub use geocode::{Gazetteer, GeocodeError, Geocoder};
pub use loading::{
    EdgeDirection, NetworkConfig, ParseError, Weighting, build_route_graph, load_records,
    parse_coordinates, parse_geometry, read_records,
};
pub use model::{
    Coordinate, CoordinateError, EdgeKind, NetworkStats, NodeOrigin, RouteGraph, RouteRecord,
};
pub use routing::{
    AnchorPolicy, AttachError, Attachment, AttachmentConfig, Endpoint, InputError, Path,
    RouteOutcome, RoutePlanner, RoutingError, attach, attach_with_policy, resolve_location,
    shortest_path,
};

/// Vertex handle inside a [`RouteGraph`]
pub type VertexId = petgraph::graph::NodeIndex;

/// Edge traversal cost. Always finite and strictly positive inside a graph.
pub type Weight = f64;

/// Weight of a route segment under uniform weighting
pub const DEFAULT_EDGE_WEIGHT: Weight = 1.0;

/// Lower bound applied to distance-based weights, in metres
pub const MIN_EDGE_WEIGHT: Weight = 1e-3;
