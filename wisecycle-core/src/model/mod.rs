//! Data model for the route network
//!
//! Contains coordinates, raw route records and the directed route graph.

pub mod coordinate;
pub mod network;
pub mod record;

pub use coordinate::{Coordinate, CoordinateError};
pub use network::{EdgeKind, NetworkStats, NodeOrigin, RouteEdge, RouteGraph, RouteNode};
pub use record::RouteRecord;
