//! Directed route network model

pub mod components;
pub mod graph;

pub use components::{EdgeKind, NodeOrigin, RouteEdge, RouteNode};
pub use graph::{NetworkStats, RouteGraph};
