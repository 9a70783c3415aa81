// Re-export key components
pub use crate::loading::{NetworkConfig, build_route_graph, load_records};
pub use crate::model::{Coordinate, RouteGraph, RouteRecord};
pub use crate::routing::{
    AnchorPolicy, AttachmentConfig, Path, RouteOutcome, RoutePlanner, shortest_path,
};
pub use crate::{Gazetteer, Geocoder};

// Core types for the route network
pub use crate::VertexId;
pub use crate::Weight;
