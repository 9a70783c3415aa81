//! Shortest paths, endpoint attachment and the route query facade

pub mod attach;
mod common;
pub mod dijkstra;
mod path;
pub mod planner;

pub use attach::{
    AnchorPolicy, AttachError, Attachment, AttachmentConfig, attach, attach_with_policy,
};
pub use common::{Endpoint, RoutingError, RoutingResult};
pub use dijkstra::shortest_path;
pub use path::Path;
pub use planner::{InputError, RouteOutcome, RoutePlanner, resolve_location};
