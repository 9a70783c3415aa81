//! This module is responsible for reading route records, decoding their
//! geometries and building the route network.

mod builder;
mod config;
mod geometry;
mod records;

pub use builder::build_route_graph;
pub use config::{EdgeDirection, NetworkConfig, Weighting};
pub use geometry::{ParseError, parse_coordinates, parse_geometry};
pub use records::{load_records, read_records};
