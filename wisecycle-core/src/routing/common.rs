use std::fmt;

use thiserror::Error;

use crate::Coordinate;

/// Which end of a route query a coordinate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Origin => f.write_str("origin"),
            Self::Destination => f.write_str("destination"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("{endpoint} {coordinate} is not a vertex of the route network")]
    NodeNotFound {
        endpoint: Endpoint,
        coordinate: Coordinate,
    },
    #[error("no directed route from {origin} to {destination}")]
    Unreachable {
        origin: Coordinate,
        destination: Coordinate,
    },
}

pub type RoutingResult<T> = Result<T, RoutingError>;
