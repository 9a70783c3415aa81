use thiserror::Error;

use crate::Coordinate;
use crate::loading::ParseError;
use crate::routing::{AttachError, RoutingError};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid edge weight {weight} between {from} and {to}")]
    InvalidWeight {
        from: Coordinate,
        to: Coordinate,
        weight: f64,
    },
    #[error("Geometry error: {0}")]
    Geometry(#[from] ParseError),
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),
    #[error("Attachment error: {0}")]
    Attachment(#[from] AttachError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
