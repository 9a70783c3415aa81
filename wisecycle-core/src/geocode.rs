//! Address resolution boundary
//!
//! Routing only needs a coordinate for an address; where it comes from is up
//! to the [`Geocoder`] implementation. [`Gazetteer`] is an in-memory table,
//! used for configured landmarks and tests.

use hashbrown::HashMap;
use log::debug;
use thiserror::Error;

use crate::Coordinate;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("no address given")]
    EmptyAddress,
    #[error("address \"{0}\" could not be geocoded")]
    NotFound(String),
    #[error("geocoding provider failed: {0}")]
    Provider(String),
}

/// Resolves a free-form address to a coordinate
pub trait Geocoder: Send + Sync {
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the address cannot be resolved
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

/// Case- and whitespace-insensitive address table
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: HashMap<String, Coordinate>,
}

impl Gazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: &str, coordinate: Coordinate) -> Option<Coordinate> {
        self.entries.insert(normalize(address), coordinate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, Coordinate)> for Gazetteer {
    fn from_iter<I: IntoIterator<Item = (S, Coordinate)>>(iter: I) -> Self {
        let mut gazetteer = Self::new();
        for (address, coordinate) in iter {
            gazetteer.insert(address.as_ref(), coordinate);
        }
        gazetteer
    }
}

impl Geocoder for Gazetteer {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let key = normalize(address);
        if key.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        let coordinate = self
            .entries
            .get(&key)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(address.trim().to_string()))?;
        debug!("Geocoded address {address:?} to {coordinate}");
        Ok(coordinate)
    }
}

fn normalize(address: &str) -> String {
    address
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
