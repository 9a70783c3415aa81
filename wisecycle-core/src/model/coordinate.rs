//! Coordinate pairs used as vertex identity

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use geo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("expected `lat,lon`, got `{0}`")]
    Malformed(String),
    #[error("coordinate components must be finite numbers, got `{0}`")]
    NotFinite(String),
}

/// A `(latitude, longitude)` pair.
///
/// Equality and hashing are exact on the stored bit patterns, so two
/// coordinates are the same vertex only if both components match exactly.
/// Negative zero is stored as positive zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NotFinite(format!("{lat},{lon}")));
        }
        Ok(Self {
            lat: canonical(lat),
            lon: canonical(lon),
        })
    }

    /// Builds a coordinate from a GeoJSON-ordered `(lon, lat)` position
    pub fn from_lon_lat(lon: f64, lat: f64) -> Result<Self, CoordinateError> {
        Self::new(lat, lon)
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Rounds both components to `decimals` places.
    /// Returns the coordinate unchanged if rounding would leave the finite range.
    #[must_use]
    pub fn rounded(self, decimals: u32) -> Self {
        let factor = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
        let lat = (self.lat * factor).round() / factor;
        let lon = (self.lon * factor).round() / factor;
        Self::new(lat, lon).unwrap_or(self)
    }

    /// Position as a `geo` point (x = lon, y = lat)
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

fn canonical(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.lat.to_bits() == other.lat.to_bits() && self.lon.to_bits() == other.lon.to_bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lat.to_bits().hash(state);
        self.lon.to_bits().hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    /// Parses `"lat,lon"`, optionally wrapped in parentheses or brackets
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .trim_start_matches(['(', '['])
            .trim_end_matches([')', ']']);

        let mut parts = inner.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoordinateError::Malformed(s.to_string()));
        };

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CoordinateError::Malformed(s.to_string()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| CoordinateError::Malformed(s.to_string()))?;

        Self::new(lat, lon).map_err(|_| CoordinateError::NotFinite(s.to_string()))
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = CoordinateError;

    fn try_from([lat, lon]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(lat, lon)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.lat, coordinate.lon]
    }
}
