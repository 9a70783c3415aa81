use std::path::PathBuf;

use geo::{Distance, Haversine};
use serde::Deserialize;

use crate::{Coordinate, DEFAULT_EDGE_WEIGHT, MIN_EDGE_WEIGHT, Weight};

/// Which directed edges a route segment produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    /// Only in the order the record lists its points
    #[default]
    Forward,
    /// Forward and reverse, for networks ridden both ways
    Both,
}

/// Edge weight function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Every segment costs [`DEFAULT_EDGE_WEIGHT`]
    #[default]
    Uniform,
    /// Great-circle length in metres
    Haversine,
}

impl Weighting {
    /// Weight of the segment `from -> to`, always finite and positive
    pub fn weight(self, from: Coordinate, to: Coordinate) -> Weight {
        match self {
            Self::Uniform => DEFAULT_EDGE_WEIGHT,
            Self::Haversine => Haversine
                .distance(from.to_point(), to.to_point())
                .max(MIN_EDGE_WEIGHT),
        }
    }
}

/// Settings for building the route network
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// CSV file with `name`, `direction`, `status` and `Geo Shape` columns
    pub records_path: PathBuf,
    pub edge_direction: EdgeDirection,
    pub weighting: Weighting,
    /// Decimal places vertex keys are rounded to; `None` keeps exact keys
    pub key_precision: Option<u32>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from("bicycle_routes.csv"),
            edge_direction: EdgeDirection::default(),
            weighting: Weighting::default(),
            key_precision: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_weights_are_metres() {
        let a = Coordinate::new(-37.8136, 144.9631).unwrap();
        let b = Coordinate::new(-37.8146, 144.9631).unwrap();
        let weight = Weighting::Haversine.weight(a, b);
        assert!((weight - 111.2).abs() < 1.0, "got {weight}");
        assert_eq!(Weighting::Uniform.weight(a, b), DEFAULT_EDGE_WEIGHT);
    }

    #[test]
    fn haversine_weight_is_never_zero() {
        let a = Coordinate::new(-37.8136, 144.9631).unwrap();
        assert_eq!(Weighting::Haversine.weight(a, a), MIN_EDGE_WEIGHT);
    }
}
