//! Decoding of raw `Geo Shape` payloads

use serde::Deserialize;
use thiserror::Error;

use crate::{Coordinate, CoordinateError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("malformed geometry payload: {0}")]
    Malformed(String),
    #[error("geometry has no coordinates")]
    Empty,
    #[error("geometry has {0} point(s), a route needs at least 2")]
    TooFewPoints(usize),
    #[error("invalid position {position:?}: {reason}")]
    InvalidPosition {
        position: Vec<f64>,
        reason: String,
    },
}

#[derive(Deserialize)]
struct RawShape {
    #[serde(default)]
    coordinates: Option<RawCoordinates>,
}

/// `MultiLineString` nesting is tried first, then `LineString`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinates {
    Lines(Vec<Vec<Vec<f64>>>),
    Line(Vec<Vec<f64>>),
}

/// Parses a geometry payload into its primary line, in the payload's
/// `(lon, lat)` position order.
///
/// Doubled quote characters (`""`) and a single pair of wrapping quotes left
/// over from CSV escaping are normalized away before decoding. A payload
/// without any `"` has its single quotes read as JSON quotes. For
/// multi-line geometries only the first line is returned.
///
/// # Errors
///
/// Returns [`ParseError`] if the payload is not a JSON object with a usable
/// `coordinates` field, or if the primary line has fewer than two points
pub fn parse_geometry(raw: &str) -> Result<Vec<(f64, f64)>, ParseError> {
    let normalized = normalize_quotes(raw);
    let shape: RawShape =
        serde_json::from_str(&normalized).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let line = match shape.coordinates.ok_or(ParseError::Empty)? {
        RawCoordinates::Lines(lines) => lines.into_iter().next().ok_or(ParseError::Empty)?,
        RawCoordinates::Line(line) => line,
    };

    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    if line.len() < 2 {
        return Err(ParseError::TooFewPoints(line.len()));
    }

    line.into_iter().map(position).collect()
}

/// Parses a payload straight into canonical `(lat, lon)` coordinates
///
/// # Errors
///
/// See [`parse_geometry`]
pub fn parse_coordinates(raw: &str) -> Result<Vec<Coordinate>, ParseError> {
    parse_geometry(raw)?
        .into_iter()
        .map(|(lon, lat)| {
            Coordinate::from_lon_lat(lon, lat).map_err(|e: CoordinateError| {
                ParseError::InvalidPosition {
                    position: vec![lon, lat],
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

fn position(values: Vec<f64>) -> Result<(f64, f64), ParseError> {
    match values.as_slice() {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok((*lon, *lat)),
        [_, _, ..] => Err(ParseError::InvalidPosition {
            position: values,
            reason: "components must be finite".to_string(),
        }),
        _ => Err(ParseError::InvalidPosition {
            position: values,
            reason: "expected at least [lon, lat]".to_string(),
        }),
    }
}

fn normalize_quotes(raw: &str) -> String {
    let trimmed = raw.trim();
    let unwrapped = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .filter(|s| s.trim_start().starts_with('{'))
        .unwrap_or(trimmed);
    let collapsed = unwrapped.replace("\"\"", "\"");
    // Python-repr payloads quote keys and strings with `'` only
    if collapsed.contains('"') {
        collapsed
    } else {
        collapsed.replace('\'', "\"")
    }
}
