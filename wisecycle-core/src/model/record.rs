use serde::Deserialize;

/// One row of the route geometry source.
///
/// `geometry` holds the raw `Geo Shape` text exactly as stored, quoting
/// irregularities included; it is decoded by [`parse_geometry`](crate::parse_geometry).
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RouteRecord {
    pub name: String,
    pub direction: String,
    pub status: String,
    #[serde(rename = "Geo Shape")]
    pub geometry: String,
}

impl RouteRecord {
    pub fn new(
        name: impl Into<String>,
        direction: impl Into<String>,
        status: impl Into<String>,
        geometry: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            direction: direction.into(),
            status: status.into(),
            geometry: geometry.into(),
        }
    }
}
