//! GeoJSON output for the rendering layer

use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use log::debug;
use serde_json::json;

use crate::loading::parse_coordinates;
use crate::{Coordinate, Error, Path, RouteRecord};

fn line_geometry(coordinates: &[Coordinate]) -> Geometry {
    let coords: Vec<Coord<f64>> = coordinates
        .iter()
        .map(|c| Coord {
            x: c.lon(),
            y: c.lat(),
        })
        .collect();
    Geometry::new(GeoJsonValue::from(&LineString::new(coords)))
}

impl Path {
    /// The path as a `LineString` feature in GeoJSON `(lon, lat)` order
    pub fn to_geojson(&self) -> Result<Feature, Error> {
        let value = json!({
            "type": "Feature",
            "geometry": line_geometry(self.coordinates()),
            "properties": {
                "cost": self.cost(),
                "vertices": self.vertex_count(),
            }
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

/// One `LineString` feature per parsable record, optionally restricted to
/// records whose `name` (the route category) equals `name_filter`.
/// Records with unparsable geometry are left out.
pub fn network_layer(
    records: &[RouteRecord],
    name_filter: Option<&str>,
) -> Result<FeatureCollection, Error> {
    let mut features = Vec::new();

    for record in records {
        if name_filter.is_some_and(|name| record.name != name) {
            continue;
        }
        let coordinates = match parse_coordinates(&record.geometry) {
            Ok(coordinates) => coordinates,
            Err(e) => {
                debug!("Leaving record {} out of the network layer: {e}", record.name);
                continue;
            }
        };

        let value = json!({
            "type": "Feature",
            "geometry": line_geometry(&coordinates),
            "properties": {
                "name": record.name,
                "direction": record.direction,
                "status": record.status,
            }
        });
        features.push(
            Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))?,
        );
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RouteGraph, shortest_path};

    fn record(name: &str, geometry: &str) -> RouteRecord {
        RouteRecord::new(name, "Both", "Existing", geometry)
    }

    #[test]
    fn path_feature_uses_lon_lat_order() {
        let a = Coordinate::new(-37.81, 144.96).unwrap();
        let b = Coordinate::new(-37.82, 144.97).unwrap();
        let mut graph = RouteGraph::new();
        graph.add_segment(a, b, 1.0).unwrap();

        let feature = shortest_path(&graph, a, b).unwrap().to_geojson().unwrap();
        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["geometry"]["type"], "LineString");
        assert_eq!(value["geometry"]["coordinates"][0][0], 144.96);
        assert_eq!(value["geometry"]["coordinates"][0][1], -37.81);
        assert_eq!(value["properties"]["vertices"], 2);
    }

    #[test]
    fn layer_filters_by_category() {
        let records = [
            record(
                "On-Road Bike Lane",
                r#"{"coordinates": [[[144.96, -37.81], [144.97, -37.82]]]}"#,
            ),
            record(
                "Off-Road Bike Route",
                r#"{"coordinates": [[[144.98, -37.83], [144.99, -37.84]]]}"#,
            ),
            record("On-Road Bike Lane", "garbage"),
        ];

        assert_eq!(network_layer(&records, None).unwrap().features.len(), 2);

        let layer = network_layer(&records, Some("Off-Road Bike Route")).unwrap();
        assert_eq!(layer.features.len(), 1);
        let properties = layer.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["status"], "Existing");
    }
}
