//! Endpoint attachment
//!
//! Coordinates that are not network vertices (typed coordinates, geocoded
//! addresses) are inserted as vertices and linked to an anchor vertex with a
//! single connector edge. This is a direct vertex-to-vertex link, not a
//! projection onto the nearest segment, so route geometry near an attached
//! endpoint can be approximate.

use log::{debug, warn};
use petgraph::Direction;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{EdgeKind, NodeOrigin, RouteEdge};
use crate::{Coordinate, DEFAULT_EDGE_WEIGHT, RouteGraph, VertexId, Weight};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttachError {
    #[error("route network has no vertices to anchor {0} to")]
    EmptyNetwork(Coordinate),
    #[error("anchor {0} is not a vertex of the route network")]
    AnchorNotFound(Coordinate),
    #[error("connector weight {0} must be finite and positive")]
    InvalidWeight(Weight),
}

/// Result of attaching a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// The coordinate already was a vertex; nothing changed
    Existing(VertexId),
    /// A new vertex linked to `anchor` by one connector edge
    Connected { vertex: VertexId, anchor: VertexId },
}

impl Attachment {
    pub fn vertex(&self) -> VertexId {
        match self {
            Self::Existing(vertex) | Self::Connected { vertex, .. } => *vertex,
        }
    }
}

/// How the anchor vertex for a new coordinate is chosen
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// Closest network vertex by planar lon/lat distance
    #[default]
    Nearest,
    /// Origins connect to `origin`, destinations are reached from
    /// `destination`. Falls back to [`AnchorPolicy::Nearest`] when the
    /// configured vertex is missing from the network.
    Fixed {
        origin: Coordinate,
        destination: Coordinate,
    },
}

impl AnchorPolicy {
    fn fixed_anchor(&self, direction: Direction) -> Option<Coordinate> {
        match (self, direction) {
            (Self::Fixed { origin, .. }, Direction::Outgoing) => Some(*origin),
            (Self::Fixed { destination, .. }, Direction::Incoming) => Some(*destination),
            (Self::Nearest, _) => None,
        }
    }
}

/// Attachment settings of a [`RoutePlanner`](crate::RoutePlanner)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttachmentConfig {
    /// Weight of every connector edge
    pub connector_weight: Weight,
    pub anchor: AnchorPolicy,
    /// Attached vertices are dropped once this many have accumulated
    pub max_attached_vertices: Option<usize>,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            connector_weight: DEFAULT_EDGE_WEIGHT,
            anchor: AnchorPolicy::default(),
            max_attached_vertices: None,
        }
    }
}

/// Makes `coordinate` routable through `anchor`.
///
/// `direction` is taken from the coordinate's side: [`Direction::Outgoing`]
/// links `coordinate -> anchor` (a route origin), [`Direction::Incoming`]
/// links `anchor -> coordinate` (a route destination). No-op if `coordinate`
/// already is a network vertex, or an attached vertex that already has a
/// connector on that side.
///
/// # Errors
///
/// Returns [`AttachError::AnchorNotFound`] if `anchor` is not a vertex and
/// [`AttachError::InvalidWeight`] for a non-positive `weight`
pub fn attach(
    graph: &mut RouteGraph,
    coordinate: Coordinate,
    anchor: Coordinate,
    direction: Direction,
    weight: Weight,
) -> Result<Attachment, AttachError> {
    if let Some(vertex) = routable_vertex(graph, coordinate, direction) {
        return Ok(Attachment::Existing(vertex));
    }
    let anchor = graph
        .vertex(anchor)
        .ok_or(AttachError::AnchorNotFound(anchor))?;
    connect(graph, coordinate, anchor, direction, weight)
}

/// Like [`attach`], choosing the anchor with `policy`.
///
/// # Errors
///
/// Returns [`AttachError::EmptyNetwork`] if the graph has no network vertex
/// to anchor to and [`AttachError::InvalidWeight`] for a non-positive `weight`
pub fn attach_with_policy(
    graph: &mut RouteGraph,
    coordinate: Coordinate,
    policy: &AnchorPolicy,
    direction: Direction,
    weight: Weight,
) -> Result<Attachment, AttachError> {
    if let Some(vertex) = routable_vertex(graph, coordinate, direction) {
        return Ok(Attachment::Existing(vertex));
    }

    let fixed = policy.fixed_anchor(direction).and_then(|anchor| {
        let vertex = graph.vertex(anchor);
        if vertex.is_none() {
            warn!("Fixed anchor {anchor} is not in the route network, using nearest vertex");
        }
        vertex
    });
    let anchor = fixed
        .or_else(|| graph.nearest_network_vertex(coordinate))
        .ok_or(AttachError::EmptyNetwork(coordinate))?;

    connect(graph, coordinate, anchor, direction, weight)
}

/// The vertex for `coordinate` if it can already be left (`Outgoing`) or
/// reached (`Incoming`). Network vertices always qualify; an attached vertex
/// only has the connector of the side it was first attached for.
fn routable_vertex(
    graph: &RouteGraph,
    coordinate: Coordinate,
    direction: Direction,
) -> Option<VertexId> {
    let vertex = graph.vertex(coordinate)?;
    let routable = match graph.node(vertex).map(|node| node.origin) {
        Some(NodeOrigin::Attached) => graph
            .graph
            .edges_directed(vertex, direction)
            .next()
            .is_some(),
        _ => true,
    };
    routable.then_some(vertex)
}

fn connect(
    graph: &mut RouteGraph,
    coordinate: Coordinate,
    anchor: VertexId,
    direction: Direction,
    weight: Weight,
) -> Result<Attachment, AttachError> {
    if !(weight.is_finite() && weight > 0.0) {
        return Err(AttachError::InvalidWeight(weight));
    }

    let vertex = graph.insert_vertex(coordinate, NodeOrigin::Attached);
    let (source, target) = match direction {
        Direction::Outgoing => (vertex, anchor),
        Direction::Incoming => (anchor, vertex),
    };
    graph
        .link(
            source,
            target,
            RouteEdge {
                weight,
                kind: EdgeKind::Connector,
            },
        )
        .map_err(|_| AttachError::InvalidWeight(weight))?;

    debug!(
        "Attached {coordinate} ({direction:?}) via anchor {}",
        graph
            .coordinate(anchor)
            .map_or_else(|| format!("{anchor:?}"), |c| c.to_string())
    );
    Ok(Attachment::Connected { vertex, anchor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortest_path;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn line() -> (RouteGraph, [Coordinate; 3]) {
        let points = [coord(0.0, 0.0), coord(0.0, 1.0), coord(0.0, 2.0)];
        let mut graph = RouteGraph::new();
        graph.add_segment(points[0], points[1], 1.0).unwrap();
        graph.add_segment(points[1], points[2], 1.0).unwrap();
        (graph, points)
    }

    #[test]
    fn existing_vertex_is_left_alone() {
        let (mut graph, [a, b, _]) = line();
        let before = graph.edge_list();
        let result = attach(&mut graph, a, b, Direction::Outgoing, 1.0).unwrap();
        assert!(matches!(result, Attachment::Existing(_)));
        assert_eq!(graph.edge_list(), before);
    }

    #[test]
    fn outgoing_links_coordinate_to_anchor() {
        let (mut graph, [a, _, c]) = line();
        let start = coord(-0.1, -0.1);
        attach(&mut graph, start, a, Direction::Outgoing, 1.0).unwrap();

        assert!(graph.edge_list().contains(&(start, a, 1.0)));
        let path = shortest_path(&graph, start, c).unwrap();
        assert_eq!(path.vertex_count(), 4);
    }

    #[test]
    fn incoming_links_anchor_to_coordinate() {
        let (mut graph, [a, _, c]) = line();
        let end = coord(0.1, 2.1);
        attach(&mut graph, end, c, Direction::Incoming, 2.0).unwrap();

        assert!(graph.edge_list().contains(&(c, end, 2.0)));
        assert_eq!(shortest_path(&graph, a, end).unwrap().cost(), 4.0);
    }

    #[test]
    fn attached_destination_gains_outgoing_connector_as_origin() {
        let (mut graph, [a, _, c]) = line();
        let point = coord(0.1, 2.1);
        let policy = AnchorPolicy::Nearest;

        let first =
            attach_with_policy(&mut graph, point, &policy, Direction::Incoming, 1.0).unwrap();
        assert!(matches!(first, Attachment::Connected { .. }));
        let again =
            attach_with_policy(&mut graph, point, &policy, Direction::Incoming, 1.0).unwrap();
        assert_eq!(again, Attachment::Existing(first.vertex()));

        let reused =
            attach_with_policy(&mut graph, point, &policy, Direction::Outgoing, 1.0).unwrap();
        let Attachment::Connected { vertex, anchor } = reused else {
            panic!("expected an outgoing connector, got {reused:?}");
        };
        assert_eq!(vertex, first.vertex());
        assert_eq!(graph.coordinate(anchor), Some(c));
        assert!(graph.edge_list().contains(&(point, c, 1.0)));
        assert_eq!(graph.attached_count(), 1);

        graph.add_segment(c, a, 1.0).unwrap();
        assert_eq!(shortest_path(&graph, point, a).unwrap().vertex_count(), 3);
    }

    #[test]
    fn missing_anchor_is_rejected_without_side_effects() {
        let (mut graph, _) = line();
        let result = attach(
            &mut graph,
            coord(5.0, 5.0),
            coord(6.0, 6.0),
            Direction::Outgoing,
            1.0,
        );
        assert_eq!(result, Err(AttachError::AnchorNotFound(coord(6.0, 6.0))));
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn invalid_weight_leaves_graph_unchanged() {
        let (mut graph, [a, ..]) = line();
        let result = attach(&mut graph, coord(5.0, 5.0), a, Direction::Outgoing, 0.0);
        assert_eq!(result, Err(AttachError::InvalidWeight(0.0)));
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn nearest_policy_picks_closest_network_vertex() {
        let (mut graph, [_, _, c]) = line();
        let end = coord(0.2, 2.3);
        let attachment =
            attach_with_policy(&mut graph, end, &AnchorPolicy::Nearest, Direction::Incoming, 1.0)
                .unwrap();

        let Attachment::Connected { vertex, anchor } = attachment else {
            panic!("expected a new vertex, got {attachment:?}");
        };
        assert_eq!(graph.coordinate(anchor), Some(c));
        assert_eq!(graph.coordinate(vertex), Some(end));
        assert_eq!(graph.degree(vertex), 1);
    }

    #[test]
    fn fixed_policy_uses_side_specific_anchor() {
        let (mut graph, [a, _, c]) = line();
        let policy = AnchorPolicy::Fixed {
            origin: a,
            destination: c,
        };

        let start = coord(40.0, 40.0);
        let end = coord(-40.0, -40.0);
        attach_with_policy(&mut graph, start, &policy, Direction::Outgoing, 1.0).unwrap();
        attach_with_policy(&mut graph, end, &policy, Direction::Incoming, 1.0).unwrap();

        let path = shortest_path(&graph, start, end).unwrap();
        assert_eq!(path.coordinates().first(), Some(&start));
        assert_eq!(path.coordinates()[1], a);
        assert_eq!(path.coordinates()[path.vertex_count() - 2], c);
        assert_eq!(path.cost(), 4.0);
    }

    #[test]
    fn fixed_policy_falls_back_to_nearest() {
        let (mut graph, [a, ..]) = line();
        let policy = AnchorPolicy::Fixed {
            origin: coord(70.0, 70.0),
            destination: coord(71.0, 71.0),
        };
        let start = coord(-0.1, -0.1);
        let attachment =
            attach_with_policy(&mut graph, start, &policy, Direction::Outgoing, 1.0).unwrap();
        let Attachment::Connected { anchor, .. } = attachment else {
            panic!("expected a new vertex");
        };
        assert_eq!(graph.coordinate(anchor), Some(a));
    }

    #[test]
    fn empty_network_cannot_anchor() {
        let mut graph = RouteGraph::new();
        let result = attach_with_policy(
            &mut graph,
            coord(1.0, 1.0),
            &AnchorPolicy::Nearest,
            Direction::Outgoing,
            1.0,
        );
        assert_eq!(result, Err(AttachError::EmptyNetwork(coord(1.0, 1.0))));
        assert!(graph.is_empty());
    }

    #[test]
    fn attachment_config_deserializes_fixed_policy() {
        let config: AttachmentConfig = serde_json::from_str(
            r#"{"connector_weight": 2.5, "anchor": {"policy": "fixed", "origin": [-37.81, 144.96], "destination": [-37.82, 144.97]}}"#,
        )
        .unwrap();
        assert_eq!(config.connector_weight, 2.5);
        assert_eq!(
            config.anchor,
            AnchorPolicy::Fixed {
                origin: coord(-37.81, 144.96),
                destination: coord(-37.82, 144.97)
            }
        );
        assert_eq!(config.max_attached_vertices, None);
    }
}
