//! Route query facade
//!
//! [`RoutePlanner`] owns the route graph. Each query attaches its endpoints
//! and runs Dijkstra while holding the write lock, so concurrent queries never
//! race on the same new coordinate.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use log::{error, info, warn};
use petgraph::Direction;
use thiserror::Error;

use super::attach::{AttachmentConfig, attach_with_policy};
use super::common::{Endpoint, RoutingError};
use super::dijkstra::shortest_path;
use super::path::Path;
use crate::{Coordinate, CoordinateError, GeocodeError, Geocoder, NetworkStats, RouteGraph};

/// Why a textual endpoint could not be turned into a coordinate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// Answer to a route query. Every failure mode has its own variant.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Found {
        path: Path,
        description: String,
    },
    /// Both endpoints were understood but no route connects them.
    /// `reason` tells a missing vertex apart from a disconnected pair.
    NoRoute {
        reason: RoutingError,
        description: String,
    },
    InvalidInput {
        input: String,
        reason: InputError,
        description: String,
    },
    Internal {
        description: String,
    },
}

impl RouteOutcome {
    pub fn description(&self) -> &str {
        match self {
            Self::Found { description, .. }
            | Self::NoRoute { description, .. }
            | Self::InvalidInput { description, .. }
            | Self::Internal { description } => description,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    fn invalid(input: &str, reason: InputError) -> Self {
        Self::InvalidInput {
            description: format!("Could not understand the location \"{input}\": {reason}"),
            input: input.to_string(),
            reason,
        }
    }
}

/// Shared routing service over one route network
pub struct RoutePlanner {
    graph: RwLock<RouteGraph>,
    config: AttachmentConfig,
}

impl RoutePlanner {
    pub fn new(graph: RouteGraph, config: AttachmentConfig) -> Self {
        Self {
            graph: RwLock::new(graph),
            config,
        }
    }

    pub fn config(&self) -> &AttachmentConfig {
        &self.config
    }

    /// Read access to the graph, for inspection between queries
    pub fn graph(&self) -> RwLockReadGuard<'_, RouteGraph> {
        self.graph.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stats(&self) -> NetworkStats {
        self.graph().stats()
    }

    /// Drops all attached vertices, returning how many were removed
    pub fn reset_attachments(&self) -> usize {
        self.graph
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .detach_all()
    }

    /// Routes between two coordinates, attaching either one to the network
    /// first if it is not already a vertex
    pub fn find_route(&self, origin: Coordinate, destination: Coordinate) -> RouteOutcome {
        let mut graph = match self.graph.write() {
            Ok(graph) => graph,
            Err(poisoned) => {
                let mut graph = poisoned.into_inner();
                error!(
                    "Route graph lock poisoned, dropping query {origin} -> {destination} \
                    ({} vertices, {} edges, {} attached)",
                    graph.vertex_count(),
                    graph.edge_count(),
                    graph.attached_count()
                );
                graph.detach_all();
                drop(graph);
                self.graph.clear_poison();
                return RouteOutcome::Internal {
                    description: "We could not process your request. Please try again."
                        .to_string(),
                };
            }
        };

        if let Some(limit) = self.config.max_attached_vertices {
            if graph.attached_count() >= limit {
                let removed = graph.detach_all();
                info!("Attached vertex limit {limit} reached, dropped {removed} attached vertices");
            }
        }

        for (endpoint, coordinate, direction) in [
            (Endpoint::Origin, origin, Direction::Outgoing),
            (Endpoint::Destination, destination, Direction::Incoming),
        ] {
            if let Err(e) = attach_with_policy(
                &mut graph,
                coordinate,
                &self.config.anchor,
                direction,
                self.config.connector_weight,
            ) {
                warn!("Could not attach {endpoint} {coordinate}: {e}");
            }
        }

        match shortest_path(&graph, origin, destination) {
            Ok(path) => {
                info!(
                    "Route {origin} -> {destination}: {} vertices, cost {}",
                    path.vertex_count(),
                    path.cost()
                );
                RouteOutcome::Found {
                    description: format!(
                        "Shortest path from {origin} to {destination} through {} points",
                        path.vertex_count()
                    ),
                    path,
                }
            }
            Err(reason) => {
                warn!(
                    "No route {origin} -> {destination}: {reason} ({} vertices, {} edges)",
                    graph.vertex_count(),
                    graph.edge_count()
                );
                RouteOutcome::NoRoute {
                    description: format!(
                        "No route found from {origin} to {destination}. Please check the locations."
                    ),
                    reason,
                }
            }
        }
    }

    /// Routes between two textual locations, each either `"lat,lon"` or an
    /// address resolved through `geocoder`
    pub fn find_route_text(
        &self,
        origin: &str,
        destination: &str,
        geocoder: Option<&dyn Geocoder>,
    ) -> RouteOutcome {
        let origin_coordinate = match resolve_location(origin, geocoder) {
            Ok(coordinate) => coordinate,
            Err(reason) => return RouteOutcome::invalid(origin, reason),
        };
        let destination_coordinate = match resolve_location(destination, geocoder) {
            Ok(coordinate) => coordinate,
            Err(reason) => return RouteOutcome::invalid(destination, reason),
        };
        self.find_route(origin_coordinate, destination_coordinate)
    }
}

/// Parses `text` as `"lat,lon"`, falling back to `geocoder` for anything
/// that is not numeric
///
/// # Errors
///
/// Returns [`InputError`] if the text is neither a finite coordinate pair nor
/// an address the geocoder resolves
pub fn resolve_location(
    text: &str,
    geocoder: Option<&dyn Geocoder>,
) -> Result<Coordinate, InputError> {
    match text.parse::<Coordinate>() {
        Ok(coordinate) => Ok(coordinate),
        Err(e @ CoordinateError::NotFinite(_)) => Err(e.into()),
        Err(e) => match geocoder {
            Some(geocoder) => geocoder.geocode(text).map_err(|ge| {
                warn!("Geocoding failed for {text:?}: {ge}");
                InputError::Geocode(ge)
            }),
            None => Err(e.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnchorPolicy, Gazetteer};

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn planner(config: AttachmentConfig) -> RoutePlanner {
        let mut graph = RouteGraph::new();
        graph.add_segment(coord(0.0, 0.0), coord(0.0, 1.0), 1.0).unwrap();
        graph.add_segment(coord(0.0, 1.0), coord(0.0, 2.0), 1.0).unwrap();
        RoutePlanner::new(graph, config)
    }

    #[test]
    fn routes_between_network_vertices() {
        let planner = planner(AttachmentConfig::default());
        let outcome = planner.find_route(coord(0.0, 0.0), coord(0.0, 2.0));
        let path = outcome.path().unwrap();
        assert_eq!(path.vertex_count(), 3);
        assert_eq!(planner.stats().attached_vertices, 0);
    }

    #[test]
    fn attaches_unknown_endpoints() {
        let planner = planner(AttachmentConfig::default());
        let origin = coord(-0.1, -0.1);
        let destination = coord(0.1, 2.1);

        let outcome = planner.find_route(origin, destination);
        let path = outcome.path().unwrap();
        assert_eq!(path.origin(), Some(origin));
        assert_eq!(path.destination(), Some(destination));
        assert_eq!(path.cost(), 4.0);

        let stats = planner.stats();
        assert_eq!(stats.attached_vertices, 2);
        assert_eq!(stats.connector_edges, 2);
    }

    #[test]
    fn repeated_query_reuses_attached_vertices() {
        let planner = planner(AttachmentConfig::default());
        let origin = coord(-0.1, -0.1);
        let destination = coord(0.1, 2.1);
        planner.find_route(origin, destination);
        let before = planner.stats();
        planner.find_route(origin, destination);
        assert_eq!(planner.stats(), before);
    }

    #[test]
    fn attached_endpoints_work_on_either_side() {
        let mut graph = RouteGraph::new();
        let [a, b, c] = [coord(0.0, 0.0), coord(0.0, 1.0), coord(0.0, 2.0)];
        graph.add_segment(a, b, 1.0).unwrap();
        graph.add_segment(b, c, 1.0).unwrap();
        graph.add_segment(c, a, 1.0).unwrap();
        let planner = RoutePlanner::new(graph, AttachmentConfig::default());
        let home = coord(-0.1, -0.1);
        let work = coord(0.1, 2.1);

        let outbound = planner.find_route(home, work);
        assert_eq!(outbound.path().unwrap().coordinates(), &[home, a, b, c, work]);

        let inbound = planner.find_route(work, home);
        assert_eq!(inbound.path().unwrap().coordinates(), &[work, c, a, home]);
        assert_eq!(inbound.path().unwrap().cost(), 3.0);

        let stats = planner.stats();
        assert_eq!(stats.attached_vertices, 2);
        assert_eq!(stats.connector_edges, 4);
    }

    #[test]
    fn poisoned_lock_is_an_internal_fault_and_recovers() {
        let planner = planner(AttachmentConfig::default());
        let origin = coord(-0.1, -0.1);
        let destination = coord(0.1, 2.1);
        assert!(planner.find_route(origin, destination).is_found());

        std::thread::scope(|scope| {
            let writer = scope.spawn(|| {
                let _graph = planner.graph.write().unwrap();
                panic!("writer failed while holding the route graph");
            });
            assert!(writer.join().is_err());
        });
        assert!(planner.graph.is_poisoned());

        let outcome = planner.find_route(origin, destination);
        assert!(matches!(outcome, RouteOutcome::Internal { .. }));
        assert_eq!(
            outcome.description(),
            "We could not process your request. Please try again."
        );
        assert!(!planner.graph.is_poisoned());
        assert_eq!(planner.stats().attached_vertices, 0);

        let retry = planner.find_route(origin, destination);
        assert_eq!(retry.path().unwrap().cost(), 4.0);
    }

    #[test]
    fn unreachable_is_reported_as_no_route() {
        let planner = planner(AttachmentConfig::default());
        let outcome = planner.find_route(coord(0.0, 2.0), coord(0.0, 0.0));
        assert!(matches!(
            outcome,
            RouteOutcome::NoRoute {
                reason: RoutingError::Unreachable { .. },
                ..
            }
        ));
        assert!(outcome.description().starts_with("No route found"));
    }

    #[test]
    fn empty_network_reports_missing_vertex() {
        let planner = RoutePlanner::new(RouteGraph::new(), AttachmentConfig::default());
        let outcome = planner.find_route(coord(1.0, 1.0), coord(2.0, 2.0));
        assert!(matches!(
            outcome,
            RouteOutcome::NoRoute {
                reason: RoutingError::NodeNotFound {
                    endpoint: Endpoint::Origin,
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn attached_vertices_are_bounded() {
        let planner = planner(AttachmentConfig {
            max_attached_vertices: Some(3),
            ..AttachmentConfig::default()
        });
        planner.find_route(coord(-0.1, -0.1), coord(0.1, 2.1));
        assert_eq!(planner.stats().attached_vertices, 2);
        planner.find_route(coord(-0.2, -0.2), coord(0.2, 2.2));
        assert_eq!(planner.stats().attached_vertices, 4);
        let outcome = planner.find_route(coord(-0.3, -0.3), coord(0.3, 2.3));
        assert!(outcome.is_found());
        assert_eq!(planner.stats().attached_vertices, 2);
    }

    #[test]
    fn text_input_is_validated() {
        let planner = planner(AttachmentConfig::default());

        let outcome = planner.find_route_text("0,0", "not a place", None);
        let RouteOutcome::InvalidInput { input, reason, .. } = &outcome else {
            panic!("expected invalid input, got {outcome:?}");
        };
        assert_eq!(input, "not a place");
        assert!(matches!(reason, InputError::Coordinate(_)));
        assert!(outcome.description().contains("not a place"));

        assert!(matches!(
            planner.find_route_text("inf,0", "0,2", None),
            RouteOutcome::InvalidInput {
                reason: InputError::Coordinate(CoordinateError::NotFinite(_)),
                ..
            }
        ));
        assert!(planner.find_route_text("0, 0", "(0, 2)", None).is_found());
    }

    #[test]
    fn addresses_go_through_geocoder() {
        let planner = planner(AttachmentConfig {
            anchor: AnchorPolicy::Fixed {
                origin: coord(0.0, 0.0),
                destination: coord(0.0, 2.0),
            },
            ..AttachmentConfig::default()
        });
        let mut gazetteer = Gazetteer::new();
        gazetteer.insert("Flinders Street Station", coord(-37.818, 144.967));
        gazetteer.insert("Melbourne Central", coord(-37.810, 144.963));

        let outcome = planner.find_route_text(
            "flinders street station",
            "Melbourne Central",
            Some(&gazetteer),
        );
        let path = outcome.path().unwrap();
        assert_eq!(path.vertex_count(), 5);

        let outcome = planner.find_route_text("Nowhere", "Melbourne Central", Some(&gazetteer));
        assert!(matches!(
            outcome,
            RouteOutcome::InvalidInput {
                reason: InputError::Geocode(GeocodeError::NotFound(_)),
                ..
            }
        ));
    }
}
