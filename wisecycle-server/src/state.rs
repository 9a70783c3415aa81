//! Shared application state.

use tracing::info;
use wisecycle_core::{Gazetteer, RoutePlanner, RouteRecord, build_route_graph, load_records};

use crate::config::Config;

pub struct AppState {
    pub planner: RoutePlanner,
    /// Source records, kept for the network layer endpoint
    pub records: Vec<RouteRecord>,
    pub geocoder: Gazetteer,
}

impl AppState {
    pub fn new(records: Vec<RouteRecord>, config: &Config) -> Self {
        let graph = build_route_graph(&records, &config.network);
        let geocoder = config.geocoder();
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            gazetteer_entries = geocoder.len(),
            "Route network ready"
        );

        Self {
            planner: RoutePlanner::new(graph, config.attachment.clone()),
            records,
            geocoder,
        }
    }

    pub fn load(config: &Config) -> Result<Self, wisecycle_core::Error> {
        let records = load_records(&config.network.records_path)?;
        Ok(Self::new(records, config))
    }
}
