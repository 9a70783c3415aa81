//! Server configuration from a TOML file.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use wisecycle_core::{AttachmentConfig, Coordinate, Gazetteer, NetworkConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub network: NetworkConfig,
    pub attachment: AttachmentConfig,
    /// Address -> `[lat, lon]` entries answered by the built-in geocoder
    pub gazetteer: BTreeMap<String, Coordinate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8050)),
            request_timeout_secs: 30,
            max_concurrent_requests: 64,
        }
    }
}

impl Config {
    /// Reads `path`, or returns the defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn geocoder(&self) -> Gazetteer {
        self.gazetteer
            .iter()
            .map(|(address, coordinate)| (address.as_str(), *coordinate))
            .collect()
    }
}
