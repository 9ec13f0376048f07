use std::net::SocketAddr;

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Upstream JSON endpoint serving the raw permit dataset.
    pub dataset_url: String,
    pub dataset_timeout_secs: u64,
    pub user_agent: String,
    /// How long a fetched dataset is served before it is refreshed.
    pub cache_ttl_secs: u64,
    pub default_radius_miles: f64,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
    /// Fixed device position backing the CLI's location capability.
    pub device_location: Option<Coordinate>,
}
