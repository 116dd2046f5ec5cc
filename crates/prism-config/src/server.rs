use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig};

/// Default listen address when none is configured
pub const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000);

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    #[serde(default)]
    pub health: HealthConfig,
    /// CORS policy; permissive unless overridden
    #[serde(default = "default_cors")]
    pub cors: Option<CorsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            health: HealthConfig::default(),
            cors: default_cors(),
        }
    }
}

impl ServerConfig {
    /// Configured listen address or the default `0.0.0.0:8000`
    pub fn listen_address(&self) -> SocketAddr {
        self.listen_address.unwrap_or(DEFAULT_LISTEN_ADDRESS)
    }
}

#[allow(clippy::unnecessary_wraps)]
fn default_cors() -> Option<CorsConfig> {
    Some(CorsConfig::default())
}
