//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use prism_config::{Config, CorsConfig};
use secrecy::SecretString;

/// API key the test gateway sends upstream
pub const TEST_API_KEY: &str = "test-key";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.listen_address = Some(SocketAddr::from(([127, 0, 0, 1], 0)));
        config.upstream.api_key = Some(SecretString::from(TEST_API_KEY));

        Self { config }
    }

    /// Point the upstream client at a mock backend
    pub fn with_upstream(mut self, base_url: &str) -> Self {
        self.config.upstream.base_url = Some(base_url.parse().expect("valid URL"));
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Remove the CORS layer
    pub fn without_cors(mut self) -> Self {
        self.config.server.cors = None;
        self
    }

    /// Disable the chart hook
    pub fn without_chart(mut self) -> Self {
        self.config.hooks.chart.enabled = false;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Serve health checks on a custom path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
