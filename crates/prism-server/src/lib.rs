//! HTTP server assembly for Prism
//!
//! Wires the chat completions router, health check and service metadata
//! behind request tracing and CORS.

mod cors;
mod health;
mod metadata;

use std::net::SocketAddr;

use axum::{Json, Router};
use prism_config::Config;
use prism_llm::Gateway;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway cannot be constructed
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let gateway = Gateway::from_config(config)?;
        Ok(Self::with_gateway(config, gateway))
    }

    /// Build the server around an already constructed gateway
    #[must_use]
    pub fn with_gateway(config: &Config, gateway: Gateway) -> Self {
        let listen_address = config.server.listen_address();
        let health = &config.server.health;

        let mut app = Router::new();

        // Health check
        if health.enabled {
            app = app.route(&health.path, axum::routing::get(health::health_handler));
        }

        // Service metadata
        let metadata = metadata::service_metadata(health.enabled.then_some(health.path.as_str()));
        app = app.route("/", axum::routing::get(move || async move { Json(metadata) }));

        // Chat completions
        app = app.merge(prism_llm::llm_router(gateway));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        if let Some(ref cors_config) = config.server.cors {
            app = app
                .layer(cors::cors_layer(cors_config))
                .layer(axum::middleware::map_response(cors::json_options_body));
        }

        Self {
            router: app,
            listen_address,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
