#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
pub mod hooks;
mod loader;
pub mod logging;
pub mod server;
pub mod upstream;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use hooks::*;
pub use loader::{API_KEY_ENV, load_env_file};
pub use logging::*;
pub use server::*;
pub use upstream::*;

/// Top-level Prism configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream chat-completion API
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Response hook configuration
    #[serde(default)]
    pub hooks: HooksConfig,
    /// Log output configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
