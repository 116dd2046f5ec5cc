use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::Config;

/// Environment variable holding the upstream API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

impl Config {
    /// Load configuration, optionally from a TOML file
    ///
    /// Without a file every section takes its defaults. The upstream API key
    /// falls back to `OPENAI_API_KEY` when the file does not set one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let raw = match path {
            Some(path) => std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?,
            None => String::new(),
        };

        Self::from_toml_str(&raw)
    }

    /// Parse, resolve and validate configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let mut config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        if config.upstream.api_key.is_none()
            && let Ok(key) = std::env::var(API_KEY_ENV)
        {
            config.upstream.api_key = Some(SecretString::from(key));
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream API key is missing or blank, or the
    /// health path is not absolute
    pub fn validate(&self) -> anyhow::Result<()> {
        let has_key = self
            .upstream
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty());

        if !has_key {
            anyhow::bail!(
                "could not load settings: make sure {API_KEY_ENV} is set in the environment or a .env file \
                 (or set upstream.api_key in the config file)"
            );
        }

        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        Ok(())
    }
}

/// Load a `.env` file into the process environment when it exists
///
/// Variables already present in the environment win over the file.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed
pub fn load_env_file(path: &Path) -> anyhow::Result<bool> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no env file found");
        return Ok(false);
    }

    dotenv::from_path(path).map_err(|e| anyhow::anyhow!("failed to load env file {}: {e}", path.display()))?;
    Ok(true)
}
