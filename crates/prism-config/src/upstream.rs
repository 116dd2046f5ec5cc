use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Upstream chat-completion API configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// API key sent as a bearer token; falls back to `OPENAI_API_KEY`
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override (defaults to the public `OpenAI` API)
    #[serde(default)]
    pub base_url: Option<Url>,
}
