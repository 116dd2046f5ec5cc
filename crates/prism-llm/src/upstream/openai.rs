//! OpenAI-compatible upstream client

use async_trait::async_trait;
use prism_config::UpstreamConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::ChatCompletionClient;
use crate::error::LlmError;
use crate::types::{ChatCompletionResponse, UpstreamParams};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for `POST {base_url}/chat/completions`
pub struct OpenAiClient {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl OpenAiClient {
    /// Create from upstream configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Internal` if the default base URL fails to parse
    pub fn new(config: &UpstreamConfig) -> Result<Self, LlmError> {
        let base_url = match &config.base_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_BASE_URL).map_err(|e| LlmError::Internal(e.into()))?,
        };

        Ok(Self {
            client: Client::new(),
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

#[async_trait]
impl ChatCompletionClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn create_chat_completion(&self, params: &UpstreamParams) -> Result<ChatCompletionResponse, LlmError> {
        let mut builder = self.client.post(self.completions_url()).json(params);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(model = %params.model, error = %e, "upstream request failed");
            LlmError::Upstream(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %params.model, status = %status, "upstream returned error");
            return Err(LlmError::Upstream(format!("provider returned {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::Upstream(format!("failed to parse response: {e}")))
    }
}
