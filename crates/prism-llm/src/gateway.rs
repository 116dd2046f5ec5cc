//! Request pipeline: forward, hook, normalize, dispatch

use std::fmt;
use std::sync::Arc;

use prism_config::Config;

use crate::emulator::StreamEmulator;
use crate::error::LlmError;
use crate::hook::{ChartHook, HookRegistry};
use crate::normalize::normalize;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChoiceMessage, UpstreamParams};
use crate::upstream::{ChatCompletionClient, OpenAiClient};

/// Lifecycle stage of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Forwarded,
    Hooked,
    Normalized,
    Dispatched,
    JsonSent,
    StreamSent,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Received => "received",
            Self::Forwarded => "forwarded",
            Self::Hooked => "hooked",
            Self::Normalized => "normalized",
            Self::Dispatched => "dispatched",
            Self::JsonSent => "json_sent",
            Self::StreamSent => "stream_sent",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

/// How a processed request is answered
#[derive(Debug)]
pub enum Dispatch {
    /// Single JSON document
    Json(ChatCompletionResponse),
    /// Emulated SSE stream
    Stream(StreamEmulator),
}

/// Shared, read-only gateway state
///
/// The hook registry is frozen once the gateway is built.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    client: Arc<dyn ChatCompletionClient>,
    hooks: HookRegistry,
}

impl Gateway {
    pub fn new(client: Arc<dyn ChatCompletionClient>, hooks: HookRegistry) -> Self {
        Self {
            inner: Arc::new(GatewayInner { client, hooks }),
        }
    }

    /// Build the gateway from configuration: `OpenAI` client plus configured hooks
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client cannot be constructed
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let client = OpenAiClient::new(&config.upstream)?;

        let mut hooks = HookRegistry::new();
        if config.hooks.chart.enabled {
            hooks.register(ChartHook::from_config(&config.hooks.chart));
        }

        tracing::info!(hooks = ?hooks, "response hooks registered");

        Ok(Self::new(Arc::new(client), hooks))
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.inner.hooks
    }

    /// Run one request through the pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if validation, the upstream call, a hook or
    /// normalization fails, or a stream was requested for a response
    /// without content
    pub async fn process(&self, request: &ChatCompletionRequest) -> Result<Dispatch, LlmError> {
        tracing::debug!(stage = %Stage::Received, model = %request.model, stream = request.is_stream());

        self.run(request)
            .await
            .inspect_err(|e| tracing::debug!(stage = %Stage::Failed, error = %e))
    }

    async fn run(&self, request: &ChatCompletionRequest) -> Result<Dispatch, LlmError> {
        request.validate()?;

        let params = UpstreamParams::from(request);
        let response = self
            .inner
            .client
            .create_chat_completion(&params)
            .await
            .inspect_err(|e| tracing::error!(client = self.inner.client.name(), error = %e, "upstream call failed"))?;
        tracing::debug!(stage = %Stage::Forwarded, client = self.inner.client.name());

        let response = self.inner.hooks.apply_all(response)?;
        tracing::debug!(stage = %Stage::Hooked, hooks = self.inner.hooks.len());

        let response = normalize(response)?;
        tracing::debug!(stage = %Stage::Normalized);

        let dispatch = if request.is_stream() {
            Dispatch::Stream(emulator_for(&response)?)
        } else {
            Dispatch::Json(response)
        };
        tracing::debug!(stage = %Stage::Dispatched, stream = request.is_stream());

        Ok(dispatch)
    }
}

/// Build the stream emulator from a normalized response
fn emulator_for(response: &ChatCompletionResponse) -> Result<StreamEmulator, LlmError> {
    let content = response
        .first_message()
        .and_then(ChoiceMessage::content)
        .cloned()
        .ok_or_else(|| LlmError::MalformedResponse("response has no message content to stream".to_owned()))?;

    let model = response
        .model
        .clone()
        .ok_or_else(|| LlmError::MalformedResponse("response has no model".to_owned()))?;

    // normalization guarantees an id
    let id = response.id.clone().unwrap_or_default();

    let mut emulator = StreamEmulator::new(content, model, id);
    if let Some(created) = response.created {
        emulator = emulator.with_created(created);
    }

    Ok(emulator)
}
