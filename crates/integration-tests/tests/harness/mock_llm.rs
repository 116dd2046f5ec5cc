//! Mock upstream server for integration tests
//!
//! Implements a minimal OpenAI-compatible chat completions endpoint that
//! returns canned responses and records what it was sent

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Content returned when no custom content is configured
pub const DEFAULT_CONTENT: &str = "Hello from mock LLM";

/// Mock upstream that returns predictable responses
pub struct MockLlm {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockLlmState>,
}

enum Reply {
    /// Standard completion with the given message content
    Content(Value),
    /// Verbatim response document
    Raw(Value),
    /// Error status with a plain-text body
    Fail(StatusCode),
}

struct MockLlmState {
    completion_count: AtomicU32,
    reply: Reply,
    last_request: Mutex<Option<Value>>,
    last_authorization: Mutex<Option<String>>,
}

impl MockLlm {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(Reply::Content(Value::String(DEFAULT_CONTENT.to_owned()))).await
    }

    /// Start a mock server whose completions carry the given content
    pub async fn start_with_response(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(Reply::Content(Value::String(content.to_owned()))).await
    }

    /// Start a mock server whose completions carry arbitrary JSON content
    pub async fn start_with_content(content: Value) -> anyhow::Result<Self> {
        Self::start_inner(Reply::Content(content)).await
    }

    /// Start a mock server that answers every completion with `body` verbatim
    pub async fn start_with_raw(body: Value) -> anyhow::Result<Self> {
        Self::start_inner(Reply::Raw(body)).await
    }

    /// Start a mock server that fails every request with `status`
    pub async fn start_failing(status: StatusCode) -> anyhow::Result<Self> {
        Self::start_inner(Reply::Fail(status)).await
    }

    async fn start_inner(reply: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockLlmState {
            completion_count: AtomicU32::new(0),
            reply,
            last_request: Mutex::new(None),
            last_authorization: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the upstream
    ///
    /// Includes `/v1` since the client appends `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of completion requests received
    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }

    /// Body of the most recent completion request
    pub fn last_request(&self) -> Option<Value> {
        self.state.last_request.lock().unwrap().clone()
    }

    /// `Authorization` header of the most recent completion request
    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(
    State(state): State<Arc<MockLlmState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.completion_count.fetch_add(1, Ordering::Relaxed);

    let model = body["model"].as_str().unwrap_or("mock-model").to_owned();
    *state.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    *state.last_request.lock().unwrap() = Some(body);

    match &state.reply {
        Reply::Content(content) => Json(completion(&model, content)).into_response(),
        Reply::Raw(raw) => Json(raw.clone()).into_response(),
        Reply::Fail(status) => (*status, "mock upstream failure").into_response(),
    }
}

fn completion(model: &str, content: &Value) -> Value {
    json!({
        "id": "chatcmpl-mock-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "system_fingerprint": "fp_mock",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}
