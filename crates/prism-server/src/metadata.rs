use prism_llm::CHAT_COMPLETIONS_PATH;
use serde_json::{Value, json};

const SERVICE_NAME: &str = "Prism OpenAI-compatible chat completion gateway";

/// Service metadata for `GET /`
///
/// `health` is `null` when the health endpoint is disabled.
#[must_use]
pub fn service_metadata(health_path: Option<&str>) -> Value {
    json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "chat_completions": CHAT_COMPLETIONS_PATH,
            "health": health_path,
        }
    })
}
