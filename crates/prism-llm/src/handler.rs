//! Axum route handlers for the `OpenAI`-compatible chat completions endpoint

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::{Stream, StreamExt, stream};
use http::{HeaderValue, StatusCode, header};
use prism_core::{HttpError, error_body};

use crate::emulator::StreamEmulator;
use crate::error::LlmError;
use crate::gateway::{Dispatch, Gateway, Stage};
use crate::types::{ChatCompletionRequest, StreamFrame};

/// Route serving chat completions
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Build the LLM router
pub fn llm_router(gateway: Gateway) -> Router {
    Router::new()
        .route(
            CHAT_COMPLETIONS_PATH,
            routing::post(chat_completions).options(chat_completions_options),
        )
        .with_state(gateway)
}

/// Handle `POST /v1/chat/completions`
async fn chat_completions(
    State(gateway): State<Gateway>,
    body: Result<Json<ChatCompletionRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(stage = %Stage::Failed, error = %rejection.body_text(), "rejected request body");
            let body = serde_json::json!({ "detail": rejection.body_text() });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match gateway.process(&request).await {
        Ok(Dispatch::Json(response)) => {
            tracing::debug!(stage = %Stage::JsonSent);
            let reply = Json(response).into_response();
            tracing::debug!(stage = %Stage::Done);
            reply
        }
        Ok(Dispatch::Stream(emulator)) => stream_response(emulator),
        Err(e) => error_response(&e),
    }
}

/// Handle `OPTIONS /v1/chat/completions`
///
/// Real preflights carrying CORS headers are answered by the CORS layer.
async fn chat_completions_options() -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}

/// Write the emulator's frames as an SSE body
fn stream_response(emulator: StreamEmulator) -> Response {
    let mut response = Sse::new(sse_events(emulator)).into_response();
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    response
}

fn sse_events(frames: impl Iterator<Item = StreamFrame>) -> impl Stream<Item = Result<Event, serde_json::Error>> {
    stream::iter(frames).map(|frame| {
        if frame == StreamFrame::Done {
            tracing::debug!(stage = %Stage::StreamSent);
            tracing::debug!(stage = %Stage::Done);
        }
        frame.to_data().map(|data| Event::default().data(data))
    })
}

fn error_response(error: &LlmError) -> Response {
    (error.status_code(), Json(error_body(error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageContent;

    #[tokio::test]
    async fn sse_events_end_with_sentinel() {
        let emulator = StreamEmulator::new(MessageContent::from("hello world"), "m", "id").with_created(1);
        let events: Vec<_> = sse_events(emulator).collect().await;

        // role, two fragments, terminal, sentinel
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(Result::is_ok));
    }

    #[tokio::test]
    async fn dropped_stream_stops_producing_frames() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let produced = AtomicUsize::new(0);
        let emulator = StreamEmulator::new(MessageContent::Text("x".repeat(500)), "m", "id");
        let frames = emulator.inspect(|_| {
            produced.fetch_add(1, Ordering::Relaxed);
        });

        let events = sse_events(frames);
        futures_util::pin_mut!(events);
        let taken: Vec<_> = events.as_mut().take(2).collect().await;
        drop(events);

        assert_eq!(taken.len(), 2);
        assert_eq!(produced.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn errors_render_detail_body() {
        let response = error_response(&LlmError::Upstream("down".to_owned()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
