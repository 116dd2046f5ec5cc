//! Chat completions pipeline for Prism
//!
//! Forwards `OpenAI`-style chat completion requests to an upstream client,
//! runs the registered response hooks over the result, normalizes it into a
//! schema-complete document and answers either as JSON or as an emulated
//! SSE stream.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod emulator;
pub mod error;
pub mod gateway;
#[cfg(feature = "http")]
pub mod handler;
pub mod hook;
pub mod normalize;
pub mod types;
pub mod upstream;

pub use emulator::StreamEmulator;
pub use error::LlmError;
pub use gateway::{Dispatch, Gateway, Stage};
#[cfg(feature = "http")]
pub use handler::{CHAT_COMPLETIONS_PATH, llm_router};
pub use hook::{ChartHook, HookRegistry, ResponseHook};
pub use normalize::normalize;
pub use upstream::{ChatCompletionClient, OpenAiClient};
