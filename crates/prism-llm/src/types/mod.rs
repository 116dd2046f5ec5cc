//! Chat-completion wire types
//!
//! Response types keep every field optional so the normalizer can tell
//! "absent" from "present", and carry unknown upstream fields through
//! untouched.

pub mod message;
pub mod request;
pub mod response;
pub mod stream;

pub use message::{ChatMessage, ContentPart, ImageUrl, MessageContent};
pub use request::{ChatCompletionRequest, UpstreamParams};
pub use response::{ChatCompletionResponse, Choice, ChoiceMessage, Usage};
pub use stream::{CHUNK_OBJECT, ChunkChoice, DONE_SENTINEL, Delta, StreamChunk, StreamFrame};
