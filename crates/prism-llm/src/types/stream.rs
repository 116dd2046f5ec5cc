use serde::{Deserialize, Serialize};

use super::message::{ContentPart, MessageContent};

/// Literal payload of the final SSE frame
pub const DONE_SENTINEL: &str = "[DONE]";

/// Object type of every streaming chunk
pub const CHUNK_OBJECT: &str = "chat.completion.chunk";

/// One `chat.completion.chunk` event
///
/// Field order matches what `OpenAI` clients receive from the native API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

/// Choice entry within a streaming chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: Delta,
    /// Serialized as `null` until the terminal chunk
    pub finish_reason: Option<String>,
}

/// Incremental patch applied by the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

impl Delta {
    /// `{"role": "assistant", "content": ""}`
    pub fn role() -> Self {
        Self {
            role: Some("assistant".to_owned()),
            content: Some(MessageContent::Text(String::new())),
        }
    }

    /// `{"content": "<fragment>"}`
    pub const fn fragment(text: String) -> Self {
        Self {
            role: None,
            content: Some(MessageContent::Text(text)),
        }
    }

    /// `{"content": [...]}` carrying a whole content array
    pub const fn parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: None,
            content: Some(MessageContent::Parts(parts)),
        }
    }
}

/// A frame written to the SSE transport
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    /// A data chunk
    Chunk(StreamChunk),
    /// End-of-stream sentinel
    Done,
}

impl StreamFrame {
    /// Payload of the `data:` line for this frame
    ///
    /// # Errors
    ///
    /// Returns an error if the chunk cannot be serialized
    pub fn to_data(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Chunk(chunk) => serde_json::to_string(chunk),
            Self::Done => Ok(DONE_SENTINEL.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(delta: Delta, finish_reason: Option<&str>) -> StreamFrame {
        StreamFrame::Chunk(StreamChunk {
            id: "chatcmpl-1".to_owned(),
            object: CHUNK_OBJECT.to_owned(),
            created: 1_700_000_000,
            model: "gpt-4o".to_owned(),
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason: finish_reason.map(str::to_owned),
            }],
        })
    }

    #[test]
    fn role_chunk_wire_format() {
        assert_eq!(
            chunk(Delta::role(), None).to_data().unwrap(),
            r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1700000000,"model":"gpt-4o","choices":[{"index":0,"delta":{"role":"assistant","content":""},"finish_reason":null}]}"#
        );
    }

    #[test]
    fn terminal_chunk_has_empty_delta() {
        assert_eq!(
            chunk(Delta::default(), Some("stop")).to_data().unwrap(),
            r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1700000000,"model":"gpt-4o","choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#
        );
    }

    #[test]
    fn sentinel_is_literal() {
        assert_eq!(StreamFrame::Done.to_data().unwrap(), "[DONE]");
    }
}
