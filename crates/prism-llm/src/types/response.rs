use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::MessageContent;

/// Chat completion response as received from upstream and sent to clients
///
/// Every field is optional so that missing upstream fields stay observable
/// until normalization fills them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Unique response identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Object type (e.g. "chat.completion")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Unix timestamp of creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<u64>,
    /// Model used for generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Generated choices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Fields this gateway does not interpret (e.g. `system_fingerprint`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionResponse {
    /// Message of the first choice, if any
    pub fn first_message(&self) -> Option<&ChoiceMessage> {
        self.choices.as_ref()?.first()?.message.as_ref()
    }

    /// Mutable message of the first choice, if any
    pub fn first_message_mut(&mut self) -> Option<&mut ChoiceMessage> {
        self.choices.as_mut()?.first_mut()?.message.as_mut()
    }
}

/// A single completion choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Index of this choice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Generated message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChoiceMessage>,
    /// Why generation stopped; an explicit `null` reads as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// Log probabilities; `Some(None)` is an explicit `null`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub logprobs: Option<Option<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Assistant message within a response choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Author role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content; `Some(None)` is an explicit `null`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub content: Option<Option<MessageContent>>,
    /// Refusal text; `Some(None)` is an explicit `null`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub refusal: Option<Option<String>>,
    /// Fields this gateway does not interpret (e.g. `tool_calls`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChoiceMessage {
    /// Create a plain-text assistant message
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            role: Some("assistant".to_owned()),
            content: Some(Some(MessageContent::Text(content.into()))),
            ..Self::default()
        }
    }

    /// Content if present and not `null`
    pub fn content(&self) -> Option<&MessageContent> {
        self.content.as_ref()?.as_ref()
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    #[serde(default)]
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion)
    #[serde(default)]
    pub total_tokens: u32,
    /// Token detail breakdowns
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
