//! Post-hook response normalization
//!
//! Fills in whatever an `OpenAI`-compatible client expects to find on a
//! finished chat completion. Each rule only touches a missing field, so
//! normalizing an already-normalized response changes nothing.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::LlmError;
use crate::types::{ChatCompletionResponse, ChoiceMessage, ContentPart, MessageContent, Usage};

/// Normalize a response after the hook chain has run
///
/// Only the first choice is shaped. Message rules are skipped when the
/// choice has no message.
///
/// # Errors
///
/// Returns `LlmError::MalformedResponse` when the response has no choices
pub fn normalize(mut response: ChatCompletionResponse) -> Result<ChatCompletionResponse, LlmError> {
    let now = unix_now();

    let choice = response
        .choices
        .as_mut()
        .and_then(|choices| choices.first_mut())
        .ok_or_else(|| LlmError::MalformedResponse("upstream response contains no choices".to_owned()))?;

    choice.finish_reason.get_or_insert_with(|| "stop".to_owned());
    choice.index.get_or_insert(0);
    choice.logprobs.get_or_insert(None);

    if let Some(message) = choice.message.as_mut() {
        normalize_message(message);
    }

    response.usage.get_or_insert_with(Usage::default);
    response.id.get_or_insert_with(|| format!("chatcmpl-{now}"));
    response.object.get_or_insert_with(|| "chat.completion".to_owned());
    response.created.get_or_insert(now);

    Ok(response)
}

fn normalize_message(message: &mut ChoiceMessage) {
    message.role.get_or_insert_with(|| "assistant".to_owned());
    message.refusal.get_or_insert(None);

    match message.content.as_mut() {
        Some(Some(MessageContent::Parts(parts))) => text_first(parts),
        Some(content) if content.is_none() => *content = Some(MessageContent::Text(String::new())),
        _ => {}
    }
}

/// Move text parts ahead of all other parts, keeping order within each group
pub fn text_first(parts: &mut [ContentPart]) {
    parts.sort_by_key(|part| !part.is_text());
}

/// Current time in unix seconds
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
