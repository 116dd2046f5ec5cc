//! Response hooks
//!
//! A hook transforms a finished upstream response before it is normalized
//! and sent to the caller. Hooks are registered once at startup on a
//! [`HookRegistry`] and applied in registration order for every request.

pub mod chart;

use std::fmt;

use crate::error::LlmError;
use crate::types::ChatCompletionResponse;

pub use chart::ChartHook;

/// A transformation applied to every completed response
///
/// Implementations must return the response unchanged when the fields they
/// act on (`choices`, `message`) are absent, and only fail on genuine
/// processing errors.
pub trait ResponseHook: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    /// Transform the response
    ///
    /// # Errors
    ///
    /// Returns an error if the transformation itself fails
    fn apply(&self, response: ChatCompletionResponse) -> Result<ChatCompletionResponse, LlmError>;
}

impl<F> ResponseHook for F
where
    F: Fn(ChatCompletionResponse) -> Result<ChatCompletionResponse, LlmError> + Send + Sync,
{
    fn name(&self) -> &str {
        std::any::type_name::<F>()
    }

    fn apply(&self, response: ChatCompletionResponse) -> Result<ChatCompletionResponse, LlmError> {
        self(response)
    }
}

/// Ordered list of response hooks
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Box<dyn ResponseHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook; it runs after every hook registered before it
    pub fn register(&mut self, hook: impl ResponseHook + 'static) -> &mut Self {
        tracing::debug!(hook = hook.name(), position = self.hooks.len(), "registered response hook");
        self.hooks.push(Box::new(hook));
        self
    }

    /// Fold the response through every hook in registration order
    ///
    /// Each hook receives the previous hook's output. The first failure
    /// aborts the chain.
    ///
    /// # Errors
    ///
    /// Returns the error of the first hook that fails
    pub fn apply_all(&self, response: ChatCompletionResponse) -> Result<ChatCompletionResponse, LlmError> {
        self.hooks.iter().try_fold(response, |response, hook| {
            hook.apply(response).inspect_err(|e| {
                tracing::warn!(hook = hook.name(), error = %e, "response hook failed");
            })
        })
    }

    /// Hook names in application order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().map(|hook| hook.name())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
