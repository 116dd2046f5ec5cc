use http::StatusCode;
use prism_core::HttpError;
use thiserror::Error;

/// Errors that can occur while serving a chat completion
#[derive(Debug, Error)]
pub enum LlmError {
    /// Client sent a malformed or invalid request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream call failed (network, auth, rate limit, provider error)
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A response hook failed
    #[error("hook '{hook}' failed: {message}")]
    Hook {
        /// Name of the failing hook
        hook: String,
        /// Failure description
        message: String,
    },

    /// Upstream response lacks structure that cannot be repaired
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LlmError {
    /// Build a hook failure
    pub fn hook(hook: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Hook {
            hook: hook.into(),
            message: message.into(),
        }
    }
}

impl HttpError for LlmError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Hook { .. } | Self::MalformedResponse(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
