//! Shared primitives for Prism feature crates

mod error;

pub use error::{HttpError, error_body};
