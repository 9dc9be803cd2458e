//! # Error Types
//!
//! Two error families flow through the router:
//!
//! - [`HandlerError`] is what a route handler (or error handler) fails with. It carries a message
//!   and an optional HTTP status code. A handler that wants the request treated as "not found"
//!   returns `HandlerError::not_found(..)`; the router then prefers the 404 error route over the
//!   default 500 one.
//! - [`RouterError`] covers failures of the router itself: unsupported request methods,
//!   output that cannot be serialized, invalid configuration, and failures raised inside an
//!   error handler (which the router deliberately does not swallow).

use std::fmt;

/// Message reported when a handler's output cannot be converted to JSON.
pub const SERIALIZATION_FAILED: &str = "The output from this endpoint failed to be converted to JSON.";

/// Failure produced while executing a route or error handler.
///
/// A status of `None` (or `Some(0)`) means "no opinion": the router uses whatever status the
/// failure path was entered with, typically 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    message: String,
    status: Option<u16>,
}

impl HandlerError {
    /// Create an error without a status code.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Attach a status code that overrides the router's default failure status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Shorthand for a 404-tagged error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).with_status(404)
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The status code carried by this error, if any. Zero is treated as absent.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status.filter(|s| *s != 0)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HandlerError {}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain on one line
        Self::new(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<RouterError> for HandlerError {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::ErrorHandler { source, .. } => source,
            other => Self::new(other.to_string()),
        }
    }
}

/// Errors raised by the router itself.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The request method is outside GET, POST, PUT, DELETE, PATCH, HEAD and OPTIONS.
    #[error("unsupported request method: {0}")]
    UnsupportedMethod(String),

    /// A handler result could not be converted to JSON. The detail is kept for logging only;
    /// the displayed message is fixed.
    #[error("{}", SERIALIZATION_FAILED)]
    Serialization(String),

    /// An error handler itself failed. These are propagated to the embedding application.
    #[error("error handler for status {status} failed: {source}")]
    ErrorHandler {
        status: u16,
        #[source]
        source: HandlerError,
    },

    /// Invalid configuration value or file.
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_status_is_absent() {
        assert_eq!(HandlerError::new("x").with_status(0).status(), None);
        assert_eq!(HandlerError::new("x").status(), None);
        assert_eq!(HandlerError::not_found("gone").status(), Some(404));
    }

    #[test]
    fn serialization_error_has_fixed_message() {
        let err = RouterError::Serialization("invalid utf-8 sequence".to_string());
        assert_eq!(err.to_string(), SERIALIZATION_FAILED);
        let handler_err = HandlerError::from(err);
        assert_eq!(handler_err.message(), SERIALIZATION_FAILED);
        assert_eq!(handler_err.status(), None);
    }

    #[test]
    fn anyhow_context_is_preserved() {
        let err = anyhow::anyhow!("disk full").context("saving user");
        let handler_err = HandlerError::from(err);
        assert_eq!(handler_err.message(), "saving user: disk full");
    }
}
