//! Dispatcher core - handler signatures, request context and output rendering.

use crate::error::{HandlerError, RouterError};
use http::Method;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::error;

/// Merged request parameters: query/form/body values overlaid with path parameters.
pub type Params = HashMap<String, Value>;

/// Result returned by route and error handlers.
pub type HandlerResult = Result<HandlerOutput, HandlerError>;

/// A route handler. Receives the read-only request context, returns a tagged result.
pub type Handler = Arc<dyn Fn(&HandlerRequest) -> HandlerResult + Send + Sync>;

/// A status-code error handler.
pub type ErrorHandler = Arc<dyn Fn(&ErrorRequest) -> HandlerResult + Send + Sync>;

/// Request data passed to a route handler
///
/// Built by the router after a route has been selected. Parameters are already merged:
/// values from the request source come first and path parameters replace them on key
/// collision.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// HTTP method of the request
    pub method: Method,
    /// Request path relative to the router root (e.g. `/users/1/activate`)
    pub path: String,
    /// Normalized pattern of the route that matched (e.g. `/users/{id}/{action}`)
    pub pattern: String,
    /// Root prefix of the router that dispatched the request
    pub root: String,
    /// Merged parameters
    pub params: Params,
}

impl HandlerRequest {
    /// Build a request context for a router rooted at `/`.
    #[must_use]
    pub fn new(
        method: Method,
        path: impl Into<String>,
        pattern: impl Into<String>,
        params: Params,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            pattern: pattern.into(),
            root: "/".to_string(),
            params,
        }
    }

    /// Get a parameter by name
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Get a parameter as a string slice. Returns `None` for non-string values.
    #[inline]
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }
}

/// Context handed to an error handler.
#[derive(Debug, Clone)]
pub struct ErrorRequest {
    /// Resolved status code (after any override carried by the error)
    pub status: u16,
    /// The failure that triggered the error route, if any
    pub error: Option<HandlerError>,
    /// Human readable description: the error message, or the status reason phrase
    pub message: String,
}

impl ErrorRequest {
    pub(crate) fn new(status: u16, error: Option<HandlerError>) -> Self {
        let message = match &error {
            Some(err) if !err.message().is_empty() => err.message().to_string(),
            _ => http::StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or("Unknown Error")
                .to_string(),
        };
        Self {
            status,
            error,
            message,
        }
    }
}

/// What a handler produced.
///
/// `Empty` is the explicit "no output" value: nothing is written, even when JSON output is
/// forced.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    Empty,
    Text(String),
    Bytes(Vec<u8>),
    Json(Value),
}

impl HandlerOutput {
    #[must_use]
    pub fn empty() -> Self {
        HandlerOutput::Empty
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        HandlerOutput::Text(text.into())
    }

    /// Convert any serializable value into a JSON output.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HandlerError> {
        Ok(HandlerOutput::Json(serde_json::to_value(value)?))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, HandlerOutput::Empty)
    }

    /// Render the output as-is.
    ///
    /// Text and bytes pass through untouched, a JSON string yields its contents and any other
    /// JSON value is written in compact form.
    #[must_use]
    pub fn render_raw(self) -> Option<Vec<u8>> {
        match self {
            HandlerOutput::Empty => None,
            HandlerOutput::Text(text) => Some(text.into_bytes()),
            HandlerOutput::Bytes(bytes) => Some(bytes),
            HandlerOutput::Json(Value::String(text)) => Some(text.into_bytes()),
            HandlerOutput::Json(value) => Some(value.to_string().into_bytes()),
        }
    }

    /// Render the output as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Serialization`] when the output has no JSON representation
    /// (raw bytes that are not valid UTF-8).
    pub fn render_json(self) -> Result<Option<Vec<u8>>, RouterError> {
        let encoded = match self {
            HandlerOutput::Empty => return Ok(None),
            HandlerOutput::Text(text) => serde_json::to_vec(&text),
            HandlerOutput::Bytes(bytes) => {
                let text = String::from_utf8(bytes)
                    .map_err(|e| RouterError::Serialization(e.to_string()))?;
                serde_json::to_vec(&text)
            }
            HandlerOutput::Json(value) => serde_json::to_vec(&value),
        };
        encoded
            .map(Some)
            .map_err(|e| RouterError::Serialization(e.to_string()))
    }
}

impl From<Value> for HandlerOutput {
    fn from(value: Value) -> Self {
        HandlerOutput::Json(value)
    }
}

impl From<String> for HandlerOutput {
    fn from(text: String) -> Self {
        HandlerOutput::Text(text)
    }
}

impl From<&str> for HandlerOutput {
    fn from(text: &str) -> Self {
        HandlerOutput::Text(text.to_string())
    }
}

impl From<()> for HandlerOutput {
    fn from(_: ()) -> Self {
        HandlerOutput::Empty
    }
}

/// Run a handler inside the failure boundary.
///
/// Panics are caught and turned into a [`HandlerError`] without a status, so the caller
/// routes them like any other handler failure.
pub(crate) fn call_guarded<F>(handler_name: &str, f: F) -> HandlerResult
where
    F: FnOnce() -> HandlerResult,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let panic_message = panic_message(payload.as_ref());
            error!(
                handler = %handler_name,
                panic_message = %panic_message,
                "Handler panicked"
            );
            Err(HandlerError::new(format!("Handler panicked: {panic_message}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_rendering_passes_text_through() {
        assert_eq!(HandlerOutput::text("hi").render_raw(), Some(b"hi".to_vec()));
        assert_eq!(HandlerOutput::Json(json!("hi")).render_raw(), Some(b"hi".to_vec()));
        assert_eq!(
            HandlerOutput::Json(json!({"a": 1})).render_raw(),
            Some(br#"{"a":1}"#.to_vec())
        );
        assert_eq!(HandlerOutput::Empty.render_raw(), None);
    }

    #[test]
    fn json_rendering_quotes_text() {
        let rendered = HandlerOutput::text("hi").render_json().unwrap();
        assert_eq!(rendered, Some(br#""hi""#.to_vec()));
        assert_eq!(HandlerOutput::Empty.render_json().unwrap(), None);
    }

    #[test]
    fn json_rendering_rejects_invalid_utf8() {
        let err = HandlerOutput::Bytes(vec![0xff, 0xfe]).render_json().unwrap_err();
        assert!(matches!(err, RouterError::Serialization(_)));
    }

    #[test]
    fn panics_become_handler_errors() {
        let result = call_guarded("boom", || panic!("kaboom"));
        let err = result.unwrap_err();
        assert_eq!(err.message(), "Handler panicked: kaboom");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn handler_request_keeps_path_and_pattern_apart() {
        let req = HandlerRequest::new(Method::GET, "/users/7", "/users/{id}", Params::new());
        assert_eq!(req.path, "/users/7");
        assert_eq!(req.pattern, "/users/{id}");
        assert_eq!(req.root, "/");
    }

    #[test]
    fn error_request_falls_back_to_reason_phrase() {
        assert_eq!(ErrorRequest::new(404, None).message, "Not Found");
        assert_eq!(ErrorRequest::new(599, None).message, "Unknown Error");
        let req = ErrorRequest::new(500, Some(HandlerError::new("db down")));
        assert_eq!(req.message, "db down");
    }
}
