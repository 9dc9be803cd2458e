//! # Dispatcher Module
//!
//! Handler-facing types: the handler signatures, the read-only request context handed to a
//! handler, the tagged handler output and the rendering rules used when output is written.
//!
//! ## Handler Contract
//!
//! A route handler is any `Fn(&HandlerRequest) -> HandlerResult`. It sees the merged
//! parameters (path parameters win over query/form/body values) and returns either:
//!
//! - `Ok(HandlerOutput::Empty)` - nothing is written
//! - `Ok(HandlerOutput::Text | Bytes | Json)` - written raw, or JSON-encoded when the route or
//!   router forces JSON output
//! - `Err(HandlerError)` - routed to the error handler for the error's status, or 500
//!
//! ```rust
//! use quickrouter::dispatcher::{HandlerOutput, HandlerRequest, HandlerResult};
//! use quickrouter::HandlerError;
//! use serde_json::json;
//!
//! fn get_user(req: &HandlerRequest) -> HandlerResult {
//!     match req.get_str("id") {
//!         Some("1") => Ok(HandlerOutput::from(json!({ "id": 1 }))),
//!         _ => Err(HandlerError::not_found("User not found.")),
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! Handler panics are caught at the same boundary as returned errors and converted into a
//! status-less [`HandlerError`](crate::HandlerError), so they reach the 500 error route.

mod core;

pub use core::{
    ErrorHandler, ErrorRequest, Handler, HandlerOutput, HandlerRequest, HandlerResult, Params,
};
pub(crate) use core::call_guarded;
