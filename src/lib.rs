//! # QuickRouter
//!
//! **QuickRouter** is a minimal, synchronous HTTP request router: register
//! `(method, pattern, handler)` rules, hand it one request, and it picks the first qualifying
//! rule, extracts path parameters, runs the handler and writes its output.
//!
//! ## Overview
//!
//! A [`Router`] is built once per request. It owns an ordered route table and a set of
//! status-coded error routes, resolves exactly one request, and reports through
//! [`Router::process`] whether it handled it. Because an unhandled request leaves the sink
//! untouched, several routers can be tried in sequence (chaining) and the last one can fall
//! back to an error route.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern compilation, root-prefix filtering, route resolution and dispatch
//! - **[`dispatcher`]** - Handler signatures, request context and output rendering
//! - **[`source`]** - The request/response environment traits plus CLI, HTTP and fixture adapters
//! - **[`error`]** - Handler and router error types
//! - **[`runtime_config`]** - Router defaults from environment variables and YAML
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - Command-line front-end for the bundled [`demo`] API
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Source as RequestSource
//!     participant Router
//!     participant Route
//!     participant Handler
//!     participant Sink as ResponseSink
//!
//!     App->>Router: Router::new(&source, "/Api", always_json)
//!     Router->>Source: method / path / query / form / body
//!     Router->>Router: normalize path, parse parameters
//!     App->>Router: add_route(..), set_error_route(..)
//!     App->>Router: process(&mut sink)
//!
//!     alt Path outside root or no route qualifies
//!         Router-->>App: Ok(false)
//!         App->>Router: handle_error(404, None, &mut sink)
//!     else First qualifying route
//!         Router->>Route: extract_parameters(path)
//!         Router->>Handler: invoke(&HandlerRequest)
//!         alt Handler succeeded
//!             Router->>Sink: write(raw or JSON body)
//!         else Handler failed, panicked or output not serializable
//!             Router->>Router: handle_error(500 or tagged status)
//!             Router->>Sink: write(error body), set_status
//!         end
//!         Router-->>App: Ok(true)
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use quickrouter::dispatcher::{HandlerOutput, HandlerRequest, HandlerResult};
//! use quickrouter::source::{BufferSink, FixtureSource};
//! use quickrouter::{HandlerError, Router};
//! use serde_json::json;
//!
//! fn get_user(req: &HandlerRequest) -> HandlerResult {
//!     match req.get_str("id") {
//!         Some("1") => Ok(HandlerOutput::from(json!({ "id": 1, "name": "Some User Name" }))),
//!         _ => Err(HandlerError::not_found("User not found.")),
//!     }
//! }
//!
//! let source = FixtureSource::new("GET", "/Api/users/2");
//! let mut router = Router::new(&source, "/Api", true).unwrap();
//! router
//!     .add_route(Method::GET, "/users/{id}", get_user, false)
//!     .set_error_route(404, |err| Ok(HandlerOutput::from(json!({ "error": err.message }))));
//!
//! let mut sink = BufferSink::new();
//! assert!(router.process(&mut sink).unwrap());
//! assert_eq!(sink.status(), 404);
//! assert_eq!(sink.body_str(), r#"{"error":"User not found."}"#);
//! ```
//!
//! ## Command Line
//!
//! ```bash
//! quickrouter request /Api/users/1/activate
//! # {"action":"activate","id":1,"name":"Some User Name"}
//!
//! quickrouter routes
//! ```

pub mod cli;
pub mod demo;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod source;

pub use error::{HandlerError, RouterError};
pub use router::{Route, Router};
