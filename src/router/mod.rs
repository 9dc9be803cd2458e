//! # Router Module
//!
//! Path matching, route resolution and dispatch.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling path patterns such as `/users/{id}/{action}` into segment matchers
//! - Selecting the first registered route that qualifies for the request
//! - Merging path parameters over query/form/body parameters
//! - Invoking the handler and writing its output, raw or as JSON
//! - Redirecting handler failures to status-code error routes
//!
//! ## Pattern Syntax
//!
//! Patterns are `/`-separated. A segment wrapped in `{` and `}` is a named parameter and
//! matches any non-empty value; every other segment is literal and matched
//! case-insensitively. A request qualifies only when it has exactly as many segments as the
//! pattern; there are no wildcards.
//!
//! ## Normalization
//!
//! Root prefixes, patterns and request paths all go through [`normalize_path`]: one leading
//! slash, no trailing slash, and `/` for the root. A router rooted at `/Api` owns `/api`,
//! `/API/users/1` and `/Api/`, but not `/Apiary`.
//!
//! ## Chaining
//!
//! ```rust
//! use http::Method;
//! use quickrouter::dispatcher::HandlerOutput;
//! use quickrouter::source::{BufferSink, FixtureSource};
//! use quickrouter::Router;
//!
//! let source = FixtureSource::new("GET", "/admin/stats");
//! let mut sink = BufferSink::new();
//!
//! let mut api = Router::new(&source, "/api", false).unwrap();
//! api.add_route(Method::GET, "/stats", |_| Ok(HandlerOutput::text("api")), false);
//!
//! let mut admin = Router::new(&source, "/admin", false).unwrap();
//! admin.add_route(Method::GET, "/stats", |_| Ok(HandlerOutput::text("admin")), false);
//!
//! let handled = api.process(&mut sink).unwrap() || admin.process(&mut sink).unwrap();
//! assert!(handled);
//! assert_eq!(sink.body_str(), "admin");
//! ```

mod core;
mod route;

pub use core::{parse_method, Router, SUPPORTED_METHODS};
pub use route::{Route, Segment, SegmentVec, MAX_INLINE_SEGMENTS};

/// Normalize a root prefix, pattern or request path.
///
/// Leading and trailing slashes are collapsed so the result starts with exactly one `/` and
/// never ends with one, except for the root itself.
///
/// ```rust
/// use quickrouter::router::normalize_path;
///
/// assert_eq!(normalize_path(""), "/");
/// assert_eq!(normalize_path("Api/"), "/Api");
/// assert_eq!(normalize_path("//users/{id}//"), "/users/{id}");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    let mut normalized = String::with_capacity(trimmed.len() + 1);
    normalized.push('/');
    normalized.push_str(trimmed);
    normalized
}
