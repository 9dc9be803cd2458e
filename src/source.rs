//! # Request Sources and Response Sinks
//!
//! The router never reads ambient process state. Everything it needs about the incoming
//! request comes through a [`RequestSource`], and everything it writes goes to a
//! [`ResponseSink`]. This module provides the traits plus the adapters used in practice:
//!
//! - [`CliSource`] - a command-line invocation (`quickrouter request /api/users/1`)
//! - [`HttpSource`] - an [`http::Request`] with a buffered body
//! - [`FixtureSource`] - a hand-built request, mostly for tests
//! - [`BufferSink`] / [`StdoutSink`] - collect output in memory or write it to stdout

use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;

/// Where the request came from.
///
/// In a CLI context a line terminator is appended after emitted output so a following shell
/// prompt does not end up on the same line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
    #[default]
    Http,
    Cli,
}

/// Key/value pairs as delivered by a request source, before JSON value parsing.
pub type RawPairs = Vec<(String, String)>;

/// Environment interface consumed by the router.
pub trait RequestSource {
    /// Request method name as received (e.g. `"get"`, `"POST"`).
    fn method(&self) -> &str;

    /// Request path without the query string. `None` means "the router root".
    fn path(&self) -> Option<&str>;

    /// Query-string pairs. Used for GET, HEAD and DELETE.
    fn query(&self) -> RawPairs;

    /// Submitted form pairs. Used for POST.
    fn form(&self) -> RawPairs;

    /// Raw request body. Parsed as form-encoded pairs for PUT, PATCH and OPTIONS.
    fn body(&self) -> &[u8];

    fn context(&self) -> ExecutionContext {
        ExecutionContext::Http
    }
}

/// Output interface used by the router.
pub trait ResponseSink {
    /// Append raw bytes to the response body.
    fn write(&mut self, bytes: &[u8]);

    /// Set the outward-facing status code.
    fn set_status(&mut self, status: u16);
}

/// Parse `application/x-www-form-urlencoded` text into pairs, in order.
///
/// A leading `?` is ignored so a raw query string can be passed directly.
#[must_use]
pub fn parse_form_pairs(input: &str) -> RawPairs {
    let input = input.strip_prefix('?').unwrap_or(input);
    url::form_urlencoded::parse(input.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Opportunistically parse a parameter value as JSON.
///
/// `"5"` becomes a number, `"true"` a boolean, `"{\"a\":1}"` an object. Anything that is not
/// valid JSON (e.g. `"activate"`) is kept as a string.
#[must_use]
pub fn parse_param_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Turn raw pairs into a parameter map. Later keys overwrite earlier ones.
#[must_use]
pub fn params_from_pairs(pairs: RawPairs) -> HashMap<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| {
            let value = parse_param_value(&v);
            (k, value)
        })
        .collect()
}

/// Request source for a command-line invocation.
///
/// The method defaults to GET. The request path is lower-cased; without one the request
/// targets the router root. A `?query` suffix on the path is split off into query pairs.
#[derive(Debug, Clone)]
pub struct CliSource {
    method: String,
    path: Option<String>,
    query: RawPairs,
    body: Vec<u8>,
}

impl Default for CliSource {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            path: None,
            query: Vec::new(),
            body: Vec::new(),
        }
    }
}

impl CliSource {
    /// Build from an argument vector (`argv[0]` is the program name, `argv[1]` the path).
    #[must_use]
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = args.into_iter().nth(1);
        Self::new(path.as_ref().map(AsRef::as_ref))
    }

    #[must_use]
    pub fn new(path: Option<&str>) -> Self {
        let mut source = Self::default();
        if let Some(raw) = path {
            let (path, query) = match raw.split_once('?') {
                Some((path, query)) => (path, parse_form_pairs(query)),
                None => (raw, Vec::new()),
            };
            source.path = Some(path.to_lowercase());
            source.query = query;
        }
        source
    }

    /// Override the request method (validated later by the router).
    #[must_use]
    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    /// Append query pairs (e.g. from repeated `--query key=value` flags).
    #[must_use]
    pub fn with_query(mut self, query: RawPairs) -> Self {
        self.query.extend(query);
        self
    }

    /// Request body. For POST it doubles as form-encoded input.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

impl RequestSource for CliSource {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn query(&self) -> RawPairs {
        self.query.clone()
    }

    fn form(&self) -> RawPairs {
        parse_form_pairs(&String::from_utf8_lossy(&self.body))
    }

    fn body(&self) -> &[u8] {
        &self.body
    }

    fn context(&self) -> ExecutionContext {
        ExecutionContext::Cli
    }
}

/// Request source backed by an [`http::Request`] with a fully buffered body.
#[derive(Debug)]
pub struct HttpSource {
    method: String,
    path: String,
    query: RawPairs,
    form: RawPairs,
    body: Vec<u8>,
}

impl HttpSource {
    #[must_use]
    pub fn from_request(req: http::Request<Vec<u8>>) -> Self {
        let (parts, body) = req.into_parts();
        let query = parts.uri.query().map(parse_form_pairs).unwrap_or_default();
        let is_form = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);
        // Mirrors how servers populate POST form data: only for form-encoded POST bodies
        let form = if is_form && parts.method == http::Method::POST {
            parse_form_pairs(&String::from_utf8_lossy(&body))
        } else {
            Vec::new()
        };
        Self {
            method: parts.method.as_str().to_string(),
            path: parts.uri.path().to_string(),
            query,
            form,
            body,
        }
    }
}

impl RequestSource for HttpSource {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn query(&self) -> RawPairs {
        self.query.clone()
    }

    fn form(&self) -> RawPairs {
        self.form.clone()
    }

    fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Hand-built request source.
///
/// ```rust
/// use quickrouter::source::FixtureSource;
///
/// let source = FixtureSource::new("POST", "/api/users")
///     .form("name", "ada")
///     .query("debug", "true");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    method: String,
    path: Option<String>,
    query: RawPairs,
    form: RawPairs,
    body: Vec<u8>,
    context: ExecutionContext,
}

impl FixtureSource {
    #[must_use]
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: Some(path.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn form(mut self, key: &str, value: &str) -> Self {
        self.form.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn cli(mut self) -> Self {
        self.context = ExecutionContext::Cli;
        self
    }

    /// Drop the path so the request targets the router root.
    #[must_use]
    pub fn without_path(mut self) -> Self {
        self.path = None;
        self
    }
}

impl RequestSource for FixtureSource {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn query(&self) -> RawPairs {
        self.query.clone()
    }

    fn form(&self) -> RawPairs {
        self.form.clone()
    }

    fn body(&self) -> &[u8] {
        &self.body
    }

    fn context(&self) -> ExecutionContext {
        self.context
    }
}

/// In-memory sink. Status defaults to 200 until an error route sets one.
#[derive(Debug, Clone)]
pub struct BufferSink {
    body: Vec<u8>,
    status: u16,
    writes: usize,
}

impl Default for BufferSink {
    fn default() -> Self {
        Self {
            body: Vec::new(),
            status: 200,
            writes: 0,
        }
    }
}

impl BufferSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text (lossy).
    #[must_use]
    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Number of `write` calls received.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Convert into an [`http::Response`].
    ///
    /// # Errors
    ///
    /// Fails when the recorded status is not a valid HTTP status code.
    pub fn into_response(self) -> Result<http::Response<Vec<u8>>, http::Error> {
        http::Response::builder().status(self.status).body(self.body)
    }
}

impl ResponseSink for BufferSink {
    fn write(&mut self, bytes: &[u8]) {
        self.writes += 1;
        self.body.extend_from_slice(bytes);
    }

    fn set_status(&mut self, status: u16) {
        self.status = status;
    }
}

/// Sink writing straight to stdout.
#[derive(Debug)]
pub struct StdoutSink {
    status: u16,
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self { status: 200 }
    }
}

impl StdoutSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }
}

impl ResponseSink for StdoutSink {
    fn write(&mut self, bytes: &[u8]) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(bytes).and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "Failed to write response to stdout");
        }
    }

    fn set_status(&mut self, status: u16) {
        self.status = status;
    }
}
