//! Router core - request resolution, dispatch and error routes.

use crate::dispatcher::{
    call_guarded, ErrorHandler, ErrorRequest, HandlerRequest, HandlerResult, Params,
};
use crate::error::{HandlerError, RouterError};
use crate::runtime_config::RouterConfig;
use crate::source::{
    params_from_pairs, parse_form_pairs, ExecutionContext, RequestSource, ResponseSink,
};
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{normalize_path, Route};

/// Methods a router accepts. Anything else fails router construction.
pub const SUPPORTED_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::HEAD,
    Method::OPTIONS,
];

/// Parse a method name (case-insensitive) into one of [`SUPPORTED_METHODS`].
///
/// # Errors
///
/// Returns [`RouterError::UnsupportedMethod`] for anything outside the supported set.
pub fn parse_method(name: &str) -> Result<Method, RouterError> {
    let upper = name.trim().to_ascii_uppercase();
    SUPPORTED_METHODS
        .iter()
        .find(|m| m.as_str() == upper)
        .cloned()
        .ok_or_else(|| RouterError::UnsupportedMethod(name.to_string()))
}

/// Per-request router
///
/// Owns an ordered route table and a set of status-code error handlers, and resolves a
/// single request captured at construction time.
///
/// Routes are tried in registration order and the first qualifying route wins; there is no
/// specificity ranking. A router only handles requests under its root prefix, and
/// [`Router::process`] returns `false` for anything else so several routers can be tried in
/// sequence against the same request.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use quickrouter::dispatcher::HandlerOutput;
/// use quickrouter::source::{BufferSink, FixtureSource};
/// use quickrouter::Router;
/// use serde_json::json;
///
/// let source = FixtureSource::new("GET", "/api/users/7");
/// let mut router = Router::new(&source, "/api", true).unwrap();
/// router.add_route(Method::GET, "/users/{id}", |req| {
///     Ok(HandlerOutput::from(json!({ "id": req.get_str("id") })))
/// }, false);
///
/// let mut sink = BufferSink::new();
/// assert!(router.process(&mut sink).unwrap());
/// assert_eq!(sink.body_str(), r#"{"id":"7"}"#);
/// ```
pub struct Router {
    root: String,
    always_json: bool,
    routes: Vec<Route>,
    error_routes: HashMap<u16, ErrorHandler>,
    method: Method,
    path: String,
    context: ExecutionContext,
    params: Params,
}

impl Router {
    /// Create a router for the request described by `source`.
    ///
    /// The root prefix is normalized (empty becomes `/`, trailing slashes are dropped). The
    /// baseline parameters depend on the method:
    ///
    /// - GET, HEAD, DELETE: query pairs
    /// - POST: form pairs
    /// - PUT, PATCH, OPTIONS: the raw body parsed as form-encoded pairs
    ///
    /// Every value is parsed as JSON when possible and kept as a string otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnsupportedMethod`] when the request method is not supported.
    pub fn new(
        source: &dyn RequestSource,
        root: &str,
        always_json: bool,
    ) -> Result<Self, RouterError> {
        let root = normalize_path(root);
        let method = parse_method(source.method())?;
        let path = normalize_path(source.path().unwrap_or(&root));

        let pairs = if method == Method::GET || method == Method::HEAD || method == Method::DELETE
        {
            source.query()
        } else if method == Method::POST {
            source.form()
        } else {
            parse_form_pairs(&String::from_utf8_lossy(source.body()))
        };
        let params = params_from_pairs(pairs);

        info!(
            root = %root,
            method = %method,
            path = %path,
            always_json = always_json,
            params_count = params.len(),
            "Router created"
        );

        Ok(Self {
            root,
            always_json,
            routes: Vec::new(),
            error_routes: HashMap::new(),
            method,
            path,
            context: source.context(),
            params,
        })
    }

    /// Create a router using the root prefix and JSON policy from `config`.
    ///
    /// # Errors
    ///
    /// See [`Router::new`].
    pub fn from_config(
        source: &dyn RequestSource,
        config: &RouterConfig,
    ) -> Result<Self, RouterError> {
        Self::new(source, &config.root, config.always_json)
    }

    /// Register a route. Patterns are relative to the root prefix.
    ///
    /// No duplicate detection happens: if two routes can match the same request, the one
    /// registered first always wins.
    pub fn add_route<F>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: F,
        always_json: bool,
    ) -> &mut Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        let route = Route::new(method, pattern, handler, always_json);
        debug!(
            method = %route.method(),
            pattern = %route.pattern(),
            parameters = ?route.parameter_indices(),
            always_json = always_json,
            position = self.routes.len(),
            "Route registered"
        );
        self.routes.push(route);
        self
    }

    /// Register (or replace) the handler for a status code.
    pub fn set_error_route<F>(&mut self, status: u16, handler: F) -> &mut Self
    where
        F: Fn(&ErrorRequest) -> HandlerResult + Send + Sync + 'static,
    {
        if self.error_routes.insert(status, Arc::new(handler)).is_some() {
            debug!(status = status, "Error route replaced");
        }
        self
    }

    /// Look up a registered route.
    ///
    /// With `exact`, only a route whose normalized pattern equals `endpoint` literally
    /// (placeholders included) is returned. Otherwise `endpoint` is treated as a request path
    /// and the first qualifying route is returned. `method` filters in both modes.
    #[must_use]
    pub fn get_route(&self, endpoint: &str, method: Option<&Method>, exact: bool) -> Option<&Route> {
        let endpoint = normalize_path(endpoint);
        self.routes.iter().find(|route| {
            if exact {
                method.is_none_or(|m| m == route.method()) && route.pattern() == endpoint
            } else {
                route.qualifies(&endpoint, method)
            }
        })
    }

    /// Resolve and run the request.
    ///
    /// Returns `Ok(true)` when a route matched, whether its handler succeeded or failed into
    /// an error route, and `Ok(false)` when this router does not own the request or no route
    /// qualifies. In the `false` case nothing has been written.
    ///
    /// # Errors
    ///
    /// Only a failing error handler produces an error; handler failures are always handled.
    pub fn process(&mut self, sink: &mut dyn ResponseSink) -> Result<bool, RouterError> {
        debug!(
            method = %self.method,
            path = %self.path,
            root = %self.root,
            "Route match attempt"
        );

        let Some(relative) = self.relative_path() else {
            debug!(
                path = %self.path,
                root = %self.root,
                "Request outside router root"
            );
            return Ok(false);
        };

        let match_start = Instant::now();
        let Some(index) = self
            .routes
            .iter()
            .position(|route| route.qualifies(&relative, Some(&self.method)))
        else {
            warn!(
                method = %self.method,
                path = %relative,
                routes_count = self.routes.len(),
                duration_us = match_start.elapsed().as_micros(),
                "No route matched"
            );
            return Ok(false);
        };

        let route = &self.routes[index];
        if let Some(path_params) = route.extract_parameters(&relative) {
            for (name, value) in path_params {
                self.params.insert(name, Value::String(value));
            }
        }

        info!(
            method = %self.method,
            path = %relative,
            route_pattern = %route.pattern(),
            position = index,
            params_count = self.params.len(),
            duration_us = match_start.elapsed().as_micros(),
            "Route matched"
        );
        debug!(
            route_pattern = %route.pattern(),
            params = ?self.params,
            "Merged request parameters"
        );

        let request = HandlerRequest {
            method: self.method.clone(),
            path: relative,
            pattern: route.pattern().to_string(),
            root: self.root.clone(),
            params: self.params.clone(),
        };

        let execution_start = Instant::now();
        let outcome = call_guarded(route.pattern(), || route.invoke(&request));
        let force_json = self.always_json || route.always_json();

        let failure = match outcome {
            Ok(output) => {
                let rendered = if force_json {
                    output.render_json()
                } else {
                    Ok(output.render_raw())
                };
                match rendered {
                    Ok(Some(bytes)) => {
                        self.emit(sink, bytes);
                        None
                    }
                    Ok(None) => {
                        debug!(route_pattern = %route.pattern(), "Handler produced no output");
                        None
                    }
                    Err(e) => {
                        warn!(
                            route_pattern = %route.pattern(),
                            error = ?e,
                            "Handler output could not be serialized"
                        );
                        Some(HandlerError::from(e))
                    }
                }
            }
            Err(err) => {
                warn!(
                    route_pattern = %route.pattern(),
                    error = %err,
                    error_status = ?err.status(),
                    "Handler failed"
                );
                Some(err)
            }
        };

        info!(
            route_pattern = %route.pattern(),
            execution_time_us = execution_start.elapsed().as_micros(),
            failed = failure.is_some(),
            "Handler execution complete"
        );

        if let Some(err) = failure {
            if !self.handle_error(500, Some(&err), sink)? {
                warn!(
                    status = err.status().unwrap_or(500),
                    error = %err,
                    "Handler failure left unhandled: no error route registered"
                );
            }
        }

        Ok(true)
    }

    /// Run the error route for `status`.
    ///
    /// A status carried by `error` takes precedence over `status`. When a handler is
    /// registered it is invoked, its output written and the outward status set; the result
    /// is `Ok(true)`. Without a handler nothing happens and the result is `Ok(false)`, leaving
    /// the final fallback to the caller.
    ///
    /// # Errors
    ///
    /// A failure inside the error handler is returned as [`RouterError::ErrorHandler`].
    pub fn handle_error(
        &self,
        status: u16,
        error: Option<&HandlerError>,
        sink: &mut dyn ResponseSink,
    ) -> Result<bool, RouterError> {
        let status = error.and_then(HandlerError::status).unwrap_or(status);

        let Some(handler) = self.error_routes.get(&status) else {
            warn!(status = status, "No error route registered");
            return Ok(false);
        };

        let request = ErrorRequest::new(status, error.cloned());
        info!(
            status = status,
            message = %request.message,
            "Invoking error route"
        );

        let output = (handler.as_ref())(&request)
            .map_err(|source| RouterError::ErrorHandler { status, source })?;
        if let Some(bytes) = output.render_raw() {
            self.emit(sink, bytes);
        }
        sink.set_status(status);
        Ok(true)
    }

    /// Route table as `METHOD /root/pattern` lines, in registration order.
    #[must_use]
    pub fn route_table(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|route| format!("{} {}", route.method(), self.full_pattern(route)))
            .collect()
    }

    /// Log all registered routes.
    pub fn dump_routes(&self) {
        info!(
            root = %self.root,
            routes_count = self.routes.len(),
            error_routes = ?self.error_routes.keys().collect::<Vec<_>>(),
            "Routing table"
        );
        for line in self.route_table() {
            info!(route = %line, "Registered route");
        }
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[must_use]
    pub fn always_json(&self) -> bool {
        self.always_json
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Normalized request path, root prefix included.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    /// Current parameter mapping. Includes path parameters once a route has matched.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn has_error_route(&self, status: u16) -> bool {
        self.error_routes.contains_key(&status)
    }

    /// Request path relative to the root, or `None` when the request is outside the root.
    /// The root must match case-insensitively and end on a segment boundary.
    fn relative_path(&self) -> Option<String> {
        if self.root == "/" {
            return Some(self.path.clone());
        }

        let head = self.path.get(..self.root.len())?;
        if !head.eq_ignore_ascii_case(&self.root) {
            return None;
        }

        let rest = &self.path[self.root.len()..];
        if rest.is_empty() || rest.starts_with('/') {
            Some(normalize_path(rest))
        } else {
            None
        }
    }

    fn full_pattern(&self, route: &Route) -> String {
        match (self.root.as_str(), route.pattern()) {
            ("/", pattern) => pattern.to_string(),
            (root, "/") => root.to_string(),
            (root, pattern) => format!("{root}{pattern}"),
        }
    }

    fn emit(&self, sink: &mut dyn ResponseSink, mut bytes: Vec<u8>) {
        if self.context == ExecutionContext::Cli {
            bytes.push(b'\n');
        }
        sink.write(&bytes);
    }
}
