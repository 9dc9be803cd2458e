//! Compiled route: one (method, pattern) matcher bound to a handler.

use crate::dispatcher::{Handler, HandlerRequest, HandlerResult};
use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use super::normalize_path;

/// Maximum number of path segments kept inline before the segment list spills to the heap.
pub const MAX_INLINE_SEGMENTS: usize = 8;

/// Segment storage for compiled patterns.
pub type SegmentVec = SmallVec<[Segment; MAX_INLINE_SEGMENTS]>;

/// One `/`-delimited component of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matched case-insensitively against the request segment
    Literal(String),
    /// `{name}` - matches any non-empty request segment
    Param(String),
}

impl Segment {
    /// Classify a raw pattern segment. Only a segment wrapped exactly in `{` and `}` with a
    /// non-empty, brace-free name is a parameter; everything else is literal.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) if !name.is_empty() && !name.contains(['{', '}']) => {
                Segment::Param(name.to_string())
            }
            _ => Segment::Literal(raw.to_string()),
        }
    }

    #[inline]
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Segment::Literal(text) => text.eq_ignore_ascii_case(candidate),
            Segment::Param(_) => !candidate.is_empty(),
        }
    }
}

/// Split a normalized path into its segments. `/` yields a single empty segment.
pub(crate) fn split_segments(normalized: &str) -> SmallVec<[&str; MAX_INLINE_SEGMENTS]> {
    normalized
        .strip_prefix('/')
        .unwrap_or(normalized)
        .split('/')
        .collect()
}

/// A compiled route
///
/// Immutable once built. The segment count is fixed at construction, so a request only
/// qualifies when it has exactly as many segments as the pattern.
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: String,
    segments: SegmentVec,
    parameter_indices: HashMap<String, usize>,
    always_json: bool,
    handler: Handler,
}

impl Route {
    /// Compile a route.
    ///
    /// Never fails: malformed placeholders such as `{id` are kept as literal segments. When a
    /// parameter name appears twice, the later position is the one extracted.
    pub fn new<F>(method: Method, pattern: &str, handler: F, always_json: bool) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        Self::with_handler(method, pattern, Arc::new(handler), always_json)
    }

    /// Compile a route around an already shared handler.
    pub fn with_handler(method: Method, pattern: &str, handler: Handler, always_json: bool) -> Self {
        let pattern = normalize_path(pattern);
        let segments: SegmentVec = split_segments(&pattern)
            .into_iter()
            .map(Segment::parse)
            .collect();

        let mut parameter_indices = HashMap::new();
        for (index, segment) in segments.iter().enumerate() {
            if let Segment::Param(name) = segment {
                if let Some(previous) = parameter_indices.insert(name.clone(), index) {
                    warn!(
                        pattern = %pattern,
                        parameter = %name,
                        previous_index = previous,
                        index = index,
                        "Duplicate route parameter name, last occurrence wins"
                    );
                }
            }
        }

        Self {
            method,
            pattern,
            segments,
            parameter_indices,
            always_json,
            handler,
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Normalized pattern (leading slash, no trailing slash).
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter name to segment position.
    #[must_use]
    pub fn parameter_indices(&self) -> &HashMap<String, usize> {
        &self.parameter_indices
    }

    #[must_use]
    pub fn has_parameters(&self) -> bool {
        !self.parameter_indices.is_empty()
    }

    #[must_use]
    pub fn always_json(&self) -> bool {
        self.always_json
    }

    /// Check whether this route should handle `path`.
    ///
    /// When `method` is given it must equal the route's method. The path is normalized the
    /// same way patterns are, so a trailing slash does not change the result.
    #[must_use]
    pub fn qualifies(&self, path: &str, method: Option<&Method>) -> bool {
        if method.is_some_and(|m| *m != self.method) {
            return false;
        }

        let normalized = normalize_path(path);
        let candidate = split_segments(&normalized);
        if candidate.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(candidate.iter())
            .all(|(segment, value)| segment.matches(value))
    }

    /// Extract path parameters from `path`.
    ///
    /// Returns `None` when the route declares no parameters or when `path` does not qualify.
    /// Values are the raw segment text; no decoding or type conversion happens here.
    #[must_use]
    pub fn extract_parameters(&self, path: &str) -> Option<HashMap<String, String>> {
        if !self.has_parameters() || !self.qualifies(path, None) {
            return None;
        }

        let normalized = normalize_path(path);
        let candidate = split_segments(&normalized);
        let params: HashMap<String, String> = self
            .parameter_indices
            .iter()
            .filter_map(|(name, &index)| {
                candidate
                    .get(index)
                    .map(|value| (name.clone(), (*value).to_string()))
            })
            .collect();

        (!params.is_empty()).then_some(params)
    }

    /// Run the handler. Output is returned untouched; rendering is the router's job.
    pub fn invoke(&self, request: &HandlerRequest) -> HandlerResult {
        (self.handler)(request)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("segments", &self.segments)
            .field("parameter_indices", &self.parameter_indices)
            .field("always_json", &self.always_json)
            .finish_non_exhaustive()
    }
}
