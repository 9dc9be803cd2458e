//! Bundled demo API used by the `quickrouter` binary.
//!
//! Rooted at `/Api` with JSON output forced:
//!
//! - `GET /` - welcome object
//! - `GET /users/{id}/{action}` - looks up user 1 and echoes the requested action. Any numeric
//!   `id` is accepted (`1.0`, `1e0`) and truncated to an integer.
//! - `GET /echo`, `POST /echo` - echo the merged request parameters
//!
//! The 404 and 500 error routes answer with JSON error bodies; the 500 body reports the status
//! carried by the failure as `code` (0 when untagged).

use crate::dispatcher::{ErrorRequest, HandlerOutput, HandlerRequest, HandlerResult};
use crate::error::HandlerError;
use crate::router::Router;
use crate::runtime_config::RouterConfig;
use http::Method;
use serde_json::{json, Value};

pub const DEFAULT_ROOT: &str = "/Api";

/// Router settings the demo API is designed for.
#[must_use]
pub fn default_config() -> RouterConfig {
    RouterConfig {
        root: DEFAULT_ROOT.to_string(),
        always_json: true,
    }
}

/// Register the demo routes and error routes on `router`.
pub fn register(router: &mut Router) {
    router
        .set_error_route(404, not_found)
        .set_error_route(500, internal_error)
        .add_route(Method::GET, "/", root_handler, true)
        .add_route(Method::GET, "/users/{id}/{action}", user_action_handler, false)
        .add_route(Method::GET, "/echo", echo_handler, false)
        .add_route(Method::POST, "/echo", echo_handler, false);
}

fn root_handler(_req: &HandlerRequest) -> HandlerResult {
    Ok(json!({ "response": "This is the root of the API!" }).into())
}

/// Lenient numeric id: surrounding whitespace, decimals and exponents are accepted and the
/// value is truncated toward zero (`"1.0"`, `"1e0"`, `" 1"` and `"1.9"` are all user 1).
#[allow(clippy::cast_possible_truncation)]
fn parse_user_id(value: Option<&Value>) -> Option<i64> {
    let number = match value? {
        Value::String(raw) => raw.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    number.is_finite().then(|| number.trunc() as i64)
}

/// `id` must be numeric; only user 1 exists.
fn user_action_handler(req: &HandlerRequest) -> HandlerResult {
    let id = parse_user_id(req.get_param("id"))
        .ok_or_else(|| HandlerError::new("Invalid user ID."))?;

    if id != 1 {
        return Err(HandlerError::not_found("User not found."));
    }

    Ok(json!({
        "id": id,
        "name": "Some User Name",
        "action": req.get_param("action"),
    })
    .into())
}

fn echo_handler(req: &HandlerRequest) -> HandlerResult {
    Ok(json!({
        "method": req.method.as_str(),
        "path": req.path,
        "pattern": req.pattern,
        "params": req.params,
    })
    .into())
}

fn not_found(err: &ErrorRequest) -> HandlerResult {
    Ok(HandlerOutput::from(json!({ "error": err.message })))
}

fn internal_error(err: &ErrorRequest) -> HandlerResult {
    Ok(HandlerOutput::from(json!({
        "error": "Exception",
        "message": err.message,
        "code": err.error.as_ref().and_then(HandlerError::status).unwrap_or(0),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(params: &[(&str, Value)]) -> HandlerRequest {
        let params = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        HandlerRequest::new(Method::GET, "/users/1/activate", "/users/{id}/{action}", params)
    }

    #[test]
    fn test_user_action_for_known_user() {
        let req = request(&[("id", json!("1")), ("action", json!("activate"))]);
        assert_eq!(
            user_action_handler(&req).unwrap(),
            HandlerOutput::Json(json!({"id": 1, "name": "Some User Name", "action": "activate"}))
        );
    }

    #[test]
    fn test_user_action_unknown_user_is_not_found() {
        let req = request(&[("id", json!("2")), ("action", json!("activate"))]);
        let err = user_action_handler(&req).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "User not found.");
    }

    #[test]
    fn test_user_action_non_numeric_id_is_untagged() {
        for raw in ["abc", "", "inf", "NaN", "1x"] {
            let req = request(&[("id", json!(raw))]);
            let err = user_action_handler(&req).unwrap_err();
            assert_eq!(err.status(), None, "{raw:?}");
            assert_eq!(err.message(), "Invalid user ID.");
        }
    }

    #[test]
    fn test_user_action_accepts_numeric_forms() {
        for raw in ["1.0", "1e0", " 1", "1 ", "1.9", "+1"] {
            let req = request(&[("id", json!(raw)), ("action", json!("view"))]);
            assert_eq!(
                user_action_handler(&req).unwrap(),
                HandlerOutput::Json(json!({"id": 1, "name": "Some User Name", "action": "view"})),
                "{raw:?}"
            );
        }
        let req = request(&[("id", json!("2.0"))]);
        assert_eq!(user_action_handler(&req).unwrap_err().status(), Some(404));
    }

    #[test]
    fn test_error_bodies() {
        let req = ErrorRequest::new(404, None);
        assert_eq!(
            not_found(&req).unwrap(),
            HandlerOutput::Json(json!({"error": "Not Found"}))
        );
        let req = ErrorRequest::new(404, Some(HandlerError::not_found("User not found.")));
        assert_eq!(
            not_found(&req).unwrap(),
            HandlerOutput::Json(json!({"error": "User not found."}))
        );
        let req = ErrorRequest::new(500, Some(HandlerError::new("boom")));
        assert_eq!(
            internal_error(&req).unwrap(),
            HandlerOutput::Json(json!({"error": "Exception", "message": "boom", "code": 0}))
        );
    }
}
