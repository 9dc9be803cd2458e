//! Binary-level tests for the `quickrouter` CLI against the bundled demo API.

mod common;

use common::temp_files::create_temp_yaml;
use serde_json::{json, Value};
use std::process::{Command, Output};

fn quickrouter(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quickrouter"))
        .args(args)
        .env_remove("QUICKROUTER_ROOT")
        .env_remove("QUICKROUTER_ALWAYS_JSON")
        .env_remove("RUST_LOG")
        .output()
        .expect("run quickrouter")
}

fn stdout_json(output: &Output) -> Value {
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.ends_with('\n'), "CLI output should end with a newline: {text:?}");
    serde_json::from_str(text.trim_end()).unwrap()
}

#[test]
fn test_cli_root_route() {
    let output = quickrouter(&["request", "/Api"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({"response": "This is the root of the API!"})
    );

    // No path at all targets the router root
    let output = quickrouter(&["request"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({"response": "This is the root of the API!"})
    );
}

#[test]
fn test_cli_user_lookup() {
    let output = quickrouter(&["request", "/Api/Users/1/Activate"]);
    assert!(output.status.success());
    // The CLI lower-cases the path, so the action arrives lower-case
    assert_eq!(
        stdout_json(&output),
        json!({"id": 1, "name": "Some User Name", "action": "activate"})
    );
}

#[test]
fn test_cli_unknown_user_is_404() {
    let output = quickrouter(&["request", "/api/users/2/activate"]);
    assert!(!output.status.success());
    assert_eq!(stdout_json(&output), json!({"error": "User not found."}));
}

#[test]
fn test_cli_invalid_user_id_is_500() {
    let output = quickrouter(&["request", "/api/users/abc/activate"]);
    assert!(!output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({"error": "Exception", "message": "Invalid user ID.", "code": 0})
    );
}

#[test]
fn test_cli_unmatched_path_uses_404_route() {
    let output = quickrouter(&["request", "/api/nothing/here"]);
    assert!(!output.status.success());
    assert_eq!(stdout_json(&output), json!({"error": "Not Found"}));
}

#[test]
fn test_cli_echo_merges_query_and_path_suffix() {
    let output = quickrouter(&["request", "/api/echo?limit=5", "--query", "tags=[1,2]"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({
            "method": "GET",
            "path": "/echo",
            "pattern": "/echo",
            "params": {"limit": 5, "tags": [1, 2]},
        })
    );
}

#[test]
fn test_cli_post_body_is_form_input() {
    let output = quickrouter(&["request", "/api/echo", "-X", "post", "--body", "name=ada"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["params"], json!({"name": "ada"}));
}

#[test]
fn test_cli_unsupported_method_fails() {
    let output = quickrouter(&["request", "/api", "-X", "TRACE"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported request method"));
}

#[test]
fn test_cli_routes_lists_demo_table() {
    let output = quickrouter(&["routes"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "GET /Api",
            "GET /Api/users/{id}/{action}",
            "GET /Api/echo",
            "POST /Api/echo",
        ]
    );
}

#[test]
fn test_cli_root_flag_and_config_file() {
    let output = quickrouter(&["routes", "--root", "/v2/"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("GET /v2\n"));

    let config = create_temp_yaml("router:\n  root: /service\n  always_json: false\n");
    let path = config.path().to_str().unwrap();
    let output = quickrouter(&["request", "/service/echo", "--config", path]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["path"], "/echo");

    // Outside the configured root nothing matches, and the 404 route answers
    let output = quickrouter(&["request", "/api/echo", "--config", path]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_invalid_config_file_fails() {
    let config = create_temp_yaml("router:\n  prefix: /nope\n");
    let path = config.path().to_str().unwrap();
    let output = quickrouter(&["routes", "--config", path]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load config"));
}

#[test]
fn test_cli_environment_overrides_root() {
    let output = Command::new(env!("CARGO_BIN_EXE_quickrouter"))
        .args(["routes"])
        .env("QUICKROUTER_ROOT", "/env")
        .output()
        .expect("run quickrouter");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("GET /env\n"));
}
