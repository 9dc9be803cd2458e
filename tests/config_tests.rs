mod common;

use common::temp_files::create_temp_yaml;
use quickrouter::runtime_config::RouterConfig;
use quickrouter::source::{BufferSink, FixtureSource};
use quickrouter::{Router, RouterError};
use std::path::Path;

#[test]
fn test_config_file_drives_router() {
    let file = create_temp_yaml("router:\n  root: /Api/\n  always_json: true\n");
    let config = RouterConfig::from_file(file.path()).unwrap();
    assert_eq!(config.root, "/Api/");
    assert!(config.always_json);

    let source = FixtureSource::new("GET", "/api/hello");
    let mut router = Router::from_config(&source, &config).unwrap();
    assert_eq!(router.root(), "/Api");
    assert!(router.always_json());
    router.add_route(
        http::Method::GET,
        "/hello",
        |_| Ok("hi".into()),
        false,
    );
    let mut sink = BufferSink::new();
    assert!(router.process(&mut sink).unwrap());
    assert_eq!(sink.body_str(), "\"hi\"");
}

#[test]
fn test_empty_config_file_uses_defaults() {
    let file = create_temp_yaml("");
    assert_eq!(
        RouterConfig::from_file(file.path()).unwrap(),
        RouterConfig::default()
    );
}

#[test]
fn test_config_errors() {
    let file = create_temp_yaml("router: [not, a, map]\n");
    assert!(matches!(
        RouterConfig::from_file(file.path()),
        Err(RouterError::Config(_))
    ));

    let missing = Path::new("/definitely/not/here/quickrouter.yaml");
    let err = RouterConfig::from_file(missing).unwrap_err();
    assert!(err.to_string().contains("quickrouter.yaml"));
}
