#![allow(dead_code)]

pub mod fixtures {
    use http::Method;
    use quickrouter::dispatcher::{HandlerOutput, HandlerRequest, HandlerResult};
    use quickrouter::source::{BufferSink, FixtureSource};
    use quickrouter::Router;

    /// Handler that answers with its own name, so tests can see which route ran.
    pub fn named(
        name: &'static str,
    ) -> impl Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static {
        move |_: &HandlerRequest| Ok(HandlerOutput::text(name))
    }

    /// Handler that echoes the merged parameters as a JSON object.
    pub fn echo_params(req: &HandlerRequest) -> HandlerResult {
        HandlerOutput::json(&req.params)
    }

    /// "Verb zoo" route table: every supported method on a small set of paths.
    pub fn register_zoo(router: &mut Router) {
        router
            .add_route(Method::GET, "/", named("root_handler"), false)
            .add_route(Method::GET, "/zoo/animals", named("get_animals"), false)
            .add_route(Method::POST, "/zoo/animals", named("create_animal"), false)
            .add_route(Method::GET, "/zoo/animals/{id}", named("get_animal"), false)
            .add_route(Method::PUT, "/zoo/animals/{id}", named("update_animal"), false)
            .add_route(Method::PATCH, "/zoo/animals/{id}", named("patch_animal"), false)
            .add_route(Method::DELETE, "/zoo/animals/{id}", named("delete_animal"), false)
            .add_route(Method::HEAD, "/zoo/health", named("health_check"), false)
            .add_route(Method::OPTIONS, "/zoo/health", named("supported_ops"), false);
    }

    /// Build a zoo router rooted at `root` for `source`, process it and return the outcome.
    pub fn run_zoo(source: &FixtureSource, root: &str) -> (bool, BufferSink) {
        let mut router = Router::new(source, root, false).unwrap();
        register_zoo(&mut router);
        let mut sink = BufferSink::new();
        let handled = router.process(&mut sink).unwrap();
        (handled, sink)
    }
}

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a temporary `.yaml` file that lives as long as the handle.
    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("quickrouter_test_")
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}
