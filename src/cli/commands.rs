use crate::demo;
use crate::router::Router;
use crate::runtime_config::RouterConfig;
use crate::source::{CliSource, ResponseSink, StdoutSink};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};

/// Body written when nothing handles the request and no 404 error route exists.
pub const DEFAULT_NOT_FOUND: &str = "Not Found";

/// Command-line interface for QuickRouter
///
/// Runs single requests against the bundled demo API and prints the response body to stdout.
#[derive(Parser, Debug)]
#[command(name = "quickrouter", version)]
#[command(about = "QuickRouter CLI", long_about = None)]
pub struct Cli {
    /// YAML configuration file with a `router` section (root, always_json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: trace/debug/info/warn/error (logs go to stderr)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one request and print the response body
    ///
    /// Without a matching route the 404 error route answers; the exit code is non-zero
    /// whenever the final status is 400 or above.
    Request {
        /// Request path, optionally with a `?query` suffix (default: the router root)
        path: Option<String>,

        /// Request method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,

        /// Request body (form-encoded for POST, PUT, PATCH and OPTIONS)
        #[arg(short = 'd', long)]
        body: Option<String>,

        /// Root prefix override
        #[arg(long)]
        root: Option<String>,

        /// Force JSON output for every route
        #[arg(long, default_value_t = false)]
        always_json: bool,
    },
    /// Print the route table of the demo API
    Routes {
        /// Root prefix override
        #[arg(long)]
        root: Option<String>,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

/// Resolve the router configuration for the demo API.
///
/// Starts from the demo defaults (or the YAML file when given) and overlays the
/// `QUICKROUTER_*` environment variables.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or an environment value is invalid.
pub fn load_config(path: Option<&Path>) -> Result<RouterConfig> {
    let base = match path {
        Some(path) => RouterConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => demo::default_config(),
    };
    Ok(base.merge_env()?)
}

/// Run one request through the demo API, writing the outcome to `sink`.
///
/// # Errors
///
/// Fails for unsupported methods and when an error handler itself fails.
pub fn run_request(
    source: &CliSource,
    config: &RouterConfig,
    sink: &mut dyn ResponseSink,
) -> Result<()> {
    let mut router = Router::from_config(source, config)?;
    demo::register(&mut router);

    if router.process(sink)? {
        return Ok(());
    }
    debug!(path = %router.path(), "Unhandled request, trying 404 error route");
    if !router.handle_error(404, None, sink)? {
        warn!(path = %router.path(), "No 404 error route, writing default response");
        sink.write(format!("{DEFAULT_NOT_FOUND}\n").as_bytes());
        sink.set_status(404);
    }
    Ok(())
}

/// Execute the parsed CLI command
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file or environment is invalid
/// - The request method is not supported
/// - An error route handler fails
pub fn run_cli(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Request {
            path,
            method,
            query,
            body,
            root,
            always_json,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(root) = root {
                config.root.clone_from(root);
            }
            if *always_json {
                config.always_json = true;
            }

            let mut source = CliSource::new(path.as_deref())
                .with_method(method)
                .with_query(query.clone());
            if let Some(body) = body {
                source = source.with_body(body.as_bytes());
            }

            let mut sink = StdoutSink::new();
            run_request(&source, &config, &mut sink)?;
            Ok(exit_code(sink.status()))
        }
        Commands::Routes { root } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(root) = root {
                config.root.clone_from(root);
            }
            let mut router = Router::from_config(&CliSource::default(), &config)?;
            demo::register(&mut router);
            router.dump_routes();
            for line in router.route_table() {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Statuses of 400 and above map to a failing exit code.
#[must_use]
pub fn exit_code(status: u16) -> ExitCode {
    if status >= 400 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
