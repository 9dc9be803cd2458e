//! # CLI Module
//!
//! Command-line front-end for the bundled demo API.
//!
//! ## Commands
//!
//! ### `request`
//!
//! Resolve a single request and print the response body:
//!
//! ```bash
//! quickrouter request /Api/users/1/activate
//! quickrouter request /api/echo --query debug=true
//! quickrouter request /api/echo -X POST --body 'name=ada&tags=[1,2]'
//! ```
//!
//! Options:
//! - `-X, --method <METHOD>` - Request method (default: GET)
//! - `-q, --query <KEY=VALUE>` - Query parameter, repeatable
//! - `-d, --body <BODY>` - Form-encoded request body
//! - `--root <ROOT>` - Root prefix override (default: `/Api`)
//! - `--always-json` - Force JSON output for every route
//!
//! ### `routes`
//!
//! Print the route table:
//!
//! ```bash
//! quickrouter routes
//! ```
//!
//! ## Global Options
//!
//! - `--config <FILE>` - YAML file with a `router` section
//! - `--log-level <LEVEL>` - Log level for stderr output
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use clap::Parser;
//! use quickrouter::cli::{run_cli, Cli};
//!
//! let cli = Cli::parse();
//! run_cli(&cli)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod commands;


pub use commands::{
    exit_code, load_config, run_cli, run_request, Cli, Commands, DEFAULT_NOT_FOUND,
};
