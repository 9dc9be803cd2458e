use clap::Parser;
use quickrouter::cli::{run_cli, Cli};
use quickrouter::logging::init_logging;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    // Keep the guard alive so async log lines are flushed on exit
    let _log_guard = init_logging(&cli.log_level)?;
    run_cli(&cli)
}
