use crate::envs::EnvVars;
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod backend;
mod cli;
mod envs;
mod error;
mod shell;
mod store;
mod venv;

/// Every reported failure exits with this code, matching clap's usage errors.
const FAILURE: u8 = 2;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(EnvVars::ENVON_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn report(result: anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            anstream::eprintln!("{}", format!("{err:#}").red());
            FAILURE
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    ExitCode::from(report(cli::run(std::env::args_os().collect())))
}
