//! micro-gw - Set up, build and run micro gateway projects from a management API

use std::process::ExitCode;

use mgw_runtime::config::{LOG_ENV_VAR, PROGRAM_NAME};
use mgw_runtime::{CliError, ErrorKind};
use tracing_subscriber::EnvFilter;

mod cli;
mod dispatch;

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(err: &CliError) -> ExitCode {
    tracing::debug!(kind = ?err.kind(), "Command failed");
    eprintln!("{PROGRAM_NAME}: {err}");
    if err.kind() == ErrorKind::Usage {
        eprintln!("Run '{PROGRAM_NAME} help' for usage.");
    }
    ExitCode::from(err.exit_code())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let result = match dispatch::resolve(std::env::args_os()) {
        Ok(command) => dispatch::execute(command).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}
