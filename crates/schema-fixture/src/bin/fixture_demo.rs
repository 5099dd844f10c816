//! Prints the demonstration fixtures as JSON.
//!
//! This binary delegates to `schema_fixture::demo` for settings and
//! rendering, keeping the behaviour testable without spawning a process.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use schema_fixture::demo::{DemoError, load_settings, render};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), DemoError> {
    let settings = load_settings(env::args_os())?;
    let output = render(&settings)?;
    if let Err(err) = writeln!(io::stdout().lock(), "{output}") {
        drop(err);
    }
    Ok(())
}
