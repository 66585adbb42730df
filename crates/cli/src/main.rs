//! factor-cli - command-line inspection of the factor update configuration.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Construct the configuration resolver (the composition root).
//! - Print resolved values, paths, and projections.
//!
//! Does NOT handle:
//! - Configuration resolution logic (see `crates/config`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` values can
//!   provide clap env defaults.
//! - Logging goes to stderr; command output goes to stdout.

mod args;
mod commands;
mod error;

use args::Cli;
use clap::Parser;
use error::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    // Load .env BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = factor_config::load_dotenv() {
        eprintln!("Failed to load environment: {e}");
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    // Argument errors exit with the Usage code; help/version exit cleanly.
    let cli = Cli::try_parse().unwrap_or_else(|error| {
        let _ = error.print();
        let code = if error.use_stderr() {
            ExitCode::Usage
        } else {
            ExitCode::Success
        };
        std::process::exit(code.as_i32());
    });

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match commands::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::GeneralError
        }
    };

    std::process::exit(exit_code.as_i32());
}
