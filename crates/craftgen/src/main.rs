//! craftgen - Craft CMS project generator
//!
//! Entry point for the `craftgen` command-line interface.

mod cli;
mod commands;
mod output;
mod progress;
mod prompts;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    commands::scaffold::run(cli).await
}

/// Level used when `RUST_LOG` is unset. Step progress is shown by
/// spinners, so plain runs only log warnings.
fn log_level(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    }
}

/// Log to stderr so stdout carries only the scaffold's own output.
/// `RUST_LOG` overrides the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(verbose, quiet)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose > 2)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
