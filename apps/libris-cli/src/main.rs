//! Libris console entry point.

use std::process::ExitCode;

use clap::Parser;
use libris_cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    libris_cli::run(Args::parse()).await
}
