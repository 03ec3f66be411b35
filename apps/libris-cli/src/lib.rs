//! # Libris Console
//!
//! Interactive menu for managing books, users and loans.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Console Startup                                   │
//! │                                                                         │
//! │  1. Parse flags (clap)                                                 │
//! │  2. Load config: defaults → TOML → LIBRIS_* env → flags                │
//! │  3. Initialize tracing (stderr)                                        │
//! │  4. Open the database session, create missing tables                   │
//! │  5. Run the menu on stdin/stdout                                       │
//! │  6. Disconnect, exit 0                                                 │
//! │                                                                         │
//! │  Steps 2 and 4 are fatal on failure: message on stderr, exit 1.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod console;
pub mod display;
pub mod error;
pub mod menu;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use libris_db::Database;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use console::Console;
use error::CliResult;

/// Libris command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "libris",
    author = "Libris Team",
    version,
    about = "Library management console: books, users and loans"
)]
pub struct Args {
    /// Database file (use ":memory:" for a throwaway database)
    #[arg(long, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging for libris crates
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Runs the console until the operator exits.
pub async fn run(args: Args) -> ExitCode {
    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.filter);

    if config.uses_default_db_path() {
        if let Err(e) = ensure_data_dir(&config) {
            error!(error = %e, "Could not create data directory");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    let db = match Database::connect(config.db_config()).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to open database");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    let outcome = menu::run_session(&db, &mut console).await;

    db.disconnect().await;

    match outcome {
        Ok(()) => {
            info!("Session ended");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Session aborted");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Defaults → TOML → env → flags, then validation.
fn resolve_config(args: Args) -> CliResult<AppConfig> {
    let mut config = AppConfig::load(args.config.as_deref(), |key| std::env::var(key).ok())?;
    config.apply_flags(args.db, args.verbose);
    config.validate()?;
    Ok(config)
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn ensure_data_dir(config: &AppConfig) -> io::Result<()> {
    match config.database.path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}
