//! # Compras Intake Library
//!
//! Command-line front end for purchase intake.
//!
//! ## Module Organization
//! ```text
//! compras_intake_lib/
//! ├── lib.rs          ◄─── You are here (flags, logging, startup)
//! ├── shell.rs        ◄─── Line parser and read loop
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── draft.rs    ◄─── Purchase draft (Arc<Mutex>)
//! │   ├── config.rs   ◄─── Resolved configuration
//! │   └── backend.rs  ◄─── REST client
//! ├── commands/
//! │   ├── mod.rs      ◄─── Shared views
//! │   ├── form.rs     ◄─── New-product form
//! │   ├── quick.rs    ◄─── Quick entry for known products
//! │   ├── table.rs    ◄─── Pending-products table editor
//! │   └── submit.rs   ◄─── Header and "Guardar"
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

use std::path::PathBuf;

use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use compras_client::ClientConfig;

use error::ApiError;
use shell::Shell;
use state::{BackendState, ConfigState, DraftState};

/// Purchase intake: load products by box or by unit and send the purchase.
#[derive(Debug, Parser)]
#[command(name = "compras-intake", version, about)]
pub struct Cli {
    /// Path to compras.toml (defaults to the platform config directory)
    #[arg(long, env = "COMPRAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the purchase JSON instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Runs the intake shell on stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Parse flags ──────────────────────────────────────────────────────► │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,compras=debug, can be overridden with RUST_LOG      │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • --config given: must load and validate                            │
/// │     • otherwise: platform file if present, else defaults                │
/// │                                                                         │
/// │  4. Initialize State Objects ─────────────────────────────────────────► │
/// │     • DraftState: empty purchase, configured supplier                   │
/// │     • ConfigState: dry-run flag                                         │
/// │     • BackendState: REST client                                         │
/// │                                                                         │
/// │  5. Read commands until quit / EOF ───────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> Result<(), ApiError> {
    let cli = Cli::parse();
    init_tracing();

    info!("Starting Compras intake");

    let client_config = match cli.config {
        Some(path) => ClientConfig::load(Some(path))?,
        None => ClientConfig::load_or_default(None),
    };
    info!(base_url = %client_config.api.base_url, dry_run = cli.dry_run, "Configuration loaded");

    let backend = BackendState::new(&client_config.api)?;
    let draft = DraftState::new(client_config.purchase.idproveedor);
    let config = ConfigState::new(cli.dry_run);
    let shell = Shell::new(draft, config, backend);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| ApiError::internal(format!("Failed to start runtime: {e}")))?;

    runtime
        .block_on(shell.run(BufReader::new(tokio::io::stdin()), std::io::stdout()))
        .map_err(|e| ApiError::internal(format!("I/O error: {e}")))?;

    info!("Compras intake finished");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=compras_client=trace` - Trace the backend client only
/// - Default: `info,compras=debug`
///
/// Logs go to stderr so stdout carries only command replies.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,compras=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
