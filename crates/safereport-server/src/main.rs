//! SafeReport server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, builds the Gemini classifier and serves the JSON API over
//! HTTP.
//!
//! # Helper modes
//!
//! ```text
//! safereport --hash-password        # argon2 PHC string for a password on stdin
//! safereport --generate-report-id   # print a fresh public report id
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use safereport_api::{AppState, auth};
use safereport_core::report_id;
use safereport_store_sqlite::SqliteStore;
use safereport_vision::GeminiClassifier;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "SafeReport incident-reporting server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Print a freshly generated public report id and exit.
  #[arg(long)]
  generate_report_id: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let hash = auth::hash_password(&password).context("failed to hash password")?;
    println!("{hash}");
    return Ok(());
  }

  if cli.generate_report_id {
    println!("{}", report_id::generate());
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config)?;

  // Open SQLite store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let classifier = GeminiClassifier::new(server_cfg.gemini_config())
    .context("failed to build Gemini client")?;
  if !classifier.has_api_key() {
    tracing::warn!("no Gemini API key configured; image analysis will fail");
  }

  tracing::info!(transitions = ?server_cfg.transitions, "transition policy");

  // Build application state.
  let state = AppState::new(
    Arc::new(store),
    Arc::new(classifier),
    server_cfg.transitions.into(),
    server_cfg.api_config(),
  );

  let app = safereport_api::router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
