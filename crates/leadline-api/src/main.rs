//! leadline server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `LEADLINE__*`
//! environment overrides, opens the SQLite store and serves the HTTP API.
//!
//! # Accounts and admins
//!
//! Sign-in accounts live in config; admin rights live in the store. To
//! produce the argon2 PHC string for an account's `password_hash`:
//!
//! ```text
//! cargo run -p leadline-api --bin leadline-server -- --hash-password
//! ```
//!
//! and to grant an account admin rights:
//!
//! ```text
//! cargo run -p leadline-api --bin leadline-server -- --grant-admin <uid>
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use leadline_api::{AppState, ServerConfig};
use leadline_core::admin::AdminDirectory;
use leadline_notify::ResendMailer;
use leadline_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Leadline lead intake and admin server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Flag UID as an admin in the store and exit.
  #[arg(long, value_name = "UID")]
  grant_admin: Option<String>,

  /// Clear the admin flag for UID in the store and exit.
  #[arg(long, value_name = "UID")]
  revoke_admin: Option<String>,

  /// Print the admin allow-list and exit.
  #[arg(long)]
  list_admins: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let store_path = expand_home(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Allow-list maintenance modes.
  if let Some(uid) = &cli.grant_admin {
    let record = store.set_admin(uid, true).await.context("failed to grant admin")?;
    println!("{} is_admin={}", record.uid, record.is_admin);
    return Ok(());
  }
  if let Some(uid) = &cli.revoke_admin {
    let record = store.set_admin(uid, false).await.context("failed to revoke admin")?;
    println!("{} is_admin={}", record.uid, record.is_admin);
    return Ok(());
  }
  if cli.list_admins {
    for record in store.list_admins().await.context("failed to list admins")? {
      println!("{}\t{}", record.uid, record.is_admin);
    }
    return Ok(());
  }

  if server_cfg.accounts.is_empty() {
    tracing::warn!("no accounts configured; every admin request will be denied");
  }
  if server_cfg.mail.api_key.is_none() {
    tracing::warn!("no email API key configured; demo requests will fail with 500");
  }

  let mailer = ResendMailer::new(&server_cfg.mail).context("failed to build email client")?;
  let state = AppState::new(Arc::new(store), mailer, &server_cfg);

  let app = leadline_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read one line from stdin as the password. The prompt goes to stderr so
/// stdout carries only the hash.
fn read_password() -> anyhow::Result<String> {
  use std::io::{BufRead, Write};
  eprint!("Password: ");
  std::io::stderr().flush().ok();
  let line = std::io::stdin().lock().lines().next().transpose()?;
  line.filter(|p| !p.is_empty()).context("no password given")
}

/// Resolve a leading `~` against `$HOME`.
fn expand_home(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}
