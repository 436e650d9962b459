//! Folio API server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), overlays any
//! `FOLIO_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP.
//!
//! # Account provisioning
//!
//! There is no public registration endpoint. Accounts are created here:
//!
//! ```text
//! cargo run -p folio-api --bin server -- add-user --email ada@example.com --name "Ada Lovelace"
//! ```
//!
//! The password is read from stdin.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use folio_api::{AppState, ServerConfig, auth::hash_password};
use folio_core::{store::AccountStore as _, user::NewUser};
use folio_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Parser)]
#[command(author, version, about = "Folio API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the API (the default).
  Serve,
  /// Print the bcrypt hash for a password entered on stdin and exit.
  HashPassword,
  /// Create an account; the password is read from stdin.
  AddUser {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name:  String,
  },
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

  // Helper mode: hash a password and exit.
  if let Some(Command::HashPassword) = cli.command {
    let password = read_password()?;
    println!("{}", hash_password(&password).context("bcrypt error")?);
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("FOLIO").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Some(Command::AddUser { email, name }) => add_user(&store, &email, &name).await,
    _ => serve(store, &server_cfg).await,
  }
}

async fn serve(store: SqliteStore, server_cfg: &ServerConfig) -> anyhow::Result<()> {
  anyhow::ensure!(
    !server_cfg.jwt_secret.is_empty(),
    "jwt_secret must be set (config.toml or FOLIO_JWT_SECRET)"
  );

  let state = AppState::new(Arc::new(store), server_cfg)
    .context("failed to build GitHub client")?;

  let app = folio_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn add_user(store: &SqliteStore, email: &str, name: &str) -> anyhow::Result<()> {
  let password = read_password()?;
  anyhow::ensure!(
    password.chars().count() >= MIN_PASSWORD_LEN,
    "password must be at least {MIN_PASSWORD_LEN} characters"
  );
  anyhow::ensure!(!name.trim().is_empty(), "name must not be empty");

  let hash = tokio::task::spawn_blocking(move || hash_password(&password))
    .await
    .context("hashing task failed")?
    .context("bcrypt error")?;

  let user = store
    .add_user(NewUser::new(email, name, hash))
    .await
    .with_context(|| format!("failed to create account for {email}"))?;

  tracing::info!(user_id = %user.user_id, email = %user.email, "account created");
  println!("{}", user.user_id);
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
