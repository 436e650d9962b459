//! JSON REST API for Folio.
//!
//! Exposes an axum [`Router`] backed by any [`AccountStore`]. All shared
//! state is built once by the caller and handed to [`router`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = folio_api::router(AppState::new(store, &config)?);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod error;
pub mod extract;
pub mod github;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, put},
};
use folio_core::store::AccountStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{DEFAULT_TOKEN_TTL_SECS, TokenService};
use github::GithubClient;
use handlers::{entries, profile};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FOLIO_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  /// HMAC secret for session tokens. Must be non-empty to serve.
  #[serde(default)]
  pub jwt_secret:           String,
  #[serde(default = "default_token_ttl_secs")]
  pub token_ttl_secs:       i64,
  #[serde(default = "default_github_api_url")]
  pub github_api_url:       String,
  #[serde(default)]
  pub github_client_id:     Option<String>,
  #[serde(default)]
  pub github_client_secret: Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5000 }
fn default_store_path() -> PathBuf { PathBuf::from("folio.db") }
fn default_token_ttl_secs() -> i64 { DEFAULT_TOKEN_TTL_SECS }
fn default_github_api_url() -> String { "https://api.github.com".to_string() }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: AccountStore> {
  pub store:  Arc<S>,
  pub tokens: Arc<TokenService>,
  pub github: GithubClient,
}

impl<S: AccountStore> AppState<S> {
  pub fn new(store: Arc<S>, config: &ServerConfig) -> reqwest::Result<Self> {
    Ok(Self {
      store,
      tokens: Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl_secs,
      )),
      github: GithubClient::new(
        &config.github_api_url,
        config.github_client_id.clone(),
        config.github_client_secret.clone(),
      )?,
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router, with the API nested under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let api = Router::new()
    // Auth
    .route(
      "/auth",
      get(handlers::auth::current_user::<S>).post(handlers::auth::login::<S>),
    )
    // Profiles
    .route(
      "/profile",
      get(profile::list::<S>)
        .post(profile::upsert::<S>)
        .delete(profile::delete::<S>),
    )
    .route("/profile/me", get(profile::me::<S>))
    .route("/profile/user/{user_id}", get(profile::by_user::<S>))
    // Experience / education
    .route("/profile/experience", put(entries::add_experience::<S>))
    .route("/profile/experience/{exp_id}", delete(entries::remove_experience::<S>))
    .route("/profile/education", put(entries::add_education::<S>))
    .route("/profile/education/{edu_id}", delete(entries::remove_education::<S>))
    // GitHub
    .route("/profile/github/{username}", get(handlers::github::repos::<S>));

  Router::new()
    .route("/", get(root))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn root() -> &'static str { "Folio API running" }

// ─── Integration tests ────────────────────────────────────────────────────────
