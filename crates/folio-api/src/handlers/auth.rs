//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/auth` | Protected; the caller's account without its password hash |
//! | `POST` | `/auth` | Body: `{"email","password"}`; returns `{"token"}` |

use axum::{Json, extract::State};
use folio_core::{store::AccountStore, user::User, validate::Checks};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{AuthUser, hash_to_check, verify_password},
  error::ApiError,
  extract::JsonBody,
};

// ─── Current user ─────────────────────────────────────────────────────────────

/// `GET /auth`
pub async fn current_user<S>(
  State(state): State<AppState<S>>,
  auth: AuthUser,
) -> Result<Json<User>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(super::account(&state, auth.user_id).await?))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
  pub token: String,
}

/// `POST /auth`: exchange credentials for a token.
///
/// An unknown email and a wrong password produce the same response, and both
/// pay for one bcrypt verification.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut checks = Checks::new();
  let email = checks.required("email", body.email, "Email is required");
  let password = checks.required("password", body.password, "Password is required");
  let (email, password) = checks.finish(|| Some((email?, password?)))?;

  let user = state
    .store
    .find_user_by_email(&email)
    .await
    .map_err(ApiError::store)?;

  let hash = hash_to_check(user.as_ref().map(|u| u.password_hash.as_str())).to_owned();
  let matched = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
    .await
    .map_err(|e| ApiError::Internal(format!("password check panicked: {e}")))?;

  let user = match user {
    Some(user) if matched => user,
    Some(user) => {
      tracing::info!(user_id = %user.user_id, "login rejected: wrong password");
      return Err(ApiError::InvalidCredentials);
    }
    None => {
      tracing::info!("login rejected: no such account");
      return Err(ApiError::InvalidCredentials);
    }
  };

  let token = state
    .tokens
    .issue(user.user_id)
    .map_err(|e| ApiError::Internal(e.to_string()))?;
  tracing::info!(user_id = %user.user_id, "token issued");
  Ok(Json(TokenResponse { token }))
}
