//! Bearer-token extractor gating protected routes.
//!
//! The gate only checks the token; it never consults the store. Handlers that
//! need the user record load it themselves.

pub mod password;
pub mod token;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use folio_core::store::AccountStore;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub use password::{DUMMY_HASH, hash_password, hash_to_check, verify_password};
pub use token::{DEFAULT_TOKEN_TTL_SECS, TokenError, TokenService};

/// Legacy header some clients send the bare token in.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// The authenticated caller. Present in a handler's arguments means the
/// request carried a valid token; also inserted into request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
  pub user_id: Uuid,
}

/// Pull the raw token from `Authorization: Bearer …`, falling back to
/// `x-auth-token`.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
  let bearer = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim);

  bearer
    .or_else(|| {
      headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
    })
    .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = extract_token(&parts.headers)
      .ok_or(ApiError::Unauthorized("No token, authorization denied"))?;

    let user_id = state.tokens.verify(token).map_err(|e| {
      tracing::debug!(error = %e, "token rejected");
      ApiError::Unauthorized("Token is not valid")
    })?;

    let user = AuthUser { user_id };
    parts.extensions.insert(user);
    Ok(user)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{body::Body, http::Request};
  use chrono::{Duration, Utc};
  use folio_store_sqlite::SqliteStore;

  use super::*;
  use crate::github::GithubClient;

  async fn make_state() -> AppState<SqliteStore> {
    AppState {
      store:  Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      tokens: Arc::new(TokenService::new(b"gate-secret", DEFAULT_TOKEN_TTL_SECS)),
      github: GithubClient::new("http://127.0.0.1:1", None, None).unwrap(),
    }
  }

  async fn extract(
    req: Request<Body>,
    state: &AppState<SqliteStore>,
  ) -> Result<(AuthUser, Parts), ApiError> {
    let (mut parts, _) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, state).await?;
    Ok((user, parts))
  }

  #[tokio::test]
  async fn bearer_token_resolves_user() {
    let state = make_state().await;
    let user_id = Uuid::new_v4();
    let token = state.tokens.issue(user_id).unwrap();
    let req = Request::builder()
      .header(header::AUTHORIZATION, format!("Bearer {token}"))
      .body(Body::empty()).unwrap();

    let (user, parts) = extract(req, &state).await.unwrap();
    assert_eq!(user.user_id, user_id);
    assert_eq!(parts.extensions.get::<AuthUser>(), Some(&user));
  }

  #[tokio::test]
  async fn legacy_header_is_accepted() {
    let state = make_state().await;
    let user_id = Uuid::new_v4();
    let token = state.tokens.issue(user_id).unwrap();
    let req = Request::builder()
      .header(AUTH_TOKEN_HEADER, token)
      .body(Body::empty()).unwrap();
    assert_eq!(extract(req, &state).await.unwrap().0.user_id, user_id);
  }

  #[tokio::test]
  async fn missing_token() {
    let state = make_state().await;
    let req = Request::builder().body(Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(ApiError::Unauthorized(_))));
  }

  #[tokio::test]
  async fn non_bearer_scheme_is_ignored() {
    let state = make_state().await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
      .body(Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(ApiError::Unauthorized(_))));
  }

  #[tokio::test]
  async fn expired_token() {
    let state = make_state().await;
    let issued = Utc::now() - Duration::seconds(DEFAULT_TOKEN_TTL_SECS + 5);
    let token = state.tokens.issue_at(Uuid::new_v4(), issued).unwrap();
    let req = Request::builder()
      .header(header::AUTHORIZATION, format!("Bearer {token}"))
      .body(Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(ApiError::Unauthorized(_))));
  }
}
