//! Handler for `GET /profile/github/:username`.

use axum::{
  Json,
  extract::{Path, State},
};
use folio_core::store::AccountStore;
use serde_json::Value;

use crate::{AppState, error::ApiError, github::RepoLookup};

/// Proxy the user's repositories from GitHub. Any non-200 upstream answer
/// becomes a 404; transport failures become a 500.
pub async fn repos<S>(
  State(state): State<AppState<S>>,
  Path(username): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  match state.github.repos(&username).await? {
    RepoLookup::Found(body) => Ok(Json(body)),
    RepoLookup::Missing(status) => {
      tracing::debug!(%username, ?status, "github lookup missed");
      Err(ApiError::GithubNotFound)
    }
  }
}
