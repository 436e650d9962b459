//! Handlers for `/profile` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/profile` | Public; every profile with its owner |
//! | `POST`   | `/profile` | Protected; create or merge-update own profile |
//! | `DELETE` | `/profile` | Protected; delete own profile and account |
//! | `GET`    | `/profile/me` | Protected; 400 if no profile yet |
//! | `GET`    | `/profile/user/:user_id` | Public; 400 if no profile |

use axum::{
  Json,
  extract::{Path, State},
};
use folio_core::{
  profile::{Profile, ProfileFields, ProfileInput, ProfileView},
  store::AccountStore,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError, extract::JsonBody};

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /profile/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  auth: AuthUser,
) -> Result<Json<ProfileView>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let view = state
    .store
    .get_profile_view(auth.user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::ProfileNotFound)?;
  Ok(Json(view))
}

/// `GET /profile`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ProfileView>>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let views = state
    .store
    .list_profile_views()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(views))
}

/// `GET /profile/user/:user_id`: a malformed id is treated as "no profile".
pub async fn by_user<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user_id = Uuid::parse_str(&user_id).map_err(|_| ApiError::ProfileNotFound)?;
  let view = state
    .store
    .get_profile_view(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::ProfileNotFound)?;
  Ok(Json(view))
}

// ─── Upsert ───────────────────────────────────────────────────────────────────

/// `POST /profile`, body: [`ProfileInput`]; `status` and `skills` required.
///
/// Fields absent from the body keep their stored values, except the social
/// links which are replaced as a block. A token whose account has been
/// deleted gets a 404.
pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  auth: AuthUser,
  JsonBody(body): JsonBody<ProfileInput>,
) -> Result<Json<Profile>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let fields = ProfileFields::try_from(body)?;
  // A token can outlive its account; saving would then hit no owner.
  super::account(&state, auth.user_id).await?;

  let existing = state
    .store
    .get_profile(auth.user_id)
    .await
    .map_err(ApiError::store)?;
  let created = existing.is_none();
  let mut profile = existing.unwrap_or_else(|| Profile::new(auth.user_id));
  profile.apply(fields);

  let profile = state
    .store
    .save_profile(profile)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(user_id = %auth.user_id, created, "profile saved");
  Ok(Json(profile))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /profile` removes the profile and the account. Succeeds even if
/// either is already gone.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  auth: AuthUser,
) -> Result<Json<Value>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .delete_account(auth.user_id)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(user_id = %auth.user_id, "account deleted");
  Ok(Json(json!({ "msg": "User deleted" })))
}
