//! Handlers for the experience and education sub-lists of a profile.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `PUT`    | `/profile/experience` | Body: [`ExperienceInput`]; prepends |
//! | `DELETE` | `/profile/experience/:exp_id` | 404 if no such entry |
//! | `PUT`    | `/profile/education` | Body: [`EducationInput`]; prepends |
//! | `DELETE` | `/profile/education/:edu_id` | 404 if no such entry |

use axum::{
  Json,
  extract::{Path, State},
};
use folio_core::{
  profile::{Education, EducationInput, Experience, ExperienceInput, Profile},
  store::AccountStore,
};
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError, extract::JsonBody};

async fn load<S>(state: &AppState<S>, user_id: Uuid) -> Result<Profile, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_profile(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::ProfileNotFound)
}

async fn save<S>(state: &AppState<S>, profile: Profile) -> Result<Json<Profile>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profile = state
    .store
    .save_profile(profile)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(profile))
}

fn parse_entry_id(kind: &str, raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{kind} {raw} not found")))
}

// ─── Experience ───────────────────────────────────────────────────────────────

/// `PUT /profile/experience`
pub async fn add_experience<S>(
  State(state): State<AppState<S>>,
  auth: AuthUser,
  JsonBody(body): JsonBody<ExperienceInput>,
) -> Result<Json<Profile>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = Experience::try_from(body)?;
  let mut profile = load(&state, auth.user_id).await?;
  tracing::debug!(user_id = %auth.user_id, entry_id = %entry.id, "adding experience");
  profile.add_experience(entry);
  save(&state, profile).await
}

/// `DELETE /profile/experience/:exp_id`
pub async fn remove_experience<S>(
  State(state): State<AppState<S>>,
  auth: AuthUser,
  Path(exp_id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let exp_id = parse_entry_id("experience", &exp_id)?;
  let mut profile = load(&state, auth.user_id).await?;
  profile.remove_experience(exp_id)?;
  save(&state, profile).await
}

// ─── Education ────────────────────────────────────────────────────────────────

/// `PUT /profile/education`
pub async fn add_education<S>(
  State(state): State<AppState<S>>,
  auth: AuthUser,
  JsonBody(body): JsonBody<EducationInput>,
) -> Result<Json<Profile>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entry = Education::try_from(body)?;
  let mut profile = load(&state, auth.user_id).await?;
  tracing::debug!(user_id = %auth.user_id, entry_id = %entry.id, "adding education");
  profile.add_education(entry);
  save(&state, profile).await
}

/// `DELETE /profile/education/:edu_id`
pub async fn remove_education<S>(
  State(state): State<AppState<S>>,
  auth: AuthUser,
  Path(edu_id): Path<String>,
) -> Result<Json<Profile>, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let edu_id = parse_entry_id("education", &edu_id)?;
  let mut profile = load(&state, auth.user_id).await?;
  profile.remove_education(edu_id)?;
  save(&state, profile).await
}
