//! Route handlers, grouped by resource.

pub mod auth;
pub mod entries;
pub mod github;
pub mod profile;

use folio_core::{store::AccountStore, user::User};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Load the account behind a token. Tokens outlive account deletion, so a
/// valid token may name a user that is gone.
pub(crate) async fn account<S>(state: &AppState<S>, user_id: Uuid) -> Result<User, ApiError>
where
  S: AccountStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_user(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))
}
