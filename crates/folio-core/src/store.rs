//! The `AccountStore` trait.
//!
//! Implemented by storage backends (e.g. `folio-store-sqlite`). The HTTP layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  profile::{Profile, ProfileView},
  user::{NewUser, User},
};

/// Abstraction over the user and profile document store.
///
/// Atomicity is per call: each method either fully applies or leaves the
/// store untouched. There is no cross-call locking, so a profile
/// read-modify-write racing with another request may lose an update.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails if the (normalised) email is already taken.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by email, compared case-insensitively.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// The bare profile document owned by `user_id`.
  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// The profile owned by `user_id`, joined with its owner.
  fn get_profile_view(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<ProfileView>, Self::Error>> + Send + '_;

  /// Every profile joined with its owner, oldest first.
  fn list_profile_views(
    &self,
  ) -> impl Future<Output = Result<Vec<ProfileView>, Self::Error>> + Send + '_;

  /// Insert or replace the profile document for `profile.user_id`.
  ///
  /// Fails if the owning user does not exist.
  fn save_profile(
    &self,
    profile: Profile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Delete a user together with their profile.
  ///
  /// Idempotent: deleting an account that is already (partly) gone succeeds.
  fn delete_account(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
