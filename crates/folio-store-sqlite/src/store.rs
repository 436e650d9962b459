//! [`SqliteStore`], the SQLite implementation of [`AccountStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use folio_core::{
  profile::{Profile, ProfileView},
  store::AccountStore,
  user::{NewUser, User, normalize_email},
};

use crate::{
  Error, Result,
  encode::{
    RawProfileView, RawUser, USER_COLUMNS, VIEW_QUERY, encode_dt, encode_profile,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio account store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_user(&self, column: &'static str, value: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"),
              rusqlite::params![value],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:       Uuid::new_v4(),
      email:         normalize_email(&input.email),
      avatar:        input.avatar(),
      name:          input.name,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str     = encode_uuid(user.user_id);
    let email      = user.email.clone();
    let name       = user.name.clone();
    let hash       = user.password_hash.clone();
    let avatar     = user.avatar.clone();
    let created_at = encode_dt(user.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO users (user_id, email, name, password_hash, avatar, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, email, name, hash, avatar, created_at],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::EmailTaken(user.email));
    }
    tracing::debug!(user_id = %user.user_id, "user created");
    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.query_user("user_id", encode_uuid(id)).await
  }

  async fn find_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>> {
    self.query_user("email", normalize_email(email)).await
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    Ok(self.get_profile_view(user_id).await?.map(|v| v.profile))
  }

  async fn get_profile_view(&self, user_id: Uuid) -> Result<Option<ProfileView>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawProfileView> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{VIEW_QUERY} WHERE p.user_id = ?1"),
              rusqlite::params![id_str],
              RawProfileView::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfileView::into_view).transpose()
  }

  async fn list_profile_views(&self) -> Result<Vec<ProfileView>> {
    let raws: Vec<RawProfileView> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{VIEW_QUERY} ORDER BY p.created_at, p.rowid"))?;
        let rows = stmt
          .query_map([], RawProfileView::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfileView::into_view).collect()
  }

  async fn save_profile(&self, profile: Profile) -> Result<Profile> {
    let profile_id = encode_uuid(profile.profile_id);
    let user_id    = encode_uuid(profile.user_id);
    let document   = encode_profile(&profile)?;
    let created_at = encode_dt(profile.created_at);
    let updated_at = encode_dt(profile.updated_at);

    let owner_exists = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![user_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO profiles (profile_id, user_id, document, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (user_id) DO UPDATE SET
             document   = excluded.document,
             updated_at = excluded.updated_at",
          rusqlite::params![profile_id, user_id, document, created_at, updated_at],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !owner_exists {
      return Err(Error::UserNotFound(profile.user_id));
    }
    Ok(profile)
  }

  async fn delete_account(&self, user_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(user_id);

    let (profiles, users) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let profiles =
          tx.execute("DELETE FROM profiles WHERE user_id = ?1", rusqlite::params![id_str])?;
        let users =
          tx.execute("DELETE FROM users WHERE user_id = ?1", rusqlite::params![id_str])?;
        tx.commit()?;
        Ok((profiles, users))
      })
      .await?;

    tracing::debug!(%user_id, profiles, users, "account deleted");
    Ok(())
  }
}
