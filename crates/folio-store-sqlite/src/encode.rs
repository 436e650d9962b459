//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs are hyphenated lowercase strings,
//! and profile documents are compact JSON.

use chrono::{DateTime, Utc};
use folio_core::{
  profile::{Profile, ProfileView},
  user::{User, UserSummary},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Profile document ────────────────────────────────────────────────────────

pub fn encode_profile(p: &Profile) -> Result<String> {
  Ok(serde_json::to_string(p)?)
}

pub fn decode_profile(s: &str) -> Result<Profile> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "user_id, email, name, password_hash, avatar, created_at";

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub email:         String,
  pub name:          String,
  pub password_hash: String,
  pub avatar:        String,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      name:          row.get(2)?,
      password_hash: row.get(3)?,
      avatar:        row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      email:         self.email,
      name:          self.name,
      password_hash: self.password_hash,
      avatar:        self.avatar,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const VIEW_QUERY: &str = "SELECT p.document, u.user_id, u.name, u.avatar
   FROM profiles p
   JOIN users u ON u.user_id = p.user_id";

/// A profile document joined with its owner's public columns.
pub struct RawProfileView {
  pub document: String,
  pub user_id:  String,
  pub name:     String,
  pub avatar:   String,
}

impl RawProfileView {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      document: row.get(0)?,
      user_id:  row.get(1)?,
      name:     row.get(2)?,
      avatar:   row.get(3)?,
    })
  }

  pub fn into_view(self) -> Result<ProfileView> {
    Ok(ProfileView {
      profile: decode_profile(&self.document)?,
      user:    UserSummary {
        id:     decode_uuid(&self.user_id)?,
        name:   self.name,
        avatar: self.avatar,
      },
    })
  }
}
