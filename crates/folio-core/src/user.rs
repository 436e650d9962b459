//! User accounts.
//!
//! A user is created once (via the admin CLI) and afterwards only read; the
//! profile aggregate hangs off its id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A stored account. The password hash never leaves the process: it is
/// skipped on serialisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:       Uuid,
  pub email:         String,
  pub name:          String,
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub avatar:        String,
  pub created_at:    DateTime<Utc>,
}

/// The public slice of a user embedded in profile reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub id:     Uuid,
  pub name:   String,
  pub avatar: String,
}

impl From<&User> for UserSummary {
  fn from(u: &User) -> Self {
    Self { id: u.user_id, name: u.name.clone(), avatar: u.avatar.clone() }
  }
}

/// Input to [`crate::store::AccountStore::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub name:          String,
  /// Pre-computed hash; the store never sees plaintext.
  pub password_hash: String,
}

impl NewUser {
  pub fn new(email: &str, name: &str, password_hash: String) -> Self {
    Self {
      email: normalize_email(email),
      name: name.trim().to_owned(),
      password_hash,
    }
  }

  pub fn avatar(&self) -> String { gravatar_url(&self.email) }
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// Gravatar URL for an address: 200px, PG-rated, mystery-person fallback.
pub fn gravatar_url(email: &str) -> String {
  let digest = Sha256::digest(normalize_email(email).as_bytes());
  format!(
    "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
    hex::encode(digest)
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gravatar_ignores_case_and_whitespace() {
    assert_eq!(gravatar_url(" Ada@Example.com "), gravatar_url("ada@example.com"));
    assert!(gravatar_url("ada@example.com").ends_with("?s=200&r=pg&d=mm"));
  }

  #[test]
  fn password_hash_is_not_serialised() {
    let user = User {
      user_id:       Uuid::new_v4(),
      email:         "ada@example.com".into(),
      name:          "Ada".into(),
      password_hash: "$2b$04$secret".into(),
      avatar:        gravatar_url("ada@example.com"),
      created_at:    Utc::now(),
    };
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["email"], "ada@example.com");
  }
}
