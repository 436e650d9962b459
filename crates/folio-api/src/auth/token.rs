//! Signed, time-limited session tokens (HS256 JWTs).

use chrono::{DateTime, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
  errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default lifetime of an issued token, in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 360_000;

/// The identity embedded in a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedUser {
  pub id: Uuid,
}

/// JWT payload: `{"user":{"id":...},"iat":...,"exp":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub user: ClaimedUser,
  pub iat:  i64,
  pub exp:  i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
  #[error("token is invalid")]
  Invalid,
  #[error("token has expired")]
  Expired,
  #[error("failed to sign token: {0}")]
  Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies tokens with a process-wide secret.
///
/// Built once at startup and shared read-only between requests.
pub struct TokenService {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl_secs:   i64,
}

impl TokenService {
  pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation,
      ttl_secs,
    }
  }

  pub fn ttl_secs(&self) -> i64 { self.ttl_secs }

  /// Issue a token for `user_id`, valid for the configured TTL from now.
  pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
    self.issue_at(user_id, Utc::now())
  }

  /// Issue a token as if it had been created at `issued_at`.
  pub fn issue_at(
    &self,
    user_id: Uuid,
    issued_at: DateTime<Utc>,
  ) -> Result<String, TokenError> {
    let iat = issued_at.timestamp();
    let claims = Claims {
      user: ClaimedUser { id: user_id },
      iat,
      exp: iat.saturating_add(self.ttl_secs),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(TokenError::Signing)
  }

  /// Verify signature and expiry, returning the embedded user id.
  pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
    decode::<Claims>(token, &self.decoding, &self.validation)
      .map(|data| data.claims.user.id)
      .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
      })
  }
}
