//! Password hashing and verification.
//!
//! New hashes are bcrypt. Verification also accepts argon2 PHC strings so
//! accounts provisioned with either scheme can log in.

use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// A bcrypt hash at [`bcrypt::DEFAULT_COST`] whose plaintext is never a
/// valid login. Checked in place of a real hash when no account matches, so
/// both login failures cost one full bcrypt verification.
pub const DUMMY_HASH: &str =
  "$2b$12$2w6e970wdoWL/QvKkXs4dOqWOyvnti2n89dyf6y0/tSaHBLX9ivf6";

/// The hash a login attempt is checked against: the account's own, or
/// [`DUMMY_HASH`] when there is no account.
pub fn hash_to_check(stored_hash: Option<&str>) -> &str {
  stored_hash.unwrap_or(DUMMY_HASH)
}

/// Hash `plaintext` with bcrypt at the default cost.
pub fn hash_password(plaintext: &str) -> Result<String, bcrypt::BcryptError> {
  bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)
}

/// Check `plaintext` against a stored hash.
///
/// A mismatch and an unreadable stored hash both yield `false`; the latter is
/// logged since it points at bad data rather than a bad password.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
  if stored_hash.starts_with("$argon2") {
    return match PasswordHash::new(stored_hash) {
      Ok(parsed) => Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok(),
      Err(e) => {
        tracing::warn!(error = %e, "stored argon2 hash is malformed");
        false
      }
    };
  }

  match bcrypt::verify(plaintext, stored_hash) {
    Ok(matched) => matched,
    Err(e) => {
      tracing::warn!(error = %e, "stored bcrypt hash is malformed");
      false
    }
  }
}
