//! Error types for `folio-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::validate::FieldError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {}", FieldError::join(.0))]
  Validation(Vec<FieldError>),

  #[error("experience not found: {0}")]
  ExperienceNotFound(Uuid),

  #[error("education not found: {0}")]
  EducationNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
