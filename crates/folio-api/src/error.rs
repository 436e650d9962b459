//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Server-side failures (store, upstream, internal) are logged here and
//! reach the client only as a generic `500 Server error`.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use folio_core::validate::FieldError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation failed")]
  Validation(Vec<FieldError>),

  #[error("unauthorized: {0}")]
  Unauthorized(&'static str),

  /// Unknown email and wrong password are deliberately the same variant.
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("no profile for this user")]
  ProfileNotFound,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("no github profile for this user")]
  GithubNotFound,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("upstream error: {0}")]
  Upstream(#[from] reqwest::Error),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl From<folio_core::Error> for ApiError {
  fn from(e: folio_core::Error) -> Self {
    match e {
      folio_core::Error::Validation(errors) => ApiError::Validation(errors),
      folio_core::Error::ExperienceNotFound(id) => {
        ApiError::NotFound(format!("experience {id} not found"))
      }
      folio_core::Error::EducationNotFound(id) => {
        ApiError::NotFound(format!("education {id} not found"))
      }
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::Validation(vec![FieldError::new("body", &rejection.body_text())])
  }
}

fn msg(status: StatusCode, message: &str) -> Response {
  (status, Json(json!({ "msg": message }))).into_response()
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Validation(errors) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
      }
      ApiError::Unauthorized(message) => {
        let mut res = msg(StatusCode::UNAUTHORIZED, message);
        res
          .headers_mut()
          .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        res
      }
      ApiError::InvalidCredentials => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "errors": [{ "msg": "Invalid credentials" }] })),
      )
        .into_response(),
      ApiError::ProfileNotFound => {
        msg(StatusCode::BAD_REQUEST, "There is no profile for this user")
      }
      ApiError::NotFound(message) => msg(StatusCode::NOT_FOUND, &message),
      ApiError::GithubNotFound => {
        msg(StatusCode::NOT_FOUND, "There is no github profile for this user")
      }
      ApiError::Store(_) | ApiError::Upstream(_) | ApiError::Internal(_) => {
        tracing::error!(error = %self, "request failed");
        msg(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
      }
    }
  }
}
