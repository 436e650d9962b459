//! Request-body extractor whose rejections use the API's error shape.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// [`axum::Json`] with rejections mapped through [`ApiError`]: a body that
/// is not JSON, or whose fields have the wrong types, is a 400 validation
/// failure rather than axum's plain-text 415/422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
