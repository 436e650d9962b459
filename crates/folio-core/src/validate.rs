//! Request-field validation.
//!
//! Checks accumulate every failing field instead of stopping at the first, so
//! a client sees all problems with a payload in one response.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  /// Name of the offending payload key.
  pub param: String,
  pub msg:   String,
}

impl FieldError {
  pub fn new(param: &str, msg: &str) -> Self {
    Self { param: param.to_owned(), msg: msg.to_owned() }
  }

  pub(crate) fn join(errors: &[FieldError]) -> String {
    errors
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(", ")
  }
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.param, self.msg)
  }
}

/// Treat empty strings the same as absent keys.
pub fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}

/// Parse a calendar date from either `YYYY-MM-DD` or a full RFC 3339
/// timestamp (the date part is kept).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.date_naive())
  })
}

/// Collects field failures for a single payload.
#[derive(Debug, Default)]
pub struct Checks {
  errors: Vec<FieldError>,
}

impl Checks {
  pub fn new() -> Self { Self::default() }

  /// Require a non-empty string, returning it when present.
  pub fn required(
    &mut self,
    param: &str,
    value: Option<String>,
    msg: &str,
  ) -> Option<String> {
    let value = non_empty(value);
    if value.is_none() {
      self.errors.push(FieldError::new(param, msg));
    }
    value
  }

  /// Require a parseable date.
  pub fn required_date(
    &mut self,
    param: &str,
    value: Option<String>,
    msg: &str,
  ) -> Option<NaiveDate> {
    let raw = self.required(param, value, msg)?;
    let date = parse_date(&raw);
    if date.is_none() {
      self
        .errors
        .push(FieldError::new(param, &format!("{param} must be a valid date")));
    }
    date
  }

  /// Accept a missing date, but reject one that does not parse.
  pub fn optional_date(
    &mut self,
    param: &str,
    value: Option<String>,
  ) -> Option<NaiveDate> {
    let raw = non_empty(value)?;
    let date = parse_date(&raw);
    if date.is_none() {
      self
        .errors
        .push(FieldError::new(param, &format!("{param} must be a valid date")));
    }
    date
  }

  /// Finish validation. `build` runs only when every check passed, so it may
  /// assume the values returned by `required*` are `Some`.
  pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T> {
    if !self.errors.is_empty() {
      return Err(Error::Validation(self.errors));
    }
    build().ok_or(Error::Validation(Vec::new()))
  }
}
