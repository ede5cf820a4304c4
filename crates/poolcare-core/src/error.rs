//! Error types for `poolcare-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Input rejected before anything was written.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("unknown service day: {0:?}")]
  UnknownServiceDay(String),

  #[error("invalid date {0:?}, expected YYYY-MM-DD")]
  InvalidDate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
