//! Responsible: a staff member who performs maintenance visits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Responsible {
  pub id:         i64,
  pub name:       String,
  pub active:     bool,
  pub created_at: DateTime<Utc>,
}

/// Trim `name` and reject it if nothing is left.
pub fn validate_name(name: &str) -> Result<&str> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(Error::Validation("responsible name is required".into()));
  }
  Ok(trimmed)
}
