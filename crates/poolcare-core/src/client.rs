//! Clients: the pool-owning accounts being serviced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, day::ServiceDay};

// ─── Read model ──────────────────────────────────────────────────────────────

/// A persisted client, joined with the name of its responsible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
  pub id:               i64,
  pub name:             String,
  pub address:          Option<String>,
  pub district:         Option<String>,
  pub phone:            Option<String>,
  /// Weak reference; may point at a responsible that no longer exists.
  pub responsible_id:   Option<i64>,
  pub service_day:      Option<ServiceDay>,
  pub price_per_visit:  f64,
  pub active:           bool,
  pub notes:            Option<String>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
  pub responsible_name: Option<String>,
}

// ─── Creation ────────────────────────────────────────────────────────────────

/// Input for [`PoolStore::add_client`](crate::store::PoolStore::add_client).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClient {
  pub name:            String,
  pub address:         Option<String>,
  pub district:        Option<String>,
  pub phone:           Option<String>,
  pub responsible_id:  Option<i64>,
  pub service_day:     Option<ServiceDay>,
  pub price_per_visit: f64,
}

impl NewClient {
  /// A client with only a name; everything else null and price 0.
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn validate(&self) -> Result<()> {
    validate_client_name(&self.name)?;
    validate_price(self.price_per_visit)
  }
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// A partial update for a client. Only populated slots are written.
///
/// Nullable columns use `Option<Option<T>>`: `Some(None)` clears the column,
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
  pub name:            Option<String>,
  pub address:         Option<Option<String>>,
  pub district:        Option<Option<String>>,
  pub phone:           Option<Option<String>>,
  pub responsible_id:  Option<Option<i64>>,
  pub service_day:     Option<Option<ServiceDay>>,
  pub price_per_visit: Option<f64>,
  pub active:          Option<bool>,
  pub notes:           Option<Option<String>>,
}

impl ClientPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn validate(&self) -> Result<()> {
    if let Some(name) = &self.name {
      validate_client_name(name)?;
    }
    if let Some(price) = self.price_per_visit {
      validate_price(price)?;
    }
    Ok(())
  }
}

fn validate_client_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::Validation("client name is required".into()));
  }
  Ok(())
}

/// Prices must be finite and non-negative.
pub fn validate_price(price: f64) -> Result<()> {
  if !price.is_finite() || price < 0.0 {
    return Err(Error::Validation(format!(
      "price must be a non-negative number, got {price}"
    )));
  }
  Ok(())
}
