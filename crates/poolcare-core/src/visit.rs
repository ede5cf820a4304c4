//! Visits: the append-only log of maintenance that actually happened.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A persisted visit, joined with client and responsible names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
  pub id:               i64,
  pub client_id:        i64,
  pub visit_date:       NaiveDate,
  pub responsible_id:   Option<i64>,
  /// Snapshot of the client's price when the visit was recorded.
  pub price:            f64,
  pub done:             bool,
  pub notes:            Option<String>,
  pub created_at:       DateTime<Utc>,
  pub client_name:      Option<String>,
  pub responsible_name: Option<String>,
}

/// Input for [`PoolStore::record_visit`](crate::store::PoolStore::record_visit).
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisit {
  pub client_id:      i64,
  pub visit_date:     NaiveDate,
  pub responsible_id: Option<i64>,
  /// When `None`, the client's current `price_per_visit` is copied.
  pub price:          Option<f64>,
  pub done:           bool,
  pub notes:          Option<String>,
}

impl NewVisit {
  /// A completed visit with no explicit responsible or price.
  pub fn new(client_id: i64, visit_date: NaiveDate) -> Self {
    Self {
      client_id,
      visit_date,
      responsible_id: None,
      price: None,
      done: true,
      notes: None,
    }
  }
}
