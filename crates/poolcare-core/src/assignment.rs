//! Weekly assignments: which clients are scheduled in which week.
//!
//! There is at most one assignment per `(week_start, client_id)`. Writing the
//! same pair again replaces the earlier row wholesale.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, client::validate_price, day::ServiceDay};

/// A persisted assignment, joined with client contact details and the
/// responsible's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAssignment {
  pub id:               i64,
  pub week_start:       NaiveDate,
  pub client_id:        i64,
  pub responsible_id:   Option<i64>,
  pub service_day:      Option<ServiceDay>,
  /// Snapshot of the client's price at assignment time.
  pub price:            f64,
  pub assigned:         bool,
  pub done:             bool,
  pub notes:            Option<String>,
  pub created_at:       DateTime<Utc>,
  pub client_name:      Option<String>,
  pub client_address:   Option<String>,
  pub client_district:  Option<String>,
  pub client_phone:     Option<String>,
  pub responsible_name: Option<String>,
}

/// Input for
/// [`PoolStore::upsert_weekly_assignment`](crate::store::PoolStore::upsert_weekly_assignment).
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
  pub week_start:     NaiveDate,
  pub client_id:      i64,
  pub responsible_id: Option<i64>,
  pub service_day:    Option<ServiceDay>,
  /// When `None`, the client's current `price_per_visit` is copied.
  pub price:          Option<f64>,
}

impl NewAssignment {
  pub fn new(week_start: NaiveDate, client_id: i64) -> Self {
    Self {
      week_start,
      client_id,
      responsible_id: None,
      service_day: None,
      price: None,
    }
  }
}

/// A partial update for an existing assignment (marking it done, adding a
/// note, moving it to another day or responsible).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentPatch {
  pub responsible_id: Option<Option<i64>>,
  pub service_day:    Option<Option<ServiceDay>>,
  pub price:          Option<f64>,
  pub assigned:       Option<bool>,
  pub done:           Option<bool>,
  pub notes:          Option<Option<String>>,
}

impl AssignmentPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn validate(&self) -> Result<()> {
    if let Some(price) = self.price {
      validate_price(price)?;
    }
    Ok(())
  }
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Headline counts shown on the shell's summary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
  pub week_start:          NaiveDate,
  pub active_clients:      u64,
  pub active_responsibles: u64,
  pub week_assignments:    u64,
}

/// Assignment completion for one responsible over one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsibleProgress {
  /// `None` groups assignments with no responsible.
  pub responsible_id:   Option<i64>,
  pub responsible_name: Option<String>,
  pub total:            u64,
  pub done:             u64,
  pub pending:          u64,
}
