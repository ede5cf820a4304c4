//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings in UTC, calendar dates are `YYYY-MM-DD`,
//! and service days use their Spanish label.

use chrono::{DateTime, NaiveDate, Utc};
use poolcare_core::{
  assignment::WeeklyAssignment, client::Client, day::ServiceDay,
  responsible::Responsible, visit::Visit,
};
use rusqlite::{Row, types::Value};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── ServiceDay ──────────────────────────────────────────────────────────────

pub fn encode_day(d: Option<ServiceDay>) -> Option<&'static str> {
  d.map(ServiceDay::label)
}

pub fn decode_day(s: Option<String>) -> Result<Option<ServiceDay>> {
  Ok(s.filter(|s| !s.trim().is_empty()).map(|s| s.parse::<ServiceDay>()).transpose()?)
}

/// Column value for a nullable day, as used in dynamic `UPDATE`s.
pub fn day_value(d: Option<ServiceDay>) -> Value {
  encode_day(d).map(str::to_owned).into()
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub struct RawResponsible {
  pub id:         i64,
  pub name:       String,
  pub active:     bool,
  pub created_at: String,
}

impl RawResponsible {
  pub const COLUMNS: &'static str = "id, name, active, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      active:     row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_responsible(self) -> Result<Responsible> {
    Ok(Responsible {
      id:         self.id,
      name:       self.name,
      active:     self.active,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawClient {
  pub id:               i64,
  pub name:             String,
  pub address:          Option<String>,
  pub district:         Option<String>,
  pub phone:            Option<String>,
  pub responsible_id:   Option<i64>,
  pub service_day:      Option<String>,
  pub price_per_visit:  f64,
  pub active:           bool,
  pub notes:            Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
  pub responsible_name: Option<String>,
}

impl RawClient {
  /// Select list matching [`RawClient::from_row`]; expects `clients c` left
  /// joined with `responsibles r`.
  pub const COLUMNS: &'static str = "c.id, c.name, c.address, c.district, c.phone,
     c.responsible_id, c.service_day, c.price_per_visit, c.active, c.notes,
     c.created_at, c.updated_at, r.name";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      name:             row.get(1)?,
      address:          row.get(2)?,
      district:         row.get(3)?,
      phone:            row.get(4)?,
      responsible_id:   row.get(5)?,
      service_day:      row.get(6)?,
      price_per_visit:  row.get(7)?,
      active:           row.get(8)?,
      notes:            row.get(9)?,
      created_at:       row.get(10)?,
      updated_at:       row.get(11)?,
      responsible_name: row.get(12)?,
    })
  }

  pub fn into_client(self) -> Result<Client> {
    Ok(Client {
      id:               self.id,
      name:             self.name,
      address:          self.address,
      district:         self.district,
      phone:            self.phone,
      responsible_id:   self.responsible_id,
      service_day:      decode_day(self.service_day)?,
      price_per_visit:  self.price_per_visit,
      active:           self.active,
      notes:            self.notes,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
      responsible_name: self.responsible_name,
    })
  }
}

pub struct RawAssignment {
  pub id:               i64,
  pub week_start:       String,
  pub client_id:        i64,
  pub responsible_id:   Option<i64>,
  pub service_day:      Option<String>,
  pub price:            f64,
  pub assigned:         bool,
  pub done:             bool,
  pub notes:            Option<String>,
  pub created_at:       String,
  pub client_name:      Option<String>,
  pub client_address:   Option<String>,
  pub client_district:  Option<String>,
  pub client_phone:     Option<String>,
  pub responsible_name: Option<String>,
}

impl RawAssignment {
  /// Expects `weekly_assignments a` left joined with `clients c` and
  /// `responsibles r`.
  pub const COLUMNS: &'static str = "a.id, a.week_start, a.client_id, a.responsible_id,
     a.service_day, a.price, a.assigned, a.done, a.notes, a.created_at,
     c.name, c.address, c.district, c.phone, r.name";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      week_start:       row.get(1)?,
      client_id:        row.get(2)?,
      responsible_id:   row.get(3)?,
      service_day:      row.get(4)?,
      price:            row.get(5)?,
      assigned:         row.get(6)?,
      done:             row.get(7)?,
      notes:            row.get(8)?,
      created_at:       row.get(9)?,
      client_name:      row.get(10)?,
      client_address:   row.get(11)?,
      client_district:  row.get(12)?,
      client_phone:     row.get(13)?,
      responsible_name: row.get(14)?,
    })
  }

  pub fn into_assignment(self) -> Result<WeeklyAssignment> {
    Ok(WeeklyAssignment {
      id:               self.id,
      week_start:       decode_date(&self.week_start)?,
      client_id:        self.client_id,
      responsible_id:   self.responsible_id,
      service_day:      decode_day(self.service_day)?,
      price:            self.price,
      assigned:         self.assigned,
      done:             self.done,
      notes:            self.notes,
      created_at:       decode_dt(&self.created_at)?,
      client_name:      self.client_name,
      client_address:   self.client_address,
      client_district:  self.client_district,
      client_phone:     self.client_phone,
      responsible_name: self.responsible_name,
    })
  }
}

pub struct RawVisit {
  pub id:               i64,
  pub client_id:        i64,
  pub visit_date:       String,
  pub responsible_id:   Option<i64>,
  pub price:            f64,
  pub done:             bool,
  pub notes:            Option<String>,
  pub created_at:       String,
  pub client_name:      Option<String>,
  pub responsible_name: Option<String>,
}

impl RawVisit {
  /// Expects `visits v` left joined with `clients c` and `responsibles r`.
  pub const COLUMNS: &'static str = "v.id, v.client_id, v.visit_date, v.responsible_id,
     v.price, v.done, v.notes, v.created_at, c.name, r.name";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      client_id:        row.get(1)?,
      visit_date:       row.get(2)?,
      responsible_id:   row.get(3)?,
      price:            row.get(4)?,
      done:             row.get(5)?,
      notes:            row.get(6)?,
      created_at:       row.get(7)?,
      client_name:      row.get(8)?,
      responsible_name: row.get(9)?,
    })
  }

  pub fn into_visit(self) -> Result<Visit> {
    Ok(Visit {
      id:               self.id,
      client_id:        self.client_id,
      visit_date:       decode_date(&self.visit_date)?,
      responsible_id:   self.responsible_id,
      price:            self.price,
      done:             self.done,
      notes:            self.notes,
      created_at:       decode_dt(&self.created_at)?,
      client_name:      self.client_name,
      responsible_name: self.responsible_name,
    })
  }
}
