//! [`SqliteStore`] — the SQLite implementation of [`PoolStore`].

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use poolcare_core::{
  assignment::{
    AssignmentPatch, NewAssignment, ResponsibleProgress, Stats, WeeklyAssignment,
  },
  client::{Client, ClientPatch, NewClient},
  responsible::{Responsible, validate_name},
  store::PoolStore,
  visit::{NewVisit, Visit},
};
use rusqlite::{Connection, ErrorCode, OptionalExtension as _, params, types::Value};
use tracing::{debug, info};

use crate::{
  Error, Result,
  encode::{
    RawAssignment, RawClient, RawResponsible, RawVisit, day_value, encode_date,
    encode_day, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A poolcare store backed by a single SQLite file.
///
/// Holds only the file path. Each operation opens a fresh connection, which
/// is closed when it goes out of scope on every return path.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and apply the schema.
  ///
  /// Missing parent directories are created.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let store = Self { path };
    store.init_schema()?;
    Ok(store)
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Open a connection with foreign key enforcement switched off. The
  /// bundled SQLite enables it by default.
  fn connect(&self) -> Result<Connection> {
    let conn = Connection::open(&self.path)?;
    conn.pragma_update(None, "foreign_keys", false)?;
    Ok(conn)
  }

  fn init_schema(&self) -> Result<()> {
    let conn = self.connect()?;
    conn.execute_batch(SCHEMA)?;
    debug!(path = %self.path.display(), "schema applied");
    Ok(())
  }

  fn query_week(
    &self,
    week_start: NaiveDate,
    with_notes: bool,
  ) -> Result<Vec<WeeklyAssignment>> {
    let conn = self.connect()?;
    let sql = format!(
      "SELECT {}
       FROM weekly_assignments a
       LEFT JOIN clients      c ON c.id = a.client_id
       LEFT JOIN responsibles r ON r.id = a.responsible_id
       WHERE a.week_start = ?1
         AND (?2 = 0 OR TRIM(COALESCE(a.notes, '')) <> '')
       ORDER BY a.service_day, c.name",
      RawAssignment::COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt
      .query_map(params![encode_date(week_start), with_notes], RawAssignment::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  fn query_clients(
    &self,
    responsible_id: Option<i64>,
    active_only: bool,
  ) -> Result<Vec<Client>> {
    let conn = self.connect()?;
    let sql = format!(
      "SELECT {}
       FROM clients c
       LEFT JOIN responsibles r ON r.id = c.responsible_id
       WHERE (?1 IS NULL OR c.responsible_id = ?1)
         AND (?2 = 0 OR c.active = 1)
       ORDER BY c.name",
      RawClient::COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt
      .query_map(params![responsible_id, active_only], RawClient::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawClient::into_client).collect()
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Current price of a client, or 0 if the client does not exist.
fn client_price(conn: &Connection, client_id: i64) -> Result<f64> {
  Ok(
    conn
      .query_row(
        "SELECT price_per_visit FROM clients WHERE id = ?1",
        params![client_id],
        |r| r.get(0),
      )
      .optional()?
      .unwrap_or(0.0),
  )
}

/// Column assignments for a dynamic `UPDATE ... SET`.
type SetList = Vec<(&'static str, Value)>;

/// Run `UPDATE {table} SET ... WHERE id = ?` with the given assignments.
/// Returns the number of rows changed.
fn run_update(conn: &Connection, table: &str, id: i64, sets: SetList) -> Result<usize> {
  let clause = sets
    .iter()
    .enumerate()
    .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
    .collect::<Vec<_>>()
    .join(", ");
  let sql = format!("UPDATE {table} SET {clause} WHERE id = ?{}", sets.len() + 1);

  let mut values: Vec<Value> = sets.into_iter().map(|(_, v)| v).collect();
  values.push(Value::Integer(id));

  Ok(conn.execute(&sql, rusqlite::params_from_iter(values))?)
}

fn client_sets(patch: ClientPatch) -> SetList {
  let mut sets = SetList::new();
  if let Some(v) = patch.name {
    sets.push(("name", v.trim().to_owned().into()));
  }
  if let Some(v) = patch.address {
    sets.push(("address", v.into()));
  }
  if let Some(v) = patch.district {
    sets.push(("district", v.into()));
  }
  if let Some(v) = patch.phone {
    sets.push(("phone", v.into()));
  }
  if let Some(v) = patch.responsible_id {
    sets.push(("responsible_id", v.into()));
  }
  if let Some(v) = patch.service_day {
    sets.push(("service_day", day_value(v)));
  }
  if let Some(v) = patch.price_per_visit {
    sets.push(("price_per_visit", v.into()));
  }
  if let Some(v) = patch.active {
    sets.push(("active", v.into()));
  }
  if let Some(v) = patch.notes {
    sets.push(("notes", v.into()));
  }
  sets
}

fn assignment_sets(patch: AssignmentPatch) -> SetList {
  let mut sets = SetList::new();
  if let Some(v) = patch.responsible_id {
    sets.push(("responsible_id", v.into()));
  }
  if let Some(v) = patch.service_day {
    sets.push(("service_day", day_value(v)));
  }
  if let Some(v) = patch.price {
    sets.push(("price", v.into()));
  }
  if let Some(v) = patch.assigned {
    sets.push(("assigned", v.into()));
  }
  if let Some(v) = patch.done {
    sets.push(("done", v.into()));
  }
  if let Some(v) = patch.notes {
    sets.push(("notes", v.into()));
  }
  sets
}

const UPSERT_ASSIGNMENT: &str = "INSERT OR REPLACE INTO weekly_assignments
   (week_start, client_id, responsible_id, service_day, price, created_at)
   VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

// ─── PoolStore impl ──────────────────────────────────────────────────────────

impl PoolStore for SqliteStore {
  type Error = Error;

  // ── Responsibles ──────────────────────────────────────────────────────────

  fn add_responsible(&self, name: &str) -> Result<i64> {
    let name = validate_name(name)?;
    let conn = self.connect()?;

    let inserted = conn.execute(
      "INSERT INTO responsibles (name, created_at) VALUES (?1, ?2)",
      params![name, encode_dt(Utc::now())],
    );

    match inserted {
      Ok(_) => {
        let id = conn.last_insert_rowid();
        info!(id, responsible = name, "responsible added");
        Ok(id)
      }
      Err(rusqlite::Error::SqliteFailure(e, _))
        if e.code == ErrorCode::ConstraintViolation =>
      {
        let id = conn.query_row(
          "SELECT id FROM responsibles WHERE name = ?1",
          params![name],
          |r| r.get(0),
        )?;
        debug!(id, responsible = name, "responsible already exists");
        Ok(id)
      }
      Err(e) => Err(e.into()),
    }
  }

  fn list_responsibles(&self, active_only: bool) -> Result<Vec<Responsible>> {
    let conn = self.connect()?;
    let sql = format!(
      "SELECT {} FROM responsibles WHERE (?1 = 0 OR active = 1) ORDER BY name",
      RawResponsible::COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt
      .query_map(params![active_only], RawResponsible::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawResponsible::into_responsible).collect()
  }

  // ── Clients ───────────────────────────────────────────────────────────────

  fn add_client(&self, input: NewClient) -> Result<i64> {
    input.validate()?;
    let now = encode_dt(Utc::now());
    let conn = self.connect()?;

    conn.execute(
      "INSERT INTO clients (
         name, address, district, phone, responsible_id, service_day,
         price_per_visit, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
      params![
        input.name.trim(),
        input.address,
        input.district,
        input.phone,
        input.responsible_id,
        encode_day(input.service_day),
        input.price_per_visit,
        now,
      ],
    )?;

    let id = conn.last_insert_rowid();
    info!(id, name = %input.name.trim(), "client added");
    Ok(id)
  }

  fn update_client(&self, id: i64, patch: ClientPatch) -> Result<()> {
    if patch.is_empty() {
      return Ok(());
    }
    patch.validate()?;

    let mut sets = client_sets(patch);
    sets.push(("updated_at", encode_dt(Utc::now()).into()));

    let conn = self.connect()?;
    let changed = run_update(&conn, "clients", id, sets)?;
    debug!(id, changed, "client updated");
    Ok(())
  }

  fn list_clients(&self, active_only: bool) -> Result<Vec<Client>> {
    self.query_clients(None, active_only)
  }

  fn list_clients_for_responsible(
    &self,
    responsible_id: i64,
    active_only: bool,
  ) -> Result<Vec<Client>> {
    self.query_clients(Some(responsible_id), active_only)
  }

  fn get_client(&self, id: i64) -> Result<Option<Client>> {
    let conn = self.connect()?;
    let sql = format!(
      "SELECT {}
       FROM clients c
       LEFT JOIN responsibles r ON r.id = c.responsible_id
       WHERE c.id = ?1",
      RawClient::COLUMNS
    );

    let raw = conn
      .query_row(&sql, params![id], RawClient::from_row)
      .optional()?;

    raw.map(RawClient::into_client).transpose()
  }

  // ── Weekly assignments ────────────────────────────────────────────────────

  fn upsert_weekly_assignment(&self, input: NewAssignment) -> Result<i64> {
    if let Some(price) = input.price {
      poolcare_core::client::validate_price(price)?;
    }
    let conn = self.connect()?;

    let price = match input.price {
      Some(p) => p,
      None => client_price(&conn, input.client_id)?,
    };

    conn.execute(
      UPSERT_ASSIGNMENT,
      params![
        encode_date(input.week_start),
        input.client_id,
        input.responsible_id,
        encode_day(input.service_day),
        price,
        encode_dt(Utc::now()),
      ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(id, week = %input.week_start, client_id = input.client_id, "assignment upserted");
    Ok(id)
  }

  fn assign_clients_to_week(&self, week_start: NaiveDate, active_only: bool) -> Result<usize> {
    let week = encode_date(week_start);
    let now = encode_dt(Utc::now());

    let mut conn = self.connect()?;
    let tx = conn.transaction()?;

    let clients: Vec<(i64, Option<i64>, Option<String>, f64)> = {
      let mut stmt = tx.prepare(
        "SELECT id, responsible_id, service_day, price_per_visit
         FROM clients
         WHERE (?1 = 0 OR active = 1)
         ORDER BY name",
      )?;
      let rows = stmt
        .query_map(params![active_only], |r| {
          Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
        })?
        .collect::<rusqlite::Result<_>>()?;
      rows
    };

    {
      let mut upsert = tx.prepare(UPSERT_ASSIGNMENT)?;
      for (client_id, responsible_id, service_day, price) in &clients {
        upsert.execute(params![week, client_id, responsible_id, service_day, price, now])?;
      }
    }

    tx.commit()?;
    info!(week = %week_start, count = clients.len(), "clients assigned to week");
    Ok(clients.len())
  }

  fn list_week_assignments(&self, week_start: NaiveDate) -> Result<Vec<WeeklyAssignment>> {
    self.query_week(week_start, false)
  }

  fn list_week_notes(&self, week_start: NaiveDate) -> Result<Vec<WeeklyAssignment>> {
    self.query_week(week_start, true)
  }

  fn update_assignment(&self, id: i64, patch: AssignmentPatch) -> Result<()> {
    if patch.is_empty() {
      return Ok(());
    }
    patch.validate()?;

    let conn = self.connect()?;
    let changed = run_update(&conn, "weekly_assignments", id, assignment_sets(patch))?;
    debug!(id, changed, "assignment updated");
    Ok(())
  }

  // ── Visits ────────────────────────────────────────────────────────────────

  fn record_visit(&self, input: NewVisit) -> Result<i64> {
    if let Some(price) = input.price {
      poolcare_core::client::validate_price(price)?;
    }
    let conn = self.connect()?;

    let price = match input.price {
      Some(p) => p,
      None => client_price(&conn, input.client_id)?,
    };

    conn.execute(
      "INSERT INTO visits
         (client_id, visit_date, responsible_id, price, done, notes, created_at)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
      params![
        input.client_id,
        encode_date(input.visit_date),
        input.responsible_id,
        price,
        input.done,
        input.notes,
        encode_dt(Utc::now()),
      ],
    )?;

    let id = conn.last_insert_rowid();
    info!(id, client_id = input.client_id, date = %input.visit_date, "visit recorded");
    Ok(id)
  }

  fn list_client_visits(&self, client_id: i64, limit: usize) -> Result<Vec<Visit>> {
    let conn = self.connect()?;
    let sql = format!(
      "SELECT {}
       FROM visits v
       LEFT JOIN clients      c ON c.id = v.client_id
       LEFT JOIN responsibles r ON r.id = v.responsible_id
       WHERE v.client_id = ?1
       ORDER BY v.visit_date DESC
       LIMIT ?2",
      RawVisit::COLUMNS
    );

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt
      .query_map(params![client_id, limit], RawVisit::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawVisit::into_visit).collect()
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  fn stats(&self, week_start: NaiveDate) -> Result<Stats> {
    let conn = self.connect()?;
    let count = |sql: &str, p: &[&dyn rusqlite::ToSql]| -> Result<u64> {
      let n: i64 = conn.query_row(sql, p, |r| r.get(0))?;
      Ok(n.max(0) as u64)
    };

    Ok(Stats {
      week_start,
      active_clients: count("SELECT COUNT(*) FROM clients WHERE active = 1", &[])?,
      active_responsibles: count(
        "SELECT COUNT(*) FROM responsibles WHERE active = 1",
        &[],
      )?,
      week_assignments: count(
        "SELECT COUNT(*) FROM weekly_assignments WHERE week_start = ?1",
        &[&encode_date(week_start)],
      )?,
    })
  }

  fn week_progress(&self, week_start: NaiveDate) -> Result<Vec<ResponsibleProgress>> {
    let conn = self.connect()?;
    let mut stmt = conn.prepare(
      "SELECT a.responsible_id, r.name, COUNT(*), COALESCE(SUM(a.done), 0)
       FROM weekly_assignments a
       LEFT JOIN responsibles r ON r.id = a.responsible_id
       WHERE a.week_start = ?1
       GROUP BY a.responsible_id
       ORDER BY a.responsible_id IS NULL, r.name",
    )?;

    let rows = stmt
      .query_map(params![encode_date(week_start)], |r| {
        let total: i64 = r.get(2)?;
        let done: i64 = r.get(3)?;
        Ok(ResponsibleProgress {
          responsible_id:   r.get(0)?,
          responsible_name: r.get(1)?,
          total:            total as u64,
          done:             done as u64,
          pending:          (total - done) as u64,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
  }
}
