//! The `PoolStore` trait.
//!
//! Implemented by storage backends (e.g. `poolcare-store-sqlite`). The shell
//! and the importer depend on this abstraction, not on a concrete backend.

use chrono::NaiveDate;

use crate::{
  assignment::{AssignmentPatch, NewAssignment, ResponsibleProgress, Stats, WeeklyAssignment},
  client::{Client, ClientPatch, NewClient},
  responsible::Responsible,
  visit::{NewVisit, Visit},
};

/// Default number of visits returned by [`PoolStore::list_client_visits`].
pub const DEFAULT_VISIT_LIMIT: usize = 10;

/// Abstraction over a poolcare storage backend.
///
/// Every call is a self-contained unit of work; no state is shared between
/// calls and there is no transaction spanning more than one call.
pub trait PoolStore {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Responsibles ──────────────────────────────────────────────────────

  /// Add a responsible by name. If the name is already taken, the existing
  /// id is returned instead of an error.
  fn add_responsible(&self, name: &str) -> Result<i64, Self::Error>;

  /// List responsibles ordered by name.
  fn list_responsibles(&self, active_only: bool) -> Result<Vec<Responsible>, Self::Error>;

  // ── Clients ───────────────────────────────────────────────────────────

  fn add_client(&self, input: NewClient) -> Result<i64, Self::Error>;

  /// Apply `patch` to client `id` and refresh `updated_at`.
  ///
  /// An empty patch writes nothing. An unknown `id` is not an error.
  fn update_client(&self, id: i64, patch: ClientPatch) -> Result<(), Self::Error>;

  /// List clients ordered by name, with their responsible's name.
  fn list_clients(&self, active_only: bool) -> Result<Vec<Client>, Self::Error>;

  /// Like [`PoolStore::list_clients`], restricted to one responsible.
  fn list_clients_for_responsible(
    &self,
    responsible_id: i64,
    active_only: bool,
  ) -> Result<Vec<Client>, Self::Error>;

  /// Retrieve a client by id. Returns `None` if not found.
  fn get_client(&self, id: i64) -> Result<Option<Client>, Self::Error>;

  // ── Weekly assignments ────────────────────────────────────────────────

  /// Insert or fully replace the assignment for
  /// `(input.week_start, input.client_id)`.
  fn upsert_weekly_assignment(&self, input: NewAssignment) -> Result<i64, Self::Error>;

  /// Upsert an assignment for every client matching `active_only`,
  /// snapshotting each client's responsible, day and price. Returns the
  /// number of clients processed.
  fn assign_clients_to_week(
    &self,
    week_start: NaiveDate,
    active_only: bool,
  ) -> Result<usize, Self::Error>;

  /// Assignments for one week, ordered by service day then client name.
  fn list_week_assignments(
    &self,
    week_start: NaiveDate,
  ) -> Result<Vec<WeeklyAssignment>, Self::Error>;

  /// The week's assignments that carry a non-blank note, in the same order
  /// as [`PoolStore::list_week_assignments`].
  fn list_week_notes(
    &self,
    week_start: NaiveDate,
  ) -> Result<Vec<WeeklyAssignment>, Self::Error>;

  /// Apply `patch` to assignment `id`. Empty patches and unknown ids are
  /// no-ops.
  fn update_assignment(&self, id: i64, patch: AssignmentPatch) -> Result<(), Self::Error>;

  // ── Visits — append-only ──────────────────────────────────────────────

  fn record_visit(&self, input: NewVisit) -> Result<i64, Self::Error>;

  /// The most recent `limit` visits for a client, newest first.
  fn list_client_visits(&self, client_id: i64, limit: usize)
  -> Result<Vec<Visit>, Self::Error>;

  // ── Reports ───────────────────────────────────────────────────────────

  fn stats(&self, week_start: NaiveDate) -> Result<Stats, Self::Error>;

  /// Per-responsible completion for a week, ordered by responsible name.
  fn week_progress(
    &self,
    week_start: NaiveDate,
  ) -> Result<Vec<ResponsibleProgress>, Self::Error>;
}
