//! Integration tests for `SqliteStore` against a throwaway database file.

use chrono::NaiveDate;
use poolcare_core::{
  assignment::{AssignmentPatch, NewAssignment},
  client::{ClientPatch, NewClient},
  day::ServiceDay,
  store::{DEFAULT_VISIT_LIMIT, PoolStore},
  visit::NewVisit,
};
use tempfile::TempDir;

use crate::{Error, SqliteStore};

fn store() -> (TempDir, SqliteStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = SqliteStore::open(dir.path().join("pool.db")).expect("open store");
  (dir, store)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn count(store: &SqliteStore, sql: &str) -> i64 {
  let conn = rusqlite::Connection::open(store.path()).unwrap();
  conn.query_row(sql, [], |r| r.get(0)).unwrap()
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[test]
fn open_creates_missing_directories_and_is_idempotent() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("data").join("pool.db");

  let s = SqliteStore::open(&path).unwrap();
  let id = s.add_client(NewClient::new("Kept")).unwrap();
  assert!(path.exists());

  // Re-opening applies the schema again without touching existing rows.
  let reopened = SqliteStore::open(&path).unwrap();
  assert_eq!(reopened.get_client(id).unwrap().unwrap().name, "Kept");
}

// ─── Responsibles ────────────────────────────────────────────────────────────

#[test]
fn add_responsible_is_idempotent_by_name() {
  let (_dir, s) = store();

  let first = s.add_responsible("X").unwrap();
  let second = s.add_responsible("X").unwrap();

  assert_eq!(first, second);
  assert_eq!(count(&s, "SELECT COUNT(*) FROM responsibles"), 1);
}

#[test]
fn add_responsible_rejects_blank_name() {
  let (_dir, s) = store();
  let err = s.add_responsible("   ").unwrap_err();
  assert!(matches!(err, Error::Core(poolcare_core::Error::Validation(_))));
  assert_eq!(count(&s, "SELECT COUNT(*) FROM responsibles"), 0);
}

#[test]
fn list_responsibles_sorted_and_filtered() {
  let (_dir, s) = store();
  s.add_responsible("Pedro").unwrap();
  let ana = s.add_responsible("Ana").unwrap();
  s.add_responsible("Luis").unwrap();

  // No operation deactivates staff, so flip the flag directly.
  let conn = rusqlite::Connection::open(s.path()).unwrap();
  conn
    .execute("UPDATE responsibles SET active = 0 WHERE id = ?1", [ana])
    .unwrap();

  let names: Vec<_> = s
    .list_responsibles(false)
    .unwrap()
    .into_iter()
    .map(|r| r.name)
    .collect();
  assert_eq!(names, ["Ana", "Luis", "Pedro"]);

  let active = s.list_responsibles(true).unwrap();
  assert_eq!(active.len(), 2);
  assert!(active.iter().all(|r| r.active));
}

// ─── Clients ─────────────────────────────────────────────────────────────────

#[test]
fn add_client_then_get_returns_supplied_fields() {
  let (_dir, s) = store();
  let ana = s.add_responsible("Ana").unwrap();

  let id = s
    .add_client(NewClient {
      name:            "Juan Pérez".into(),
      address:         Some("Av. Siempre Viva 742".into()),
      district:        Some("Ñuñoa".into()),
      phone:           Some("+56 9 1234 5678".into()),
      responsible_id:  Some(ana),
      service_day:     Some(ServiceDay::Monday),
      price_per_visit: 15000.0,
    })
    .unwrap();

  let c = s.get_client(id).unwrap().expect("client exists");
  assert_eq!(c.name, "Juan Pérez");
  assert_eq!(c.address.as_deref(), Some("Av. Siempre Viva 742"));
  assert_eq!(c.district.as_deref(), Some("Ñuñoa"));
  assert_eq!(c.phone.as_deref(), Some("+56 9 1234 5678"));
  assert_eq!(c.responsible_id, Some(ana));
  assert_eq!(c.responsible_name.as_deref(), Some("Ana"));
  assert_eq!(c.service_day, Some(ServiceDay::Monday));
  assert_eq!(c.price_per_visit, 15000.0);
  assert!(c.active);
  assert_eq!(c.notes, None);
}

#[test]
fn add_client_defaults_optional_fields() {
  let (_dir, s) = store();
  let id = s.add_client(NewClient::new("Solo Nombre")).unwrap();

  let c = s.get_client(id).unwrap().unwrap();
  assert_eq!(c.address, None);
  assert_eq!(c.district, None);
  assert_eq!(c.phone, None);
  assert_eq!(c.responsible_id, None);
  assert_eq!(c.responsible_name, None);
  assert_eq!(c.service_day, None);
  assert_eq!(c.price_per_visit, 0.0);
}

#[test]
fn add_client_validation_writes_nothing() {
  let (_dir, s) = store();
  assert!(s.add_client(NewClient::new("")).is_err());
  let negative = NewClient { price_per_visit: -5.0, ..NewClient::new("Neg") };
  assert!(s.add_client(negative).is_err());
  assert_eq!(count(&s, "SELECT COUNT(*) FROM clients"), 0);
}

#[test]
fn get_client_missing_returns_none() {
  let (_dir, s) = store();
  assert!(s.get_client(42).unwrap().is_none());
}

#[test]
fn update_client_with_empty_patch_is_a_noop() {
  let (_dir, s) = store();
  let id = s.add_client(NewClient::new("Quieto")).unwrap();
  let before = s.get_client(id).unwrap().unwrap();

  s.update_client(id, ClientPatch::default()).unwrap();

  let after = s.get_client(id).unwrap().unwrap();
  assert_eq!(before, after);
}

#[test]
fn update_client_changes_only_supplied_fields() {
  let (_dir, s) = store();
  let id = s
    .add_client(NewClient {
      address: Some("Calle 1".into()),
      phone: Some("555".into()),
      price_per_visit: 10000.0,
      ..NewClient::new("Parcial")
    })
    .unwrap();
  let before = s.get_client(id).unwrap().unwrap();

  s.update_client(id, ClientPatch {
    phone: Some(None),
    service_day: Some(Some(ServiceDay::Friday)),
    price_per_visit: Some(12000.0),
    ..Default::default()
  })
  .unwrap();

  let after = s.get_client(id).unwrap().unwrap();
  assert_eq!(after.name, "Parcial");
  assert_eq!(after.address.as_deref(), Some("Calle 1"));
  assert_eq!(after.phone, None);
  assert_eq!(after.service_day, Some(ServiceDay::Friday));
  assert_eq!(after.price_per_visit, 12000.0);
  assert_eq!(after.created_at, before.created_at);
  assert!(after.updated_at >= before.updated_at);
}

#[test]
fn update_client_unknown_id_is_silent() {
  let (_dir, s) = store();
  let patch = ClientPatch { name: Some("Nadie".into()), ..Default::default() };
  s.update_client(999, patch).unwrap();
  assert_eq!(count(&s, "SELECT COUNT(*) FROM clients"), 0);
}

#[test]
fn update_client_rejects_invalid_values() {
  let (_dir, s) = store();
  let id = s.add_client(NewClient::new("Valido")).unwrap();

  let blank = ClientPatch { name: Some("  ".into()), ..Default::default() };
  assert!(s.update_client(id, blank).is_err());
  let negative = ClientPatch { price_per_visit: Some(-1.0), ..Default::default() };
  assert!(s.update_client(id, negative).is_err());

  assert_eq!(s.get_client(id).unwrap().unwrap().name, "Valido");
}

#[test]
fn list_clients_sorted_and_filtered() {
  let (_dir, s) = store();
  let ana = s.add_responsible("Ana").unwrap();
  s.add_client(NewClient { responsible_id: Some(ana), ..NewClient::new("Zoe") })
    .unwrap();
  let bea = s.add_client(NewClient::new("Bea")).unwrap();
  s.add_client(NewClient { responsible_id: Some(ana), ..NewClient::new("Carlos") })
    .unwrap();

  s.update_client(bea, ClientPatch { active: Some(false), ..Default::default() })
    .unwrap();

  let all: Vec<_> = s.list_clients(false).unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(all, ["Bea", "Carlos", "Zoe"]);

  let active: Vec<_> = s.list_clients(true).unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(active, ["Carlos", "Zoe"]);

  let for_ana = s.list_clients_for_responsible(ana, true).unwrap();
  assert_eq!(for_ana.len(), 2);
  assert!(for_ana.iter().all(|c| c.responsible_name.as_deref() == Some("Ana")));
}

// ─── Weekly assignments ──────────────────────────────────────────────────────

#[test]
fn upsert_replaces_existing_pair() {
  let (_dir, s) = store();
  let week = date(2025, 11, 3);
  let client = s
    .add_client(NewClient { price_per_visit: 9000.0, ..NewClient::new("Repetido") })
    .unwrap();

  s.upsert_weekly_assignment(NewAssignment {
    service_day: Some(ServiceDay::Monday),
    ..NewAssignment::new(week, client)
  })
  .unwrap();
  s.upsert_weekly_assignment(NewAssignment {
    service_day: Some(ServiceDay::Thursday),
    price: Some(11000.0),
    ..NewAssignment::new(week, client)
  })
  .unwrap();

  let rows = s.list_week_assignments(week).unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].service_day, Some(ServiceDay::Thursday));
  assert_eq!(rows[0].price, 11000.0);
  assert_eq!(count(&s, "SELECT COUNT(*) FROM weekly_assignments"), 1);
}

#[test]
fn upsert_overwrites_rather_than_merges() {
  let (_dir, s) = store();
  let week = date(2025, 11, 3);
  let client = s.add_client(NewClient::new("Sobrescrito")).unwrap();

  let first = s.upsert_weekly_assignment(NewAssignment::new(week, client)).unwrap();
  s.update_assignment(first, AssignmentPatch {
    done: Some(true),
    notes: Some(Some("filtro cambiado".into())),
    ..Default::default()
  })
  .unwrap();

  s.upsert_weekly_assignment(NewAssignment::new(week, client)).unwrap();

  let rows = s.list_week_assignments(week).unwrap();
  assert_eq!(rows.len(), 1);
  assert!(!rows[0].done);
  assert_eq!(rows[0].notes, None);
}

#[test]
fn upsert_snapshots_client_price_when_omitted() {
  let (_dir, s) = store();
  let week = date(2025, 11, 3);
  let client = s
    .add_client(NewClient { price_per_visit: 20000.0, ..NewClient::new("Snap") })
    .unwrap();

  s.upsert_weekly_assignment(NewAssignment::new(week, client)).unwrap();
  s.update_client(client, ClientPatch {
    price_per_visit: Some(25000.0),
    ..Default::default()
  })
  .unwrap();

  let rows = s.list_week_assignments(week).unwrap();
  assert_eq!(rows[0].price, 20000.0);
}

#[test]
fn upsert_for_unknown_client_uses_zero_price() {
  let (_dir, s) = store();
  let week = date(2025, 11, 3);
  s.upsert_weekly_assignment(NewAssignment::new(week, 77)).unwrap();

  let rows = s.list_week_assignments(week).unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].price, 0.0);
  assert_eq!(rows[0].client_name, None);
}

#[test]
fn dangling_references_are_accepted() {
  let (_dir, s) = store();
  let id = s
    .add_client(NewClient { responsible_id: Some(999), ..NewClient::new("Huerfano") })
    .unwrap();
  let c = s.get_client(id).unwrap().unwrap();
  assert_eq!(c.responsible_id, Some(999));
  assert_eq!(c.responsible_name, None);

  s.update_client(id, ClientPatch {
    responsible_id: Some(Some(555)),
    ..Default::default()
  })
  .unwrap();
  assert_eq!(s.get_client(id).unwrap().unwrap().responsible_id, Some(555));

  s.record_visit(NewVisit::new(4242, date(2025, 11, 4))).unwrap();
  let visits = s.list_client_visits(4242, DEFAULT_VISIT_LIMIT).unwrap();
  assert_eq!(visits.len(), 1);
  assert_eq!(visits[0].price, 0.0);
  assert_eq!(visits[0].client_name, None);
}

#[test]
fn assign_clients_to_week_covers_every_active_client() {
  let (_dir, s) = store();
  let week = date(2025, 11, 10);
  let prices = [10000.0, 12500.0, 18000.0];
  for (i, price) in prices.iter().enumerate() {
    s.add_client(NewClient {
      price_per_visit: *price,
      ..NewClient::new(format!("Cliente {i}"))
    })
    .unwrap();
  }
  let inactive = s.add_client(NewClient::new("Inactivo")).unwrap();
  s.update_client(inactive, ClientPatch { active: Some(false), ..Default::default() })
    .unwrap();

  let n = s.assign_clients_to_week(week, true).unwrap();
  assert_eq!(n, 3);

  let rows = s.list_week_assignments(week).unwrap();
  assert_eq!(rows.len(), 3);
  for row in &rows {
    let client = s.get_client(row.client_id).unwrap().unwrap();
    assert_eq!(row.price, client.price_per_visit);
    assert!(row.assigned);
    assert!(!row.done);
  }

  // Running again replaces in place.
  assert_eq!(s.assign_clients_to_week(week, true).unwrap(), 3);
  assert_eq!(s.list_week_assignments(week).unwrap().len(), 3);

  // Including inactive clients picks up the fourth.
  assert_eq!(s.assign_clients_to_week(week, false).unwrap(), 4);
  assert_eq!(s.list_week_assignments(week).unwrap().len(), 4);
}

#[test]
fn week_assignments_are_ordered_by_day_then_client() {
  let (_dir, s) = store();
  let week = date(2025, 11, 3);
  let mk = |name: &str, day: Option<ServiceDay>| {
    s.add_client(NewClient { service_day: day, ..NewClient::new(name) })
      .unwrap()
  };
  mk("Bruno", Some(ServiceDay::Tuesday));
  mk("Alicia", Some(ServiceDay::Tuesday));
  mk("Carla", Some(ServiceDay::Monday));
  mk("Diego", None);

  s.assign_clients_to_week(week, true).unwrap();

  let names: Vec<_> = s
    .list_week_assignments(week)
    .unwrap()
    .into_iter()
    .map(|a| a.client_name.unwrap())
    .collect();
  // Text ordering on the stored label, null first.
  assert_eq!(names, ["Diego", "Carla", "Alicia", "Bruno"]);
}

#[test]
fn weeks_are_kept_apart() {
  let (_dir, s) = store();
  s.add_client(NewClient::new("Uno")).unwrap();
  s.assign_clients_to_week(date(2025, 11, 3), true).unwrap();

  assert_eq!(s.list_week_assignments(date(2025, 11, 3)).unwrap().len(), 1);
  assert!(s.list_week_assignments(date(2025, 11, 10)).unwrap().is_empty());
}

#[test]
fn update_assignment_marks_done() {
  let (_dir, s) = store();
  let week = date(2025, 11, 3);
  let client = s.add_client(NewClient::new("Hecho")).unwrap();
  let id = s.upsert_weekly_assignment(NewAssignment::new(week, client)).unwrap();

  s.update_assignment(id, AssignmentPatch::default()).unwrap();
  assert!(!s.list_week_assignments(week).unwrap()[0].done);

  s.update_assignment(id, AssignmentPatch { done: Some(true), ..Default::default() })
    .unwrap();
  assert!(s.list_week_assignments(week).unwrap()[0].done);
}

#[test]
fn scenario_assign_week_for_juan_perez() {
  let (_dir, s) = store();
  let ana = s.add_responsible("Ana").unwrap();
  s.add_client(NewClient {
    responsible_id: Some(ana),
    service_day: Some("Lunes".parse().unwrap()),
    price_per_visit: 15000.0,
    ..NewClient::new("Juan Pérez")
  })
  .unwrap();

  let week = date(2025, 11, 3);
  assert_eq!(s.assign_clients_to_week(week, true).unwrap(), 1);

  let rows = s.list_week_assignments(week).unwrap();
  assert_eq!(rows.len(), 1);
  let row = &rows[0];
  assert_eq!(row.client_name.as_deref(), Some("Juan Pérez"));
  assert_eq!(row.service_day.map(ServiceDay::label), Some("Lunes"));
  assert_eq!(row.responsible_name.as_deref(), Some("Ana"));
  assert_eq!(row.price, 15000.0);
  assert!(!row.done);
}

#[test]
fn week_notes_lists_only_annotated_assignments() {
  let (_dir, s) = store();
  let week = date(2025, 11, 3);
  for (name, day) in [("Beatriz", "Martes"), ("Alberto", "Martes"), ("Carla", "Lunes")] {
    s.add_client(NewClient {
      service_day: Some(day.parse().unwrap()),
      ..NewClient::new(name)
    })
    .unwrap();
  }
  s.add_client(NewClient::new("Sin nota")).unwrap();
  s.assign_clients_to_week(week, true).unwrap();
  s.assign_clients_to_week(date(2025, 11, 10), true).unwrap();

  for a in s.list_week_assignments(week).unwrap() {
    let notes = match a.client_name.as_deref() {
      Some("Sin nota") => continue,
      Some("Alberto") => Some("   "),
      _ => Some("cambiar filtro"),
    };
    s.update_assignment(a.id, AssignmentPatch {
      notes: Some(notes.map(str::to_owned)),
      ..Default::default()
    })
    .unwrap();
  }

  let names: Vec<_> = s
    .list_week_notes(week)
    .unwrap()
    .into_iter()
    .map(|a| (a.client_name.unwrap(), a.notes.unwrap()))
    .collect();
  assert_eq!(names, [
    ("Carla".to_owned(), "cambiar filtro".to_owned()),
    ("Beatriz".to_owned(), "cambiar filtro".to_owned()),
  ]);
  assert!(s.list_week_notes(date(2025, 11, 10)).unwrap().is_empty());
}

// ─── Visits ──────────────────────────────────────────────────────────────────

#[test]
fn record_visit_snapshots_price() {
  let (_dir, s) = store();
  let client = s
    .add_client(NewClient { price_per_visit: 14000.0, ..NewClient::new("Historial") })
    .unwrap();

  s.record_visit(NewVisit::new(client, date(2025, 11, 4))).unwrap();
  s.update_client(client, ClientPatch {
    price_per_visit: Some(16000.0),
    ..Default::default()
  })
  .unwrap();

  let visits = s.list_client_visits(client, DEFAULT_VISIT_LIMIT).unwrap();
  assert_eq!(visits.len(), 1);
  assert_eq!(visits[0].price, 14000.0);
  assert!(visits[0].done);
  assert_eq!(visits[0].client_name.as_deref(), Some("Historial"));
}

#[test]
fn record_visit_keeps_explicit_values() {
  let (_dir, s) = store();
  let luis = s.add_responsible("Luis").unwrap();
  let client = s.add_client(NewClient::new("Explicito")).unwrap();

  s.record_visit(NewVisit {
    responsible_id: Some(luis),
    price: Some(5000.0),
    done: false,
    notes: Some("no había acceso".into()),
    ..NewVisit::new(client, date(2025, 11, 5))
  })
  .unwrap();

  let v = &s.list_client_visits(client, 10).unwrap()[0];
  assert_eq!(v.price, 5000.0);
  assert!(!v.done);
  assert_eq!(v.responsible_name.as_deref(), Some("Luis"));
  assert_eq!(v.notes.as_deref(), Some("no había acceso"));
}

#[test]
fn list_client_visits_returns_most_recent_first() {
  let (_dir, s) = store();
  let client = s.add_client(NewClient::new("Frecuente")).unwrap();
  let other = s.add_client(NewClient::new("Otro")).unwrap();
  for day in 1..=5 {
    s.record_visit(NewVisit::new(client, date(2025, 10, day))).unwrap();
  }
  s.record_visit(NewVisit::new(other, date(2025, 10, 31))).unwrap();

  let visits = s.list_client_visits(client, 2).unwrap();
  let dates: Vec<_> = visits.iter().map(|v| v.visit_date).collect();
  assert_eq!(dates, [date(2025, 10, 5), date(2025, 10, 4)]);
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[test]
fn stats_counts_active_rows_and_week_assignments() {
  let (_dir, s) = store();
  let week = date(2025, 11, 3);
  s.add_responsible("Ana").unwrap();
  s.add_client(NewClient::new("A")).unwrap();
  let b = s.add_client(NewClient::new("B")).unwrap();
  s.assign_clients_to_week(week, true).unwrap();
  s.update_client(b, ClientPatch { active: Some(false), ..Default::default() })
    .unwrap();

  let stats = s.stats(week).unwrap();
  assert_eq!(stats.week_start, week);
  assert_eq!(stats.active_clients, 1);
  assert_eq!(stats.active_responsibles, 1);
  // Deactivating a client does not hide its existing assignment.
  assert_eq!(stats.week_assignments, 2);
}

#[test]
fn week_progress_groups_by_responsible() {
  let (_dir, s) = store();
  let week = date(2025, 11, 3);
  let ana = s.add_responsible("Ana").unwrap();
  let beto = s.add_responsible("Beto").unwrap();
  for (name, resp) in [("c1", Some(beto)), ("c2", Some(ana)), ("c3", Some(ana)), ("c4", None)] {
    s.add_client(NewClient { responsible_id: resp, ..NewClient::new(name) })
      .unwrap();
  }
  s.assign_clients_to_week(week, true).unwrap();

  let ana_rows: Vec<_> = s
    .list_week_assignments(week)
    .unwrap()
    .into_iter()
    .filter(|a| a.responsible_id == Some(ana))
    .collect();
  s.update_assignment(ana_rows[0].id, AssignmentPatch {
    done: Some(true),
    ..Default::default()
  })
  .unwrap();

  let progress = s.week_progress(week).unwrap();
  assert_eq!(progress.len(), 3);

  assert_eq!(progress[0].responsible_name.as_deref(), Some("Ana"));
  assert_eq!((progress[0].total, progress[0].done, progress[0].pending), (2, 1, 1));
  assert_eq!(progress[1].responsible_name.as_deref(), Some("Beto"));
  assert_eq!((progress[1].total, progress[1].done, progress[1].pending), (1, 0, 1));
  assert_eq!(progress[2].responsible_id, None);
  assert_eq!(progress[2].total, 1);
}
