//! Table rendering for the shell.

use comfy_table::{ContentArrangement, Table, presets};
use poolcare_core::{
  assignment::{ResponsibleProgress, WeeklyAssignment},
  client::Client,
  responsible::Responsible,
  visit::Visit,
};

const UNASSIGNED: &str = "Unassigned";

fn table(header: &[&str]) -> Table {
  let mut table = Table::new();
  table.load_preset(presets::UTF8_FULL_CONDENSED);
  table.set_content_arrangement(ContentArrangement::Dynamic);
  table.set_header(header.to_vec());
  table
}

pub fn price(p: f64) -> String { format!("${p:.0}") }

fn yes_no(b: bool) -> &'static str { if b { "Yes" } else { "No" } }

pub fn clients(rows: &[Client]) -> Table {
  let mut t = table(&["ID", "Name", "Responsible", "Day", "Price"]);
  for c in rows {
    t.add_row(vec![
      c.id.to_string(),
      c.name.clone(),
      c.responsible_name.clone().unwrap_or_else(|| UNASSIGNED.into()),
      c.service_day.map_or_else(|| UNASSIGNED.into(), |d| d.to_string()),
      price(c.price_per_visit),
    ]);
  }
  t
}

pub fn responsibles(rows: &[Responsible]) -> Table {
  let mut t = table(&["ID", "Name"]);
  for r in rows {
    t.add_row(vec![r.id.to_string(), r.name.clone()]);
  }
  t
}

/// One day's worth of assignments.
pub fn assignments<'a>(rows: impl IntoIterator<Item = &'a WeeklyAssignment>) -> Table {
  let mut t = table(&["ID", "Client", "District", "Responsible", "Price", "Done", "Notes"]);
  for a in rows {
    t.add_row(vec![
      a.id.to_string(),
      client_label(a),
      a.client_district.clone().unwrap_or_default(),
      a.responsible_name.clone().unwrap_or_else(|| UNASSIGNED.into()),
      price(a.price),
      yes_no(a.done).into(),
      a.notes.clone().unwrap_or_default(),
    ]);
  }
  t
}

/// Annotated assignments, with the day since they span the whole week.
pub fn notes(rows: &[WeeklyAssignment]) -> Table {
  let mut t = table(&["Day", "Client", "Address", "Responsible", "Done", "Notes"]);
  for a in rows {
    t.add_row(vec![
      a.service_day.map_or_else(|| UNASSIGNED.into(), |d| d.to_string()),
      client_label(a),
      a.client_address.clone().unwrap_or_default(),
      a.responsible_name.clone().unwrap_or_else(|| UNASSIGNED.into()),
      yes_no(a.done).into(),
      a.notes.clone().unwrap_or_default(),
    ]);
  }
  t
}

fn client_label(a: &WeeklyAssignment) -> String {
  a.client_name.clone().unwrap_or_else(|| format!("#{}", a.client_id))
}

pub fn visits(rows: &[Visit]) -> Table {
  let mut t = table(&["Date", "Responsible", "Price", "Done"]);
  for v in rows {
    t.add_row(vec![
      v.visit_date.to_string(),
      v.responsible_name.clone().unwrap_or_else(|| "N/A".into()),
      price(v.price),
      yes_no(v.done).into(),
    ]);
  }
  t
}

pub fn progress(rows: &[ResponsibleProgress]) -> Table {
  let mut t = table(&["Responsible", "Total", "Done", "Pending"]);
  for p in rows {
    t.add_row(vec![
      p.responsible_name.clone().unwrap_or_else(|| UNASSIGNED.into()),
      p.total.to_string(),
      p.done.to_string(),
      p.pending.to_string(),
    ]);
  }
  t
}
