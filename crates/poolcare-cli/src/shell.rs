//! The interactive numbered menu.
//!
//! Generic over its input and output so the whole loop can be driven from
//! tests with in-memory buffers.

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use poolcare_core::{
  assignment::{AssignmentPatch, WeeklyAssignment},
  client::{Client, ClientPatch, NewClient},
  day::ServiceDay,
  store::PoolStore,
  visit::NewVisit,
  week,
};
use thiserror::Error;
use tracing::error;

use crate::render;

const RULE: &str = "============================================================";

/// A menu action that stopped early. Reported to the operator; the loop
/// carries on (except at end of input).
#[derive(Debug, Error)]
enum Abort {
  #[error("end of input")]
  Eof,
  #[error("{0}")]
  Invalid(String),
  #[error("{0}")]
  NotFound(String),
}

fn invalid(msg: impl Into<String>) -> anyhow::Error { Abort::Invalid(msg.into()).into() }

/// What the operator typed into an "edit" prompt.
enum Edit<'s> {
  /// Blank: leave as is.
  Keep,
  /// `-`: clear the field.
  Clear,
  Set(&'s str),
}

impl<'s> Edit<'s> {
  fn parse(raw: &'s str) -> Self {
    match raw {
      "" => Edit::Keep,
      "-" => Edit::Clear,
      other => Edit::Set(other),
    }
  }
}

pub struct Shell<'a, S, R, W> {
  store:         &'a S,
  input:         R,
  out:           W,
  history_limit: usize,
}

impl<'a, S, R, W> Shell<'a, S, R, W>
where
  S: PoolStore,
  R: BufRead,
  W: Write,
{
  pub fn new(store: &'a S, input: R, out: W, history_limit: usize) -> Self {
    Self { store, input, out, history_limit }
  }

  /// Run the menu until the operator picks `0` or input ends.
  pub fn run(&mut self) -> anyhow::Result<()> {
    loop {
      self.print_menu()?;

      let choice = match self.prompt("\nSelect an option: ") {
        Ok(choice) => choice,
        Err(e) if is_eof(&e) => break,
        Err(e) => return Err(e),
      };
      if choice == "0" {
        writeln!(self.out, "\nBye!")?;
        break;
      }

      if let Err(e) = self.dispatch(&choice)
        && self.report(&choice, e)?
      {
        break;
      }
    }
    Ok(())
  }

  /// Tell the operator why `action` stopped. Input rejected by the store
  /// counts as invalid input; anything else is logged as unexpected.
  /// Returns `true` once input has ended.
  fn report(&mut self, action: &str, e: anyhow::Error) -> anyhow::Result<bool> {
    if let Some(abort) = e.downcast_ref::<Abort>() {
      if matches!(abort, Abort::Eof) {
        return Ok(true);
      }
      writeln!(self.out, "\n{abort}")?;
    } else if let Some(rejected) =
      e.chain().find_map(|c| c.downcast_ref::<poolcare_core::Error>())
    {
      writeln!(self.out, "\n{}", Abort::Invalid(rejected.to_string()))?;
    } else {
      error!(action, error = %format!("{e:#}"), "menu action failed");
      writeln!(self.out, "\nError: {e:#}")?;
    }
    Ok(false)
  }

  fn dispatch(&mut self, choice: &str) -> anyhow::Result<()> {
    match choice {
      "1" => self.show_clients(),
      "2" => self.show_responsibles(),
      "3" => self.add_client(),
      "4" => self.edit_client(),
      "5" => self.add_responsible(),
      "6" => self.assign_current_week(),
      "7" => self.show_week(week::current_week_start()),
      "8" => {
        let week = self.prompt_week("\nAny date in the week (YYYY-MM-DD): ")?;
        self.show_week(week)
      }
      "9" => self.record_visit(),
      "10" => self.client_history(),
      "11" => self.mark_done(),
      "12" => self.show_progress(),
      "13" => self.show_notes(),
      _ => Err(invalid("Invalid option.")),
    }
  }

  fn print_menu(&mut self) -> anyhow::Result<()> {
    writeln!(self.out, "\n{RULE}")?;
    writeln!(self.out, "  POOL MAINTENANCE")?;
    match self.store.stats(week::current_week_start()) {
      Ok(stats) => writeln!(
        self.out,
        "  Week of {}: {} active clients, {} staff, {} assignments",
        stats.week_start, stats.active_clients, stats.active_responsibles, stats.week_assignments
      )?,
      // The menu stays usable without its summary line.
      Err(e) => {
        self.report("menu", e.into())?;
      }
    }
    writeln!(self.out, "{RULE}")?;
    for line in [
      "1. List clients",
      "2. List responsibles",
      "3. Add client",
      "4. Edit client",
      "5. Add responsible",
      "6. Assign clients to current week",
      "7. Show current week",
      "8. Show a specific week",
      "9. Record visit",
      "10. Client visit history",
      "11. Mark assignment done",
      "12. Weekly progress by responsible",
      "13. Week notes",
      "0. Exit",
    ] {
      writeln!(self.out, "{line}")?;
    }
    writeln!(self.out, "{RULE}")?;
    Ok(())
  }

  // ── Input helpers ─────────────────────────────────────────────────────────

  /// Print `label` and read one trimmed line.
  fn prompt(&mut self, label: &str) -> anyhow::Result<String> {
    write!(self.out, "{label}")?;
    self.out.flush()?;

    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Err(Abort::Eof.into());
    }
    Ok(line.trim().to_owned())
  }

  fn prompt_optional(&mut self, label: &str) -> anyhow::Result<Option<String>> {
    let raw = self.prompt(label)?;
    Ok((!raw.is_empty()).then_some(raw))
  }

  fn prompt_id(&mut self, label: &str) -> anyhow::Result<i64> {
    let raw = self.prompt(label)?;
    raw.parse().map_err(|_| invalid("Invalid ID."))
  }

  /// Read a date and normalise it to the Monday of its week. Blank means
  /// the current week.
  fn prompt_week(&mut self, label: &str) -> anyhow::Result<NaiveDate> {
    let raw = self.prompt(label)?;
    if raw.is_empty() {
      return Ok(week::current_week_start());
    }
    let date = week::parse_date(&raw)
      .map_err(|_| invalid("Invalid date format. Use YYYY-MM-DD."))?;
    Ok(week::week_start_of(date))
  }

  fn prompt_client(&mut self) -> anyhow::Result<Client> {
    self.show_clients()?;
    let id = self.prompt_id("\nClient ID: ")?;
    self
      .store
      .get_client(id)?
      .ok_or_else(|| Abort::NotFound("Client not found.".into()).into())
  }

  fn list_responsible_choices(&mut self) -> anyhow::Result<bool> {
    let staff = self.store.list_responsibles(true)?;
    if staff.is_empty() {
      return Ok(false);
    }
    writeln!(self.out, "\nAvailable responsibles:")?;
    for r in &staff {
      writeln!(self.out, "  {}. {}", r.id, r.name)?;
    }
    Ok(true)
  }

  fn list_day_choices(&mut self) -> anyhow::Result<()> {
    writeln!(self.out, "\nDays:")?;
    for day in ServiceDay::ALL {
      writeln!(self.out, "  {}. {day}", day.number())?;
    }
    Ok(())
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  fn show_clients(&mut self) -> anyhow::Result<()> {
    let clients = self.store.list_clients(true)?;
    if clients.is_empty() {
      writeln!(self.out, "\nNo clients registered.")?;
    } else {
      writeln!(self.out, "\n{}", render::clients(&clients))?;
    }
    Ok(())
  }

  fn show_responsibles(&mut self) -> anyhow::Result<()> {
    let staff = self.store.list_responsibles(true)?;
    if staff.is_empty() {
      writeln!(self.out, "\nNo responsibles registered.")?;
      return Ok(());
    }
    writeln!(self.out, "\n{}", render::responsibles(&staff))?;

    let raw = self.prompt("\nResponsible ID to list their clients (blank to go back): ")?;
    let Some(id) = parse_optional_id(&raw)? else {
      return Ok(());
    };
    let clients = self.store.list_clients_for_responsible(id, true)?;
    if clients.is_empty() {
      writeln!(self.out, "\nNo clients for that responsible.")?;
    } else {
      writeln!(self.out, "\n{}", render::clients(&clients))?;
    }
    Ok(())
  }

  fn add_client(&mut self) -> anyhow::Result<()> {
    writeln!(self.out, "\n--- Add client ---")?;
    let name = self.prompt("Name: ")?;
    if name.is_empty() {
      return Err(invalid("Name is required."));
    }
    let address = self.prompt_optional("Address (optional): ")?;
    let district = self.prompt_optional("District (optional): ")?;
    let phone = self.prompt_optional("Phone (optional): ")?;

    let responsible_id = if self.list_responsible_choices()? {
      let raw = self.prompt("\nResponsible ID (blank for none): ")?;
      parse_optional_id(&raw)?
    } else {
      None
    };

    self.list_day_choices()?;
    let raw = self.prompt("\nService day (1-7, blank for none): ")?;
    let service_day = parse_optional_day(&raw)?;

    let raw = self.prompt("Price per visit (blank for 0): ")?;
    let price_per_visit = if raw.is_empty() { 0.0 } else { parse_price(&raw)? };

    let id = self.store.add_client(NewClient {
      name,
      address,
      district,
      phone,
      responsible_id,
      service_day,
      price_per_visit,
    })?;
    writeln!(self.out, "\nClient added with ID {id}")?;
    Ok(())
  }

  fn edit_client(&mut self) -> anyhow::Result<()> {
    let client = self.prompt_client()?;
    writeln!(self.out, "\nEditing client: {}", client.name)?;
    writeln!(self.out, "(Enter keeps the current value, '-' clears it)\n")?;

    let mut patch = ClientPatch::default();

    let raw = self.prompt(&format!("Name [{}]: ", client.name))?;
    if !raw.is_empty() && raw != client.name {
      patch.name = Some(raw);
    }

    patch.address = self.edit_text("Address", client.address.as_deref())?;
    patch.district = self.edit_text("District", client.district.as_deref())?;
    patch.phone = self.edit_text("Phone", client.phone.as_deref())?;

    if self.list_responsible_choices()? {
      let current = client.responsible_id.map_or("none".into(), |id| id.to_string());
      let raw = self.prompt(&format!("\nResponsible ID [{current}]: "))?;
      let value = match Edit::parse(&raw) {
        Edit::Keep => None,
        Edit::Clear => Some(None),
        Edit::Set(s) => Some(parse_optional_id(s)?),
      };
      patch.responsible_id = value.filter(|v| *v != client.responsible_id);
    }

    self.list_day_choices()?;
    let current = client.service_day.map_or("none".into(), |d| d.to_string());
    let raw = self.prompt(&format!("\nService day [{current}]: "))?;
    let value = match Edit::parse(&raw) {
      Edit::Keep => None,
      Edit::Clear => Some(None),
      Edit::Set(s) => Some(parse_optional_day(s)?),
    };
    patch.service_day = value.filter(|v| *v != client.service_day);

    let raw = self.prompt(&format!(
      "Price per visit [{}]: ",
      render::price(client.price_per_visit)
    ))?;
    if !raw.is_empty() {
      let price = parse_price(&raw)?;
      if price != client.price_per_visit {
        patch.price_per_visit = Some(price);
      }
    }

    let current = if client.active { "y" } else { "n" };
    let raw = self.prompt(&format!("Active (y/n) [{current}]: "))?;
    if !raw.is_empty() {
      let active = parse_yes(&raw);
      if active != client.active {
        patch.active = Some(active);
      }
    }

    patch.notes = self.edit_text("Notes", client.notes.as_deref())?;

    if patch.is_empty() {
      writeln!(self.out, "\nNo changes made.")?;
    } else {
      self.store.update_client(client.id, patch)?;
      writeln!(self.out, "\nClient updated.")?;
    }
    Ok(())
  }

  /// Prompt for a nullable text field. Returns the patch slot.
  fn edit_text(
    &mut self,
    label: &str,
    current: Option<&str>,
  ) -> anyhow::Result<Option<Option<String>>> {
    let raw = self.prompt(&format!("{label} [{}]: ", current.unwrap_or("")))?;
    Ok(match Edit::parse(&raw) {
      Edit::Keep => None,
      Edit::Clear => current.is_some().then_some(None),
      Edit::Set(s) => (Some(s) != current).then(|| Some(s.to_owned())),
    })
  }

  fn add_responsible(&mut self) -> anyhow::Result<()> {
    writeln!(self.out, "\n--- Add responsible ---")?;
    let name = self.prompt("Name: ")?;
    if name.is_empty() {
      return Err(invalid("Name is required."));
    }
    let id = self.store.add_responsible(&name)?;
    writeln!(self.out, "\nResponsible saved with ID {id}")?;
    Ok(())
  }

  fn assign_current_week(&mut self) -> anyhow::Result<()> {
    writeln!(self.out, "\n--- Assign clients to current week ---")?;
    let raw = self.prompt("Assign every active client to the current week? (y/n): ")?;
    if !parse_yes(&raw) {
      return Ok(());
    }
    let week = week::current_week_start();
    let n = self.store.assign_clients_to_week(week, true)?;
    writeln!(self.out, "\n{n} clients assigned to the week of {week}")?;
    Ok(())
  }

  fn show_week(&mut self, week: NaiveDate) -> anyhow::Result<()> {
    let rows = self.store.list_week_assignments(week)?;
    if rows.is_empty() {
      writeln!(self.out, "\nNo assignments for the week of {week}")?;
      return Ok(());
    }

    writeln!(self.out, "\nAssignments for the week of {week}")?;
    for (label, group) in group_by_day(&rows) {
      writeln!(self.out, "\n{label}:")?;
      writeln!(self.out, "{}", render::assignments(group))?;
    }
    Ok(())
  }

  fn record_visit(&mut self) -> anyhow::Result<()> {
    writeln!(self.out, "\n--- Record visit ---")?;
    let client = self.prompt_client()?;

    let today = week::today();
    let raw = self.prompt(&format!("Visit date (YYYY-MM-DD) [today: {today}]: "))?;
    let visit_date = if raw.is_empty() {
      today
    } else {
      week::parse_date(&raw).map_err(|_| invalid("Invalid date format."))?
    };

    let id = self.store.record_visit(NewVisit {
      responsible_id: client.responsible_id,
      price: Some(client.price_per_visit),
      ..NewVisit::new(client.id, visit_date)
    })?;
    writeln!(self.out, "\nVisit recorded with ID {id}")?;
    Ok(())
  }

  fn client_history(&mut self) -> anyhow::Result<()> {
    self.show_clients()?;
    let id = self.prompt_id("\nClient ID: ")?;
    let visits = self.store.list_client_visits(id, self.history_limit)?;
    if visits.is_empty() {
      writeln!(self.out, "\nNo visits recorded for this client.")?;
      return Ok(());
    }
    writeln!(self.out, "\nVisit history (last {}):", self.history_limit)?;
    writeln!(self.out, "{}", render::visits(&visits))?;
    Ok(())
  }

  fn mark_done(&mut self) -> anyhow::Result<()> {
    let week = self.prompt_week("\nWeek (YYYY-MM-DD, blank for current): ")?;
    self.show_week(week)?;
    let rows = self.store.list_week_assignments(week)?;
    if rows.is_empty() {
      return Ok(());
    }

    let id = self.prompt_id("\nAssignment ID: ")?;
    if !rows.iter().any(|a| a.id == id) {
      return Err(Abort::NotFound("Assignment not found in that week.".into()).into());
    }
    let notes = self.prompt_optional("Notes (optional): ")?;

    self.store.update_assignment(id, AssignmentPatch {
      done: Some(true),
      notes: notes.map(Some),
      ..Default::default()
    })?;
    writeln!(self.out, "\nAssignment {id} marked as done.")?;
    Ok(())
  }

  fn show_notes(&mut self) -> anyhow::Result<()> {
    let week = self.prompt_week("\nWeek (YYYY-MM-DD, blank for current): ")?;
    let rows = self.store.list_week_notes(week)?;
    if rows.is_empty() {
      writeln!(self.out, "\nNo notes for the week of {week}")?;
    } else {
      writeln!(self.out, "\nNotes for the week of {week}")?;
      writeln!(self.out, "{}", render::notes(&rows))?;
    }
    Ok(())
  }

  fn show_progress(&mut self) -> anyhow::Result<()> {
    let week = self.prompt_week("\nWeek (YYYY-MM-DD, blank for current): ")?;
    let rows = self.store.week_progress(week)?;
    if rows.is_empty() {
      writeln!(self.out, "\nNo assignments for the week of {week}")?;
    } else {
      writeln!(self.out, "\nProgress for the week of {week}")?;
      writeln!(self.out, "{}", render::progress(&rows))?;
    }
    Ok(())
  }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

fn is_eof(e: &anyhow::Error) -> bool { matches!(e.downcast_ref::<Abort>(), Some(Abort::Eof)) }

fn parse_yes(raw: &str) -> bool { matches!(raw.to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí") }

fn parse_optional_id(raw: &str) -> anyhow::Result<Option<i64>> {
  if raw.is_empty() {
    return Ok(None);
  }
  raw.parse().map(Some).map_err(|_| invalid("Invalid ID."))
}

/// Accepts a menu number (1-7) or a day name.
fn parse_optional_day(raw: &str) -> anyhow::Result<Option<ServiceDay>> {
  if raw.is_empty() {
    return Ok(None);
  }
  if let Ok(n) = raw.parse::<u32>() {
    return ServiceDay::from_number(n)
      .map(Some)
      .ok_or_else(|| invalid("Service day must be between 1 and 7."));
  }
  raw.parse().map(Some).map_err(|_| invalid("Unknown service day."))
}

fn parse_price(raw: &str) -> anyhow::Result<f64> {
  match raw.parse::<f64>() {
    Ok(p) if p.is_finite() && p >= 0.0 => Ok(p),
    _ => Err(invalid("Price must be a non-negative number.")),
  }
}

/// Group a week's assignments by day in calendar order; unscheduled last.
fn group_by_day(rows: &[WeeklyAssignment]) -> Vec<(String, Vec<&WeeklyAssignment>)> {
  let mut groups: Vec<(Option<ServiceDay>, Vec<&WeeklyAssignment>)> = Vec::new();
  for row in rows {
    match groups.iter_mut().find(|(day, _)| *day == row.service_day) {
      Some((_, members)) => members.push(row),
      None => groups.push((row.service_day, vec![row])),
    }
  }
  groups.sort_by_key(|(day, _)| day.map_or(u32::MAX, ServiceDay::number));

  groups
    .into_iter()
    .map(|(day, members)| {
      let label = day.map_or_else(|| "No day assigned".to_owned(), |d| d.to_string());
      (label, members)
    })
    .collect()
}
