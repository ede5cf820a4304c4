//! One-shot importer that seeds the store from the client spreadsheet,
//! exported as CSV.
//!
//! Responsibles are created first (deduplicated by name), then every row with
//! a client name becomes a client. Blank cells become nulls, or 0 for the
//! price.

use std::{
  collections::{BTreeMap, BTreeSet},
  fs::File,
  io::Read,
  path::Path,
};

use anyhow::{Context as _, bail};
use csv::{ReaderBuilder, Trim};
use poolcare_core::{client::NewClient, day::ServiceDay, store::PoolStore};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// The one column a sheet must have.
const NAME_COLUMN: &str = "Nombre cliente";

/// One spreadsheet row. Column names are those of the operator's workbook.
#[derive(Debug, Default, Deserialize)]
struct SheetRow {
  #[serde(rename = "Nombre cliente", default)]
  name:        Option<String>,
  #[serde(rename = "Dirección", default)]
  address:     Option<String>,
  #[serde(rename = "Comuna", default)]
  district:    Option<String>,
  #[serde(rename = "Celular", default)]
  phone:       Option<String>,
  #[serde(rename = "Responsable", default)]
  responsible: Option<String>,
  #[serde(rename = "día de atención", default)]
  service_day: Option<String>,
  #[serde(rename = "precio", default)]
  price:       Option<String>,
}

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
  /// Distinct responsible names found (new or already present).
  pub responsibles: usize,
  pub clients:      usize,
  /// Rows without a client name or that failed to insert.
  pub skipped:      usize,
}

/// Import the CSV file at `path`.
pub fn import_file<S: PoolStore>(store: &S, path: &Path) -> anyhow::Result<ImportReport> {
  let file =
    File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
  info!(path = %path.display(), "importing clients");
  import_reader(store, file)
}

/// Import CSV data from any reader. Both `,` and `;` separated exports are
/// accepted; the header row decides which.
pub fn import_reader<S: PoolStore, R: Read>(
  store: &S,
  mut reader: R,
) -> anyhow::Result<ImportReport> {
  let mut data = String::new();
  reader.read_to_string(&mut data).context("failed to read CSV input")?;

  let delimiter = sniff_delimiter(data.lines().next().unwrap_or_default());
  debug!(delimiter = %char::from(delimiter), "csv delimiter");

  let mut csv = ReaderBuilder::new()
    .delimiter(delimiter)
    .trim(Trim::All)
    .flexible(true)
    .from_reader(data.as_bytes());

  let headers = csv.headers().context("malformed CSV header")?;
  if !headers.iter().any(|h| h == NAME_COLUMN) {
    let found: Vec<_> = headers.iter().collect();
    bail!("no {NAME_COLUMN:?} column in the header row (found: {})", found.join(" | "));
  }

  let rows = csv
    .deserialize::<SheetRow>()
    .collect::<Result<Vec<_>, _>>()
    .context("malformed CSV input")?;

  // Pass 1: responsibles.
  let names: BTreeSet<String> = rows
    .iter()
    .filter_map(|r| non_blank(r.responsible.as_deref()))
    .filter(|n| n != "Responsable")
    .collect();
  info!(count = names.len(), "responsibles found");

  let mut responsible_ids = BTreeMap::new();
  for name in names {
    let id = store.add_responsible(&name)?;
    responsible_ids.insert(name, id);
  }

  // Pass 2: clients.
  let mut report = ImportReport { responsibles: responsible_ids.len(), ..Default::default() };
  for row in rows {
    let Some(name) = non_blank(row.name.as_deref()).filter(|n| n != NAME_COLUMN)
    else {
      report.skipped += 1;
      continue;
    };

    let responsible_id = non_blank(row.responsible.as_deref())
      .and_then(|r| responsible_ids.get(&r).copied());

    let service_day = non_blank(row.service_day.as_deref()).and_then(|raw| {
      raw
        .parse::<ServiceDay>()
        .inspect_err(|_| warn!(client = %name, day = %raw, "unrecognised service day, left blank"))
        .ok()
    });

    let input = NewClient {
      address: non_blank(row.address.as_deref()),
      district: non_blank(row.district.as_deref()),
      phone: non_blank(row.phone.as_deref()),
      responsible_id,
      service_day,
      price_per_visit: row.price.as_deref().map(parse_price).unwrap_or(0.0),
      name,
    };

    let client_name = input.name.clone();
    match store.add_client(input) {
      Ok(_) => {
        report.clients += 1;
        if report.clients % 50 == 0 {
          info!(imported = report.clients, "import progress");
        }
      }
      Err(e) => {
        warn!(client = %client_name, error = %e, "failed to import client, skipped");
        report.skipped += 1;
      }
    }
  }

  info!(
    responsibles = report.responsibles,
    clients = report.clients,
    skipped = report.skipped,
    "import finished"
  );
  Ok(report)
}

/// `;` when the header has more semicolons than commas, as in exports from
/// a Spanish-locale spreadsheet; `,` otherwise.
fn sniff_delimiter(header: &str) -> u8 {
  if header.matches(';').count() > header.matches(',').count() { b';' } else { b',' }
}

fn non_blank(s: Option<&str>) -> Option<String> {
  s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
}

/// Parse a spreadsheet price such as `15000`, `$15,000` or `12500.5`.
/// Anything unparseable or negative counts as 0.
fn parse_price(raw: &str) -> f64 {
  let cleaned: String = raw
    .chars()
    .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
    .collect();
  if cleaned.is_empty() {
    return 0.0;
  }
  match cleaned.parse::<f64>() {
    Ok(p) if p.is_finite() && p >= 0.0 => p,
    _ => {
      warn!(price = %raw, "unparseable price, using 0");
      0.0
    }
  }
}
