//! `poolcare` — menu-driven tracker for pool-maintenance clients, staff,
//! weekly assignments and visits.
//!
//! # Usage
//!
//! ```text
//! poolcare                          # interactive menu
//! poolcare --db ./data/piscinas.db  # use another database file
//! poolcare import clientes.csv      # seed the store from a spreadsheet export
//! ```

mod import;
mod render;
mod settings;
mod shell;

use std::{io, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use poolcare_store_sqlite::SqliteStore;
use settings::Settings;
use shell::Shell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "poolcare", version, about = "Pool maintenance client tracker")]
struct Cli {
  /// Path to the TOML configuration file (optional).
  #[arg(short, long, value_name = "FILE", default_value = "poolcare.toml")]
  config: PathBuf,

  /// SQLite database file; overrides the configured `db_path`.
  #[arg(long, value_name = "PATH")]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Interactive menu (the default).
  Shell,
  /// Import clients and responsibles from a CSV export of the spreadsheet.
  Import {
    /// CSV file with a header row.
    file: PathBuf,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let command = cli.command.unwrap_or(Command::Shell);

  // Keep the menu readable unless RUST_LOG asks for more.
  let default_level = match command {
    Command::Shell => LevelFilter::WARN,
    Command::Import { .. } => LevelFilter::INFO,
  };
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(db) = cli.db {
    settings.db_path = db;
  }

  let store = SqliteStore::open(&settings.db_path)
    .with_context(|| format!("failed to open store at {}", settings.db_path.display()))?;

  match command {
    Command::Shell => {
      let stdin = io::stdin();
      Shell::new(&store, stdin.lock(), io::stdout(), settings.history_limit).run()?;
    }
    Command::Import { file } => {
      let report = import::import_file(&store, &file)?;
      println!("Import finished:");
      println!("  - responsibles: {}", report.responsibles);
      println!("  - clients imported: {}", report.clients);
      println!("  - rows skipped: {}", report.skipped);
    }
  }

  Ok(())
}
