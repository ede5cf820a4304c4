//! Runtime configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! `POOLCARE_*` environment variables, then command-line flags (applied by
//! `main`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file; created on first use.
  #[serde(default = "default_db_path")]
  pub db_path:       PathBuf,
  /// Number of visits shown by the shell's history view.
  #[serde(default = "default_history_limit")]
  pub history_limit: usize,
}

fn default_db_path() -> PathBuf { PathBuf::from("piscinas.db") }

fn default_history_limit() -> usize { 20 }

impl Default for Settings {
  fn default() -> Self {
    Self { db_path: default_db_path(), history_limit: default_history_limit() }
  }
}

impl Settings {
  /// Load settings from `file` (if it exists) and the environment.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("POOLCARE").try_parsing(true))
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?
      .try_deserialize()
      .context("failed to deserialise settings")
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.history_limit, Settings::default().history_limit);
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("poolcare.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "db_path = \"/var/lib/poolcare/pool.db\"").unwrap();
    writeln!(f, "history_limit = 5").unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.db_path, PathBuf::from("/var/lib/poolcare/pool.db"));
    assert_eq!(settings.history_limit, 5);
  }
}
