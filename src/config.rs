use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

fn default_tick_rate_ms() -> u64 {
  250
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Path to the observation database (defaults to the XDG data dir)
  pub database: Option<PathBuf>,
  /// Custom title for the header (defaults to the database file name)
  pub title: Option<String>,
  /// UI tick rate in milliseconds
  #[serde(default = "default_tick_rate_ms")]
  pub tick_rate_ms: u64,
  /// Report memos to hide from the report choice (case-insensitive)
  #[serde(default, deserialize_with = "deserialize_lowercase_set")]
  pub hide_reports: BTreeSet<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database: None,
      title: None,
      tick_rate_ms: default_tick_rate_ms(),
      hide_reports: BTreeSet::new(),
    }
  }
}

fn deserialize_lowercase_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  let v: Vec<String> = Vec::deserialize(deserializer)?;
  Ok(v.into_iter().map(|s| s.to_lowercase()).collect())
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./osserva.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/osserva/config.yaml
  ///
  /// With no config file anywhere, every setting takes its default;
  /// the tool works out of the box against the default database path.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("osserva.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("osserva").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.database, None);
    assert_eq!(config.tick_rate_ms, 250);
    assert!(config.hide_reports.is_empty());
  }

  #[test]
  fn test_parse_full_config() {
    let yaml = "database: /tmp/obs.db\ntitle: regional\ntick_rate_ms: 100\nhide_reports:\n  - Generic\n  - TEMP\n";
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.database, Some(PathBuf::from("/tmp/obs.db")));
    assert_eq!(config.title.as_deref(), Some("regional"));
    assert_eq!(config.tick_rate_ms, 100);
    assert!(config.hide_reports.contains("generic"));
    assert!(config.hide_reports.contains("temp"));
  }

  #[test]
  fn test_parse_empty_config() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.tick_rate_ms, 250);
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let result = Config::load(Some(Path::new("/nonexistent/osserva.yaml")));
    assert!(result.is_err());
  }
}
