use anyhow::{Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::constants::constants;

/// User preferences stored in `prefs.toml`.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub api_key: Option<String>,
  pub base_url: Option<String>,
  pub theme_name: Option<String>,
}

impl Config {
  pub fn path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mdb").map(|dirs| dirs.config_dir().join("prefs.toml"))
  }

  pub fn load() -> Self {
    Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
  }

  /// Read preferences from `path`; a missing or malformed file yields the defaults.
  pub fn load_from(path: &Path) -> Self {
    if let Ok(content) = std::fs::read_to_string(path)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }
    Self::default()
  }

  pub fn save_to(&self, path: &Path) {
    if let Some(dir) = path.parent()
      && let Err(e) = std::fs::create_dir_all(dir)
    {
      warn!(err = %e, path = %dir.display(), "config: failed to create config dir");
      return;
    }
    match toml::to_string(self) {
      Ok(content) => {
        if let Err(e) = std::fs::write(path, content) {
          warn!(err = %e, path = %path.display(), "config: failed to write preferences");
        }
      }
      Err(e) => warn!(err = %e, "config: failed to serialize preferences"),
    }
  }

  /// CLI/env value first, then `prefs.toml`. Blank keys count as missing.
  pub fn resolve_api_key(&self, cli: Option<&str>) -> Result<String> {
    cli
      .or(self.api_key.as_deref())
      .map(str::trim)
      .filter(|k| !k.is_empty())
      .map(str::to_string)
      .ok_or_else(|| {
        let location = Self::path().map_or_else(|| "prefs.toml".to_string(), |p| p.display().to_string());
        anyhow!("No OMDb API key configured. Pass --api-key, set OMDB_API_KEY, or add `api_key = \"...\"` to {}", location)
      })
  }

  pub fn resolve_base_url(&self, cli: Option<&str>) -> String {
    cli
      .or(self.base_url.as_deref())
      .filter(|u| !u.trim().is_empty())
      .map_or_else(|| constants().default_base_url.clone(), str::to_string)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.toml");
    let config = Config {
      api_key: Some("abc123".to_string()),
      base_url: None,
      theme_name: Some("noir".to_string()),
    };
    config.save_to(&path);
    assert_eq!(Config::load_from(&path), config);
  }

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(Config::load_from(&dir.path().join("absent.toml")), Config::default());
  }

  #[test]
  fn malformed_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.toml");
    std::fs::write(&path, "api_key = [not toml").unwrap();
    assert_eq!(Config::load_from(&path), Config::default());
  }

  #[test]
  fn cli_key_wins_over_file() {
    let config = Config { api_key: Some("from-file".to_string()), ..Default::default() };
    assert_eq!(config.resolve_api_key(Some("from-cli")).unwrap(), "from-cli");
    assert_eq!(config.resolve_api_key(None).unwrap(), "from-file");
  }

  #[test]
  fn blank_or_missing_key_is_an_error() {
    assert!(Config::default().resolve_api_key(None).is_err());
    assert!(Config::default().resolve_api_key(Some("  ")).is_err());
  }

  #[test]
  fn base_url_falls_back_to_default() {
    let config = Config::default();
    assert_eq!(config.resolve_base_url(None), constants().default_base_url);
    let config = Config { base_url: Some("http://localhost:9000/".to_string()), ..Default::default() };
    assert_eq!(config.resolve_base_url(None), "http://localhost:9000/");
    assert_eq!(config.resolve_base_url(Some("http://cli/")), "http://cli/");
  }
}
