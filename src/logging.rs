//! File logging.
//!
//! The TUI owns the terminal, so everything goes to a log file instead of
//! stdout/stderr. The filter comes from `MDB_LOG` (EnvFilter syntax) and
//! defaults to `mdb=info`.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILTER_ENV: &str = "MDB_LOG";
const DEFAULT_FILTER: &str = "mdb=info";

/// `<data_local_dir>/mdb/mdb.log`, or `mdb.log` in the temp dir when no home is known.
pub fn default_log_path() -> PathBuf {
  ProjectDirs::from("", "", "mdb")
    .map(|dirs| dirs.data_local_dir().join("mdb.log"))
    .unwrap_or_else(|| std::env::temp_dir().join("mdb.log"))
}

fn split_log_path(path: &Path) -> (PathBuf, String) {
  let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).map_or_else(|| PathBuf::from("."), Path::to_path_buf);
  let file = path.file_name().map_or_else(|| "mdb.log".to_string(), |f| f.to_string_lossy().into_owned());
  (dir, file)
}

/// Install the global subscriber. Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_logging(path: &Path) -> Result<WorkerGuard> {
  let (dir, file) = split_log_path(path);
  std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;

  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, &file));
  let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
    .try_init()
    .context("Failed to install tracing subscriber")?;

  Ok(guard)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn split_keeps_directory_and_file() {
    let (dir, file) = split_log_path(Path::new("/var/log/mdb/run.log"));
    assert_eq!(dir, PathBuf::from("/var/log/mdb"));
    assert_eq!(file, "run.log");
  }

  #[test]
  fn bare_file_name_logs_to_current_dir() {
    let (dir, file) = split_log_path(Path::new("mdb.log"));
    assert_eq!(dir, PathBuf::from("."));
    assert_eq!(file, "mdb.log");
  }

  #[test]
  fn default_path_ends_in_log_file() {
    assert!(default_log_path().ends_with("mdb.log"));
  }
}
