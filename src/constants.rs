//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, so no runtime file I/O happens.
//! Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  /// OMDb endpoint used when neither the CLI nor `prefs.toml` names one.
  pub default_base_url: String,

  // Poster placeholders
  pub card_placeholder_poster: String,
  pub detail_placeholder_poster: String,

  // Result grid
  pub card_width: u16,
  pub card_height: u16,

  // Event loop
  pub poll_interval_ms: u64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed the first test run catches it.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert!(c.default_base_url.starts_with("https://"));
    assert!(c.card_width > 0 && c.card_height > 0);
    assert_ne!(c.card_placeholder_poster, "N/A");
    assert_ne!(c.detail_placeholder_poster, "N/A");
  }
}
