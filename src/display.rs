use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliDisplayMode {
  Auto,
  Direct,
  Ascii,
  None,
}

/// How the detail panel draws the poster image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
  /// Posters are not fetched at all.
  Off,
  Ascii,
  /// True-colour half-block cells.
  Direct,
}

impl DisplayMode {
  pub fn label(self) -> &'static str {
    match self {
      DisplayMode::Off => "off",
      DisplayMode::Ascii => "ascii",
      DisplayMode::Direct => "half-block",
    }
  }

  pub fn shows_posters(self) -> bool {
    self != DisplayMode::Off
  }
}

/// Pick half-block rendering when the terminal advertises 24-bit colour.
pub fn detect_display_mode(colorterm: Option<&str>) -> DisplayMode {
  match colorterm.map(str::to_lowercase).as_deref() {
    Some("truecolor" | "24bit") => DisplayMode::Direct,
    _ => DisplayMode::Ascii,
  }
}

pub fn resolve_display_mode(cli: CliDisplayMode) -> DisplayMode {
  match cli {
    CliDisplayMode::Auto => detect_display_mode(std::env::var("COLORTERM").ok().as_deref()),
    CliDisplayMode::Direct => DisplayMode::Direct,
    CliDisplayMode::Ascii => DisplayMode::Ascii,
    CliDisplayMode::None => DisplayMode::Off,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truecolor_terminals_get_half_blocks() {
    assert_eq!(detect_display_mode(Some("truecolor")), DisplayMode::Direct);
    assert_eq!(detect_display_mode(Some("24BIT")), DisplayMode::Direct);
  }

  #[test]
  fn everything_else_gets_ascii() {
    assert_eq!(detect_display_mode(None), DisplayMode::Ascii);
    assert_eq!(detect_display_mode(Some("")), DisplayMode::Ascii);
  }

  #[test]
  fn none_disables_posters() {
    assert!(!resolve_display_mode(CliDisplayMode::None).shows_posters());
    assert!(resolve_display_mode(CliDisplayMode::Ascii).shows_posters());
  }
}
