use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub card_bg: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub static THEMES: [Theme; 3] = [
  Theme {
    name: "marquee",
    bg: Color::Rgb(20, 20, 28),
    fg: Color::Rgb(230, 228, 220),
    accent: Color::Rgb(245, 197, 24),
    muted: Color::Rgb(128, 126, 140),
    border: Color::Rgb(70, 70, 86),
    highlight_fg: Color::Rgb(20, 20, 28),
    highlight_bg: Color::Rgb(245, 197, 24),
    card_bg: Color::Rgb(30, 30, 40),
    status: Color::Rgb(120, 190, 250),
    error: Color::Rgb(240, 96, 96),
    key_fg: Color::Rgb(20, 20, 28),
    key_bg: Color::Rgb(128, 126, 140),
  },
  Theme {
    name: "noir",
    bg: Color::Rgb(12, 12, 12),
    fg: Color::Rgb(220, 220, 220),
    accent: Color::Rgb(255, 255, 255),
    muted: Color::Rgb(110, 110, 110),
    border: Color::Rgb(60, 60, 60),
    highlight_fg: Color::Rgb(12, 12, 12),
    highlight_bg: Color::Rgb(220, 220, 220),
    card_bg: Color::Rgb(24, 24, 24),
    status: Color::Rgb(180, 180, 180),
    error: Color::Rgb(255, 110, 110),
    key_fg: Color::Rgb(12, 12, 12),
    key_bg: Color::Rgb(110, 110, 110),
  },
  Theme {
    name: "matinee",
    bg: Color::Rgb(250, 246, 238),
    fg: Color::Rgb(40, 36, 32),
    accent: Color::Rgb(176, 42, 48),
    muted: Color::Rgb(140, 130, 120),
    border: Color::Rgb(200, 190, 176),
    highlight_fg: Color::Rgb(250, 246, 238),
    highlight_bg: Color::Rgb(176, 42, 48),
    card_bg: Color::Rgb(242, 236, 224),
    status: Color::Rgb(40, 100, 160),
    error: Color::Rgb(190, 30, 30),
    key_fg: Color::Rgb(250, 246, 238),
    key_bg: Color::Rgb(140, 130, 120),
  },
];

/// Index of the theme called `name`, falling back to the first theme.
pub fn theme_index(name: Option<&str>) -> usize {
  name.and_then(|n| THEMES.iter().position(|t| t.name == n)).unwrap_or(0)
}
