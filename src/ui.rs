use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, Padding, Paragraph, Wrap},
};

use crate::app::{App, AppMode};
use crate::constants::constants;
use crate::graphics::{PosterWidget, fit_poster};
use crate::omdb::{MovieDetails, MovieSummary, PosterSize, poster_url};
use crate::state::View;
use crate::theme::Theme;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

/// The rightmost `width` columns of `area`, clipped to the area.
fn right_aligned(area: Rect, width: usize) -> Rect {
  let width = u16::try_from(width).unwrap_or(u16::MAX).min(area.width);
  Rect { x: area.x + area.width - width, width, ..area }
}

fn rounded(theme: &Theme) -> Block<'static> {
  Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(theme.border))
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, input_area, status_area, main_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  render_input(frame, app, input_area);
  render_status(frame, app, status_area);
  match app.state.view() {
    View::Loading => render_loading(frame, theme, main_area),
    View::Detail => render_detail(frame, app, main_area),
    View::Results => render_results(frame, app, main_area),
    View::Idle => render_welcome(frame, theme, main_area),
  }
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(vec![
    Span::styled(" ▶ mdb ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled(" Movie Database", Style::default().fg(theme.muted)),
  ]);
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area = right_aligned(area, version.len());
  frame.render_widget(right, right_area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let border_color = if app.mode == AppMode::Input { theme.accent } else { theme.border };
  let input_block = Block::bordered()
    .title(" Search for movies ")
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let query = &app.state.query;
  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(query, app.cursor_position);

  // Too narrow for any text; leave the scroll where it was.
  if inner_w > 0 {
    if cursor_col < app.input_scroll {
      app.input_scroll = cursor_col;
    } else if cursor_col >= app.input_scroll + inner_w {
      app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
    }
  }

  let visible: String = query
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if app.mode == AppMode::Input && inner_w > 0 {
    let cursor_x = area.x + 2 + cursor_col.saturating_sub(app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if app.state.loading {
    (" ⏳ Loading...".to_string(), Style::default().fg(theme.status))
  } else if let Some(err) = &app.state.error_message {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if !app.state.results.is_empty() {
    let count = app.state.results.len();
    (format!(" {} result{}", count, if count == 1 { "" } else { "s" }), Style::default().fg(theme.muted))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_welcome(frame: &mut Frame, theme: &Theme, area: Rect) {
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("▶  Movie Database", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Search OMDb by title. Pick a card for the full record.", Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(Span::styled("Type a title above and press Enter.", Style::default().fg(theme.muted))),
  ];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(rounded(theme));
  frame.render_widget(paragraph, area);
}

fn render_loading(frame: &mut Frame, theme: &Theme, area: Rect) {
  let text = vec![Line::from(""), Line::from(Span::styled("Loading...", Style::default().fg(theme.status)))];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(rounded(theme));
  frame.render_widget(paragraph, area);
}

// --- Result grid ---

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let focused = app.mode == AppMode::Results;
  let block = rounded(theme)
    .title(" Results ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));
  let inner = block.inner(area);
  frame.render_widget(block, area);
  if inner.is_empty() {
    return;
  }

  let c = constants();
  let cols = usize::from((inner.width / c.card_width.max(1)).max(1));
  let card_h = c.card_height.min(inner.height).max(1);
  let visible_rows = usize::from((inner.height / card_h).max(1));
  let card_w = inner.width / cols as u16;
  app.grid_columns = cols;

  // Keep the highlighted card's row on screen.
  let row = app.selected_card / cols;
  if row < app.grid_scroll {
    app.grid_scroll = row;
  } else if row >= app.grid_scroll + visible_rows {
    app.grid_scroll = row + 1 - visible_rows;
  }

  let first = app.grid_scroll * cols;
  for (i, movie) in app.state.results.iter().enumerate().skip(first).take(visible_rows * cols) {
    let rel = i - first;
    let card_area = Rect {
      x: inner.x + (rel % cols) as u16 * card_w,
      y: inner.y + (rel / cols) as u16 * card_h,
      width: card_w,
      height: card_h,
    };
    render_card(frame, theme, movie, i == app.selected_card, focused, card_area);
  }
}

fn render_card(frame: &mut Frame, theme: &Theme, movie: &MovieSummary, selected: bool, focused: bool, area: Rect) {
  let border = if selected && focused {
    theme.accent
  } else if selected {
    theme.muted
  } else {
    theme.border
  };
  let block = Block::bordered()
    .border_type(if selected { BorderType::Thick } else { BorderType::Rounded })
    .border_style(Style::default().fg(border))
    .style(Style::default().bg(theme.card_bg))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let title_style = if selected && focused {
    Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)
  };
  let poster = poster_url(&movie.poster, PosterSize::Card);

  let lines = vec![
    Line::from(Span::styled(truncate_str(&movie.title, inner_w), title_style)),
    Line::from(vec![
      Span::styled("Year: ", Style::default().fg(theme.muted)),
      Span::styled(movie.year.as_str(), Style::default().fg(theme.fg)),
    ]),
    Line::from(Span::styled(
      truncate_str(poster, inner_w),
      Style::default().fg(theme.muted).add_modifier(Modifier::UNDERLINED),
    )),
  ];
  frame.render_widget(Paragraph::new(lines).block(block), area);
}

// --- Detail panel ---

fn render_detail(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let info_area = if app.display_mode.shows_posters() {
    let [poster_area, info_area] =
      Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).areas(area);
    render_poster(frame, app, poster_area);
    info_area
  } else {
    area
  };

  let Some(movie) = app.state.selected.as_ref() else { return };
  let title = Line::from(vec![
    Span::styled(format!(" {} ", movie.title), Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled(format!("{} ", movie.year), Style::default().fg(theme.muted)),
  ]);
  let block = rounded(theme).title(title).padding(Padding::new(2, 2, 1, 1));
  let paragraph = Paragraph::new(detail_lines(theme, movie)).wrap(Wrap { trim: true }).block(block);
  frame.render_widget(paragraph, info_area);
}

fn detail_lines<'a>(theme: &Theme, movie: &'a MovieDetails) -> Vec<Line<'a>> {
  let field = |label: &'static str, value: &'a str| {
    Line::from(vec![
      Span::styled(label, Style::default().fg(theme.muted).add_modifier(Modifier::BOLD)),
      Span::styled(value, Style::default().fg(theme.fg)),
    ])
  };
  vec![
    field("Plot: ", movie.plot.as_str()),
    Line::from(""),
    field("Director: ", movie.director.as_str()),
    field("Actors: ", movie.actors.as_str()),
    field("Genre: ", movie.genre.as_str()),
    field("IMDB Rating: ", movie.imdb_rating.as_str()),
    field("Released: ", movie.released.as_str()),
    Line::from(""),
    field("Poster: ", poster_url(&movie.poster, PosterSize::Detail)),
  ]
}

fn render_poster(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let block = rounded(theme);
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let Some((ref imdb_id, ref image)) = app.poster.image else {
    let text = Paragraph::new(Span::styled("loading poster…", Style::default().fg(theme.muted)))
      .alignment(Alignment::Center);
    frame.render_widget(text, Rect { y: inner.y + inner.height / 2, height: 1.min(inner.height), ..inner });
    return;
  };

  let needs_resize = match &app.poster.resized {
    Some((id, w, h, _)) => id != imdb_id || *w != inner.width || *h != inner.height,
    None => true,
  };
  if needs_resize {
    let resized = fit_poster(image, inner, app.display_mode);
    app.poster.resized = Some((imdb_id.clone(), inner.width, inner.height, resized));
  }

  if let Some((_, _, _, ref resized)) = app.poster.resized {
    frame.render_widget(PosterWidget { image: resized, display_mode: app.display_mode }, inner);
  }
}

// --- Footer ---

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Input => {
      let mut k = vec![("Enter", "Search"), ("^t", "Theme")];
      let state = &app.state;
      // Mirrors handle_input_key: Esc clears first, then hands focus over, then quits.
      let esc = if !state.query.is_empty() {
        Some("Clear")
      } else if state.loading {
        None
      } else if state.selected.is_some() {
        Some("Details")
      } else if !state.results.is_empty() {
        Some("Results")
      } else {
        Some("Quit")
      };
      if !state.loading && state.selected.is_some() {
        k.push(("Tab", "Details"));
      } else if !state.loading && !state.results.is_empty() {
        k.push(("Tab", "Results"));
      }
      if let Some(action) = esc {
        k.push(("Esc", action));
      }
      k
    }
    AppMode::Results => vec![("Enter", "Details"), ("←↓↑→", "Move"), ("/", "Search"), ("^t", "Theme"), ("^c", "Quit")],
    AppMode::Detail => vec![("Esc", "Back"), ("/", "Search"), ("^t", "Theme"), ("^c", "Quit")],
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area = right_aligned(area, theme_label.len());
  frame.render_widget(right, right_area);
}
