use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode, CardStep};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  match app.mode {
    AppMode::Input => handle_input_key(app, key),
    AppMode::Results => handle_results_key(app, key),
    AppMode::Detail => handle_detail_key(app, key),
  }
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
  let query = &mut app.state.query;
  match key.code {
    KeyCode::Enter => {
      app.trigger_search();
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(query, app.cursor_position);
      query.insert(byte_idx, c);
      app.cursor_position += 1;
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(query, app.cursor_position);
        query.remove(byte_idx);
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < query.chars().count() {
        let byte_idx = char_to_byte_index(query, app.cursor_position);
        query.remove(byte_idx);
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < query.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = query.chars().count();
    }
    KeyCode::Esc => {
      if !query.is_empty() {
        query.clear();
        app.cursor_position = 0;
        app.input_scroll = 0;
      } else if !app.state.loading && !focus_main(app) {
        app.should_quit = true;
      }
    }
    KeyCode::Down | KeyCode::Tab => {
      focus_main(app);
    }
    _ => {}
  }
}

/// Hand focus to the result grid or detail panel if either is on screen.
fn focus_main(app: &mut App) -> bool {
  if app.state.loading {
    return false;
  }
  if app.state.selected.is_some() {
    app.mode = AppMode::Detail;
    true
  } else if !app.state.results.is_empty() {
    app.mode = AppMode::Results;
    true
  } else {
    false
  }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.trigger_lookup();
    }
    KeyCode::Left | KeyCode::Char('h') => app.move_card(CardStep::Left),
    KeyCode::Right | KeyCode::Char('l') => app.move_card(CardStep::Right),
    KeyCode::Down | KeyCode::Char('j') => app.move_card(CardStep::Down),
    KeyCode::Up | KeyCode::Char('k') => app.move_card(CardStep::Up),
    KeyCode::Home | KeyCode::Char('g') => app.move_card(CardStep::First),
    KeyCode::End | KeyCode::Char('G') => app.move_card(CardStep::Last),
    KeyCode::Esc | KeyCode::Tab | KeyCode::Char('/') => {
      app.mode = AppMode::Input;
    }
    _ => {}
  }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
  match key.code {
    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => {
      app.close_detail();
    }
    KeyCode::Tab | KeyCode::Char('/') => {
      app.mode = AppMode::Input;
    }
    _ => {}
  }
}
