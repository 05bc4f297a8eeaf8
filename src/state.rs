//! UI state and the controller transitions that drive it.
//!
//! Every transition is a plain function over [`UiState`]; the network calls
//! themselves are issued by `App`, which hands the results back here. A
//! `begin_*` call returns the [`Request`] to issue (or `None` when nothing
//! should go out) and the matching `finish_*` call applies its result.

use anyhow::Result;

use crate::omdb::{ApiOutcome, MovieDetails, MovieSummary};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a movie name.";
pub const SEARCH_FAILED_MESSAGE: &str = "An error occurred while fetching movies.";
pub const LOOKUP_FAILED_MESSAGE: &str = "An error occurred while fetching movie details.";

/// A remote call the controller wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
  Search { query: String },
  Lookup { imdb_id: String },
}

/// Which part of the main area is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Idle,
  Loading,
  Results,
  Detail,
}

#[derive(Debug, Default)]
pub struct UiState {
  pub query: String,
  pub results: Vec<MovieSummary>,
  pub selected: Option<MovieDetails>,
  pub loading: bool,
  pub error_message: Option<String>,
}

impl UiState {
  /// Start a title search for the current query.
  pub fn begin_search(&mut self) -> Option<Request> {
    let query = self.query.trim();
    if query.is_empty() {
      self.error_message = Some(EMPTY_QUERY_MESSAGE.to_string());
      return None;
    }
    let query = query.to_string();
    self.loading = true;
    self.error_message = None;
    self.selected = None;
    Some(Request::Search { query })
  }

  pub fn finish_search(&mut self, result: Result<ApiOutcome<Vec<MovieSummary>>>) {
    match result {
      Ok(ApiOutcome::Found(movies)) => {
        self.results = movies;
      }
      Ok(ApiOutcome::Rejected(message)) => {
        self.error_message = Some(message);
        self.results.clear();
      }
      Err(_) => {
        self.error_message = Some(SEARCH_FAILED_MESSAGE.to_string());
      }
    }
    self.loading = false;
  }

  /// Start a lookup of one search hit.
  pub fn begin_lookup(&mut self, imdb_id: &str) -> Request {
    self.loading = true;
    self.error_message = None;
    Request::Lookup { imdb_id: imdb_id.to_string() }
  }

  pub fn finish_lookup(&mut self, result: Result<ApiOutcome<MovieDetails>>) {
    match result {
      Ok(ApiOutcome::Found(movie)) => {
        self.selected = Some(movie);
      }
      Ok(ApiOutcome::Rejected(message)) => {
        self.error_message = Some(message);
      }
      Err(_) => {
        self.error_message = Some(LOOKUP_FAILED_MESSAGE.to_string());
      }
    }
    self.loading = false;
  }

  /// Drop the selected record so the result list shows again.
  pub fn close_detail(&mut self) {
    self.selected = None;
  }

  /// Loading hides everything; a selected record hides the list.
  pub fn view(&self) -> View {
    if self.loading {
      View::Loading
    } else if self.selected.is_some() {
      View::Detail
    } else if !self.results.is_empty() {
      View::Results
    } else {
      View::Idle
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use anyhow::anyhow;

  fn summary(id: &str, title: &str, year: &str) -> MovieSummary {
    MovieSummary { imdb_id: id.to_string(), title: title.to_string(), year: year.to_string(), poster: "N/A".to_string() }
  }

  fn details(id: &str, title: &str) -> MovieDetails {
    MovieDetails { imdb_id: id.to_string(), title: title.to_string(), director: "Tim Burton".to_string(), ..Default::default() }
  }

  fn with_query(query: &str) -> UiState {
    UiState { query: query.to_string(), ..Default::default() }
  }

  // --- search ---

  #[test]
  fn blank_query_issues_no_request() {
    for query in ["", "   ", "\t\n"] {
      let mut state = with_query(query);
      assert_eq!(state.begin_search(), None);
      assert_eq!(state.error_message.as_deref(), Some(EMPTY_QUERY_MESSAGE));
      assert!(!state.loading);
    }
  }

  #[test]
  fn search_trims_query_and_keeps_input() {
    let mut state = with_query("  batman ");
    assert_eq!(state.begin_search(), Some(Request::Search { query: "batman".to_string() }));
    assert_eq!(state.query, "  batman ");
  }

  #[test]
  fn begin_search_sets_loading_and_clears_error_and_selection() {
    let mut state = with_query("batman");
    state.error_message = Some("old".to_string());
    state.selected = Some(details("tt1", "Old"));

    state.begin_search();

    assert!(state.loading);
    assert_eq!(state.error_message, None);
    assert_eq!(state.selected, None);
    assert_eq!(state.view(), View::Loading);
  }

  #[test]
  fn found_search_replaces_results_in_order() {
    let mut state = with_query("batman");
    state.results = vec![summary("tt9", "Stale", "1900")];
    state.begin_search();

    let movies = vec![summary("tt0096895", "Batman", "1989"), summary("tt0372784", "Batman Begins", "2005")];
    state.finish_search(Ok(ApiOutcome::Found(movies.clone())));

    assert_eq!(state.results, movies);
    assert!(!state.loading);
    assert_eq!(state.error_message, None);
    assert_eq!(state.view(), View::Results);
  }

  #[test]
  fn rejected_search_clears_results_and_shows_api_message() {
    let mut state = with_query("zzzz");
    state.results = vec![summary("tt1", "Something", "2000")];
    state.begin_search();

    state.finish_search(Ok(ApiOutcome::Rejected("Movie not found!".to_string())));

    assert!(state.results.is_empty());
    assert_eq!(state.error_message.as_deref(), Some("Movie not found!"));
    assert!(!state.loading);
    assert_eq!(state.view(), View::Idle);
  }

  #[test]
  fn failed_search_sets_generic_message() {
    let mut state = with_query("batman");
    state.begin_search();
    state.finish_search(Err(anyhow!("connection refused")));

    assert_eq!(state.error_message.as_deref(), Some(SEARCH_FAILED_MESSAGE));
    assert!(!state.loading);
  }

  // --- lookup ---

  #[test]
  fn found_lookup_shows_detail_instead_of_list() {
    let mut state = UiState { results: vec![summary("tt0096895", "Batman", "1989")], ..Default::default() };
    assert_eq!(state.begin_lookup("tt0096895"), Request::Lookup { imdb_id: "tt0096895".to_string() });
    assert!(state.loading);

    let record = details("tt0096895", "Batman");
    state.finish_lookup(Ok(ApiOutcome::Found(record.clone())));

    assert_eq!(state.selected, Some(record));
    assert!(!state.loading);
    assert_eq!(state.view(), View::Detail);
  }

  #[test]
  fn rejected_lookup_keeps_list() {
    let mut state = UiState { results: vec![summary("tt1", "A", "2000")], ..Default::default() };
    state.begin_lookup("tt1");
    state.finish_lookup(Ok(ApiOutcome::Rejected("Incorrect IMDb ID.".to_string())));

    assert_eq!(state.error_message.as_deref(), Some("Incorrect IMDb ID."));
    assert_eq!(state.selected, None);
    assert_eq!(state.view(), View::Results);
  }

  #[test]
  fn failed_lookup_sets_generic_message_regardless_of_prior_error() {
    let mut state = UiState { error_message: Some("earlier".to_string()), ..Default::default() };
    state.begin_lookup("tt1");
    assert_eq!(state.error_message, None);
    state.finish_lookup(Err(anyhow!("dns")));

    assert_eq!(state.error_message.as_deref(), Some(LOOKUP_FAILED_MESSAGE));
    assert!(!state.loading);
  }

  #[test]
  fn closing_detail_reveals_results() {
    let mut state = UiState {
      results: vec![summary("tt1", "A", "2000")],
      selected: Some(details("tt1", "A")),
      ..Default::default()
    };
    assert_eq!(state.view(), View::Detail);
    state.close_detail();
    assert_eq!(state.view(), View::Results);
  }

  #[test]
  fn initial_state_is_idle() {
    let state = UiState::default();
    assert_eq!(state.view(), View::Idle);
    assert!(state.results.is_empty());
  }
}
