use anyhow::{Result, anyhow};
use image::DynamicImage;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::display::DisplayMode;
use crate::omdb::{ApiOutcome, MovieDetails, MovieSummary, OmdbClient, PosterSize, fetch_poster, poster_url};
use crate::state::{Request, UiState, View};
use crate::theme::{THEMES, Theme, theme_index};

// --- Types ---

pub type SearchResult = Result<ApiOutcome<Vec<MovieSummary>>>;
pub type LookupResult = Result<ApiOutcome<MovieDetails>>;
pub type PosterResult = Result<(String, DynamicImage)>;

/// Which pane receives key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Input,
  Results,
  Detail,
}

/// Cursor movement inside the result grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStep {
  Left,
  Right,
  Up,
  Down,
  First,
  Last,
}

/// The one remote call that may be outstanding.
pub(crate) enum PendingRequest {
  Search(oneshot::Receiver<SearchResult>),
  Lookup(oneshot::Receiver<LookupResult>),
}

/// In-flight async task receivers and handles.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) request: Option<PendingRequest>,
  pub(crate) request_handle: Option<JoinHandle<()>>,
  pub(crate) poster_rx: Option<oneshot::Receiver<PosterResult>>,
}

/// Poster for the selected record, plus its last resize for the current panel size.
#[derive(Default)]
pub struct PosterCache {
  pub image: Option<(String, DynamicImage)>,
  pub resized: Option<(String, u16, u16, DynamicImage)>,
}

impl PosterCache {
  fn clear(&mut self) {
    self.image = None;
    self.resized = None;
  }
}

pub struct App {
  pub state: UiState,
  pub cursor_position: usize,
  pub input_scroll: usize,
  pub mode: AppMode,
  pub theme_index: usize,
  pub display_mode: DisplayMode,
  /// Index into `state.results` of the highlighted card.
  pub selected_card: usize,
  /// Card columns in the last rendered grid; drives up/down movement.
  pub grid_columns: usize,
  /// First visible grid row.
  pub grid_scroll: usize,
  pub poster: PosterCache,
  pub should_quit: bool,
  client: OmdbClient,
  config: Config,
  prefs_path: Option<PathBuf>,
  pub(crate) tasks: AsyncTasks,
}

/// Take a finished result off a oneshot, treating a dropped sender as a transport failure.
fn poll_result<T>(rx: &mut oneshot::Receiver<Result<T>>) -> Option<Result<T>> {
  match rx.try_recv() {
    Ok(result) => Some(result),
    Err(oneshot::error::TryRecvError::Empty) => None,
    Err(oneshot::error::TryRecvError::Closed) => Some(Err(anyhow!("request task ended without a result"))),
  }
}

impl App {
  pub fn new(client: OmdbClient, display_mode: DisplayMode, config: Config, prefs_path: Option<PathBuf>) -> Self {
    let theme_index = theme_index(config.theme_name.as_deref());
    Self {
      state: UiState::default(),
      cursor_position: 0,
      input_scroll: 0,
      mode: AppMode::Input,
      theme_index,
      display_mode,
      selected_card: 0,
      grid_columns: 1,
      grid_scroll: 0,
      poster: PosterCache::default(),
      should_quit: false,
      client,
      config,
      prefs_path,
      tasks: AsyncTasks::default(),
    }
  }

  pub fn theme(&self) -> &'static Theme {
    // Safety: theme_index comes from theme_index() or modular arithmetic in next_theme().
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.config.theme_name = Some(self.theme().name.to_string());
    if let Some(ref path) = self.prefs_path {
      self.config.save_to(path);
    }
  }

  pub fn selected_summary(&self) -> Option<&MovieSummary> {
    self.state.results.get(self.selected_card)
  }

  // --- Controller actions ---

  pub fn trigger_search(&mut self) {
    if let Some(request) = self.state.begin_search() {
      self.poster.clear();
      self.dispatch(request);
    } else {
      debug!("search: blank query ignored");
    }
  }

  pub fn trigger_lookup(&mut self) {
    let Some(imdb_id) = self.selected_summary().map(|m| m.imdb_id.clone()) else { return };
    let request = self.state.begin_lookup(&imdb_id);
    self.dispatch(request);
  }

  pub fn close_detail(&mut self) {
    self.state.close_detail();
    self.tasks.poster_rx = None;
    self.poster.clear();
    self.focus_view();
  }

  /// Drop whatever request is still outstanding; its response will never be applied.
  pub fn cancel_pending(&mut self) {
    if self.tasks.request.take().is_some() {
      debug!("request: superseded by a newer action");
    }
    if let Some(handle) = self.tasks.request_handle.take() {
      handle.abort();
    }
    self.tasks.poster_rx = None;
  }

  fn dispatch(&mut self, request: Request) {
    self.cancel_pending();
    let client = self.client.clone();
    match request {
      Request::Search { query } => {
        info!(query = %query, "search triggered");
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
          let _ = tx.send(client.search_by_title(&query).await);
        });
        self.tasks.request = Some(PendingRequest::Search(rx));
        self.tasks.request_handle = Some(handle);
      }
      Request::Lookup { imdb_id } => {
        info!(imdb_id = %imdb_id, "lookup triggered");
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
          let _ = tx.send(client.lookup_by_id(&imdb_id).await);
        });
        self.tasks.request = Some(PendingRequest::Lookup(rx));
        self.tasks.request_handle = Some(handle);
      }
    }
  }

  fn trigger_poster(&mut self, movie: &MovieDetails) {
    self.poster.clear();
    if !self.display_mode.shows_posters() {
      return;
    }
    let imdb_id = movie.imdb_id.clone();
    let url = poster_url(&movie.poster, PosterSize::Detail).to_string();
    let http = self.client.http_client().clone();
    debug!(imdb_id = %imdb_id, url = %url, "poster: fetching");

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(fetch_poster(&http, &url).await.map(|image| (imdb_id, image)));
    });
    self.tasks.poster_rx = Some(rx);
  }

  // --- Completion ---

  pub fn check_pending(&mut self) {
    match self.tasks.request.take() {
      Some(PendingRequest::Search(mut rx)) => match poll_result(&mut rx) {
        Some(result) => self.apply_search(result),
        None => self.tasks.request = Some(PendingRequest::Search(rx)),
      },
      Some(PendingRequest::Lookup(mut rx)) => match poll_result(&mut rx) {
        Some(result) => self.apply_lookup(result),
        None => self.tasks.request = Some(PendingRequest::Lookup(rx)),
      },
      None => {}
    }

    if let Some(mut rx) = self.tasks.poster_rx.take() {
      match poll_result(&mut rx) {
        Some(Ok((imdb_id, image))) => {
          let current = self.state.selected.as_ref().is_some_and(|m| m.imdb_id == imdb_id);
          if current {
            self.poster.resized = None;
            self.poster.image = Some((imdb_id, image));
          }
        }
        Some(Err(e)) => {
          // The detail panel works without a poster.
          warn!(err = %format!("{:#}", e), "poster: fetch failed");
        }
        None => self.tasks.poster_rx = Some(rx),
      }
    }
  }

  fn apply_search(&mut self, result: SearchResult) {
    self.tasks.request_handle = None;
    let found = match &result {
      Ok(ApiOutcome::Found(movies)) => {
        info!(count = movies.len(), "search: results received");
        true
      }
      Ok(ApiOutcome::Rejected(message)) => {
        info!(message = %message, "search: rejected by api");
        false
      }
      Err(e) => {
        warn!(err = %format!("{:#}", e), "search: request failed");
        false
      }
    };
    self.state.finish_search(result);
    if found {
      self.selected_card = 0;
      self.grid_scroll = 0;
    }
    self.focus_view();
  }

  fn apply_lookup(&mut self, result: LookupResult) {
    self.tasks.request_handle = None;
    match &result {
      Ok(ApiOutcome::Found(movie)) => {
        info!(imdb_id = %movie.imdb_id, title = %movie.title, "lookup: record received");
        self.trigger_poster(movie);
      }
      Ok(ApiOutcome::Rejected(message)) => info!(message = %message, "lookup: rejected by api"),
      Err(e) => warn!(err = %format!("{:#}", e), "lookup: request failed"),
    }
    self.state.finish_lookup(result);
    self.focus_view();
  }

  /// Move key focus to whatever the main area now shows.
  fn focus_view(&mut self) {
    self.mode = match self.state.view() {
      View::Detail => AppMode::Detail,
      View::Results => AppMode::Results,
      View::Idle | View::Loading => AppMode::Input,
    };
    self.selected_card = self.selected_card.min(self.state.results.len().saturating_sub(1));
  }

  // --- Grid navigation ---

  pub fn move_card(&mut self, step: CardStep) {
    let count = self.state.results.len();
    if count == 0 {
      return;
    }
    let cols = self.grid_columns.max(1);
    let last = count - 1;
    let i = self.selected_card.min(last);
    self.selected_card = match step {
      CardStep::Left => i.saturating_sub(1),
      CardStep::Right => (i + 1).min(last),
      CardStep::Up => i.checked_sub(cols).unwrap_or(i),
      CardStep::Down => {
        if i + cols <= last {
          i + cols
        } else if i / cols < last / cols {
          // Next row exists but is shorter than this column.
          last
        } else {
          i
        }
      }
      CardStep::First => 0,
      CardStep::Last => last,
    };
  }
}
