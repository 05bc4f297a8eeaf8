mod app;
mod config;
mod constants;
mod display;
mod graphics;
mod input;
mod logging;
mod omdb;
mod state;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use app::App;
use config::Config;
use constants::constants;
use display::CliDisplayMode;
use omdb::OmdbClient;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Search the OMDb movie database from the terminal", long_about = None)]
struct Args {
  /// OMDb API key (falls back to `api_key` in prefs.toml)
  #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
  api_key: Option<String>,

  /// OMDb endpoint (default: https://www.omdbapi.com/)
  #[arg(long)]
  base_url: Option<String>,

  /// Poster rendering in the detail panel: 'auto', 'direct', 'ascii', or 'none'
  #[arg(short, long, default_value = "auto")]
  display_mode: CliDisplayMode,

  /// Write logs here instead of the default data directory
  #[arg(long)]
  log_file: Option<PathBuf>,

  /// Print a shell completion script and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), "mdb", &mut std::io::stdout());
    return Ok(());
  }

  let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
  let _log_guard = logging::init_logging(&log_path)?;

  // Resolve everything that can fail before the terminal enters raw mode.
  let config = Config::load();
  let api_key = config.resolve_api_key(args.api_key.as_deref())?;
  let base_url = config.resolve_base_url(args.base_url.as_deref());
  let client = OmdbClient::new(&base_url, api_key)?;
  let display_mode = display::resolve_display_mode(args.display_mode);
  info!(base_url = %base_url, display_mode = display_mode.label(), "starting");

  let app = App::new(client, display_mode, config, Config::path());

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, app);
  ratatui::restore();
  info!("exiting");
  result
}

fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
  let poll_interval = Duration::from_millis(constants().poll_interval_ms);

  loop {
    app.check_pending();

    terminal.draw(|frame| ui::ui(frame, &mut app)).context("Failed to draw frame")?;

    if event::poll(poll_interval).context("Failed to poll terminal events")? {
      match event::read().context("Failed to read terminal event")? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  app.cancel_pending();
  Ok(())
}
