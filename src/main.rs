use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use skyfetch::app::{run_app, App};
use skyfetch::config::{Config, API_KEY_ENV};
use skyfetch::openweather::WeatherClient;
use skyfetch::storage::FileStore;

mod cli;

const LOG_FILE: &str = "skyfetch.log";

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    let log_path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let api_key = config.resolve_api_key(std::env::var(API_KEY_ENV).ok())?;
    let data_dir = config.data_dir()?;

    init_logging(&data_dir)?;
    tracing::info!("SkyFetch starting, data in {}", data_dir.display());

    let store = FileStore::open(&data_dir).context("Failed to open storage")?;
    let client = WeatherClient::new(config.client_settings(api_key))
        .context("Failed to build HTTP client")?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let mut app = App::new(store);

    // setup terminal
    enable_raw_mode()?;
    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            return Err(err).context("Failed to set up terminal");
        }
    };

    // create app and run it
    let res = run_app(
        &mut terminal,
        &mut app,
        Arc::new(client),
        runtime.handle(),
        args.city,
    );

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!("UI loop failed: {}", err);
    }
    runtime.shutdown_background();
    tracing::info!("SkyFetch exiting");

    res.context("Terminal UI failed")
}
