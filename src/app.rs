use std::io;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use tokio::runtime::Handle;

use crate::error::{FetchError, SearchError, ValidationError};
use crate::history::RecentSearches;
use crate::openweather::{WeatherClient, WeatherReport};
use crate::storage::{KeyValueStore, LAST_CITY_KEY};
use crate::ui;
use crate::view::View;
use crate::weather::{daily_forecast, WeatherSnapshot};

pub const MIN_CITY_LEN: usize = 2;

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Recent,
}

/// A search the event loop must dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: u64,
    pub city: String,
}

/// Result of a dispatched search, tagged with its request token.
#[derive(Debug)]
pub struct FetchOutcome {
    pub token: u64,
    pub result: Result<WeatherReport, FetchError>,
}

/// Trimmed city name, or why it can't be searched.
pub fn validate_city(raw: &str) -> Result<String, ValidationError> {
    let city = raw.trim();
    if city.is_empty() {
        return Err(ValidationError::Empty);
    }
    if city.chars().count() < MIN_CITY_LEN {
        return Err(ValidationError::TooShort { min: MIN_CITY_LEN });
    }
    Ok(city.to_string())
}

/// Application controller. Owns the store, the recent list and the view.
#[derive(Debug)]
pub struct App<S> {
    store: S,
    recent: RecentSearches,
    view: View,
    phase: Phase,
    input: String,
    focus: Focus,
    selected: usize,
    latest_token: u64,
    in_flight: Option<SearchRequest>,
    confirm_clear: bool,
    should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: S) -> Self {
        let recent = RecentSearches::load(&store);
        let mut view = View::new();
        view.render_recent_searches(recent.list());
        Self {
            store,
            recent,
            view,
            phase: Phase::Idle,
            input: String::new(),
            focus: Focus::Input,
            selected: 0,
            latest_token: 0,
            in_flight: None,
            confirm_clear: false,
            should_quit: false,
        }
    }

    /// Search `city` if given, else restore the last city, else show the welcome screen.
    pub fn startup(&mut self, city: Option<String>) -> Option<SearchRequest> {
        if let Some(city) = city {
            tracing::info!("Searching {} from the command line", city);
            self.input = city;
            return self.submit();
        }

        match self.store.get(LAST_CITY_KEY) {
            Some(last) if !last.trim().is_empty() => {
                tracing::info!("Restoring last city {}", last);
                self.input = last.clone();
                Some(self.begin_search(last))
            }
            _ => {
                tracing::info!("No last city, showing welcome");
                self.phase = Phase::Welcome;
                self.view.render_welcome();
                None
            }
        }
    }

    /// Validate the city field and start a search.
    pub fn submit(&mut self) -> Option<SearchRequest> {
        match validate_city(&self.input) {
            Ok(city) => Some(self.begin_search(city)),
            Err(e) => {
                tracing::debug!("Rejected city input {:?}: {}", self.input, e);
                if let Some(abandoned) = self.in_flight.take() {
                    tracing::debug!("Abandoning request {}", abandoned.token);
                    self.view.set_searching(false);
                    self.focus = Focus::Input;
                }
                self.fail(SearchError::Validation(e));
                None
            }
        }
    }

    /// Search a recent entry, exactly as if it had been typed.
    pub fn select_recent(&mut self, index: usize) -> Option<SearchRequest> {
        let city = self.recent.get(index)?.to_string();
        self.input = city.clone();
        Some(self.begin_search(city))
    }

    fn begin_search(&mut self, city: String) -> SearchRequest {
        self.latest_token += 1;
        let request = SearchRequest {
            token: self.latest_token,
            city,
        };
        tracing::info!("Searching {} (request {})", request.city, request.token);

        self.phase = Phase::Loading;
        self.view.render_loading();
        self.view.set_searching(true);
        self.in_flight = Some(request.clone());
        request
    }

    /// Apply a fetch result. Outcomes of superseded requests are dropped.
    pub fn complete_search(&mut self, outcome: FetchOutcome) {
        let request = match self.in_flight.take() {
            Some(request) if request.token == outcome.token => request,
            other => {
                tracing::debug!(
                    "Dropping stale outcome for request {} (latest {})",
                    outcome.token,
                    self.latest_token
                );
                self.in_flight = other;
                return;
            }
        };

        self.view.set_searching(false);
        self.focus = Focus::Input;

        let shown = outcome
            .result
            .and_then(|report| self.show_report(&report));
        match shown {
            Ok(()) => {
                self.recent.record(&request.city, &mut self.store);
                if let Err(e) = self.store.set(LAST_CITY_KEY, &request.city) {
                    tracing::warn!("Failed to persist last city: {}", e);
                }
                self.selected = 0;
                self.view.render_recent_searches(self.recent.list());
                self.phase = Phase::Success;
            }
            Err(e) => {
                tracing::warn!("Search for {} failed: {}", request.city, e);
                self.fail(SearchError::Fetch(e));
            }
        }
    }

    fn show_report(&mut self, report: &WeatherReport) -> Result<(), FetchError> {
        let snapshot = WeatherSnapshot::from_conditions(&report.current)?;
        self.view.render_weather(snapshot);
        self.view.render_forecast(&daily_forecast(&report.forecast));
        Ok(())
    }

    fn fail(&mut self, error: SearchError) {
        self.phase = Phase::Error;
        self.view.render_error(error.user_message());
    }

    /// Ask for confirmation before wiping the history.
    pub fn request_clear_history(&mut self) {
        self.confirm_clear = true;
    }

    pub fn resolve_clear_history(&mut self, confirmed: bool) {
        self.confirm_clear = false;
        if !confirmed {
            return;
        }
        tracing::info!("Clearing search history");
        self.recent.clear(&mut self.store);
        self.view.render_recent_searches(self.recent.list());
        self.selected = 0;
        self.focus = Focus::Input;
    }

    /// Map a key press to controller actions.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<SearchRequest> {
        if self.confirm_clear {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.resolve_clear_history(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.resolve_clear_history(false)
                }
                _ => {}
            }
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('d') if ctrl => self.request_clear_history(),
            KeyCode::Tab | KeyCode::BackTab => self.toggle_focus(),
            _ => {
                return match self.focus {
                    Focus::Input => self.handle_input_key(key),
                    Focus::Recent => self.handle_recent_key(key),
                }
            }
        }
        None
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<SearchRequest> {
        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c)
            }
            _ => {}
        }
        None
    }

    fn handle_recent_key(&mut self, key: KeyEvent) -> Option<SearchRequest> {
        match key.code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.recent.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => return self.select_recent(self.selected),
            _ => {}
        }
        None
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input if !self.recent.is_empty() => Focus::Recent,
            _ => Focus::Input,
        };
        self.selected = self.selected.min(self.recent.len().saturating_sub(1));
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn confirming_clear(&self) -> bool {
        self.confirm_clear
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Run a search on the runtime; the outcome comes back over `tx`.
pub fn dispatch(
    runtime: &Handle,
    client: &Arc<WeatherClient>,
    request: SearchRequest,
    tx: &Sender<FetchOutcome>,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.fetch_weather_and_forecast(&request.city).await;
        let _ = tx.send(FetchOutcome {
            token: request.token,
            result,
        });
    });
}

pub fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    client: Arc<WeatherClient>,
    runtime: &Handle,
    initial_city: Option<String>,
) -> io::Result<()> {
    let (tx, rx) = mpsc::channel();

    if let Some(request) = app.startup(initial_city) {
        dispatch(runtime, &client, request, &tx);
    }

    loop {
        while let Ok(outcome) = rx.try_recv() {
            app.complete_search(outcome);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(request) = app.handle_key(key) {
                        dispatch(runtime, &client, request, &tx);
                    }
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
