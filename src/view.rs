//! Presentation state: what the dashboard shows, independent of the terminal.
//!
//! Each `render_*` call replaces the region it owns, the way the page replaced
//! container contents. [`crate::ui`] paints this state every frame.

use crate::weather::{ForecastDay, WeatherSnapshot, FORECAST_DAYS};

pub const SEARCH_LABEL: &str = "Search";
pub const SEARCHING_LABEL: &str = "Searching...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Display {
    Welcome,
    Loading,
    Error(String),
    Weather(WeatherSnapshot),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchButton {
    pub enabled: bool,
    pub label: &'static str,
}

impl Default for SearchButton {
    fn default() -> Self {
        Self {
            enabled: true,
            label: SEARCH_LABEL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentSection {
    pub visible: bool,
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub display: Display,
    pub forecast: Vec<ForecastDay>,
    pub recent: RecentSection,
    pub search_button: SearchButton,
}

impl Default for View {
    fn default() -> Self {
        Self {
            display: Display::Welcome,
            forecast: Vec::new(),
            recent: RecentSection::default(),
            search_button: SearchButton::default(),
        }
    }
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_welcome(&mut self) {
        self.display = Display::Welcome;
        self.forecast.clear();
    }

    pub fn render_loading(&mut self) {
        self.display = Display::Loading;
        self.forecast.clear();
    }

    /// Stale forecast cards never stay up next to an error.
    pub fn render_error(&mut self, message: impl Into<String>) {
        self.display = Display::Error(message.into());
        self.forecast.clear();
    }

    pub fn render_weather(&mut self, snapshot: WeatherSnapshot) {
        self.display = Display::Weather(snapshot);
    }

    pub fn render_forecast(&mut self, days: &[ForecastDay]) {
        self.forecast = days.iter().take(FORECAST_DAYS).cloned().collect();
    }

    pub fn render_recent_searches(&mut self, cities: &[String]) {
        self.recent.visible = !cities.is_empty();
        self.recent.entries = cities.to_vec();
    }

    pub fn set_searching(&mut self, searching: bool) {
        self.search_button = SearchButton {
            enabled: !searching,
            label: if searching { SEARCHING_LABEL } else { SEARCH_LABEL },
        };
    }
}
