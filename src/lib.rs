//! SkyFetch: current weather and a 5-day forecast for a city, in the terminal.
//!
//! Searches run on a tokio runtime; the controller in [`app`] only ever applies
//! the outcome of the most recent request.

pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod openweather;
pub mod storage;
pub mod ui;
pub mod units;
pub mod view;
pub mod weather;

pub use app::{App, FetchOutcome, Phase, SearchRequest};
pub use config::Config;
pub use error::{ConfigError, FetchError, SearchError, StorageError, ValidationError};
pub use history::RecentSearches;
pub use openweather::{ClientSettings, WeatherClient, WeatherReport};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
