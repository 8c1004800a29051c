//! Error types for SkyFetch.
//!
//! Every error that reaches the results area has a `user_message()` suitable
//! for display; the `Display` impls carry the detail that goes to the log.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected city input. Never reaches the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("city name is empty")]
    Empty,

    #[error("city name is shorter than {min} characters")]
    TooShort { min: usize },
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::Empty => "Please enter a city name".to_string(),
            ValidationError::TooShort { .. } => "City name too short".to_string(),
        }
    }
}

/// Classified failure of a weather + forecast fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Provider answered 404.
    #[error("city not found: {0}")]
    CityNotFound(String),

    /// Provider answered 401.
    #[error("provider rejected the API key")]
    InvalidCredentials,

    /// Timeouts, DNS, refused connections, other statuses and undecodable bodies.
    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    pub fn user_message(&self) -> String {
        match self {
            FetchError::CityNotFound(city) => format!("City \"{city}\" not found"),
            FetchError::InvalidCredentials => "Invalid API key".to_string(),
            FetchError::Network(_) => "Network error. Please check your internet.".to_string(),
        }
    }

    /// Ordering used when both requests fail: not-found beats unauthorized beats network.
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            FetchError::CityNotFound(_) => 0,
            FetchError::InvalidCredentials => 1,
            FetchError::Network(_) => 2,
        }
    }
}

/// Anything that ends a search attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl SearchError {
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Validation(e) => e.user_message(),
            SearchError::Fetch(e) => e.user_message(),
        }
    }
}

/// Persistence failures. Logged, never shown.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no API key configured; set SKYFETCH_API_KEY or `api_key` in the config file")]
    MissingApiKey,

    #[error("invalid configuration: {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("could not determine a {0} directory")]
    NoDirectory(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::Empty.user_message(), "Please enter a city name");
        assert_eq!(
            ValidationError::TooShort { min: 2 }.user_message(),
            "City name too short"
        );
    }

    #[test]
    fn test_fetch_messages() {
        assert_eq!(
            FetchError::CityNotFound("Atlantis".into()).user_message(),
            "City \"Atlantis\" not found"
        );
        assert_eq!(FetchError::InvalidCredentials.user_message(), "Invalid API key");
        assert!(FetchError::Network("timeout".into())
            .user_message()
            .starts_with("Network error"));
    }

    #[test]
    fn test_search_error_conversion() {
        let err: SearchError = FetchError::InvalidCredentials.into();
        assert!(matches!(err, SearchError::Fetch(FetchError::InvalidCredentials)));
        assert_eq!(err.user_message(), "Invalid API key");
    }

    #[test]
    fn test_precedence_order() {
        let nf = FetchError::CityNotFound("x".into());
        let unauth = FetchError::InvalidCredentials;
        let net = FetchError::Network("x".into());
        assert!(nf.precedence() < unauth.precedence());
        assert!(unauth.precedence() < net.precedence());
    }
}
