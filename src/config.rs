use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::openweather::{ClientSettings, CURRENT_URL, FORECAST_URL};

pub const API_KEY_ENV: &str = "SKYFETCH_API_KEY";
const APP_DIR: &str = "skyfetch";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider API key. `SKYFETCH_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_current_url")]
    pub current_url: String,

    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Where storage and the log file live. Defaults to the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_current_url() -> String {
    CURRENT_URL.to_string()
}

fn default_forecast_url() -> String {
    FORECAST_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            current_url: default_current_url(),
            forecast_url: default_forecast_url(),
            timeout_secs: default_timeout_secs(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoDirectory("config"))
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("current_url", &self.current_url)?;
        validate_url("forecast_url", &self.forecast_url)?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Environment value wins over the file; blank values count as unset.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<String, ConfigError> {
        env_value
            .into_iter()
            .chain(self.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(ConfigError::NoDirectory("data")),
        }
    }

    pub fn client_settings(&self, api_key: String) -> ClientSettings {
        ClientSettings {
            api_key,
            current_url: self.current_url.clone(),
            forecast_url: self.forecast_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::Invalid {
        field: field.to_string(),
        message,
    };
    let url = Url::parse(value).map_err(|e| invalid(format!("{value}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("{value}: scheme must be http or https")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.current_url, CURRENT_URL);
        assert_eq!(config.forecast_url, FORECAST_URL);
        assert_eq!(config.timeout_secs, 10);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_parse_overrides() {
        let config = Config::parse(
            r#"
            api_key = "abc"
            current_url = "http://localhost:8080/weather"
            timeout_secs = 3
            data_dir = "/tmp/skyfetch"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.current_url, "http://localhost:8080/weather");
        assert_eq!(config.forecast_url, FORECAST_URL);
        assert_eq!(config.client_settings("abc".into()).timeout, Duration::from_secs(3));
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/skyfetch"));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = Config::parse(r#"forecast_url = "ftp://example.com""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "forecast_url"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(matches!(
            Config::parse("timeout_secs = 0"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(Config::parse("api_key = "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_resolve_api_key() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        };
        assert_eq!(config.resolve_api_key(Some("from-env".into())).unwrap(), "from-env");
        assert_eq!(config.resolve_api_key(Some("  ".into())).unwrap(), "from-file");
        assert_eq!(config.resolve_api_key(None).unwrap(), "from-file");
        assert!(matches!(
            Config::default().resolve_api_key(None),
            Err(ConfigError::MissingApiKey)
        ));
    }
}
