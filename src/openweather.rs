use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::FetchError;

pub const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
pub const UNITS: &str = "metric";

pub mod current {
    use super::*;

    /// `GET /weather` response, reduced to what the dashboard reads.
    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Conditions {
        pub name: String,

        pub main: Main,

        pub weather: Vec<Summary>,
    }

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Main {
        pub temp: f64,
    }

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Summary {
        pub description: String,

        pub icon: String,
    }
}

pub mod forecast {
    use super::*;

    /// `GET /forecast` response: 3-hour samples in chronological order.
    #[derive(Deserialize, Debug, Clone, PartialEq, Default)]
    pub struct Forecast {
        pub list: Vec<Sample>,
    }

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Sample {
        /// `YYYY-MM-DD HH:MM:SS`
        pub dt_txt: String,

        pub main: Main,

        pub weather: Vec<Icon>,
    }

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Main {
        pub temp: f64,
    }

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Icon {
        pub icon: String,
    }
}

/// Both payloads of one successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: current::Conditions,
    pub forecast: forecast::Forecast,
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub current_url: String,
    pub forecast_url: String,
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            current_url: CURRENT_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    settings: ClientSettings,
}

impl WeatherClient {
    pub fn new(settings: ClientSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("skyfetch")
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    /// Fetch current conditions and the 5-day forecast for `city` concurrently.
    ///
    /// Both must succeed. The caller is responsible for validating `city`.
    pub async fn fetch_weather_and_forecast(&self, city: &str) -> Result<WeatherReport, FetchError> {
        let (current, forecast) = tokio::join!(
            self.get_json::<current::Conditions>(&self.settings.current_url, city),
            self.get_json::<forecast::Forecast>(&self.settings.forecast_url, city),
        );

        match (current, forecast) {
            (Ok(current), Ok(forecast)) => {
                if current.weather.is_empty() {
                    return Err(FetchError::Network(
                        "current conditions carry no weather summary".to_string(),
                    ));
                }
                Ok(WeatherReport { current, forecast })
            }
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
            (Err(a), Err(b)) => Err(if b.precedence() < a.precedence() { b } else { a }),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, city: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .query(&[
                ("q", city),
                ("appid", self.settings.api_key.as_str()),
                ("units", UNITS),
            ])
            .send()
            .await
            .map_err(network_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(FetchError::CityNotFound(city.to_string())),
            StatusCode::UNAUTHORIZED => return Err(FetchError::InvalidCredentials),
            status if !status.is_success() => {
                return Err(FetchError::Network(format!("{url} answered {status}")))
            }
            _ => {}
        }

        response.json().await.map_err(network_error)
    }
}

fn network_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Network("request timed out".to_string())
    } else if err.is_decode() {
        FetchError::Network(format!("malformed response: {err}"))
    } else {
        FetchError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_deserialization() {
        let json = serde_json::json!({
            "name": "London",
            "main": {"temp": 15.6, "humidity": 80},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "cod": 200
        });
        let conditions: current::Conditions = serde_json::from_value(json).unwrap();
        assert_eq!(conditions.name, "London");
        assert_eq!(conditions.main.temp, 15.6);
        assert_eq!(conditions.weather[0].description, "clear sky");
        assert_eq!(conditions.weather[0].icon, "01d");
    }

    #[test]
    fn test_forecast_deserialization() {
        let json = serde_json::json!({
            "cod": "200",
            "cnt": 1,
            "list": [{
                "dt": 1705320000,
                "dt_txt": "2024-01-15 12:00:00",
                "main": {"temp": 4.2},
                "weather": [{"icon": "04d", "description": "broken clouds"}]
            }]
        });
        let forecast: forecast::Forecast = serde_json::from_value(json).unwrap();
        assert_eq!(forecast.list.len(), 1);
        assert_eq!(forecast.list[0].dt_txt, "2024-01-15 12:00:00");
        assert_eq!(forecast.list[0].weather[0].icon, "04d");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ClientSettings::new("key");
        assert_eq!(settings.current_url, CURRENT_URL);
        assert_eq!(settings.forecast_url, FORECAST_URL);
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }
}
