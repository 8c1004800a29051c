use chrono::NaiveDateTime;

use crate::error::FetchError;
use crate::openweather::{current, forecast};
use crate::units::temperature;

pub const FORECAST_DAYS: usize = 5;

/// Current conditions for one city, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature: i64,
    pub description: String,
    pub icon: String,
}

impl WeatherSnapshot {
    /// Built from the first weather summary of the current-conditions payload.
    pub fn from_conditions(conditions: &current::Conditions) -> Result<Self, FetchError> {
        let summary = conditions.weather.first().ok_or_else(|| {
            FetchError::Network("current conditions carry no weather summary".to_string())
        })?;
        Ok(Self {
            city: conditions.name.clone(),
            temperature: temperature::round(conditions.main.temp),
            description: summary.description.clone(),
            icon: summary.icon.clone(),
        })
    }
}

/// One day-card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastDay {
    /// Grouping key, the date portion of `dt_txt`.
    pub date: String,
    /// e.g. `Mon Jan 15`
    pub label: String,
    pub temperature: i64,
    pub icon: String,
}

/// Keep the first sample of each calendar date, in provider order, up to [`FORECAST_DAYS`].
pub fn daily_forecast(forecast: &forecast::Forecast) -> Vec<ForecastDay> {
    let mut days: Vec<ForecastDay> = Vec::with_capacity(FORECAST_DAYS);

    for sample in &forecast.list {
        let date = date_key(&sample.dt_txt);
        if days.iter().any(|d| d.date == date) {
            continue;
        }
        if days.len() == FORECAST_DAYS {
            break;
        }
        days.push(ForecastDay {
            date: date.to_string(),
            label: day_label(&sample.dt_txt),
            temperature: temperature::round(sample.main.temp),
            icon: sample
                .weather
                .first()
                .map(|w| w.icon.clone())
                .unwrap_or_default(),
        });
    }

    days
}

/// Everything before the first space.
fn date_key(dt_txt: &str) -> &str {
    dt_txt.split(' ').next().unwrap_or(dt_txt)
}

fn day_label(dt_txt: &str) -> String {
    match NaiveDateTime::parse_from_str(dt_txt, "%Y-%m-%d %H:%M:%S") {
        Ok(dt) => dt.format("%a %b %d").to_string(),
        Err(_) => date_key(dt_txt).to_string(),
    }
}

/// Terminal glyph for a provider icon id such as `01d` or `10n`.
pub fn icon_glyph(icon: &str) -> &'static str {
    let night = icon.ends_with('n');
    match icon.get(..2) {
        Some("01") if night => "☾",
        Some("01") => "☀",
        Some("02") => "⛅",
        Some("03") | Some("04") => "☁",
        Some("09") | Some("10") => "☂",
        Some("11") => "⚡",
        Some("13") => "❄",
        Some("50") => "≋",
        _ => "?",
    }
}
