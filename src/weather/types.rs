//! Weather data shapes

use serde::Deserialize;
use serde::Serialize;

/// Raw current conditions as reported by a weather provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderWeather {
    /// °C
    pub temperature: f64,
    /// °C
    pub feels_like: f64,
    /// Provider condition code (OpenWeatherMap ids: 2xx thunderstorm .. 8xx clouds)
    pub condition_code: u32,
    pub condition_text: String,
    /// %
    pub humidity: u32,
    /// m/s
    pub wind_speed: f64,
    pub icon_code: String,
}

/// Current weather for one spatial bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// °C, rounded to the nearest integer
    pub temperature: i32,
    /// °C, rounded to the nearest integer
    pub feels_like: i32,
    pub description: String,
    pub humidity: u32,
    pub wind_speed: f64,
    pub icon: String,
    pub is_precipitating: bool,
    pub is_overcast: bool,
}

impl WeatherSnapshot {
    /// Map a provider response onto a snapshot
    pub fn from_provider(raw: &ProviderWeather) -> Self {
        Self {
            temperature: raw.temperature.round() as i32,
            feels_like: raw.feels_like.round() as i32,
            description: raw.condition_text.clone(),
            humidity: raw.humidity,
            wind_speed: raw.wind_speed,
            icon: raw.icon_code.clone(),
            // 2xx thunderstorm, 3xx drizzle, 5xx rain
            is_precipitating: (200..600).contains(&raw.condition_code),
            // 801..=804 are the cloud ids; 800 is clear sky
            is_overcast: raw.condition_code >= 801,
        }
    }
}

/// A place to enrich with weather
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
}

/// A place joined with the weather of its bucket and a region label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceWeather {
    pub place_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub weather: WeatherSnapshot,
    pub region_label: String,
}
