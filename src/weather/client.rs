//! Weather provider clients

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::types::ProviderWeather;
use crate::config::AppConfig;
use crate::errors::JejuRagError;
use crate::errors::Result;

const DEFAULT_DESCRIPTION: &str = "정보 없음";
const DEFAULT_ICON: &str = "01d";

/// (lat, lon) → current conditions
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ProviderWeather>;
}

/// OpenWeatherMap current-weather client
pub struct OpenWeatherClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    units: String,
    lang: String,
}

#[derive(Deserialize)]
struct OwmResponse {
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    #[serde(default)]
    wind: OwmWind,
}

#[derive(Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    #[serde(default)]
    humidity: u32,
}

#[derive(Deserialize)]
struct OwmCondition {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Deserialize, Default)]
struct OwmWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Deserialize)]
struct OwmError {
    message: String,
}

impl OwmResponse {
    fn into_provider_weather(self) -> ProviderWeather {
        let condition = self.weather.into_iter().next();
        let (code, description, icon) = match condition {
            Some(c) => (c.id, c.description, c.icon),
            None => (0, None, None),
        };

        ProviderWeather {
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            condition_code: code,
            condition_text: description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            icon_code: icon
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_ICON.to_string()),
        }
    }
}

impl OpenWeatherClient {
    /// Build from `[weather]` settings
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_settings(
            &config.weather.endpoint,
            config.weather_api_key(),
            &config.weather.units,
            &config.weather.lang,
            std::time::Duration::from_secs(config.weather.timeout_secs),
        )
    }

    pub fn with_settings(
        endpoint: &str,
        api_key: Option<String>,
        units: &str,
        lang: &str,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JejuRagError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            units: units.to_string(),
            lang: lang.to_string(),
        })
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ProviderWeather> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            JejuRagError::ConfigError("OpenWeatherMap API key not provided".to_string())
        })?;

        let url = format!("{}/data/2.5/weather", self.endpoint);
        debug!("Fetching weather for {}, {}", latitude, longitude);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", api_key.to_string()),
                ("units", self.units.clone()),
                ("lang", self.lang.clone()),
            ])
            .send()
            .await
            .map_err(|e| JejuRagError::WeatherFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OwmError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(JejuRagError::WeatherFetch(format!("{status}: {message}")));
        }

        let parsed: OwmResponse = response
            .json()
            .await
            .map_err(|e| JejuRagError::WeatherFetch(format!("Failed to parse response: {e}")))?;

        Ok(parsed.into_provider_weather())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::matchers::path;
    use wiremock::matchers::query_param;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;

    use super::*;

    fn client(server: &MockServer, api_key: Option<&str>) -> OpenWeatherClient {
        OpenWeatherClient::with_settings(
            &server.uri(),
            api_key.map(str::to_string),
            "metric",
            "kr",
            std::time::Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_parses_current_weather() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "33.46"))
            .and(query_param("lon", "126.94"))
            .and(query_param("appid", "owm-key"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "kr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "weather": [{"id": 501, "description": "보통 비", "icon": "10d"}],
                "main": {"temp": 17.6, "feels_like": 17.2, "humidity": 88},
                "wind": {"speed": 6.1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let weather = client(&server, Some("owm-key"))
            .fetch(33.46, 126.94)
            .await
            .unwrap();

        assert_eq!(weather.condition_code, 501);
        assert_eq!(weather.condition_text, "보통 비");
        assert_eq!(weather.icon_code, "10d");
        assert_eq!(weather.humidity, 88);
        assert!((weather.temperature - 17.6).abs() < 1e-9);
        assert!((weather.wind_speed - 6.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_condition_fields_use_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "weather": [],
                "main": {"temp": 10.0, "feels_like": 8.0, "humidity": 40}
            })))
            .mount(&server)
            .await;

        let weather = client(&server, Some("k")).fetch(33.5, 126.5).await.unwrap();
        assert_eq!(weather.condition_code, 0);
        assert_eq!(weather.condition_text, "정보 없음");
        assert_eq!(weather.icon_code, "01d");
        assert_eq!(weather.wind_speed, 0.0);
    }

    #[tokio::test]
    async fn test_error_status_surfaces_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"cod": 401, "message": "Invalid API key"})),
            )
            .mount(&server)
            .await;

        let err = client(&server, Some("bad")).fetch(33.5, 126.5).await.unwrap_err();
        match err {
            JejuRagError::WeatherFetch(message) => {
                assert!(message.contains("401"));
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let server = MockServer::start().await;
        let err = client(&server, None).fetch(33.5, 126.5).await.unwrap_err();
        assert!(matches!(err, JejuRagError::ConfigError(_)));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }
}
