//! Current weather lookup

use crate::cli::output::*;
use crate::weather::WeatherService;
use crate::weather::JEJU_CITY_HALL;
use crate::AppConfig;
use crate::Result;

pub async fn handle_weather(config: &AppConfig, lat: Option<f64>, lon: Option<f64>) -> Result<()> {
    let service = WeatherService::new(config)?;

    let (label, (latitude, longitude), weather) = match lat.zip(lon) {
        Some((lat, lon)) => ("지정 위치", (lat, lon), service.resolve_weather(lat, lon).await?),
        None => ("제주시청", JEJU_CITY_HALL, service.default_region_weather().await?),
    };

    print_weather(label, latitude, longitude, &weather);
    Ok(())
}
