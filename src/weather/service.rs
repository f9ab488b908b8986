//! Weather resolution with bucket deduplication

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use futures::stream::StreamExt;
use futures::stream::{self};
use tracing::debug;
use tracing::warn;

use super::cache::BucketKey;
use super::cache::CacheStats;
use super::cache::Clock;
use super::cache::SystemClock;
use super::cache::WeatherCache;
use super::client::OpenWeatherClient;
use super::client::WeatherFetcher;
use super::region::JejuRegions;
use super::region::RegionPolicy;
use super::types::PlaceLocation;
use super::types::PlaceWeather;
use super::types::WeatherSnapshot;
use crate::config::AppConfig;
use crate::errors::JejuRagError;
use crate::errors::Result;
use crate::models::has_coordinates;

/// Jeju City Hall, used for the region-wide header weather
pub const JEJU_CITY_HALL: (f64, f64) = (33.4996, 126.5312);

/// Resolves coordinates to weather through a shared bucketed cache
pub struct WeatherService {
    fetcher: Arc<dyn WeatherFetcher>,
    cache: WeatherCache,
    regions: Arc<dyn RegionPolicy>,
    max_concurrent_lookups: usize,
}

impl WeatherService {
    /// OpenWeatherMap, wall clock and Jeju region labels
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self::from_components(
            Arc::new(OpenWeatherClient::new(config)?),
            Arc::new(SystemClock),
            Arc::new(JejuRegions::new()?),
            config.weather_cache_ttl(),
            config.weather.max_concurrent_lookups,
        ))
    }

    pub fn from_components(
        fetcher: Arc<dyn WeatherFetcher>,
        clock: Arc<dyn Clock>,
        regions: Arc<dyn RegionPolicy>,
        ttl: Duration,
        max_concurrent_lookups: usize,
    ) -> Self {
        Self {
            fetcher,
            cache: WeatherCache::new(ttl, clock),
            regions,
            max_concurrent_lookups: max_concurrent_lookups.max(1),
        }
    }

    /// Current weather at (lat, lon), served from cache within the TTL.
    ///
    /// Concurrent misses on one bucket may each fetch; the last write wins.
    pub async fn resolve_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        let key = BucketKey::from_coords(latitude, longitude)?;
        self.resolve_bucket(key).await
    }

    /// Weather for the region-wide header widget
    pub async fn default_region_weather(&self) -> Result<WeatherSnapshot> {
        let (lat, lon) = JEJU_CITY_HALL;
        self.resolve_weather(lat, lon).await
    }

    /// Attach weather and a region label to each place with coordinates.
    ///
    /// Places without coordinates are skipped. A failed lookup drops only the
    /// affected places. Output keeps input order.
    pub async fn enrich_places(&self, places: &[PlaceLocation]) -> Vec<PlaceWeather> {
        let mut keyed = Vec::with_capacity(places.len());
        let mut buckets: Vec<BucketKey> = Vec::new();

        for place in places {
            if !has_coordinates(place.latitude, place.longitude) {
                debug!("Skipping weather for {}: no coordinates", place.name);
                continue;
            }
            match BucketKey::from_coords(place.latitude, place.longitude) {
                Ok(key) => {
                    if !buckets.contains(&key) {
                        buckets.push(key);
                    }
                    keyed.push((place, key));
                }
                Err(e) => warn!("Skipping weather for {}: {}", place.name, e),
            }
        }

        // One lookup per bucket, so colliding places share a single fetch
        let resolved: HashMap<BucketKey, Result<WeatherSnapshot>> = stream::iter(buckets)
            .map(|key| async move { (key, self.resolve_bucket(key).await) })
            .buffered(self.max_concurrent_lookups)
            .collect()
            .await;

        let mut enriched = Vec::with_capacity(keyed.len());
        for (place, key) in keyed {
            match resolved.get(&key) {
                Some(Ok(weather)) => enriched.push(PlaceWeather {
                    place_name: place.name.clone(),
                    latitude: place.latitude,
                    longitude: place.longitude,
                    weather: weather.clone(),
                    region_label: self
                        .regions
                        .label(place.address.as_deref().unwrap_or_default(), &place.name),
                }),
                Some(Err(e)) => warn!("Weather lookup failed for {}: {}", place.name, e),
                None => {}
            }
        }

        let stats = self.cache.stats();
        debug!(
            "Enriched {}/{} places; cache hits={} misses={} fetches={}",
            enriched.len(),
            places.len(),
            stats.hits,
            stats.misses,
            stats.fetches
        );
        enriched
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn resolve_bucket(&self, key: BucketKey) -> Result<WeatherSnapshot> {
        if let Some(snapshot) = self.cache.get_fresh(&key) {
            debug!("Weather cache hit for {}", key);
            return Ok(snapshot);
        }

        self.cache.record_fetch();
        let raw = self
            .fetcher
            .fetch(key.latitude(), key.longitude())
            .await
            .map_err(|e| match e {
                JejuRagError::WeatherFetch(_) | JejuRagError::ConfigError(_) => e,
                other => JejuRagError::WeatherFetch(other.to_string()),
            })?;

        let snapshot = WeatherSnapshot::from_provider(&raw);
        self.cache.insert(key, snapshot.clone());
        debug!("Weather cached for {}: {}°C {}", key, snapshot.temperature, snapshot.description);
        Ok(snapshot)
    }
}
