//! Location-specific weather enrichment
//!
//! Coordinates are rounded into ~1 km buckets. Each bucket is fetched at most
//! once per TTL window and shared by every place that falls into it. Results
//! carry a short region label derived from the place's address.

pub mod cache;
pub mod client;
pub mod recommend;
pub mod region;
pub mod service;
pub mod types;

pub use cache::BucketKey;
pub use cache::CacheStats;
pub use cache::Clock;
pub use cache::ManualClock;
pub use cache::SystemClock;
pub use cache::WeatherCache;
pub use client::OpenWeatherClient;
pub use client::WeatherFetcher;
pub use recommend::recommend;
pub use recommend::Recommendation;
pub use region::JejuRegions;
pub use region::RegionPolicy;
pub use service::WeatherService;
pub use service::JEJU_CITY_HALL;
pub use types::PlaceLocation;
pub use types::PlaceWeather;
pub use types::ProviderWeather;
pub use types::WeatherSnapshot;
