//! Spatially bucketed, time-bounded weather cache

use std::fmt;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;

use super::types::WeatherSnapshot;
use crate::errors::JejuRagError;
use crate::errors::Result;

/// Source of "now" for TTL checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// Coordinates rounded to 2 decimal places (~1.1 km cell).
///
/// Held as integer hundredths of a degree so equal buckets hash equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    lat_centi: i32,
    lon_centi: i32,
}

impl BucketKey {
    /// Bucket for a coordinate pair; non-finite or out-of-range values are rejected
    pub fn from_coords(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || latitude.abs() > 90.0
            || longitude.abs() > 180.0
        {
            return Err(JejuRagError::InvalidCoordinate {
                lat: latitude,
                lon: longitude,
            });
        }

        Ok(Self {
            lat_centi: (latitude * 100.0).round() as i32,
            lon_centi: (longitude * 100.0).round() as i32,
        })
    }

    /// Rounded latitude
    pub fn latitude(self) -> f64 {
        f64::from(self.lat_centi) / 100.0
    }

    /// Rounded longitude
    pub fn longitude(self) -> f64 {
        f64::from(self.lon_centi) / 100.0
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2},{:.2}", self.latitude(), self.longitude())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: WeatherSnapshot,
    fetched_at: DateTime<Utc>,
}

/// Counters since the cache was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Upstream fetches issued on misses
    pub fetches: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Weather snapshots keyed by bucket.
///
/// Entries are overwritten on refresh and never evicted otherwise.
pub struct WeatherCache {
    entries: DashMap<BucketKey, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
}

impl WeatherCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
        }
    }

    /// Snapshot for `key` if one was stored less than one TTL ago
    pub fn get_fresh(&self, key: &BucketKey) -> Option<WeatherSnapshot> {
        let now = self.clock.now();
        let fresh = self
            .entries
            .get(key)
            .filter(|entry| now - entry.fetched_at < self.ttl)
            .map(|entry| entry.snapshot.clone());

        if fresh.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        fresh
    }

    /// Store `snapshot` under `key`, stamped with the current time
    pub fn insert(&self, key: BucketKey, snapshot: WeatherSnapshot) {
        self.entries.insert(
            key,
            CacheEntry {
                snapshot,
                fetched_at: self.clock.now(),
            },
        );
    }

    pub(crate) fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry; counters are kept
    pub fn clear(&self) {
        self.entries.clear();
    }
}
