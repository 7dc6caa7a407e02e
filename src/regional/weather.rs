//! Weather resolution with seasonal fallback
//!
//! A single live fetch attempt through the pluggable [`WeatherProvider`]
//! seam, degrading to a deterministic season-keyed estimate on any failure.
//! Resolution never fails and never retries; worst-case latency is one
//! bounded network call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Local};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::records;

/// Client-side bound on the live weather call.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Live responses are cached briefly; weather does not change by the minute.
const CACHE_TTL: Duration = Duration::from_secs(600);
const CACHE_CAPACITY: u64 = 1024;

// ============================================================================
// Estimates and Provenance
// ============================================================================

/// Weather triple consumed by the feature assembler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherEstimate {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
}

/// Whether an estimate came from a live call or the seasonal fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    Live,
    SeasonalFallback,
}

// ============================================================================
// Seasonal Fallback
// ============================================================================

/// Seasonal band keyed by calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    /// Dec-Feb
    Winter,
    /// Mar-May
    Summer,
    /// Jun-Sep
    Monsoon,
    /// Oct-Nov
    PostMonsoon,
}

impl Season {
    /// Band for a 1-based calendar month.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Summer,
            6..=9 => Season::Monsoon,
            _ => Season::PostMonsoon,
        }
    }

    /// Band for the current local month.
    pub fn current() -> Self {
        Season::from_month(Local::now().month())
    }

    /// Fixed estimate for this band.
    pub fn estimate(&self) -> WeatherEstimate {
        match self {
            Season::Winter => WeatherEstimate { temperature: 20.0, humidity: 60.0, rainfall: 20.0 },
            Season::Summer => WeatherEstimate { temperature: 35.0, humidity: 40.0, rainfall: 10.0 },
            Season::Monsoon => WeatherEstimate { temperature: 28.0, humidity: 85.0, rainfall: 250.0 },
            Season::PostMonsoon => {
                WeatherEstimate { temperature: 25.0, humidity: 70.0, rainfall: 50.0 }
            }
        }
    }
}

// ============================================================================
// Provider Seam
// ============================================================================

/// Errors a live weather fetch can produce.
///
/// These never cross the resolver boundary; they select the seasonal
/// fallback branch and get logged.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("weather API returned status {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Trait for live weather backends.
///
/// Implementations make exactly one attempt per call; retrying and
/// fallback policy live in [`WeatherService`].
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Fetch current weather at a coordinate.
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherEstimate, WeatherError>;
}

/// OpenWeatherMap-backed provider.
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.openweathermap.org")
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("default reqwest client");
        Self { client, base_url: base_url.into(), api_key: api_key.into() }
    }

    /// Build a client from `OPENWEATHER_API_KEY`, if set and non-empty.
    pub fn from_env() -> Option<Self> {
        match std::env::var("OPENWEATHER_API_KEY") {
            Ok(key) if !key.is_empty() => Some(Self::new(key)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    rain: Option<OwmRain>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn name(&self) -> &'static str {
        "openweathermap"
    }

    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherEstimate, WeatherError> {
        let url = format!(
            "{}/data/2.5/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url, lat, lon, self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body: OwmResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))?;

        // The API reports rain over the last hour; scale to a rough
        // monthly figure on the scale the feature vector uses.
        let rainfall = body.rain.and_then(|r| r.one_hour).unwrap_or(0.0) * 24.0 * 30.0;

        Ok(WeatherEstimate {
            temperature: body.main.temp,
            humidity: body.main.humidity,
            rainfall,
        })
    }
}

// ============================================================================
// Weather Service
// ============================================================================

/// Weather resolution with caching and silent seasonal degradation.
///
/// Without a provider (no API key configured) every lookup is seasonal.
pub struct WeatherService {
    provider: Option<Arc<dyn WeatherProvider>>,
    cache: Cache<String, WeatherEstimate>,
}

impl WeatherService {
    pub fn new(provider: Option<Arc<dyn WeatherProvider>>) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        Self { provider, cache }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolve weather at a coordinate. Total: one live attempt, then the
    /// current seasonal band.
    pub async fn resolve(&self, lat: f64, lon: f64) -> (WeatherEstimate, WeatherSource) {
        let Some(provider) = &self.provider else {
            return (Season::current().estimate(), WeatherSource::SeasonalFallback);
        };

        let key = format!("{lat:.4}:{lon:.4}");
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!("weather cache hit for {}", key);
            return (hit, WeatherSource::Live);
        }

        match provider.fetch(lat, lon).await {
            Ok(estimate) => {
                self.cache.insert(key, estimate).await;
                (estimate, WeatherSource::Live)
            }
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    error = %e,
                    "live weather fetch failed, using seasonal estimate"
                );
                (Season::current().estimate(), WeatherSource::SeasonalFallback)
            }
        }
    }

    /// Resolve weather for a (state, district) pair via the coordinate
    /// table, substituting the centroid for pairs without an entry.
    pub async fn resolve_by_location(
        &self,
        state: &str,
        district: &str,
    ) -> (WeatherEstimate, WeatherSource) {
        let (lat, lon) =
            records::coordinates(state, district).unwrap_or(records::FALLBACK_COORDINATE);
        self.resolve(lat, lon).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl WeatherProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self, _lat: f64, _lon: f64) -> Result<WeatherEstimate, WeatherError> {
            Err(WeatherError::Connection("connection refused".into()))
        }
    }

    struct FixedProvider(WeatherEstimate);

    #[async_trait]
    impl WeatherProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(&self, _lat: f64, _lon: f64) -> Result<WeatherEstimate, WeatherError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_season_banding() {
        assert_eq!(Season::from_month(12), Season::Winter);
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(2), Season::Winter);
        assert_eq!(Season::from_month(3), Season::Summer);
        assert_eq!(Season::from_month(5), Season::Summer);
        assert_eq!(Season::from_month(6), Season::Monsoon);
        assert_eq!(Season::from_month(9), Season::Monsoon);
        assert_eq!(Season::from_month(10), Season::PostMonsoon);
        assert_eq!(Season::from_month(11), Season::PostMonsoon);
    }

    #[test]
    fn test_seasonal_estimates() {
        let monsoon = Season::Monsoon.estimate();
        assert_eq!(monsoon.temperature, 28.0);
        assert_eq!(monsoon.humidity, 85.0);
        assert_eq!(monsoon.rainfall, 250.0);

        let winter = Season::Winter.estimate();
        assert_eq!(winter.rainfall, 20.0);
    }

    #[tokio::test]
    async fn test_resolve_without_provider_is_seasonal() {
        let service = WeatherService::new(None);
        let (estimate, source) = service.resolve(17.385, 78.4867).await;
        assert_eq!(source, WeatherSource::SeasonalFallback);
        assert_eq!(estimate, Season::current().estimate());
    }

    #[tokio::test]
    async fn test_resolve_degrades_on_provider_failure() {
        // Forced transport failure still yields a usable triple for the
        // current month's band.
        let service = WeatherService::new(Some(Arc::new(FailingProvider)));
        let (estimate, source) = service.resolve(17.385, 78.4867).await;
        assert_eq!(source, WeatherSource::SeasonalFallback);
        assert_eq!(estimate, Season::current().estimate());
    }

    #[tokio::test]
    async fn test_resolve_passes_through_live_estimate() {
        let live = WeatherEstimate { temperature: 31.5, humidity: 64.0, rainfall: 12.0 };
        let service = WeatherService::new(Some(Arc::new(FixedProvider(live))));
        let (estimate, source) = service.resolve(17.385, 78.4867).await;
        assert_eq!(source, WeatherSource::Live);
        assert_eq!(estimate, live);
    }

    #[tokio::test]
    async fn test_resolve_by_location_uses_centroid_for_unknown_pairs() {
        // No coordinate entry and no provider: still a seasonal triple.
        let service = WeatherService::new(None);
        let (estimate, source) = service.resolve_by_location("Punjab", "Ludhiana").await;
        assert_eq!(source, WeatherSource::SeasonalFallback);
        assert_eq!(estimate, Season::current().estimate());
    }
}
