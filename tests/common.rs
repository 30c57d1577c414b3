// ABOUTME: Shared test utilities and builders for integration tests
// ABOUTME: Provides observation builders, test doubles, and cache setup helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
#![allow(dead_code, clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Shared test utilities for `pv_insight` integration tests

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use pv_insight::cache::memory::InMemoryInsightCache;
use pv_insight::cache::{CacheConfig, InsightCache};
use pv_insight::errors::{AppError, AppResult};
use pv_insight::intelligence::NarrativeEnhancer;
use pv_insight::models::{Insight, ObservationSet, WeatherObservation};
use pv_insight::observations::{InMemoryObservationRepository, ObservationRepository};
use pv_insight::services::Clock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Build a single observation with explicit values
pub fn observation(
    timestamp: DateTime<Utc>,
    temperature_c: f64,
    relative_humidity_pct: f64,
    precipitation_mm: f64,
    wind_speed_mps: f64,
    clouds_pct: f64,
) -> WeatherObservation {
    WeatherObservation {
        timestamp,
        temperature_c,
        relative_humidity_pct,
        precipitation_mm,
        wind_speed_mps,
        clouds_pct,
        estimated_irradiance_wm2: None,
    }
}

/// Pleasant baseline sample: 20°C, 50% humidity, dry, light wind, few clouds
pub fn pleasant_observation(timestamp: DateTime<Utc>) -> WeatherObservation {
    observation(timestamp, 20.0, 50.0, 0.0, 5.0, 30.0)
}

/// Build an observation set from hourly samples produced by `make`
pub fn hourly_set(
    from: DateTime<Utc>,
    hours: i64,
    make: impl Fn(i64, DateTime<Utc>) -> WeatherObservation,
) -> ObservationSet {
    let observations = (0..hours)
        .map(|h| make(h, from + Duration::hours(h)))
        .collect();
    ObservationSet::new(from, from + Duration::hours(hours), observations)
}

/// In-memory cache without the background cleanup task, which conflicts
/// with per-test tokio runtimes
pub async fn create_test_cache() -> Result<InMemoryInsightCache> {
    let config = CacheConfig {
        enable_background_cleanup: false,
        ..CacheConfig::default()
    };
    Ok(InMemoryInsightCache::new(config).await?)
}

/// Repository wrapper counting how many queries reach the store
pub struct CountingRepository {
    inner: InMemoryObservationRepository,
    queries: AtomicUsize,
}

impl CountingRepository {
    pub fn new(observations: Vec<WeatherObservation>) -> Self {
        Self {
            inner: InMemoryObservationRepository::with_observations(observations),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ObservationRepository for CountingRepository {
    async fn query(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        location: Option<&str>,
    ) -> AppResult<Vec<WeatherObservation>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(from, to, location).await
    }
}

/// Clock frozen at a fixed instant
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Enhancer returning a fixed string
pub struct StaticEnhancer(pub String);

#[async_trait::async_trait]
impl NarrativeEnhancer for StaticEnhancer {
    async fn enhance(&self, _insight: &Insight) -> AppResult<String> {
        Ok(self.0.clone())
    }
}

/// Enhancer that always fails
pub struct FailingEnhancer;

#[async_trait::async_trait]
impl NarrativeEnhancer for FailingEnhancer {
    async fn enhance(&self, _insight: &Insight) -> AppResult<String> {
        Err(AppError::external_service(
            "enhancer",
            "model endpoint unavailable",
        ))
    }
}

/// Convenience: an Arc'd repository seeded with `days` of pleasant hourly
/// samples ending at `to`
pub fn pleasant_repository(to: DateTime<Utc>, days: i64) -> Arc<InMemoryObservationRepository> {
    let from = to - Duration::days(days);
    let observations = (0..days * 24)
        .map(|h| pleasant_observation(from + Duration::hours(h)))
        .collect();
    Arc::new(InMemoryObservationRepository::with_observations(
        observations,
    ))
}
