// ABOUTME: Demo binary seeding a week of synthetic weather data and printing one insight
// ABOUTME: Exercises the full pipeline end to end with the in-memory repository and cache
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use anyhow::Result;
use chrono::{Duration, Utc};
use pv_insight::cache::memory::InMemoryInsightCache;
use pv_insight::cache::InsightCache;
use pv_insight::config::EngineConfig;
use pv_insight::models::WeatherObservation;
use pv_insight::observations::InMemoryObservationRepository;
use pv_insight::services::InsightService;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    pv_insight::logging::init_from_env()?;
    let config = EngineConfig::from_env()?;
    info!("engine configuration: {}", config.summary());

    let repository = Arc::new(InMemoryObservationRepository::with_observations(
        synthetic_week(),
    ));
    let cache = Arc::new(InMemoryInsightCache::new(config.cache_config()).await?);
    let service = InsightService::new(repository, cache).with_ttl(config.insight_ttl());

    let to = Utc::now();
    let from = to - Duration::days(7);
    let insight = service
        .get(from, to, vec!["pv".into(), "comfort".into()], false)
        .await?;

    info!(id = %insight.id, "insight generated");
    println!("{}", serde_json::to_string_pretty(&insight)?);

    // Second call should be served from cache
    let cached = service
        .get(from, to, vec!["comfort".into(), "pv".into()], false)
        .await?;
    info!(
        cache_hit = cached.id == insight.id,
        "repeat request resolved"
    );

    Ok(())
}

/// A week of hourly samples with a mild warm-up, an afternoon irradiance
/// curve, and one rainy day in the middle
fn synthetic_week() -> Vec<WeatherObservation> {
    let to = Utc::now();
    let from = to - Duration::days(7);
    let mut observations = Vec::new();

    for hour in 0..(7 * 24_i32) {
        let timestamp = from + Duration::hours(i64::from(hour));
        let day = hour / 24;
        let hour_of_day = hour % 24;

        let daylight = f64::from(hour_of_day) - 12.0;
        let irradiance = (900.0 - daylight * daylight * 25.0).max(0.0);
        let rainy_day = day == 3;

        observations.push(WeatherObservation {
            timestamp,
            temperature_c: 18.0 + f64::from(day) * 0.8 + f64::from(hour_of_day) * 0.2,
            relative_humidity_pct: if rainy_day { 85.0 } else { 48.0 },
            precipitation_mm: if rainy_day && hour_of_day < 6 { 1.5 } else { 0.0 },
            wind_speed_mps: 3.0 + f64::from(hour_of_day % 5),
            clouds_pct: if rainy_day { 95.0 } else { 25.0 },
            estimated_irradiance_wm2: Some(if rainy_day { irradiance * 0.2 } else { irradiance }),
        });
    }

    observations
}
