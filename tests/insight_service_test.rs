// ABOUTME: End-to-end tests for the insight service orchestrator
// ABOUTME: Covers cache-first reads, forced regeneration, error paths, and enhancer fallback
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use common::{
    create_test_cache, init_test_logging, observation, pleasant_observation, pleasant_repository,
    CountingRepository, FailingEnhancer, StaticEnhancer,
};
use pv_insight::errors::ErrorCode;
use pv_insight::intelligence::DayLabel;
use pv_insight::observations::InMemoryObservationRepository;
use pv_insight::services::InsightService;
use std::sync::Arc;

fn types() -> Vec<String> {
    vec!["pv".into(), "comfort".into()]
}

#[tokio::test]
async fn test_get_serves_second_request_from_cache() -> Result<()> {
    init_test_logging();
    let to = Utc::now();
    let from = to - Duration::days(5);
    let observations = (0..5 * 24)
        .map(|h| pleasant_observation(from + Duration::hours(h)))
        .collect();
    let repository = Arc::new(CountingRepository::new(observations));
    let cache = Arc::new(create_test_cache().await?);
    let service = InsightService::new(repository.clone(), cache);

    let first = service.get(from, to, types(), false).await?;
    let second = service.get(from, to, types(), false).await?;

    assert_eq!(repository.query_count(), 1);
    assert_eq!(first.id, second.id);
    Ok(())
}

#[tokio::test]
async fn test_force_regenerate_recomputes() -> Result<()> {
    init_test_logging();
    let to = Utc::now();
    let from = to - Duration::days(3);
    let observations = (0..3 * 24)
        .map(|h| pleasant_observation(from + Duration::hours(h)))
        .collect();
    let repository = Arc::new(CountingRepository::new(observations));
    let cache = Arc::new(create_test_cache().await?);
    let service = InsightService::new(repository.clone(), cache);

    let first = service.get(from, to, types(), false).await?;
    let forced = service.get(from, to, types(), true).await?;

    assert_eq!(repository.query_count(), 2);
    assert_ne!(first.id, forced.id);
    // Same inputs, same derived values
    assert_eq!(first.statistics, forced.statistics);
    assert_eq!(first.classification, forced.classification);
    Ok(())
}

#[tokio::test]
async fn test_generate_is_deterministic_for_same_inputs() -> Result<()> {
    init_test_logging();
    let to = Utc::now();
    let from = to - Duration::days(4);
    let repository = pleasant_repository(to, 4);
    let cache = Arc::new(create_test_cache().await?);
    let service = InsightService::new(repository, cache);

    let a = service.generate(from, to, types()).await?;
    let b = service.generate(from, to, types()).await?;

    assert_ne!(a.id, b.id);
    assert_eq!(a.statistics, b.statistics);
    assert_eq!(a.trend, b.trend);
    assert_eq!(a.classification, b.classification);
    assert_eq!(a.scores, b.scores);
    assert_eq!(a.pv_metrics.estimated_production_pct, b.pv_metrics.estimated_production_pct);
    Ok(())
}

#[tokio::test]
async fn test_pleasant_week_end_to_end() -> Result<()> {
    init_test_logging();
    let to = Utc::now();
    let from = to - Duration::days(5);
    let repository = pleasant_repository(to, 5);
    let cache = Arc::new(create_test_cache().await?);
    let service = InsightService::new(repository, cache);

    let insight = service.get(from, to, types(), false).await?;

    assert_eq!(insight.classification.label, DayLabel::Pleasant);
    assert_eq!(insight.classification.confidence_pct, 100.0);
    assert_eq!(insight.scores.comfort_score, 100.0);
    assert!(insight.alerts.is_empty());
    // No derating of any kind, so full estimated production
    assert_eq!(insight.pv_metrics.estimated_production_pct, 100.0);
    assert!(insight.summary.contains("predominantly pleasant"));
    assert_eq!(insight.period.from, from);
    assert_eq!(insight.period.to, to);
    Ok(())
}

#[tokio::test]
async fn test_high_wind_reduces_production_by_ten_percent() -> Result<()> {
    init_test_logging();
    let to = Utc::now();
    let from = to - Duration::days(2);
    let observations = (0..2 * 24)
        .map(|h| {
            // One stow-level gust two days back, otherwise calm and clear
            let wind = if h == 0 { 25.0 } else { 4.0 };
            observation(from + Duration::hours(h), 20.0, 50.0, 0.0, wind, 10.0)
        })
        .collect();
    let repository = Arc::new(InMemoryObservationRepository::with_observations(
        observations,
    ));
    let cache = Arc::new(create_test_cache().await?);
    let service = InsightService::new(repository, cache);

    let insight = service.get(from, to, types(), false).await?;
    assert_eq!(insight.pv_metrics.estimated_production_pct, 90.0);
    Ok(())
}

#[tokio::test]
async fn test_no_observations_is_no_data() -> Result<()> {
    init_test_logging();
    let to = Utc::now();
    let from = to - Duration::days(7);
    let repository = Arc::new(InMemoryObservationRepository::new());
    let cache = Arc::new(create_test_cache().await?);
    let service = InsightService::new(repository, cache);

    let err = service.get(from, to, types(), false).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NoData);
    assert_eq!(err.http_status(), 404);
    Ok(())
}

#[tokio::test]
async fn test_inverted_period_is_invalid_input() -> Result<()> {
    init_test_logging();
    let now = Utc::now();
    let repository = Arc::new(InMemoryObservationRepository::new());
    let cache = Arc::new(create_test_cache().await?);
    let service = InsightService::new(repository, cache);

    let err = service
        .get(now, now - Duration::days(1), types(), false)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    Ok(())
}

#[tokio::test]
async fn test_enhancer_replaces_summary() -> Result<()> {
    init_test_logging();
    let to = Utc::now();
    let from = to - Duration::days(2);
    let repository = pleasant_repository(to, 2);
    let cache = Arc::new(create_test_cache().await?);
    let service = InsightService::new(repository, cache)
        .with_enhancer(Arc::new(StaticEnhancer("A lovely stretch of weather.".into())));

    let insight = service.get(from, to, types(), false).await?;
    assert_eq!(insight.summary, "A lovely stretch of weather.");
    Ok(())
}

#[tokio::test]
async fn test_failed_enhancer_falls_back_to_rule_based_summary() -> Result<()> {
    init_test_logging();
    let to = Utc::now();
    let from = to - Duration::days(2);
    let repository = pleasant_repository(to, 2);
    let cache = Arc::new(create_test_cache().await?);
    let service =
        InsightService::new(repository, cache).with_enhancer(Arc::new(FailingEnhancer));

    let insight = service.get(from, to, types(), false).await?;
    assert!(insight.summary.starts_with("Over the last 2 days"));
    Ok(())
}

#[tokio::test]
async fn test_insight_expiry_matches_configured_ttl() -> Result<()> {
    init_test_logging();
    let to = Utc::now();
    let from = to - Duration::days(1);
    let repository = pleasant_repository(to, 1);
    let cache = Arc::new(create_test_cache().await?);
    let service = InsightService::new(repository, cache)
        .with_ttl(std::time::Duration::from_secs(600));

    let insight = service.get(from, to, types(), false).await?;
    assert_eq!(insight.expires_at - insight.generated_at, Duration::seconds(600));
    Ok(())
}

#[tokio::test]
async fn test_invalidate_period_clears_cached_variants() -> Result<()> {
    init_test_logging();
    let to = Utc::now();
    let from = to - Duration::days(3);
    let observations = (0..3 * 24)
        .map(|h| pleasant_observation(from + Duration::hours(h)))
        .collect();
    let repository = Arc::new(CountingRepository::new(observations));
    let cache = Arc::new(create_test_cache().await?);
    let service = InsightService::new(repository.clone(), cache);

    service.get(from, to, vec!["pv".into()], false).await?;
    service.get(from, to, vec!["comfort".into()], false).await?;
    assert_eq!(repository.query_count(), 2);

    let removed = service.invalidate_period(from, to).await?;
    assert_eq!(removed, 2);

    // Next read recomputes
    service.get(from, to, vec!["pv".into()], false).await?;
    assert_eq!(repository.query_count(), 3);
    Ok(())
}
