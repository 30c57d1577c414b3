// ABOUTME: Integration tests for the priority-chain day classifier
// ABOUTME: Covers rule precedence, confidence formulas, and reported factors
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use common::{hourly_set, init_test_logging, observation};
use pv_insight::intelligence::{DayClassifier, DayLabel};

#[tokio::test]
async fn test_pleasant_day_full_confidence() -> Result<()> {
    init_test_logging();
    let from = Utc::now() - Duration::days(1);
    let set = hourly_set(from, 24, |_, ts| {
        observation(ts, 22.0, 50.0, 0.0, 3.0, 30.0)
    });

    let result = DayClassifier::classify(&set);
    assert_eq!(result.label, DayLabel::Pleasant);
    assert_eq!(result.confidence_pct, 100.0);
    assert_eq!(result.factors.avg_temp_c, 22.0);
    assert_eq!(result.factors.avg_clouds_pct, 30.0);
    Ok(())
}

#[tokio::test]
async fn test_rainy_beats_hot() -> Result<()> {
    init_test_logging();
    let from = Utc::now() - Duration::days(1);
    // 33°C average would classify hot, but 6mm of rain takes priority
    let set = hourly_set(from, 6, |_, ts| {
        observation(ts, 33.0, 70.0, 1.0, 4.0, 80.0)
    });

    let result = DayClassifier::classify(&set);
    assert_eq!(result.label, DayLabel::Rainy);
    // 50 + 6 * 5 = 80
    assert_eq!(result.confidence_pct, 80.0);
    assert_eq!(result.factors.total_precipitation_mm, 6.0);
    Ok(())
}

#[tokio::test]
async fn test_cold_and_hot_boundaries_are_exclusive() -> Result<()> {
    init_test_logging();
    let from = Utc::now() - Duration::days(1);

    // Exactly at the cold threshold is not cold
    let at_cold = hourly_set(from, 4, |_, ts| observation(ts, 15.0, 50.0, 0.0, 3.0, 20.0));
    assert_eq!(DayClassifier::classify(&at_cold).label, DayLabel::Pleasant);

    // Exactly at the hot threshold is not hot
    let at_hot = hourly_set(from, 4, |_, ts| observation(ts, 30.0, 50.0, 0.0, 3.0, 20.0));
    assert_eq!(DayClassifier::classify(&at_hot).label, DayLabel::Pleasant);

    let below = hourly_set(from, 4, |_, ts| observation(ts, 14.9, 50.0, 0.0, 3.0, 20.0));
    assert_eq!(DayClassifier::classify(&below).label, DayLabel::Cold);

    let above = hourly_set(from, 4, |_, ts| observation(ts, 30.1, 50.0, 0.0, 3.0, 20.0));
    assert_eq!(DayClassifier::classify(&above).label, DayLabel::Hot);
    Ok(())
}

#[tokio::test]
async fn test_hot_confidence_formula() -> Result<()> {
    init_test_logging();
    let from = Utc::now() - Duration::days(1);
    let set = hourly_set(from, 8, |_, ts| {
        observation(ts, 36.0, 30.0, 0.0, 2.0, 5.0)
    });

    let result = DayClassifier::classify(&set);
    assert_eq!(result.label, DayLabel::Hot);
    // 50 + (36 - 30) * 2 = 62
    assert_eq!(result.confidence_pct, 62.0);
    Ok(())
}

#[tokio::test]
async fn test_pleasant_partial_conditions() -> Result<()> {
    init_test_logging();
    let from = Utc::now() - Duration::days(1);
    // Only the temperature condition holds: humidity 80%, clouds 90%
    let set = hourly_set(from, 8, |_, ts| {
        observation(ts, 25.0, 80.0, 0.0, 3.0, 90.0)
    });

    let result = DayClassifier::classify(&set);
    assert_eq!(result.label, DayLabel::Pleasant);
    assert_eq!(result.confidence_pct, 33.3);
    Ok(())
}
