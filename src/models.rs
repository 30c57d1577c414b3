// ABOUTME: Core data model for weather observations, observation sets, and insights
// ABOUTME: Defines the immutable records flowing between analyzers, scorers, and the cache
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Engine data model.
//!
//! [`WeatherObservation`] is a single immutable sample. [`ObservationSet`]
//! owns the samples for one queried period, ordered by timestamp ascending
//! so trend and streak logic can rely on observation order. [`Insight`] is
//! the cached artifact assembled by the orchestrator.

use crate::intelligence::day_classifier::DayClassification;
use crate::intelligence::derating::{
    CloudyStreakResult, HeatDeratingResult, SoilingRiskResult, WindDeratingResult,
};
use crate::intelligence::narrative::Alert;
use crate::intelligence::trend_analyzer::{TrendDirection, TrendResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One weather sample. Immutable once created; the engine never mutates
/// observations after loading them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Sample instant
    pub timestamp: DateTime<Utc>,
    /// Air temperature (°C)
    pub temperature_c: f64,
    /// Relative humidity (0-100%)
    pub relative_humidity_pct: f64,
    /// Precipitation since the previous sample (mm, ≥0)
    #[serde(default)]
    pub precipitation_mm: f64,
    /// Wind speed (m/s, ≥0)
    pub wind_speed_mps: f64,
    /// Cloud cover (0-100%)
    pub clouds_pct: f64,
    /// Estimated solar irradiance when the collector provides it (W/m²)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_irradiance_wm2: Option<f64>,
}

/// Half-open time window `[from, to)` an insight covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightPeriod {
    /// Inclusive start of the period
    pub from: DateTime<Utc>,
    /// Exclusive end of the period
    pub to: DateTime<Utc>,
}

/// Ordered collection of observations for a half-open period `[from, to)`.
///
/// The constructor sorts by timestamp ascending; every analyzer relies on
/// that order. The set is supplied per call and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSet {
    period: InsightPeriod,
    observations: Vec<WeatherObservation>,
}

impl ObservationSet {
    /// Create a set for `[from, to)`, sorting observations by timestamp ascending
    #[must_use]
    pub fn new(
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        mut observations: Vec<WeatherObservation>,
    ) -> Self {
        observations.sort_by_key(|obs| obs.timestamp);
        Self {
            period: InsightPeriod { from, to },
            observations,
        }
    }

    /// The period this set covers
    #[must_use]
    pub const fn period(&self) -> InsightPeriod {
        self.period
    }

    /// Observations in timestamp-ascending order
    #[must_use]
    pub fn observations(&self) -> &[WeatherObservation] {
        &self.observations
    }

    /// Whether the set holds no observations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of observations in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Valid (finite) temperature samples in observation order
    #[must_use]
    pub fn temperatures(&self) -> Vec<f64> {
        self.finite(|obs| obs.temperature_c)
    }

    /// Valid (finite) humidity samples in observation order
    #[must_use]
    pub fn humidities(&self) -> Vec<f64> {
        self.finite(|obs| obs.relative_humidity_pct)
    }

    /// Valid (finite) cloud-cover samples in observation order
    #[must_use]
    pub fn cloud_covers(&self) -> Vec<f64> {
        self.finite(|obs| obs.clouds_pct)
    }

    /// Valid (finite) wind-speed samples in observation order
    #[must_use]
    pub fn wind_speeds(&self) -> Vec<f64> {
        self.finite(|obs| obs.wind_speed_mps)
    }

    /// Total precipitation over the set (mm); negative or non-finite
    /// samples are dropped
    #[must_use]
    pub fn total_precipitation_mm(&self) -> f64 {
        self.observations
            .iter()
            .map(|obs| obs.precipitation_mm)
            .filter(|p| p.is_finite() && *p >= 0.0)
            .sum()
    }

    /// Mean estimated irradiance over all observations, treating missing
    /// values as 0 W/m² (a sample without an estimate contributes nothing)
    #[must_use]
    pub fn avg_estimated_irradiance_wm2(&self) -> f64 {
        if self.observations.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .observations
            .iter()
            .map(|obs| obs.estimated_irradiance_wm2.unwrap_or(0.0))
            .filter(|v| v.is_finite())
            .sum();
        total / self.observations.len() as f64
    }

    fn finite(&self, field: impl Fn(&WeatherObservation) -> f64) -> Vec<f64> {
        self.observations
            .iter()
            .map(field)
            .filter(|v| v.is_finite())
            .collect()
    }
}

/// Aggregated statistics stored on an insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightStatistics {
    /// Mean temperature (°C, 1 decimal)
    pub avg_temp_c: f64,
    /// Mean relative humidity (%, 1 decimal)
    pub avg_humidity_pct: f64,
    /// Minimum temperature (°C, 1 decimal)
    pub min_temp_c: f64,
    /// Maximum temperature (°C, 1 decimal)
    pub max_temp_c: f64,
    /// Population standard deviation of temperature (°C, 1 decimal)
    pub std_dev_temp_c: f64,
    /// Population standard deviation of humidity (%, 1 decimal)
    pub std_dev_humidity_pct: f64,
    /// Mean wind speed (m/s, 1 decimal)
    pub avg_wind_speed_mps: f64,
    /// Maximum wind speed (m/s, 1 decimal)
    pub max_wind_speed_mps: f64,
    /// Total precipitation over the period (mm, 1 decimal)
    pub total_precipitation_mm: f64,
    /// Direction of the humidity trend over the period
    pub humidity_trend: TrendDirection,
}

/// PV derating metrics and production estimates stored on an insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvMetrics {
    /// Soiling risk from trailing rainfall accumulation
    pub soiling_risk: SoilingRiskResult,
    /// Longest run of consecutive cloudy days
    pub consecutive_cloudy_days: CloudyStreakResult,
    /// Temperature derating relative to STC
    pub heat_derating: HeatDeratingResult,
    /// Wind-speed derating risk
    pub wind_derating: WindDeratingResult,
    /// Estimated production as a percentage of maximum capacity (1 decimal)
    pub estimated_production_pct: f64,
    /// Estimated production against the notional 100 kWh base capacity
    pub estimated_production_kwh: f64,
}

/// Composite scores stored on an insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightScores {
    /// Human-comfort score (0-100, integer-rounded)
    pub comfort_score: f64,
    /// PV production score (0-100)
    pub pv_production_score: f64,
}

/// The cached insight artifact.
///
/// Created by the orchestrator on a cache miss or forced regeneration,
/// read-only afterwards, and uniquely identified by
/// `(period.from, period.to, types)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Unique id of this generated artifact
    pub id: Uuid,
    /// Period the insight covers
    pub period: InsightPeriod,
    /// Requested insight types; part of the cache key, not a field filter
    pub types: Vec<String>,
    /// Aggregated statistics
    pub statistics: InsightStatistics,
    /// Temperature trend over the period
    pub trend: TrendResult,
    /// Single-label day classification
    pub classification: DayClassification,
    /// PV derating metrics and production estimates
    pub pv_metrics: PvMetrics,
    /// Alerts derived from the recent observation window
    pub alerts: Vec<Alert>,
    /// Prose summary of the period
    pub summary: String,
    /// Composite comfort and production scores
    pub scores: InsightScores,
    /// When the insight was generated
    pub generated_at: DateTime<Utc>,
    /// When the cached insight expires
    pub expires_at: DateTime<Utc>,
}
