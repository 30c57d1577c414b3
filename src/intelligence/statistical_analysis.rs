// ABOUTME: Aggregate statistics over an observation set for temperature, humidity, wind, and rain
// ABOUTME: Implements mean, min/max, and population standard deviation with strict empty-input errors
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
#![allow(clippy::cast_precision_loss)] // Safe: sample counts are far below 2^52

use super::{mean, round1};
use crate::errors::{AppError, AppResult};
use crate::models::ObservationSet;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over one observation set.
///
/// All values are rounded to one decimal place. Standard deviations are
/// population deviations (divide by N): the set is treated as the whole
/// period, not a sample drawn from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    /// Mean temperature (°C)
    pub avg_temp_c: f64,
    /// Minimum temperature (°C)
    pub min_temp_c: f64,
    /// Maximum temperature (°C)
    pub max_temp_c: f64,
    /// Population standard deviation of temperature (°C)
    pub std_dev_temp_c: f64,
    /// Mean relative humidity (%)
    pub avg_humidity_pct: f64,
    /// Population standard deviation of humidity (%)
    pub std_dev_humidity_pct: f64,
    /// Mean wind speed (m/s); 0.0 when no valid wind samples exist
    pub avg_wind_speed_mps: f64,
    /// Maximum wind speed (m/s); 0.0 when no valid wind samples exist
    pub max_wind_speed_mps: f64,
    /// Total precipitation over the set (mm)
    pub total_precipitation_mm: f64,
    /// Number of observations the statistics were computed from
    pub sample_count: usize,
}

/// Statistical analyzer over observation sets
pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    /// Compute aggregate statistics for the set.
    ///
    /// Non-finite samples are excluded field by field, so a corrupt
    /// humidity reading does not discard its temperature.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if the set is empty or if no valid
    /// temperature or humidity samples remain after filtering.
    pub fn analyze(set: &ObservationSet) -> AppResult<StatisticsSummary> {
        if set.is_empty() {
            return Err(AppError::insufficient_data(
                "cannot compute statistics over an empty observation set",
            ));
        }

        let temperatures = set.temperatures();
        if temperatures.is_empty() {
            return Err(AppError::insufficient_data(
                "no valid temperature samples in observation set",
            ));
        }
        let humidities = set.humidities();
        if humidities.is_empty() {
            return Err(AppError::insufficient_data(
                "no valid humidity samples in observation set",
            ));
        }

        let avg_temp = mean(&temperatures);
        let avg_humidity = mean(&humidities);
        let min_temp = temperatures.iter().copied().fold(f64::INFINITY, f64::min);
        let max_temp = temperatures
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let wind_speeds = set.wind_speeds();
        let avg_wind = mean(&wind_speeds);
        let max_wind = wind_speeds.iter().copied().fold(0.0_f64, f64::max);

        Ok(StatisticsSummary {
            avg_temp_c: round1(avg_temp),
            min_temp_c: round1(min_temp),
            max_temp_c: round1(max_temp),
            std_dev_temp_c: round1(Self::population_std_dev(&temperatures, avg_temp)),
            avg_humidity_pct: round1(avg_humidity),
            std_dev_humidity_pct: round1(Self::population_std_dev(&humidities, avg_humidity)),
            avg_wind_speed_mps: round1(avg_wind),
            max_wind_speed_mps: round1(max_wind),
            total_precipitation_mm: round1(set.total_precipitation_mm()),
            sample_count: set.len(),
        })
    }

    fn population_std_dev(values: &[f64], mean_value: f64) -> f64 {
        let variance = values
            .iter()
            .map(|v| {
                let diff = v - mean_value;
                diff * diff
            })
            .sum::<f64>()
            / values.len() as f64;
        variance.sqrt()
    }
}
