// ABOUTME: Human-comfort scoring from period averages of temperature, humidity, and rain
// ABOUTME: Three weighted bands (50/30/20 points) with linear penalties outside ideal ranges
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use crate::constants::comfort;
use serde::{Deserialize, Serialize};

/// Period averages the comfort score is computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComfortInput {
    /// Mean temperature (°C)
    pub avg_temp_c: f64,
    /// Mean relative humidity (%)
    pub avg_humidity_pct: f64,
    /// Total precipitation over the period (mm)
    pub total_precipitation_mm: f64,
}

/// Comfort score with its band breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComfortReport {
    /// Overall score (0-100, integer-rounded)
    pub score: f64,
    /// Temperature band contribution (up to 50, may go negative)
    pub temperature_points: f64,
    /// Humidity band contribution (up to 30, may go negative)
    pub humidity_points: f64,
    /// Precipitation band contribution (0 to 20)
    pub precipitation_points: f64,
}

/// Banded comfort scorer.
///
/// Temperature and humidity penalties may drive their bands negative; the
/// precipitation band floors at zero on its own. Only the summed total is
/// clamped to [0, 100], so an extreme in one band can erase the others.
pub struct ComfortScorer;

impl ComfortScorer {
    /// Score comfort for the given period averages
    #[must_use]
    pub fn score(input: ComfortInput) -> ComfortReport {
        let temperature_points = distance_outside(
            input.avg_temp_c,
            comfort::TEMP_IDEAL_MIN_C,
            comfort::TEMP_IDEAL_MAX_C,
        )
        .mul_add(-comfort::TEMP_PENALTY_PER_C, comfort::TEMPERATURE_POINTS);

        let humidity_points = distance_outside(
            input.avg_humidity_pct,
            comfort::HUMIDITY_IDEAL_MIN_PCT,
            comfort::HUMIDITY_IDEAL_MAX_PCT,
        )
        .mul_add(
            -comfort::HUMIDITY_PENALTY_PER_PCT,
            comfort::HUMIDITY_POINTS,
        );

        let precipitation_points = input
            .total_precipitation_mm
            .mul_add(
                -comfort::PRECIPITATION_PENALTY_PER_MM,
                comfort::PRECIPITATION_POINTS,
            )
            .max(0.0);

        let score = (temperature_points + humidity_points + precipitation_points)
            .clamp(0.0, 100.0)
            .round();

        ComfortReport {
            score,
            temperature_points,
            humidity_points,
            precipitation_points,
        }
    }
}

/// How far `value` falls outside the closed band `[min, max]`; 0 inside it
fn distance_outside(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min - value
    } else if value > max {
        value - max
    } else {
        0.0
    }
}
