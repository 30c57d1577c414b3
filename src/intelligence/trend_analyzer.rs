// ABOUTME: Ordinary least-squares trend detection over an observation series
// ABOUTME: Classifies temperature or humidity series as rising, falling, or stable with R² confidence
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
#![allow(clippy::cast_precision_loss)] // Safe: sample counts are far below 2^52

use super::{round1, round3};
use crate::constants::trend::STABLE_SLOPE_THRESHOLD;
use crate::models::ObservationSet;
use serde::{Deserialize, Serialize};

/// Direction of a detected trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Values increase over the period
    Rising,
    /// Values decrease over the period
    Falling,
    /// No meaningful change over the period
    Stable,
}

/// Which observation field to run the regression on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendField {
    /// Air temperature (°C)
    Temperature,
    /// Relative humidity (%)
    Humidity,
}

/// Outcome of a trend analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Classified direction
    pub direction: TrendDirection,
    /// Regression slope in field units per observation step (3 decimals)
    pub slope: f64,
    /// Goodness-of-fit confidence, R² scaled to 0-100 (1 decimal)
    pub confidence_pct: f64,
}

impl TrendResult {
    const fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            slope: 0.0,
            confidence_pct: 0.0,
        }
    }
}

/// Least-squares trend analyzer.
///
/// The regression runs over observation index, not wall-clock time, so the
/// slope reads as change per observation step. Uneven sampling intervals
/// therefore distort the slope; callers with irregular series should
/// resample first.
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Detect the trend of `field` over the set.
    ///
    /// Fewer than two valid samples yields a stable result with zero slope
    /// and zero confidence rather than an error. A slope within
    /// ±[`STABLE_SLOPE_THRESHOLD`] classifies as stable regardless of fit.
    #[must_use]
    pub fn analyze(set: &ObservationSet, field: TrendField) -> TrendResult {
        let values = match field {
            TrendField::Temperature => set.temperatures(),
            TrendField::Humidity => set.humidities(),
        };
        Self::analyze_series(&values)
    }

    fn analyze_series(values: &[f64]) -> TrendResult {
        if values.len() < 2 {
            return TrendResult::stable();
        }

        let n = values.len() as f64;
        let sum_x = (0..values.len()).map(|i| i as f64).sum::<f64>();
        let sum_y = values.iter().sum::<f64>();
        let sum_xx = (0..values.len()).map(|i| (i * i) as f64).sum::<f64>();
        let sum_xy = values
            .iter()
            .enumerate()
            .map(|(i, y)| i as f64 * y)
            .sum::<f64>();

        let denominator = n.mul_add(sum_xx, -(sum_x * sum_x));
        if denominator.abs() < f64::EPSILON {
            return TrendResult::stable();
        }
        let slope = n.mul_add(sum_xy, -(sum_x * sum_y)) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        let mean_y = sum_y / n;
        let ss_tot = values
            .iter()
            .map(|y| {
                let diff = y - mean_y;
                diff * diff
            })
            .sum::<f64>();
        let ss_res = values
            .iter()
            .enumerate()
            .map(|(i, y)| {
                let diff = y - slope.mul_add(i as f64, intercept);
                diff * diff
            })
            .sum::<f64>();

        // A flat series has no variance to explain; report zero confidence
        // instead of a vacuous perfect fit.
        let confidence = if ss_tot.abs() < f64::EPSILON {
            0.0
        } else {
            ((1.0 - ss_res / ss_tot).clamp(0.0, 1.0)) * 100.0
        };

        let direction = if slope.abs() < STABLE_SLOPE_THRESHOLD {
            TrendDirection::Stable
        } else if slope > 0.0 {
            TrendDirection::Rising
        } else {
            TrendDirection::Falling
        };

        TrendResult {
            direction,
            slope: round3(slope),
            confidence_pct: round1(confidence),
        }
    }
}
