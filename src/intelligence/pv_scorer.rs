// ABOUTME: PV production scoring from irradiance, temperature, cloud cover, and soiling risk
// ABOUTME: Four capped components (40/20/20/20 points) plus a notional kWh production estimate
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::round1;
use crate::constants::pv;
use serde::{Deserialize, Serialize};

/// Period averages the PV score is computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PvInput {
    /// Mean estimated irradiance (W/m²)
    pub avg_irradiance_wm2: f64,
    /// Mean temperature (°C)
    pub avg_temp_c: f64,
    /// Mean cloud cover (%)
    pub avg_clouds_pct: f64,
    /// Soiling risk score from the soiling rule (0-100)
    pub soiling_risk_score: f64,
}

/// PV production score with its component breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PvReport {
    /// Overall score (0-100, 1 decimal)
    pub score: f64,
    /// Irradiance component (0 to 40)
    pub irradiance_points: f64,
    /// Temperature component (0 to 20)
    pub temperature_points: f64,
    /// Cloud-cover component (0 to 20)
    pub cloud_points: f64,
    /// Soiling component (0 to 20)
    pub soiling_points: f64,
    /// Production estimate against the notional 100 kWh base capacity.
    /// Not plant-specific; rescale externally for a real installation.
    pub estimated_production_kwh: f64,
}

/// Component-capped PV production scorer.
///
/// Unlike the comfort bands, every component here is individually clamped
/// to its point range, so one bad input cannot erase the others. The
/// temperature penalty is asymmetric: heat above the STC reference costs
/// twice as much per degree as cold below it.
pub struct PvScorer;

impl PvScorer {
    /// Score expected PV production for the given period averages
    #[must_use]
    pub fn score(input: PvInput) -> PvReport {
        let irradiance_points = (pv::IRRADIANCE_POINTS
            * (input.avg_irradiance_wm2 / pv::STC_IRRADIANCE_WM2).min(1.0))
        .max(0.0);

        let temp_penalty = if input.avg_temp_c > crate::constants::heat::STC_TEMPERATURE_C {
            (input.avg_temp_c - crate::constants::heat::STC_TEMPERATURE_C) * pv::HEAT_PENALTY_PER_C
        } else {
            (crate::constants::heat::STC_TEMPERATURE_C - input.avg_temp_c) * pv::COLD_PENALTY_PER_C
        };
        let temperature_points =
            (pv::TEMPERATURE_POINTS - temp_penalty).clamp(0.0, pv::TEMPERATURE_POINTS);

        let cloud_points = (pv::CLOUD_POINTS * (1.0 - input.avg_clouds_pct / 100.0))
            .clamp(0.0, pv::CLOUD_POINTS);

        let soiling_points = (pv::SOILING_POINTS * (1.0 - input.soiling_risk_score / 100.0))
            .clamp(0.0, pv::SOILING_POINTS);

        let score = round1(
            (irradiance_points + temperature_points + cloud_points + soiling_points)
                .clamp(0.0, 100.0),
        );

        PvReport {
            score,
            irradiance_points,
            temperature_points,
            cloud_points,
            soiling_points,
            estimated_production_kwh: round1(pv::NOTIONAL_BASE_CAPACITY_KWH * score / 100.0),
        }
    }
}
