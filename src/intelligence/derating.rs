// ABOUTME: PV derating rules: soiling risk, consecutive cloudy days, heat derating, wind risk
// ABOUTME: Each rule maps an observation set onto a level or percentage with an explanatory message
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::{mean, round1};
use crate::constants::{cloudy, heat, soiling, wind};
use crate::models::ObservationSet;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Qualitative risk level reported by threshold rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Low,
    Medium,
    High,
}

/// Soiling risk derived from trailing rainfall accumulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilingRiskResult {
    /// Qualitative risk level
    pub level: RuleLevel,
    /// Risk score (0-100, 1 decimal)
    pub score: f64,
    /// Rainfall accumulated inside the trailing window (mm, 1 decimal)
    pub accumulated_precipitation_mm: f64,
    /// Explanation of the assessment
    pub message: String,
}

/// Soiling risk rule.
///
/// Heavy recent rainfall leaves residue on panel surfaces faster than it
/// washes off at these accumulations, so more trailing rain means more
/// soiling risk. The window is anchored on the injected `now`, not on the
/// queried period, so historical queries read as "risk as of now".
pub struct SoilingRiskRule;

impl SoilingRiskRule {
    /// Assess soiling risk from rainfall inside the trailing window
    #[must_use]
    pub fn evaluate(set: &ObservationSet, now: DateTime<Utc>) -> SoilingRiskResult {
        if set.is_empty() {
            return SoilingRiskResult {
                level: RuleLevel::Low,
                score: 0.0,
                accumulated_precipitation_mm: 0.0,
                message: "insufficient data".into(),
            };
        }

        let window_start = now - Duration::days(soiling::TRAILING_WINDOW_DAYS);
        let accumulated: f64 = set
            .observations()
            .iter()
            .filter(|obs| obs.timestamp >= window_start)
            .map(|obs| obs.precipitation_mm)
            .filter(|p| p.is_finite() && *p >= 0.0)
            .sum();

        let (level, score, message) = if accumulated >= soiling::HIGH_THRESHOLD_MM {
            (
                RuleLevel::High,
                (accumulated / soiling::HIGH_THRESHOLD_MM * 100.0).min(100.0),
                format!(
                    "high soiling risk: {accumulated:.1} mm of rain in the last {} days",
                    soiling::TRAILING_WINDOW_DAYS
                ),
            )
        } else if accumulated >= soiling::MEDIUM_THRESHOLD_MM {
            (
                RuleLevel::Medium,
                accumulated / soiling::MEDIUM_THRESHOLD_MM * 50.0,
                format!(
                    "moderate soiling risk: {accumulated:.1} mm of rain in the last {} days",
                    soiling::TRAILING_WINDOW_DAYS
                ),
            )
        } else {
            (
                RuleLevel::Low,
                accumulated / soiling::MEDIUM_THRESHOLD_MM * 25.0,
                format!(
                    "low soiling risk: {accumulated:.1} mm of rain in the last {} days",
                    soiling::TRAILING_WINDOW_DAYS
                ),
            )
        };

        SoilingRiskResult {
            level,
            score: round1(score),
            accumulated_precipitation_mm: round1(accumulated),
            message,
        }
    }
}

/// Longest run of consecutive cloudy calendar days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudyStreakResult {
    /// Length of the longest streak in days
    pub consecutive_days: u32,
    /// Estimated production reduction from the streak (%, capped at 100)
    pub estimated_reduction_pct: f64,
    /// Explanation of the assessment
    pub message: String,
}

/// Consecutive cloudy days rule.
///
/// Observations group by UTC calendar day; a day is cloudy when its mean
/// cloud cover reaches the threshold. A calendar day with no observations
/// breaks a streak.
pub struct ConsecutiveCloudyDaysRule;

impl ConsecutiveCloudyDaysRule {
    /// Find the longest cloudy streak in the set
    #[must_use]
    pub fn evaluate(set: &ObservationSet) -> CloudyStreakResult {
        let mut daily: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for obs in set.observations() {
            if obs.clouds_pct.is_finite() {
                daily
                    .entry(obs.timestamp.date_naive())
                    .or_default()
                    .push(obs.clouds_pct);
            }
        }

        let mut longest = 0u32;
        let mut current = 0u32;
        let mut previous_cloudy_day: Option<NaiveDate> = None;
        for (day, covers) in &daily {
            if mean(covers) >= cloudy::CLOUDY_DAY_AVG_PCT {
                current = match previous_cloudy_day {
                    Some(prev) if prev.succ_opt() == Some(*day) => current + 1,
                    _ => 1,
                };
                previous_cloudy_day = Some(*day);
                longest = longest.max(current);
            } else {
                current = 0;
                previous_cloudy_day = None;
            }
        }

        let reduction =
            (f64::from(longest) * cloudy::REDUCTION_PER_DAY_PCT).min(100.0);
        let message = if longest == 0 {
            "no consecutive cloudy days detected".into()
        } else {
            format!(
                "{longest} consecutive cloudy day(s), estimated production reduction {reduction:.1}%"
            )
        };

        CloudyStreakResult {
            consecutive_days: longest,
            estimated_reduction_pct: round1(reduction),
            message,
        }
    }
}

/// Temperature derating relative to Standard Test Conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatDeratingResult {
    /// Estimated output loss (%, ≥0, 1 decimal)
    pub derating_pct: f64,
    /// Mean temperature the derating was computed from (°C, 1 decimal)
    pub avg_temp_c: f64,
    /// Maximum temperature in the set (°C, 1 decimal)
    pub max_temp_c: f64,
    /// Explanation of the assessment
    pub message: String,
}

/// Heat derating rule: output drops linearly with mean temperature above
/// the STC reference; temperatures at or below it derate nothing
pub struct HeatDeratingRule;

impl HeatDeratingRule {
    /// Estimate heat derating for the set
    #[must_use]
    pub fn evaluate(set: &ObservationSet) -> HeatDeratingResult {
        let temperatures = set.temperatures();
        if temperatures.is_empty() {
            return HeatDeratingResult {
                derating_pct: 0.0,
                avg_temp_c: 0.0,
                max_temp_c: 0.0,
                message: "insufficient data".into(),
            };
        }

        let avg_temp = mean(&temperatures);
        let max_temp = temperatures
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let derating = ((avg_temp - heat::STC_TEMPERATURE_C) * heat::DERATING_PCT_PER_C).max(0.0);

        let message = if max_temp >= heat::EXTREME_HEAT_C {
            format!(
                "extreme heat: peak {max_temp:.1}°C, estimated output loss {derating:.1}%"
            )
        } else if derating > 0.0 {
            format!(
                "average temperature {avg_temp:.1}°C is above the {:.0}°C reference, estimated output loss {derating:.1}%",
                heat::STC_TEMPERATURE_C
            )
        } else {
            "temperatures within rated operating range, no heat derating".into()
        };

        HeatDeratingResult {
            derating_pct: round1(derating),
            avg_temp_c: round1(avg_temp),
            max_temp_c: round1(max_temp),
            message,
        }
    }
}

/// Wind-speed derating risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindDeratingResult {
    /// Qualitative risk level from peak wind speed
    pub risk_level: RuleLevel,
    /// Mean wind speed (m/s, 1 decimal)
    pub avg_wind_speed_mps: f64,
    /// Maximum wind speed (m/s, 1 decimal)
    pub max_wind_speed_mps: f64,
    /// Explanation of the assessment
    pub message: String,
}

/// Wind derating rule: risk keys off the peak gust in the set, since a
/// single stow-threshold event matters more than the average
pub struct WindDeratingRule;

impl WindDeratingRule {
    /// Assess wind derating risk for the set
    #[must_use]
    pub fn evaluate(set: &ObservationSet) -> WindDeratingResult {
        let speeds = set.wind_speeds();
        if speeds.is_empty() {
            return WindDeratingResult {
                risk_level: RuleLevel::Low,
                avg_wind_speed_mps: 0.0,
                max_wind_speed_mps: 0.0,
                message: "insufficient data".into(),
            };
        }

        let avg_speed = mean(&speeds);
        let max_speed = speeds.iter().copied().fold(0.0_f64, f64::max);

        let (risk_level, message) = if max_speed >= wind::HIGH_RISK_MPS {
            (
                RuleLevel::High,
                format!("high wind risk: peak {max_speed:.1} m/s, trackers may stow"),
            )
        } else if max_speed >= wind::MEDIUM_RISK_MPS {
            (
                RuleLevel::Medium,
                format!("moderate wind risk: peak {max_speed:.1} m/s"),
            )
        } else {
            (
                RuleLevel::Low,
                format!("low wind risk: peak {max_speed:.1} m/s"),
            )
        };

        WindDeratingResult {
            risk_level,
            avg_wind_speed_mps: round1(avg_speed),
            max_wind_speed_mps: round1(max_speed),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherObservation;

    fn obs(timestamp: DateTime<Utc>, precipitation: f64, clouds: f64) -> WeatherObservation {
        WeatherObservation {
            timestamp,
            temperature_c: 20.0,
            relative_humidity_pct: 50.0,
            precipitation_mm: precipitation,
            wind_speed_mps: 3.0,
            clouds_pct: clouds,
            estimated_irradiance_wm2: None,
        }
    }

    #[test]
    fn test_soiling_ignores_rain_outside_trailing_window() {
        let now = Utc::now();
        let observations = vec![
            // 10 days old, outside the 7-day window
            obs(now - Duration::days(10), 100.0, 20.0),
            obs(now - Duration::days(1), 10.0, 20.0),
        ];
        let set = ObservationSet::new(now - Duration::days(14), now, observations);
        let result = SoilingRiskRule::evaluate(&set, now);
        assert_eq!(result.level, RuleLevel::Low);
        assert_eq!(result.accumulated_precipitation_mm, 10.0);
        assert_eq!(result.score, 10.0);
    }

    #[test]
    fn test_soiling_high_at_threshold() {
        let now = Utc::now();
        let observations = vec![
            obs(now - Duration::days(2), 30.0, 20.0),
            obs(now - Duration::days(1), 30.0, 20.0),
        ];
        let set = ObservationSet::new(now - Duration::days(7), now, observations);
        let result = SoilingRiskRule::evaluate(&set, now);
        assert_eq!(result.level, RuleLevel::High);
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_cloudy_streak_counts_consecutive_calendar_days() {
        let start = DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut observations = Vec::new();
        // Three cloudy days, a clear day, then two cloudy days
        for day in 0..3 {
            observations.push(obs(start + Duration::days(day), 0.0, 85.0));
        }
        observations.push(obs(start + Duration::days(3), 0.0, 10.0));
        for day in 4..6 {
            observations.push(obs(start + Duration::days(day), 0.0, 75.0));
        }
        let set = ObservationSet::new(start, start + Duration::days(7), observations);
        let result = ConsecutiveCloudyDaysRule::evaluate(&set);
        assert_eq!(result.consecutive_days, 3);
        assert_eq!(result.estimated_reduction_pct, 45.0);
    }

    #[test]
    fn test_missing_day_breaks_cloudy_streak() {
        let start = DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let observations = vec![
            obs(start, 0.0, 90.0),
            // No samples on day 2
            obs(start + Duration::days(2), 0.0, 90.0),
        ];
        let set = ObservationSet::new(start, start + Duration::days(3), observations);
        let result = ConsecutiveCloudyDaysRule::evaluate(&set);
        assert_eq!(result.consecutive_days, 1);
    }

    #[test]
    fn test_heat_derating_above_reference() {
        let now = Utc::now();
        let observations = vec![WeatherObservation {
            timestamp: now,
            temperature_c: 40.0,
            relative_humidity_pct: 30.0,
            precipitation_mm: 0.0,
            wind_speed_mps: 2.0,
            clouds_pct: 5.0,
            estimated_irradiance_wm2: None,
        }];
        let set = ObservationSet::new(now - Duration::days(1), now, observations);
        let result = HeatDeratingRule::evaluate(&set);
        // (40 - 25) * 0.4 = 6.0
        assert_eq!(result.derating_pct, 6.0);
        assert!(result.message.contains("extreme heat"));
    }

    #[test]
    fn test_heat_derating_never_negative() {
        let now = Utc::now();
        let observations = vec![obs(now, 0.0, 10.0)];
        let set = ObservationSet::new(now - Duration::days(1), now, observations);
        let result = HeatDeratingRule::evaluate(&set);
        assert_eq!(result.derating_pct, 0.0);
    }

    #[test]
    fn test_wind_risk_keys_off_peak() {
        let now = Utc::now();
        let mut low = obs(now, 0.0, 10.0);
        low.wind_speed_mps = 3.0;
        let mut gust = obs(now + Duration::hours(1), 0.0, 10.0);
        gust.wind_speed_mps = 21.0;
        let set = ObservationSet::new(now, now + Duration::days(1), vec![low, gust]);
        let result = WindDeratingRule::evaluate(&set);
        assert_eq!(result.risk_level, RuleLevel::High);
        assert_eq!(result.max_wind_speed_mps, 21.0);
    }

    #[test]
    fn test_wind_empty_set_reports_insufficient_data() {
        let now = Utc::now();
        let set = ObservationSet::new(now, now + Duration::days(1), vec![]);
        let result = WindDeratingRule::evaluate(&set);
        assert_eq!(result.risk_level, RuleLevel::Low);
        assert_eq!(result.avg_wind_speed_mps, 0.0);
        assert_eq!(result.max_wind_speed_mps, 0.0);
        assert_eq!(result.message, "insufficient data");
    }
}
