// ABOUTME: Priority-chain day classification (rainy, cold, hot, pleasant) with confidence scoring
// ABOUTME: First matching rule wins; the pleasant fallback scores confidence by conditions met
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::{mean, round1};
use crate::constants::classification::{
    BASE_CONFIDENCE_PCT, COLD_THRESHOLD_C, HOT_THRESHOLD_C, PLEASANT_CLOUDS_MAX_PCT,
    PLEASANT_HUMIDITY_MAX_PCT, PLEASANT_HUMIDITY_MIN_PCT, RAINY_PRECIPITATION_MM,
    RAIN_CONFIDENCE_PER_MM, TEMP_CONFIDENCE_PER_C,
};
use crate::models::ObservationSet;
use serde::{Deserialize, Serialize};

/// Single label assigned to a classified period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayLabel {
    /// Total precipitation at or above the rainy threshold
    Rainy,
    /// Average temperature below the cold threshold
    Cold,
    /// Average temperature above the hot threshold
    Hot,
    /// Fallback when no other rule fires
    Pleasant,
}

/// Averaged inputs the classification was decided on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationFactors {
    /// Mean temperature (°C, 1 decimal)
    pub avg_temp_c: f64,
    /// Mean relative humidity (%, 1 decimal)
    pub avg_humidity_pct: f64,
    /// Total precipitation (mm, 1 decimal)
    pub total_precipitation_mm: f64,
    /// Mean cloud cover (%, 1 decimal)
    pub avg_clouds_pct: f64,
}

/// Classification outcome: one label, a confidence, and the factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayClassification {
    /// Winning label
    pub label: DayLabel,
    /// Confidence in the label (0-100)
    pub confidence_pct: f64,
    /// Averages the decision was based on
    pub factors: ClassificationFactors,
}

/// Priority-chain day classifier.
///
/// Rules are evaluated in fixed order (rainy, cold, hot, pleasant) and the
/// first match wins, so a cold rainy period classifies as rainy. An empty
/// set returns the neutral pleasant label with zero confidence rather than
/// an error; strictness lives in the statistics path.
pub struct DayClassifier;

impl DayClassifier {
    /// Classify the period covered by the set
    #[must_use]
    pub fn classify(set: &ObservationSet) -> DayClassification {
        let avg_temp = mean(&set.temperatures());
        let avg_humidity = mean(&set.humidities());
        let avg_clouds = mean(&set.cloud_covers());
        let total_precipitation = set.total_precipitation_mm();

        let factors = ClassificationFactors {
            avg_temp_c: round1(avg_temp),
            avg_humidity_pct: round1(avg_humidity),
            total_precipitation_mm: round1(total_precipitation),
            avg_clouds_pct: round1(avg_clouds),
        };

        if set.is_empty() {
            return DayClassification {
                label: DayLabel::Pleasant,
                confidence_pct: 0.0,
                factors,
            };
        }

        let (label, confidence) = if total_precipitation >= RAINY_PRECIPITATION_MM {
            (
                DayLabel::Rainy,
                total_precipitation
                    .mul_add(RAIN_CONFIDENCE_PER_MM, BASE_CONFIDENCE_PCT)
                    .min(100.0),
            )
        } else if avg_temp < COLD_THRESHOLD_C {
            (
                DayLabel::Cold,
                (COLD_THRESHOLD_C - avg_temp)
                    .mul_add(TEMP_CONFIDENCE_PER_C, BASE_CONFIDENCE_PCT)
                    .min(100.0),
            )
        } else if avg_temp > HOT_THRESHOLD_C {
            (
                DayLabel::Hot,
                (avg_temp - HOT_THRESHOLD_C)
                    .mul_add(TEMP_CONFIDENCE_PER_C, BASE_CONFIDENCE_PCT)
                    .min(100.0),
            )
        } else {
            (
                DayLabel::Pleasant,
                Self::pleasant_confidence(avg_temp, avg_humidity, avg_clouds),
            )
        };

        DayClassification {
            label,
            confidence_pct: round1(confidence),
            factors,
        }
    }

    /// Pleasant confidence counts how many of the three comfort conditions
    /// the averages satisfy, scaled to a percentage
    fn pleasant_confidence(avg_temp: f64, avg_humidity: f64, avg_clouds: f64) -> f64 {
        let mut met = 0u8;
        if (COLD_THRESHOLD_C..=HOT_THRESHOLD_C).contains(&avg_temp) {
            met += 1;
        }
        if (PLEASANT_HUMIDITY_MIN_PCT..=PLEASANT_HUMIDITY_MAX_PCT).contains(&avg_humidity) {
            met += 1;
        }
        if avg_clouds <= PLEASANT_CLOUDS_MAX_PCT {
            met += 1;
        }
        f64::from(met) / 3.0 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherObservation;
    use chrono::{Duration, Utc};

    fn make_set(samples: &[(f64, f64, f64, f64)]) -> ObservationSet {
        let now = Utc::now();
        let observations = samples
            .iter()
            .enumerate()
            .map(
                |(i, &(temp, humidity, precipitation, clouds))| WeatherObservation {
                    timestamp: now + Duration::hours(i as i64),
                    temperature_c: temp,
                    relative_humidity_pct: humidity,
                    precipitation_mm: precipitation,
                    wind_speed_mps: 2.0,
                    clouds_pct: clouds,
                    estimated_irradiance_wm2: None,
                },
            )
            .collect();
        ObservationSet::new(now, now + Duration::days(1), observations)
    }

    #[test]
    fn test_rainy_takes_priority_over_cold() {
        let set = make_set(&[(5.0, 80.0, 4.0, 90.0), (6.0, 85.0, 4.0, 95.0)]);
        let result = DayClassifier::classify(&set);
        assert_eq!(result.label, DayLabel::Rainy);
        // 50 + 8mm * 5 = 90
        assert_eq!(result.confidence_pct, 90.0);
    }

    #[test]
    fn test_cold_confidence_scales_with_deficit() {
        let set = make_set(&[(5.0, 50.0, 0.0, 20.0)]);
        let result = DayClassifier::classify(&set);
        assert_eq!(result.label, DayLabel::Cold);
        // 50 + (15 - 5) * 2 = 70
        assert_eq!(result.confidence_pct, 70.0);
    }

    #[test]
    fn test_hot_confidence_caps_at_100() {
        let set = make_set(&[(60.0, 20.0, 0.0, 0.0)]);
        let result = DayClassifier::classify(&set);
        assert_eq!(result.label, DayLabel::Hot);
        assert_eq!(result.confidence_pct, 100.0);
    }

    #[test]
    fn test_pleasant_counts_conditions_met() {
        // Temperature and clouds qualify, humidity (70%) does not
        let set = make_set(&[(22.0, 70.0, 0.0, 30.0)]);
        let result = DayClassifier::classify(&set);
        assert_eq!(result.label, DayLabel::Pleasant);
        assert_eq!(result.confidence_pct, 66.7);
    }

    #[test]
    fn test_empty_set_is_neutral_pleasant() {
        let now = Utc::now();
        let set = ObservationSet::new(now, now + Duration::days(1), vec![]);
        let result = DayClassifier::classify(&set);
        assert_eq!(result.label, DayLabel::Pleasant);
        assert_eq!(result.confidence_pct, 0.0);
        assert_eq!(result.factors.avg_temp_c, 0.0);
        assert_eq!(result.factors.total_precipitation_mm, 0.0);
    }
}
