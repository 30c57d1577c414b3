// ABOUTME: Analyzer, classifier, derating-rule, and scorer modules for the insight engine
// ABOUTME: Pure, synchronous computations over an ObservationSet; orchestration lives in services
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Intelligence modules.
//!
//! Every component in this tree is a pure function of an
//! [`ObservationSet`](crate::models::ObservationSet) (plus an injected
//! clock where wall time matters). Nothing here touches the cache or the
//! repository.

pub mod comfort_scorer;
pub mod day_classifier;
pub mod derating;
pub mod narrative;
pub mod pv_scorer;
pub mod statistical_analysis;
pub mod trend_analyzer;

pub use comfort_scorer::{ComfortInput, ComfortReport, ComfortScorer};
pub use day_classifier::{DayClassification, DayClassifier, DayLabel};
pub use derating::{
    CloudyStreakResult, ConsecutiveCloudyDaysRule, HeatDeratingResult, HeatDeratingRule, RuleLevel,
    SoilingRiskResult, SoilingRiskRule, WindDeratingResult, WindDeratingRule,
};
pub use narrative::{Alert, AlertSeverity, AlertType, NarrativeEnhancer, NarrativeGenerator};
pub use pv_scorer::{PvInput, PvReport, PvScorer};
pub use statistical_analysis::{StatisticalAnalyzer, StatisticsSummary};
pub use trend_analyzer::{TrendAnalyzer, TrendDirection, TrendField, TrendResult};

/// Round to one decimal place, the precision reported on insights
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to three decimal places, used for regression slopes
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Mean of a slice; 0.0 for an empty slice (callers guard emptiness where
/// it matters)
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
