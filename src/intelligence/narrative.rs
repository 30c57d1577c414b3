// ABOUTME: Alert generation over the recent observation window and prose summary assembly
// ABOUTME: Also defines the NarrativeEnhancer seam for injected prose rewriters with fallback
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::derating::RuleLevel;
use super::trend_analyzer::{TrendDirection, TrendResult};
use crate::constants::narrative;
use crate::errors::AppResult;
use crate::models::{Insight, InsightPeriod, ObservationSet};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Category of a generated alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Precipitation,
    Heat,
    Cold,
    Wind,
}

/// Severity of a generated alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

/// An actionable alert derived from recent observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert category; at most one alert per category is emitted
    pub alert_type: AlertType,
    /// How urgent the alert is
    pub severity: AlertSeverity,
    /// Human-readable alert text
    pub message: String,
}

/// Everything the summary template needs from an assembled insight
#[derive(Debug, Clone)]
pub struct SummaryContext {
    /// Period the insight covers
    pub period: InsightPeriod,
    /// Mean temperature (°C)
    pub avg_temp_c: f64,
    /// Mean relative humidity (%)
    pub avg_humidity_pct: f64,
    /// Temperature trend over the period
    pub trend: TrendResult,
    /// Day classification label, lowercase prose form
    pub classification_label: String,
    /// Estimated production as a percentage of maximum capacity
    pub estimated_production_pct: f64,
    /// Soiling risk level
    pub soiling_level: RuleLevel,
    /// Longest consecutive cloudy streak (days)
    pub cloudy_streak_days: u32,
    /// Heat derating (%)
    pub heat_derating_pct: f64,
}

/// Rule-based alert and summary generation
pub struct NarrativeGenerator;

impl NarrativeGenerator {
    /// Generate alerts from the recent observation window.
    ///
    /// The window is the intersection of two filters: the trailing
    /// [`narrative::RECENT_SAMPLE_LIMIT`] observations of the set, and
    /// samples whose age relative to `now` is at most
    /// [`narrative::RECENT_WINDOW_HOURS`]. Observations stamped in the
    /// future pass the age filter. An empty window yields no alerts.
    #[must_use]
    pub fn generate_alerts(set: &ObservationSet, now: DateTime<Utc>) -> Vec<Alert> {
        let cutoff = Duration::hours(narrative::RECENT_WINDOW_HOURS);
        let observations = set.observations();
        let tail_start = observations.len().saturating_sub(narrative::RECENT_SAMPLE_LIMIT);
        let recent: Vec<_> = observations[tail_start..]
            .iter()
            .filter(|obs| now - obs.timestamp <= cutoff)
            .collect();
        if recent.is_empty() {
            return Vec::new();
        }

        let mut alerts = Vec::new();

        let total_precipitation: f64 = recent
            .iter()
            .map(|obs| obs.precipitation_mm)
            .filter(|p| p.is_finite() && *p >= 0.0)
            .sum();
        if total_precipitation > narrative::PRECIPITATION_ALERT_MM {
            let severity = if total_precipitation > narrative::PRECIPITATION_HIGH_MM {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            alerts.push(Alert {
                alert_type: AlertType::Precipitation,
                severity,
                message: format!(
                    "heavy rainfall: {total_precipitation:.1} mm in the last {} hours",
                    narrative::RECENT_WINDOW_HOURS
                ),
            });
        }

        let hot_samples: Vec<f64> = recent
            .iter()
            .map(|obs| obs.temperature_c)
            .filter(|t| t.is_finite() && *t > narrative::HEAT_ALERT_C)
            .collect();
        if hot_samples.len() >= narrative::TEMP_ALERT_SAMPLE_COUNT {
            let peak = hot_samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            alerts.push(Alert {
                alert_type: AlertType::Heat,
                severity: AlertSeverity::High,
                message: format!("sustained extreme heat: peak {peak:.1}°C"),
            });
        }

        let cold_samples: Vec<f64> = recent
            .iter()
            .map(|obs| obs.temperature_c)
            .filter(|t| t.is_finite() && *t < narrative::COLD_ALERT_C)
            .collect();
        if cold_samples.len() >= narrative::TEMP_ALERT_SAMPLE_COUNT {
            let minimum = cold_samples.iter().copied().fold(f64::INFINITY, f64::min);
            alerts.push(Alert {
                alert_type: AlertType::Cold,
                severity: AlertSeverity::High,
                message: format!("sustained cold: low of {minimum:.1}°C"),
            });
        }

        let max_wind = recent
            .iter()
            .map(|obs| obs.wind_speed_mps)
            .filter(|w| w.is_finite())
            .fold(0.0_f64, f64::max);
        if max_wind > narrative::WIND_ALERT_MPS {
            let severity = if max_wind > narrative::WIND_HIGH_MPS {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            alerts.push(Alert {
                alert_type: AlertType::Wind,
                severity,
                message: format!("strong winds: gusts up to {max_wind:.1} m/s"),
            });
        }

        alerts
    }

    /// Render the fixed-template prose summary.
    ///
    /// Sentences are assembled into parts joined by ". " with a closing
    /// period, so the output is always well-formed prose regardless of
    /// which optional clauses fire.
    #[must_use]
    pub fn generate_summary(ctx: &SummaryContext) -> String {
        let span_seconds = (ctx.period.to - ctx.period.from).num_seconds();
        let days = span_seconds.div_euclid(86_400)
            + i64::from(span_seconds.rem_euclid(86_400) > 0);
        let days = days.max(1);

        let mut opening = format!(
            "Over the last {days} day{}, the average temperature was {:.1}°C with an average humidity of {:.1}%",
            if days == 1 { "" } else { "s" },
            ctx.avg_temp_c,
            ctx.avg_humidity_pct
        );
        match ctx.trend.direction {
            TrendDirection::Rising => opening.push_str(" and a gradual upward temperature trend"),
            TrendDirection::Falling => {
                opening.push_str(" and a gradual downward temperature trend");
            }
            TrendDirection::Stable => {}
        }

        let mut parts = vec![
            opening,
            format!("Conditions were predominantly {}", ctx.classification_label),
            format!(
                "Estimated solar production is at {:.1}% of maximum capacity",
                ctx.estimated_production_pct
            ),
        ];

        let mut factors = Vec::new();
        if ctx.soiling_level == RuleLevel::High {
            factors.push("high soiling risk".to_owned());
        }
        if ctx.cloudy_streak_days > 0 {
            factors.push(format!(
                "{} consecutive cloudy day{}",
                ctx.cloudy_streak_days,
                if ctx.cloudy_streak_days == 1 { "" } else { "s" }
            ));
        }
        if ctx.heat_derating_pct > narrative::HEAT_FACTOR_MIN_DERATING_PCT {
            factors.push("heat derating".to_owned());
        }
        if !factors.is_empty() {
            parts.push(format!(
                "Factors reducing production: {}",
                factors.join(", ")
            ));
        }

        let mut summary = parts.join(". ");
        summary.push('.');
        summary
    }
}

/// Injected prose rewriter for generated insights.
///
/// Implementations typically call an external language model. The
/// orchestrator treats the enhancer as best-effort: on failure the
/// rule-based summary stands and the error is only logged.
#[async_trait::async_trait]
pub trait NarrativeEnhancer: Send + Sync {
    /// Produce an enhanced summary for the assembled insight
    async fn enhance(&self, insight: &Insight) -> AppResult<String>;
}
