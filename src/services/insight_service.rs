// ABOUTME: Insight generation orchestrator: fetch, analyze, score, narrate, assemble, cache
// ABOUTME: Serves cache-first reads with optional forced regeneration and enhancer fallback
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::{Clock, SystemClock};
use crate::cache::{CacheKey, InsightCache};
use crate::constants::{cache as cache_constants, production};
use crate::errors::{AppError, AppResult};
use crate::intelligence::{
    round1, ComfortInput, ComfortScorer, ConsecutiveCloudyDaysRule, DayClassifier, DayLabel,
    HeatDeratingRule, NarrativeEnhancer, NarrativeGenerator, PvInput, PvScorer, RuleLevel,
    SoilingRiskRule, StatisticalAnalyzer, TrendAnalyzer, TrendField, WindDeratingRule,
};
use crate::intelligence::narrative::SummaryContext;
use crate::models::{
    Insight, InsightScores, InsightStatistics, ObservationSet, PvMetrics,
};
use crate::observations::ObservationRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Orchestrates insight generation over an observation repository and an
/// insight cache.
///
/// `get` is cache-first; `generate` always recomputes and overwrites. Both
/// run the full analyzer pipeline regardless of the requested types, which
/// only shape the cache key. Concurrent misses on the same key may both
/// compute; writes are idempotent so the later one wins.
pub struct InsightService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    enhancer: Option<Arc<dyn NarrativeEnhancer>>,
    clock: Arc<dyn Clock>,
    insight_ttl: Duration,
    location: Option<String>,
}

impl<R, C> InsightService<R, C>
where
    R: ObservationRepository,
    C: InsightCache,
{
    /// Create a service with the default 1-hour insight TTL
    #[must_use]
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            repository,
            cache,
            enhancer: None,
            clock: Arc::new(SystemClock),
            insight_ttl: Duration::from_secs(cache_constants::INSIGHT_TTL_SECS),
            location: None,
        }
    }

    /// Restrict repository queries to one monitored location. One service
    /// instance serves one site; the cache key stays `(period, types)`.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Attach a narrative enhancer; failures fall back to the rule-based
    /// summary
    #[must_use]
    pub fn with_enhancer(mut self, enhancer: Arc<dyn NarrativeEnhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    /// Override the wall-clock source (tests)
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the insight TTL
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.insight_ttl = ttl;
        self
    }

    /// Get the insight for `[from, to)` and `types`, serving from cache
    /// when possible.
    ///
    /// With `force_regenerate` the cached entry is invalidated first and a
    /// fresh insight is computed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty or inverted period, `NoData`
    /// when the repository holds no observations for it, and analyzer or
    /// backend errors otherwise
    pub async fn get(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        types: Vec<String>,
        force_regenerate: bool,
    ) -> AppResult<Insight> {
        Self::validate_period(from, to)?;
        let key = CacheKey::new(from, to, types.clone());

        if force_regenerate {
            self.cache.invalidate(&key).await?;
        } else if let Some(cached) = self.cache.find(&key).await? {
            tracing::debug!(key = %key, "insight cache hit");
            return Ok(cached);
        }

        self.generate(from, to, types).await
    }

    /// Generate a fresh insight for `[from, to)` and cache it, overwriting
    /// any existing entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty or inverted period, `NoData`
    /// when no observations exist for it, and `InsufficientData` when the
    /// observations carry no valid temperature or humidity samples
    pub async fn generate(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        types: Vec<String>,
    ) -> AppResult<Insight> {
        Self::validate_period(from, to)?;
        let now = self.clock.now();

        tracing::debug!(%from, %to, "fetching observations");
        let observations = self
            .repository
            .query(from, to, self.location.as_deref())
            .await?;
        if observations.is_empty() {
            return Err(AppError::no_data(format!(
                "no observations between {from} and {to}"
            )));
        }
        let set = ObservationSet::new(from, to, observations);

        tracing::debug!(samples = set.len(), "computing insight");
        let summary = StatisticalAnalyzer::analyze(&set)?;
        let temperature_trend = TrendAnalyzer::analyze(&set, TrendField::Temperature);
        let humidity_trend = TrendAnalyzer::analyze(&set, TrendField::Humidity);
        let classification = DayClassifier::classify(&set);

        let soiling = SoilingRiskRule::evaluate(&set, now);
        let cloudy = ConsecutiveCloudyDaysRule::evaluate(&set);
        let heat = HeatDeratingRule::evaluate(&set);
        let wind = WindDeratingRule::evaluate(&set);

        let comfort = ComfortScorer::score(ComfortInput {
            avg_temp_c: summary.avg_temp_c,
            avg_humidity_pct: summary.avg_humidity_pct,
            total_precipitation_mm: summary.total_precipitation_mm,
        });
        let avg_clouds = classification.factors.avg_clouds_pct;
        let pv = PvScorer::score(PvInput {
            avg_irradiance_wm2: set.avg_estimated_irradiance_wm2(),
            avg_temp_c: summary.avg_temp_c,
            avg_clouds_pct: avg_clouds,
            soiling_risk_score: soiling.score,
        });

        let wind_penalty = match wind.risk_level {
            RuleLevel::High => production::WIND_HIGH_PENALTY_PCT,
            RuleLevel::Medium => production::WIND_MEDIUM_PENALTY_PCT,
            RuleLevel::Low => 0.0,
        };
        let production_pct = round1(
            (100.0
                - cloudy.estimated_reduction_pct
                - heat.derating_pct
                - soiling.score / production::SOILING_SCORE_DIVISOR
                - wind_penalty)
                .max(0.0),
        );

        let alerts = NarrativeGenerator::generate_alerts(&set, now);
        let prose = NarrativeGenerator::generate_summary(&SummaryContext {
            period: set.period(),
            avg_temp_c: summary.avg_temp_c,
            avg_humidity_pct: summary.avg_humidity_pct,
            trend: temperature_trend.clone(),
            classification_label: label_prose(classification.label).to_owned(),
            estimated_production_pct: production_pct,
            soiling_level: soiling.level,
            cloudy_streak_days: cloudy.consecutive_days,
            heat_derating_pct: heat.derating_pct,
        });

        let mut insight = Insight {
            id: Uuid::new_v4(),
            period: set.period(),
            types,
            statistics: InsightStatistics {
                avg_temp_c: summary.avg_temp_c,
                avg_humidity_pct: summary.avg_humidity_pct,
                min_temp_c: summary.min_temp_c,
                max_temp_c: summary.max_temp_c,
                std_dev_temp_c: summary.std_dev_temp_c,
                std_dev_humidity_pct: summary.std_dev_humidity_pct,
                avg_wind_speed_mps: summary.avg_wind_speed_mps,
                max_wind_speed_mps: summary.max_wind_speed_mps,
                total_precipitation_mm: summary.total_precipitation_mm,
                humidity_trend: humidity_trend.direction,
            },
            trend: temperature_trend,
            classification,
            pv_metrics: PvMetrics {
                soiling_risk: soiling,
                consecutive_cloudy_days: cloudy,
                heat_derating: heat,
                wind_derating: wind,
                estimated_production_pct: production_pct,
                estimated_production_kwh: pv.estimated_production_kwh,
            },
            alerts,
            summary: prose,
            scores: InsightScores {
                comfort_score: comfort.score,
                pv_production_score: pv.score,
            },
            generated_at: now,
            expires_at: now
                + chrono::Duration::from_std(self.insight_ttl)
                    .unwrap_or_else(|_| chrono::Duration::zero()),
        };

        if let Some(enhancer) = &self.enhancer {
            match enhancer.enhance(&insight).await {
                Ok(enhanced) => insight.summary = enhanced,
                Err(e) => {
                    tracing::warn!(error = %e, "narrative enhancer failed, keeping rule-based summary");
                }
            }
        }

        // Caching is best-effort; a failed write must not lose the insight
        if let Err(e) = self.cache.put(&insight).await {
            tracing::warn!(error = %e, "failed to cache generated insight");
        } else {
            tracing::debug!(id = %insight.id, "insight cached");
        }

        Ok(insight)
    }

    /// Drop every cached insight for a period, e.g. after backfilling its
    /// observations
    ///
    /// # Errors
    ///
    /// Returns an error if the cache backend fails
    pub async fn invalidate_period(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.cache.delete_by_period(from, to).await
    }

    fn validate_period(from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<()> {
        if from >= to {
            return Err(AppError::invalid_input(format!(
                "period start {from} must be before period end {to}"
            )));
        }
        Ok(())
    }
}

const fn label_prose(label: DayLabel) -> &'static str {
    match label {
        DayLabel::Rainy => "rainy",
        DayLabel::Cold => "cold",
        DayLabel::Hot => "hot",
        DayLabel::Pleasant => "pleasant",
    }
}
