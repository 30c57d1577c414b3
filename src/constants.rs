// ABOUTME: Domain-grouped numeric thresholds for classification, derating, and scoring
// ABOUTME: Single source of truth for every tunable constant in the insight engine
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Engine constants organized by domain.
//!
//! Every threshold that shapes a classification, a derating rule, or a
//! score lives here rather than inline in the analyzers, so tuning and
//! auditing stay in one place.

/// Day classification thresholds
pub mod classification {
    /// Below this average temperature the period classifies as cold (°C)
    pub const COLD_THRESHOLD_C: f64 = 15.0;

    /// Above this average temperature the period classifies as hot (°C)
    pub const HOT_THRESHOLD_C: f64 = 30.0;

    /// Total precipitation at or above this classifies the period as rainy (mm)
    pub const RAINY_PRECIPITATION_MM: f64 = 5.0;

    /// Lower bound of the pleasant humidity band (%)
    pub const PLEASANT_HUMIDITY_MIN_PCT: f64 = 40.0;

    /// Upper bound of the pleasant humidity band (%)
    pub const PLEASANT_HUMIDITY_MAX_PCT: f64 = 60.0;

    /// Maximum cloud cover still counted as pleasant (%)
    pub const PLEASANT_CLOUDS_MAX_PCT: f64 = 50.0;

    /// Base confidence for the rainy/cold/hot branches (%)
    pub const BASE_CONFIDENCE_PCT: f64 = 50.0;

    /// Confidence gained per mm of total precipitation on the rainy branch
    pub const RAIN_CONFIDENCE_PER_MM: f64 = 5.0;

    /// Confidence gained per °C of excess on the cold/hot branches
    pub const TEMP_CONFIDENCE_PER_C: f64 = 2.0;
}

/// Trend detection thresholds
pub mod trend {
    /// Absolute slope below which a trend classifies as stable
    /// (units per observation index)
    pub const STABLE_SLOPE_THRESHOLD: f64 = 0.1;
}

/// Soiling risk rule (panel grime accumulation vs. recent rainfall)
pub mod soiling {
    /// Rainfall accumulation window, relative to now rather than to the
    /// queried period (days)
    pub const TRAILING_WINDOW_DAYS: i64 = 7;

    /// Accumulated precipitation at or above this is a high signal (mm)
    pub const HIGH_THRESHOLD_MM: f64 = 50.0;

    /// Accumulated precipitation at or above this is a medium signal (mm)
    pub const MEDIUM_THRESHOLD_MM: f64 = 25.0;
}

/// Consecutive cloudy days rule
pub mod cloudy {
    /// Daily average cloud cover at or above this marks a cloudy day (%)
    pub const CLOUDY_DAY_AVG_PCT: f64 = 70.0;

    /// Estimated production reduction per consecutive cloudy day (%)
    pub const REDUCTION_PER_DAY_PCT: f64 = 15.0;
}

/// Heat derating rule, relative to Standard Test Conditions
///
/// STC rates panels at a 25°C cell temperature and 1000 W/m² irradiance;
/// crystalline silicon loses roughly 0.4% of output per °C above that.
pub mod heat {
    /// STC reference cell temperature (°C)
    pub const STC_TEMPERATURE_C: f64 = 25.0;

    /// Output loss per °C above STC temperature (% per °C, i.e. 0.004 × 100)
    pub const DERATING_PCT_PER_C: f64 = 0.4;

    /// Maximum temperature at or above which the period counts as extreme heat (°C)
    pub const EXTREME_HEAT_C: f64 = 35.0;
}

/// Wind derating rule
pub mod wind {
    /// Maximum wind speed at or above this is high risk (m/s)
    pub const HIGH_RISK_MPS: f64 = 20.0;

    /// Maximum wind speed at or above this is medium risk (m/s)
    pub const MEDIUM_RISK_MPS: f64 = 15.0;
}

/// Comfort score weights and bands (sums to 100 points)
pub mod comfort {
    /// Points available for the temperature band
    pub const TEMPERATURE_POINTS: f64 = 50.0;

    /// Lower bound of the ideal temperature band (°C)
    pub const TEMP_IDEAL_MIN_C: f64 = 20.0;

    /// Upper bound of the ideal temperature band (°C)
    pub const TEMP_IDEAL_MAX_C: f64 = 25.0;

    /// Penalty per °C outside the ideal band
    pub const TEMP_PENALTY_PER_C: f64 = 2.0;

    /// Points available for the humidity band
    pub const HUMIDITY_POINTS: f64 = 30.0;

    /// Lower bound of the ideal humidity band (%)
    pub const HUMIDITY_IDEAL_MIN_PCT: f64 = 40.0;

    /// Upper bound of the ideal humidity band (%)
    pub const HUMIDITY_IDEAL_MAX_PCT: f64 = 60.0;

    /// Penalty per % outside the ideal humidity band
    pub const HUMIDITY_PENALTY_PER_PCT: f64 = 0.5;

    /// Points available for the precipitation band
    pub const PRECIPITATION_POINTS: f64 = 20.0;

    /// Penalty per mm of total precipitation
    pub const PRECIPITATION_PENALTY_PER_MM: f64 = 2.0;
}

/// PV production score weights (component caps sum to 100 points)
pub mod pv {
    /// Points available for the irradiance component
    pub const IRRADIANCE_POINTS: f64 = 40.0;

    /// STC reference irradiance (W/m²)
    pub const STC_IRRADIANCE_WM2: f64 = 1000.0;

    /// Points available for the temperature component
    pub const TEMPERATURE_POINTS: f64 = 20.0;

    /// Penalty per °C above the STC temperature (heat hurts output more)
    pub const HEAT_PENALTY_PER_C: f64 = 0.4;

    /// Penalty per °C below the STC temperature
    pub const COLD_PENALTY_PER_C: f64 = 0.2;

    /// Points available for the cloud-cover component
    pub const CLOUD_POINTS: f64 = 20.0;

    /// Points available for the soiling component
    pub const SOILING_POINTS: f64 = 20.0;

    /// Notional base capacity used for the kWh estimate. Not plant-specific:
    /// callers needing real capacity must rescale externally.
    pub const NOTIONAL_BASE_CAPACITY_KWH: f64 = 100.0;
}

/// Production-percentage composition applied by the orchestrator
pub mod production {
    /// Divisor converting the soiling score into a production reduction (%)
    pub const SOILING_SCORE_DIVISOR: f64 = 10.0;

    /// Production reduction when wind derating risk is high (%)
    pub const WIND_HIGH_PENALTY_PCT: f64 = 10.0;

    /// Production reduction when wind derating risk is medium (%)
    pub const WIND_MEDIUM_PENALTY_PCT: f64 = 5.0;
}

/// Alert generation thresholds over the recent observation window
pub mod narrative {
    /// At most this many trailing observations are examined for alerts
    pub const RECENT_SAMPLE_LIMIT: usize = 6;

    /// Observations older than this many wall-clock hours are ignored
    pub const RECENT_WINDOW_HOURS: i64 = 6;

    /// Accumulated precipitation above this raises a precipitation alert (mm)
    pub const PRECIPITATION_ALERT_MM: f64 = 10.0;

    /// Accumulated precipitation above this escalates the alert to high (mm)
    pub const PRECIPITATION_HIGH_MM: f64 = 20.0;

    /// Temperature above this counts toward a heat alert (°C)
    pub const HEAT_ALERT_C: f64 = 35.0;

    /// Temperature below this counts toward a cold alert (°C)
    pub const COLD_ALERT_C: f64 = 10.0;

    /// Number of qualifying recent samples required for heat/cold alerts
    pub const TEMP_ALERT_SAMPLE_COUNT: usize = 3;

    /// Maximum wind speed above this raises a wind alert (m/s)
    pub const WIND_ALERT_MPS: f64 = 15.0;

    /// Maximum wind speed above this escalates the wind alert to high (m/s)
    pub const WIND_HIGH_MPS: f64 = 20.0;

    /// Heat derating above this is mentioned as a production reduction factor (%)
    pub const HEAT_FACTOR_MIN_DERATING_PCT: f64 = 2.0;
}

/// Cache defaults
pub mod cache {
    /// Default maximum number of cached insights
    pub const DEFAULT_MAX_ENTRIES: usize = 1000;

    /// Default interval between background cleanup sweeps (seconds)
    pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

    /// Time-to-live for a generated insight (seconds)
    pub const INSIGHT_TTL_SECS: u64 = 3600;
}
