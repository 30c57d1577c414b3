// ABOUTME: Environment-driven engine configuration with validation and a loggable summary
// ABOUTME: Covers cache sizing, cleanup cadence, and insight TTL for embedding hosts
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Engine configuration.
//!
//! All settings have working defaults; environment variables override them
//! with the `PV_INSIGHT_` prefix.

use crate::cache::CacheConfig;
use crate::constants::cache::{
    DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_MAX_ENTRIES, INSIGHT_TTL_SECS,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::time::Duration;

/// Engine-wide configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of cached insights
    pub cache_max_entries: usize,
    /// Interval between background cache cleanup sweeps (seconds)
    pub cache_cleanup_interval_secs: u64,
    /// Run the background cleanup task
    pub cache_background_cleanup: bool,
    /// Time-to-live for generated insights (seconds)
    pub insight_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_max_entries: DEFAULT_MAX_ENTRIES,
            cache_cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
            cache_background_cleanup: true,
            insight_ttl_secs: INSIGHT_TTL_SECS,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse or the
    /// resulting configuration is invalid
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            cache_max_entries: parse_env("PV_INSIGHT_CACHE_MAX_ENTRIES", DEFAULT_MAX_ENTRIES)?,
            cache_cleanup_interval_secs: parse_env(
                "PV_INSIGHT_CACHE_CLEANUP_INTERVAL_SECS",
                DEFAULT_CLEANUP_INTERVAL_SECS,
            )?,
            cache_background_cleanup: parse_env("PV_INSIGHT_CACHE_BACKGROUND_CLEANUP", true)?,
            insight_ttl_secs: parse_env("PV_INSIGHT_TTL_SECS", INSIGHT_TTL_SECS)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the engine cannot run with
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid value
    pub fn validate(&self) -> AppResult<()> {
        if self.cache_max_entries == 0 {
            return Err(AppError::config("cache_max_entries must be at least 1"));
        }
        if self.insight_ttl_secs == 0 {
            return Err(AppError::config("insight_ttl_secs must be at least 1"));
        }
        if self.cache_background_cleanup && self.cache_cleanup_interval_secs == 0 {
            return Err(AppError::config(
                "cache_cleanup_interval_secs must be at least 1 when background cleanup is enabled",
            ));
        }
        Ok(())
    }

    /// One-line summary suitable for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "cache: {} entries, cleanup every {}s (background: {}), insight TTL {}s",
            self.cache_max_entries,
            self.cache_cleanup_interval_secs,
            self.cache_background_cleanup,
            self.insight_ttl_secs
        )
    }

    /// Insight TTL as a duration
    #[must_use]
    pub const fn insight_ttl(&self) -> Duration {
        Duration::from_secs(self.insight_ttl_secs)
    }

    /// Derive the cache configuration
    #[must_use]
    pub const fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache_max_entries,
            cleanup_interval: Duration::from_secs(self.cache_cleanup_interval_secs),
            enable_background_cleanup: self.cache_background_cleanup,
            insight_ttl: Duration::from_secs(self.insight_ttl_secs),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("could not parse {name}={raw}"))),
        Err(_) => Ok(default),
    }
}
