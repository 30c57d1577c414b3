// ABOUTME: Cache abstraction for generated insights with pluggable backend support
// ABOUTME: Defines the InsightCache trait, structured cache keys, and cache configuration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

/// In-memory cache implementation
pub mod memory;

use crate::constants::cache::{
    DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_MAX_ENTRIES, INSIGHT_TTL_SECS,
};
use crate::errors::AppResult;
use crate::models::Insight;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Cache provider trait for generated insights.
///
/// Writes are idempotent overwrites, so two callers racing on the same
/// miss both succeed and the later write wins. `put` derives the entry
/// TTL from the insight's own `expires_at`; an insight already expired on
/// arrival is silently not stored.
#[async_trait::async_trait]
pub trait InsightCache: Send + Sync + Clone {
    /// Create a new cache instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Look up a cached insight; `None` on miss or expiry
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the entry cannot be decoded
    async fn find(&self, key: &CacheKey) -> AppResult<Option<Insight>>;

    /// Store an insight under its own key until its `expires_at`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    async fn put(&self, insight: &Insight) -> AppResult<()>;

    /// Remove a single entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    async fn invalidate(&self, key: &CacheKey) -> AppResult<()>;

    /// Remove every entry for a period regardless of its types, returning
    /// the number of entries removed
    ///
    /// # Errors
    ///
    /// Returns an error if pattern invalidation fails
    async fn delete_by_period(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<u64>;

    /// Remove all expired entries, returning the number removed
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep fails
    async fn delete_expired(&self) -> AppResult<u64>;

    /// Clear all cache entries (for testing/admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the clear operation fails
    async fn clear_all(&self) -> AppResult<()>;
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached insights
    pub max_entries: usize,
    /// Interval between background cleanup sweeps
    pub cleanup_interval: Duration,
    /// Enable the background cleanup task (disable in tests to avoid
    /// runtime conflicts)
    pub enable_background_cleanup: bool,
    /// Time-to-live applied to newly generated insights
    pub insight_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            insight_ttl: Duration::from_secs(INSIGHT_TTL_SECS),
        }
    }
}

/// Structured cache key identifying one insight request.
///
/// The requested types are sorted in the rendered key, so requests that
/// differ only in type order address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Inclusive start of the requested period
    pub period_from: DateTime<Utc>,
    /// Exclusive end of the requested period
    pub period_to: DateTime<Utc>,
    /// Requested insight types, as given by the caller
    pub types: Vec<String>,
}

impl CacheKey {
    /// Create a new cache key
    #[must_use]
    pub const fn new(
        period_from: DateTime<Utc>,
        period_to: DateTime<Utc>,
        types: Vec<String>,
    ) -> Self {
        Self {
            period_from,
            period_to,
            types,
        }
    }

    /// Create a pattern matching every entry for a period, any types
    #[must_use]
    pub fn period_pattern(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
        format!("period:{}:{}:types:*", from.timestamp(), to.timestamp())
    }

    fn canonical_types(&self) -> String {
        let mut types: Vec<String> = self
            .types
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        types.sort();
        types.dedup();
        types.join(",")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "period:{}:{}:types:{}",
            self.period_from.timestamp(),
            self.period_to.timestamp(),
            self.canonical_types()
        )
    }
}
