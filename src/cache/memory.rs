// ABOUTME: In-memory insight cache with LRU eviction and TTL support
// ABOUTME: Includes background cleanup task for expired entries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

use super::{CacheConfig, CacheKey, InsightCache};
use crate::errors::{AppError, AppResult};
use crate::models::Insight;
use chrono::{DateTime, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// In-memory cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory insight cache with LRU eviction and background cleanup.
///
/// Uses `Arc<RwLock<LruCache>>` for shared state between cache operations
/// and the background cleanup task. The Arc is required because the cleanup
/// task (spawned in `new_with_config`) needs shared ownership of the store
/// to remove expired entries concurrently. `LruCache` provides O(1)
/// eviction of least-recently-used entries when `max_entries` is reached.
#[derive(Clone)]
pub struct InMemoryInsightCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
    shutdown_tx: Option<Arc<tokio::sync::mpsc::Sender<()>>>,
}

impl InMemoryInsightCache {
    /// Default cache capacity when config specifies zero entries
    /// Note: the compile-time match makes the non-zero invariant explicit
    const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create new in-memory cache with optional background cleanup task
    fn new_with_config(config: &CacheConfig) -> Self {
        // LruCache requires NonZeroUsize for capacity
        let capacity =
            NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CACHE_CAPACITY);

        let store = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = if config.enable_background_cleanup {
            let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
            let store_clone = store.clone();
            let cleanup_interval = config.cleanup_interval;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::cleanup_expired(&store_clone).await;
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::debug!("cache cleanup task received shutdown signal");
                            break;
                        }
                    }
                }
            });

            Some(Arc::new(shutdown_tx))
        } else {
            None
        };

        Self { store, shutdown_tx }
    }

    /// Remove all expired entries from the store
    async fn cleanup_expired(store: &Arc<RwLock<LruCache<String, CacheEntry>>>) -> u64 {
        let mut store_guard = store.write().await;

        // Collect expired keys first (can't modify while iterating)
        let expired_keys: Vec<String> = store_guard
            .iter()
            .filter_map(|(k, v)| if v.is_expired() { Some(k.clone()) } else { None })
            .collect();

        for key in &expired_keys {
            store_guard.pop(key);
        }

        let removed = expired_keys.len() as u64;
        drop(store_guard);
        if removed > 0 {
            tracing::debug!("cleaned up {} expired cache entries", removed);
        }
        removed
    }
}

#[async_trait::async_trait]
impl InsightCache for InMemoryInsightCache {
    async fn new(config: CacheConfig) -> AppResult<Self> {
        Ok(Self::new_with_config(&config))
    }

    async fn find(&self, key: &CacheKey) -> AppResult<Option<Insight>> {
        let mut store = self.store.write().await;

        // LruCache::get is mutable (updates access order for LRU)
        if let Some(entry) = store.get(&key.to_string()) {
            if entry.is_expired() {
                store.pop(&key.to_string());
                drop(store);
                return Ok(None);
            }

            let insight: Insight = serde_json::from_slice(&entry.data)?;
            drop(store);
            return Ok(Some(insight));
        }
        drop(store);

        Ok(None)
    }

    async fn put(&self, insight: &Insight) -> AppResult<()> {
        let key = CacheKey::new(
            insight.period.from,
            insight.period.to,
            insight.types.clone(),
        );
        let remaining = insight.expires_at - Utc::now();
        let Ok(ttl) = remaining.to_std() else {
            // Expired on arrival; nothing worth storing
            return Ok(());
        };

        let serialized = serde_json::to_vec(insight)?;
        let entry = CacheEntry::new(serialized, ttl);

        // LruCache handles eviction automatically on push
        self.store.write().await.push(key.to_string(), entry);

        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> AppResult<()> {
        self.store.write().await.pop(&key.to_string());
        Ok(())
    }

    async fn delete_by_period(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<u64> {
        let pattern = CacheKey::period_pattern(from, to);
        let glob_pattern = glob::Pattern::new(&pattern)
            .map_err(|e| AppError::internal(format!("invalid glob pattern '{pattern}': {e}")))?;

        let mut store = self.store.write().await;

        // Collect keys to remove (can't modify while iterating)
        let keys_to_remove: Vec<String> = store
            .iter()
            .filter_map(|(k, _)| {
                if glob_pattern.matches(k) {
                    Some(k.clone())
                } else {
                    None
                }
            })
            .collect();

        for key in &keys_to_remove {
            store.pop(key);
        }

        let removed = keys_to_remove.len() as u64;
        drop(store);
        Ok(removed)
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        Ok(Self::cleanup_expired(&self.store).await)
    }

    async fn clear_all(&self) -> AppResult<()> {
        self.store.write().await.clear();
        Ok(())
    }
}

impl Drop for InMemoryInsightCache {
    fn drop(&mut self) {
        // Signal the background cleanup task to shut down on drop. The task
        // also exits when all senders are dropped and recv() returns None.
        if let Some(tx) = &self.shutdown_tx {
            // Send errors are expected if the channel is already closed
            if let Err(e) = tx.try_send(()) {
                tracing::debug!(error = ?e, "cache shutdown signal send failed (channel likely closed)");
            }
        }
    }
}
