// ABOUTME: Observation repository trait for loading weather samples by period and location
// ABOUTME: Includes an in-memory implementation for tests and demos
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Observation storage seam.
//!
//! Persistence lives outside the engine; hosts implement
//! [`ObservationRepository`] over their own store. The engine only ever
//! reads.

use crate::errors::AppResult;
use crate::models::WeatherObservation;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Read-only access to stored weather observations
#[async_trait::async_trait]
pub trait ObservationRepository: Send + Sync {
    /// Load all observations with timestamps in `[from, to)`, in any
    /// order, optionally restricted to one monitored location. An empty
    /// result is not an error; the caller decides how to react.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails
    async fn query(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        location: Option<&str>,
    ) -> AppResult<Vec<WeatherObservation>>;
}

/// In-memory observation store for tests and demos.
///
/// Models a single monitored site: an optional location label is matched
/// against the query filter, so a filter for another site returns nothing.
#[derive(Debug, Default, Clone)]
pub struct InMemoryObservationRepository {
    location: Option<String>,
    observations: Arc<RwLock<Vec<WeatherObservation>>>,
}

impl InMemoryObservationRepository {
    /// Create an empty repository with no location label
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-loaded with observations
    #[must_use]
    pub fn with_observations(observations: Vec<WeatherObservation>) -> Self {
        Self {
            location: None,
            observations: Arc::new(RwLock::new(observations)),
        }
    }

    /// Label this repository as holding observations for one location
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Append observations to the store
    pub async fn insert(&self, observations: Vec<WeatherObservation>) {
        self.observations.write().await.extend(observations);
    }
}

#[async_trait::async_trait]
impl ObservationRepository for InMemoryObservationRepository {
    async fn query(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        location: Option<&str>,
    ) -> AppResult<Vec<WeatherObservation>> {
        if let Some(wanted) = location {
            if self.location.as_deref() != Some(wanted) {
                return Ok(Vec::new());
            }
        }
        let store = self.observations.read().await;
        Ok(store
            .iter()
            .filter(|obs| obs.timestamp >= from && obs.timestamp < to)
            .cloned()
            .collect())
    }
}
