// ABOUTME: Weather-derived insight engine for photovoltaic production and comfort analysis
// ABOUTME: Library root wiring models, intelligence, cache, and service modules together
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # pv-insight
//!
//! Turns periodic weather observations into cached, explainable insights:
//! aggregate statistics, temperature trend, a day classification, four PV
//! derating rules, comfort and production scores, alerts, and a prose
//! summary.
//!
//! The engine is a library with two injected seams: an
//! [`ObservationRepository`](observations::ObservationRepository) supplies
//! samples, and an optional
//! [`NarrativeEnhancer`](intelligence::NarrativeEnhancer) rewrites the
//! summary. [`InsightService`](services::InsightService) orchestrates the
//! pipeline and caches results per `(period, types)`.

#![deny(unsafe_code)]

/// Insight caching with pluggable backends
pub mod cache;
/// Environment-driven engine configuration
pub mod config;
/// Domain thresholds and tunable constants
pub mod constants;
/// Unified error handling
pub mod errors;
/// Analyzers, classifiers, derating rules, and scorers
pub mod intelligence;
/// Structured logging setup
pub mod logging;
/// Core data model
pub mod models;
/// Observation storage seam
pub mod observations;
/// Orchestration services
pub mod services;

pub use errors::{AppError, AppResult, ErrorCode};
pub use models::{Insight, InsightPeriod, ObservationSet, WeatherObservation};
pub use services::InsightService;
