// ABOUTME: Service layer wiring analyzers, cache, and repository into insight generation
// ABOUTME: Also provides the injectable clock used to anchor wall-time dependent rules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

pub mod insight_service;

pub use insight_service::InsightService;

use chrono::{DateTime, Utc};

/// Wall-clock source.
///
/// Soiling windows, alert recency, and insight expiry all depend on "now";
/// injecting the clock keeps those paths deterministic under test.
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock, the production implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
