//! Basic metrics instrumentation for registry lookups.
//!
//! Provides counters and duration tracking for HTTP lookups and cache use.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector for postal-code lookups.
///
/// Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Total number of registry lookups sent over HTTP
    lookups_total: Arc<AtomicU64>,

    /// Lookups that ended without an answer (timeout, transport, 5xx)
    lookups_unavailable_total: Arc<AtomicU64>,

    /// Lookups answered with "not found"
    lookups_not_found_total: Arc<AtomicU64>,

    /// Total duration of all lookups in milliseconds
    lookup_duration_total_ms: Arc<AtomicU64>,

    /// Answers served from cache
    cache_hits_total: Arc<AtomicU64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed lookup with its duration.
    pub fn record_lookup(&self, duration: Duration) {
        self.lookups_total.fetch_add(1, Ordering::Relaxed);
        self.lookup_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_unavailable(&self) {
        self.lookups_unavailable_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_not_found(&self) {
        self.lookups_not_found_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn lookups_total(&self) -> u64 {
        self.lookups_total.load(Ordering::Relaxed)
    }

    pub fn lookups_unavailable_total(&self) -> u64 {
        self.lookups_unavailable_total.load(Ordering::Relaxed)
    }

    pub fn lookups_not_found_total(&self) -> u64 {
        self.lookups_not_found_total.load(Ordering::Relaxed)
    }

    pub fn cache_hits_total(&self) -> u64 {
        self.cache_hits_total.load(Ordering::Relaxed)
    }

    /// Get average lookup duration in milliseconds.
    pub fn lookup_duration_avg_ms(&self) -> f64 {
        let total = self.lookup_duration_total_ms.load(Ordering::Relaxed);
        let count = self.lookups_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Snapshot of all counters.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            lookups_total: self.lookups_total(),
            lookups_unavailable_total: self.lookups_unavailable_total(),
            lookups_not_found_total: self.lookups_not_found_total(),
            cache_hits_total: self.cache_hits_total(),
            lookup_duration_avg_ms: self.lookup_duration_avg_ms(),
        }
    }
}

/// Point-in-time copy of [`Metrics`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MetricsSummary {
    pub lookups_total: u64,
    pub lookups_unavailable_total: u64,
    pub lookups_not_found_total: u64,
    pub cache_hits_total: u64,
    pub lookup_duration_avg_ms: f64,
}
