//! Time-bounded cache in front of a registry.

use super::{CepAddress, PostalCodeRegistry, ViaCepClient};
use crate::domain::PostalCode;
use crate::error::RegistryResult;
use crate::metrics::Metrics;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Answer {
    exists: bool,
    answered_at: Instant,
}

/// Wraps a registry and remembers its definitive answers for `ttl`.
///
/// Only `Ok(true)` and `Ok(false)` are stored. Failures always reach the
/// inner registry again on the next call. Clones share the same entries.
#[derive(Clone)]
pub struct CachedRegistry<R> {
    inner: R,
    answers: Arc<RwLock<HashMap<PostalCode, Answer>>>,
    ttl: Duration,
    metrics: Metrics,
}

impl<R: PostalCodeRegistry> CachedRegistry<R> {
    pub fn new(inner: R, ttl_seconds: u64) -> Self {
        Self {
            inner,
            answers: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::from_secs(ttl_seconds),
            metrics: Metrics::new(),
        }
    }

    /// Count cache hits on an existing collector instead of a private one.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn cached(&self, code: &PostalCode) -> Option<bool> {
        let answers = self.answers.read().ok()?;
        let answer = answers.get(code)?;
        (answer.answered_at.elapsed() < self.ttl).then_some(answer.exists)
    }

    /// Store an answer obtained elsewhere, such as from a full address lookup.
    pub fn remember(&self, code: PostalCode, exists: bool) {
        if let Ok(mut answers) = self.answers.write() {
            answers.insert(
                code,
                Answer {
                    exists,
                    answered_at: Instant::now(),
                },
            );
        }
    }

    /// Drop entries older than the TTL.
    pub fn purge_expired(&self) {
        if let Ok(mut answers) = self.answers.write() {
            let ttl = self.ttl;
            answers.retain(|_, answer| answer.answered_at.elapsed() < ttl);
        }
    }

    /// Forget everything.
    pub fn clear(&self) {
        if let Ok(mut answers) = self.answers.write() {
            answers.clear();
        }
    }

    /// Number of stored answers, expired ones included.
    pub fn len(&self) -> usize {
        self.answers.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: PostalCodeRegistry> PostalCodeRegistry for CachedRegistry<R> {
    fn exists(&self, code: &PostalCode) -> RegistryResult<bool> {
        if let Some(exists) = self.cached(code) {
            self.metrics.record_cache_hit();
            return Ok(exists);
        }

        let exists = self.inner.exists(code)?;
        self.remember(*code, exists);
        Ok(exists)
    }
}

impl CachedRegistry<ViaCepClient> {
    /// Fetch the full address for `code` and remember whether it exists, so
    /// a validation of the same code right after is served from the cache.
    pub fn lookup(&self, code: &PostalCode) -> RegistryResult<Option<CepAddress>> {
        let found = self.inner.lookup(code)?;
        self.remember(*code, found.is_some());
        Ok(found)
    }
}

impl<R> std::fmt::Debug for CachedRegistry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.answers.read().map(|a| a.len()).unwrap_or(0);
        f.debug_struct("CachedRegistry")
            .field("ttl", &self.ttl)
            .field("entries", &entries)
            .finish()
    }
}
