//! Process-wide result memoization
//!
//! The analysis is a pure batch computation, so one payload per
//! (category, config) pair can be reused for the process lifetime. This
//! is an explicit component the caller owns, not hidden global state
//! inside the engine: the engine itself stays cache-free and
//! recomputes from scratch whenever invoked directly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::error::Result;
use crate::report::AnalysisPayload;

/// Cache key: category plus the exact config bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    crime_type: String,
    spatial_radius_bits: u64,
    temporal_days: i64,
    eps_bits: u64,
    min_samples: usize,
}

impl CacheKey {
    fn new(crime_type: &str, cfg: &Config) -> Self {
        Self {
            crime_type: crime_type.to_string(),
            spatial_radius_bits: cfg.spatial_radius_miles.to_bits(),
            temporal_days: cfg.temporal_days,
            eps_bits: cfg.dbscan_eps_miles.to_bits(),
            min_samples: cfg.dbscan_min_samples,
        }
    }
}

/// Lazy, at-most-once payload cache keyed by (category, config).
///
/// Computation runs under the cache lock, so two concurrent requests for
/// the same key never both compute; there is no invalidation, matching
/// the fixed-batch model.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: Mutex<HashMap<CacheKey, Arc<AnalysisPayload>>>,
}

impl ResultCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached payload for this key, computing and storing it
    /// on first use. A failed computation caches nothing, so a later
    /// call may retry.
    pub fn get_or_compute<F>(
        &self,
        crime_type: &str,
        cfg: &Config,
        compute: F,
    ) -> Result<Arc<AnalysisPayload>>
    where
        F: FnOnce() -> Result<AnalysisPayload>,
    {
        let key = CacheKey::new(crime_type, cfg);
        let mut entries = self.entries.lock().expect("cache lock poisoned");

        if let Some(payload) = entries.get(&key) {
            log::debug!("Cache hit for category {:?}", crime_type);
            return Ok(Arc::clone(payload));
        }

        log::debug!("Cache miss for category {:?}; computing", crime_type);
        let payload = Arc::new(compute()?);
        entries.insert(key, Arc::clone(&payload));
        Ok(payload)
    }

    /// Number of cached payloads.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
