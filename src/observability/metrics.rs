//! Provider counters
//!
//! - Counters only, monotonic
//! - One set per provider, zero at creation
//! - Atomic increments, Relaxed ordering

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters of a specification provider
#[derive(Debug, Default)]
pub struct ProviderMetrics {
    /// Specifications successfully materialized
    specs_built: AtomicU64,
    /// Builds refused by readiness or population
    builds_rejected: AtomicU64,
    /// Identities registered
    ids_registered: AtomicU64,
    /// Registrations refused as duplicates
    uniqueness_rejections: AtomicU64,
}

impl ProviderMetrics {
    /// Create a metrics set with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment specifications built
    pub fn increment_specs_built(&self) {
        self.specs_built.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rejected builds
    pub fn increment_builds_rejected(&self) {
        self.builds_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment registered identities
    pub fn increment_ids_registered(&self) {
        self.ids_registered.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment duplicate registrations
    pub fn increment_uniqueness_rejections(&self) {
        self.uniqueness_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            specs_built: self.specs_built.load(Ordering::Relaxed),
            builds_rejected: self.builds_rejected.load(Ordering::Relaxed),
            ids_registered: self.ids_registered.load(Ordering::Relaxed),
            uniqueness_rejections: self.uniqueness_rejections.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of provider counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub specs_built: u64,
    pub builds_rejected: u64,
    pub ids_registered: u64,
    pub uniqueness_rejections: u64,
}
