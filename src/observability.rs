//! Logging setup and in-process scan counters

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Metrics handle for recording scan outcomes
#[derive(Debug, Default)]
pub struct Metrics {
    scans_succeeded: AtomicU64,
    invalid_images: AtomicU64,
    missing_inputs: AtomicU64,
    lookup_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan_succeeded(&self) {
        self.scans_succeeded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "scans_succeeded", "Metric incremented");
    }

    pub fn invalid_image(&self) {
        self.invalid_images.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "invalid_images", "Metric incremented");
    }

    pub fn missing_input(&self) {
        self.missing_inputs.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "missing_inputs", "Metric incremented");
    }

    pub fn lookup_failed(&self) {
        self.lookup_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "lookup_failures", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            scans_succeeded: self.scans_succeeded.load(Ordering::Relaxed),
            invalid_images: self.invalid_images.load(Ordering::Relaxed),
            missing_inputs: self.missing_inputs.load(Ordering::Relaxed),
            lookup_failures: self.lookup_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub scans_succeeded: u64,
    pub invalid_images: u64,
    pub missing_inputs: u64,
    pub lookup_failures: u64,
}

impl MetricsSnapshot {
    pub fn total(&self) -> u64 {
        self.scans_succeeded + self.invalid_images + self.missing_inputs + self.lookup_failures
    }
}
