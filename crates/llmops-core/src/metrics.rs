//! Global atomic counters for gate observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (the CLI does so before exiting).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters.
pub struct Metrics {
    evaluations: AtomicU64,
    promotions: AtomicU64,
    rejections: AtomicU64,
    notification_failures: AtomicU64,
    runs_launched: AtomicU64,
    launch_failures: AtomicU64,
    approval_requests: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            evaluations: AtomicU64::new(0),
            promotions: AtomicU64::new(0),
            rejections: AtomicU64::new(0),
            notification_failures: AtomicU64::new(0),
            runs_launched: AtomicU64::new(0),
            launch_failures: AtomicU64::new(0),
            approval_requests: AtomicU64::new(0),
        }
    }

    pub fn inc_evaluations(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "evaluations", "counter incremented");
    }

    /// Count a decision, by outcome.
    pub fn record_decision(&self, promoted: bool) {
        if promoted {
            self.promotions.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(metric = "promotions", "counter incremented");
        } else {
            self.rejections.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(metric = "rejections", "counter incremented");
        }
    }

    pub fn inc_notification_failures(&self) {
        self.notification_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "notification_failures", "counter incremented");
    }

    pub fn inc_runs_launched(&self) {
        self.runs_launched.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "runs_launched", "counter incremented");
    }

    pub fn inc_launch_failures(&self) {
        self.launch_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "launch_failures", "counter incremented");
    }

    pub fn inc_approval_requests(&self) {
        self.approval_requests.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "approval_requests", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            evaluations = self.evaluations(),
            promotions = self.promotions(),
            rejections = self.rejections(),
            notification_failures = self.notification_failures(),
            runs_launched = self.runs_launched(),
            launch_failures = self.launch_failures(),
            approval_requests = self.approval_requests(),
        );
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    pub fn promotions(&self) -> u64 {
        self.promotions.load(Ordering::Relaxed)
    }

    pub fn rejections(&self) -> u64 {
        self.rejections.load(Ordering::Relaxed)
    }

    pub fn notification_failures(&self) -> u64 {
        self.notification_failures.load(Ordering::Relaxed)
    }

    pub fn runs_launched(&self) -> u64 {
        self.runs_launched.load(Ordering::Relaxed)
    }

    pub fn launch_failures(&self) -> u64 {
        self.launch_failures.load(Ordering::Relaxed)
    }

    pub fn approval_requests(&self) -> u64 {
        self.approval_requests.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        for counter in [
            &self.evaluations,
            &self.promotions,
            &self.rejections,
            &self.notification_failures,
            &self.runs_launched,
            &self.launch_failures,
            &self.approval_requests,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
