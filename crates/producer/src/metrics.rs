//! Route metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Metrics for a single route
#[derive(Debug, Default)]
pub struct RouteMetrics {
    /// Current queue length
    queue_len: AtomicUsize,
    /// Total messages processed (fault or not)
    processed_count: AtomicU64,
    /// Messages that ended with the fault flag set
    fault_count: AtomicU64,
    /// Messages rejected because the queue was full
    rejected_count: AtomicU64,
}

impl RouteMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current queue length
    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    /// Set current queue length
    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn processed_count(&self) -> u64 {
        self.processed_count.load(Ordering::Relaxed)
    }

    pub fn inc_processed_count(&self) {
        self.processed_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fault_count(&self) -> u64 {
        self.fault_count.load(Ordering::Relaxed)
    }

    pub fn inc_fault_count(&self) {
        self.fault_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected_count.load(Ordering::Relaxed)
    }

    pub fn inc_rejected_count(&self) {
        self.rejected_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> RouteMetricsSnapshot {
        RouteMetricsSnapshot {
            queue_len: self.queue_len(),
            processed_count: self.processed_count(),
            fault_count: self.fault_count(),
            rejected_count: self.rejected_count(),
        }
    }
}

/// Snapshot of route metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMetricsSnapshot {
    pub queue_len: usize,
    pub processed_count: u64,
    pub fault_count: u64,
    pub rejected_count: u64,
}
