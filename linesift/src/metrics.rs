use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Tracks pattern-cache and matcher task metrics
///
/// Handles are cheap to clone; all clones share the same counters.
#[derive(Debug, Clone)]
pub struct ScanMetrics {
    // Compile cache metrics
    cache_hits: Arc<AtomicU64>,
    cache_misses: Arc<AtomicU64>,

    // Matcher task metrics
    evaluations: Arc<AtomicU64>,
    short_circuits: Arc<AtomicU64>,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance
    pub fn new() -> Self {
        Self {
            cache_hits: Arc::new(AtomicU64::new(0)),
            cache_misses: Arc::new(AtomicU64::new(0)),
            evaluations: Arc::new(AtomicU64::new(0)),
            short_circuits: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a compile cache hit or miss
    pub fn record_cache_operation(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records one pattern task that ran its regex evaluation
    pub fn record_evaluation(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one pattern task that observed the cancellation signal and
    /// exited without evaluating
    pub fn record_short_circuit(&self) {
        self.short_circuits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    pub fn short_circuits(&self) -> u64 {
        self.short_circuits.load(Ordering::Relaxed)
    }

    /// Logs current metrics
    pub fn log_stats(&self) {
        info!(
            "Matcher stats: {} evaluations, {} short-circuited, cache {} hits / {} misses",
            self.evaluations(),
            self.short_circuits(),
            self.cache_hits(),
            self.cache_misses(),
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_operations() {
        let metrics = ScanMetrics::new();
        metrics.record_cache_operation(true);
        metrics.record_cache_operation(false);
        metrics.record_cache_operation(false);

        assert_eq!(metrics.cache_hits(), 1);
        assert_eq!(metrics.cache_misses(), 2);
    }

    #[test]
    fn test_task_accounting() {
        let metrics = ScanMetrics::new();
        metrics.record_evaluation();
        metrics.record_evaluation();
        metrics.record_short_circuit();

        assert_eq!(metrics.evaluations(), 2);
        assert_eq!(metrics.short_circuits(), 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = ScanMetrics::new();
        let clone = metrics.clone();
        clone.record_evaluation();

        assert_eq!(metrics.evaluations(), 1);
    }
}
