//! Incremental per-fingerprint execution statistics.

use std::time::Duration;

/// Running averages for one query fingerprint.
///
/// Updated incrementally (`avg += (x - avg) / n`) so recording is O(1) and
/// never re-walks history.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExecutionStats {
    /// Number of recorded executions.
    pub executions: u64,
    /// Average wall-clock execution time in milliseconds.
    pub avg_execution_ms: f64,
    /// Average result count.
    pub avg_result_count: f64,
    /// Fraction of executions served from cache, in `[0, 1]`.
    pub cache_hit_rate: f64,
}

impl ExecutionStats {
    /// Fold one execution into the running averages.
    pub fn record(&mut self, elapsed: Duration, result_count: usize, cache_hit: bool) {
        self.executions += 1;
        let n = self.executions as f64;

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self.avg_execution_ms += (elapsed_ms - self.avg_execution_ms) / n;
        self.avg_result_count += (result_count as f64 - self.avg_result_count) / n;

        let hit = if cache_hit { 1.0 } else { 0.0 };
        self.cache_hit_rate += (hit - self.cache_hit_rate) / n;
    }
}
