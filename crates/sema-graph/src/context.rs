//! Deadline and cancellation propagation.
//!
//! Every call into the external store carries a [`QueryContext`]. Contexts
//! are cheap to clone; clones share the cancellation flag, so cancelling a
//! parent cancels every fan-out sub-query derived from it. On cancellation
//! partial work is discarded — callers never observe a stale or partial
//! success.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{GraphError, GraphResult};

/// Caller-supplied execution bounds for a core operation.
#[derive(Clone, Debug)]
pub struct QueryContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl QueryContext {
    /// A context with no deadline. Cancellation is still available.
    pub fn unbounded() -> Self {
        Self {
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A context that times out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. All clones of this context observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Time remaining until the deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Fails with [`GraphError::Cancelled`] or [`GraphError::Timeout`] when
    /// the context is no longer active.
    ///
    /// Checked before and after every store round-trip so partial work is
    /// discarded promptly.
    pub fn ensure_active(&self) -> GraphResult<()> {
        if self.is_cancelled() {
            return Err(GraphError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(GraphError::Timeout);
            }
        }
        Ok(())
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::unbounded()
    }
}
