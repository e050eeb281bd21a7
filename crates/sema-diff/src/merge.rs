//! Merge strategy execution.
//!
//! [`MergeStrategyExecutor`] is a state machine over the five merge
//! strategies. Every strategy except `Force` fails closed when the diff
//! carries conflicts. A successful application yields an ordered replay log
//! and a merge identifier, and emits a `MergeCompleted` event.
//!
//! Cancellation is honored up until application begins; once changes are
//! being applied the merge runs to completion.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use sema_events::{ChangeEvent, EventPublisher, NoopPublisher};
use sema_graph::QueryContext;
use sema_types::{AppliedChange, BranchDiff, ChangeKind, DiffEntry, MergeResult, MergeStrategy};

use crate::error::DiffResult;

/// Applies a chosen merge strategy to a computed diff.
pub struct MergeStrategyExecutor {
    publisher: Arc<dyn EventPublisher>,
}

impl Default for MergeStrategyExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeStrategyExecutor {
    /// An executor with no event publisher configured.
    pub fn new() -> Self {
        Self {
            publisher: Arc::new(NoopPublisher),
        }
    }

    /// An executor that emits merge events to `publisher`.
    pub fn with_publisher(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }

    /// Apply `strategy` to merge `source` into `target`.
    ///
    /// Returns an unsuccessful [`MergeResult`] carrying the blocking
    /// conflicts when the strategy fails closed; conflicts are data, not
    /// errors. Only cancellation and store failures are `Err`.
    pub async fn apply_merge(
        &self,
        source: &str,
        target: &str,
        diff: &BranchDiff,
        strategy: MergeStrategy,
        by: &str,
        ctx: &QueryContext,
    ) -> DiffResult<MergeResult> {
        ctx.ensure_active()?;

        if strategy != MergeStrategy::Force && diff.has_conflicts() {
            debug!(
                %source, %target, %strategy,
                conflicts = diff.conflicts.len(),
                "merge blocked by conflicts"
            );
            return Ok(MergeResult {
                success: false,
                merged_at: Utc::now(),
                conflicts: diff.conflicts.clone(),
                applied: Vec::new(),
                merge_id: Uuid::now_v7(),
            });
        }

        // Last cancellation point: application has side effects and must
        // not be interrupted mid-flight.
        ctx.ensure_active()?;

        let applied = replay_log(&diff.entries, strategy);
        let merge_id = Uuid::now_v7();
        debug!(%source, %target, %strategy, changes = applied.len(), %merge_id, "merge applied");

        let event = ChangeEvent::merge_completed(source, target, by);
        if let Err(err) = self.publisher.publish(&event).await {
            warn!(%source, %target, %err, "merge event publish failed");
        }

        Ok(MergeResult {
            success: true,
            merged_at: Utc::now(),
            conflicts: Vec::new(),
            applied,
            merge_id,
        })
    }
}

/// Build the ordered replay log for a strategy.
///
/// `FastForward`, `ThreeWay`, `Squash`, and `Force` replay the diff in its
/// own order (the diff is already a single collapsed change set, which is
/// exactly what squash needs). `Rebase` reorders deterministically:
/// additions first, then modifications and renames, then removals, so
/// replayed entities exist before anything references them.
fn replay_log(entries: &[DiffEntry], strategy: MergeStrategy) -> Vec<AppliedChange> {
    let ordered: Vec<&DiffEntry> = match strategy {
        MergeStrategy::Rebase => {
            let rank = |kind: ChangeKind| match kind {
                ChangeKind::Added => 0u8,
                ChangeKind::Modified | ChangeKind::Renamed => 1,
                ChangeKind::Removed => 2,
            };
            let mut ordered: Vec<&DiffEntry> = entries.iter().collect();
            ordered.sort_by(|a, b| {
                rank(a.kind)
                    .cmp(&rank(b.kind))
                    .then_with(|| a.entity_id.cmp(&b.entity_id))
            });
            ordered
        }
        _ => entries.iter().collect(),
    };

    ordered
        .into_iter()
        .enumerate()
        .map(|(seq, entry)| AppliedChange {
            seq: seq as u32,
            entity_type: entry.entity_type.clone(),
            entity_id: entry.entity_id.clone(),
            kind: entry.kind,
            value: entry.new_value.clone(),
        })
        .collect()
}
