//! Pure mapping tables for resolutions, decisions, time, and risk.
//!
//! Every table is a standalone function over plain inputs so each is
//! independently unit-testable; the service only composes them.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use sema_types::{ConflictType, MergeDecision, MergeStrategy, SemanticConflict, Severity};

/// How a conflict gets resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionAction {
    Automatic,
    SemiAutomatic,
    Manual,
}

/// A proposed resolution for one conflict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub conflict_type: ConflictType,
    pub action: ResolutionAction,
    /// Confidence that the action resolves the conflict correctly, in
    /// `[0, 1]`.
    pub confidence: f64,
    pub rationale: String,
    /// Dedup signature of the underlying conflict.
    pub signature: String,
}

/// Aggregate impact of the proposed merge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    /// Number of distinct entities touched by conflicts.
    pub affected_entities: usize,
    /// Conflict count per severity.
    pub severity_histogram: BTreeMap<Severity, usize>,
    /// Estimated hands-on resolution time.
    pub estimated_resolution: Duration,
}

/// Coarse risk levels for the risk assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Risk assessment attached to every validation result.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub data_integrity: RiskLevel,
    pub performance: RiskLevel,
}

/// Severity → (action, confidence) table.
pub fn resolution_for(severity: Severity) -> (ResolutionAction, f64) {
    match severity {
        Severity::Critical => (ResolutionAction::Manual, 0.1),
        Severity::High => (ResolutionAction::SemiAutomatic, 0.6),
        Severity::Medium => (ResolutionAction::Automatic, 0.8),
        Severity::Low => (ResolutionAction::Automatic, 0.9),
    }
}

/// Dedup signature: conflict type, affected objects, and description.
pub fn conflict_signature(conflict: &SemanticConflict) -> String {
    format!(
        "{}|{}|{}",
        conflict.conflict_type,
        conflict.affected_nodes.join(","),
        conflict.description
    )
}

/// The merge decision.
///
/// Auto-merge iff no conflicts, or no critical conflict and every
/// resolution confidence meets the threshold. A critical conflict rejects
/// the merge outright; too many conflicts defer it; otherwise a human
/// resolves.
pub fn decide(
    conflicts: &[SemanticConflict],
    resolutions: &[Resolution],
    auto_resolve_confidence: f64,
    max_merge_conflicts: usize,
) -> MergeDecision {
    if conflicts.is_empty() {
        return MergeDecision::AutoMerge;
    }

    let has_critical = conflicts.iter().any(|c| c.severity == Severity::Critical);
    if has_critical {
        return MergeDecision::RejectMerge;
    }

    let all_confident = resolutions
        .iter()
        .all(|r| r.confidence >= auto_resolve_confidence);
    if all_confident {
        return MergeDecision::AutoMerge;
    }

    if conflicts.len() > max_merge_conflicts {
        return MergeDecision::DeferMerge;
    }

    MergeDecision::ManualResolution
}

/// Estimated resolution time: 30 minutes base plus a per-conflict charge by
/// severity (Critical 120, High 60, Medium 30, Low 15).
pub fn estimated_resolution_time(conflicts: &[SemanticConflict]) -> Duration {
    let minutes: u64 = 30
        + conflicts
            .iter()
            .map(|c| match c.severity {
                Severity::Critical => 120,
                Severity::High => 60,
                Severity::Medium => 30,
                Severity::Low => 15,
            })
            .sum::<u64>();
    Duration::from_secs(minutes * 60)
}

/// Data-integrity risk: high with any critical conflict, medium with more
/// than five conflicts, low otherwise.
pub fn data_integrity_risk(conflicts: &[SemanticConflict]) -> RiskLevel {
    if conflicts.iter().any(|c| c.severity == Severity::Critical) {
        RiskLevel::High
    } else if conflicts.len() > 5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Performance risk by affected-entity count: high above 50, medium above
/// 20, low otherwise.
pub fn performance_risk(affected_entities: usize) -> RiskLevel {
    if affected_entities > 50 {
        RiskLevel::High
    } else if affected_entities > 20 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Strategy recommendation: the proposed strategy stands when nothing
/// blocks it; conflicted merges fall back to a three-way merge after
/// resolution.
pub fn recommend_strategy(proposed: MergeStrategy, conflicts: &[SemanticConflict]) -> MergeStrategy {
    if conflicts.is_empty() {
        proposed
    } else {
        MergeStrategy::ThreeWay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict(severity: Severity) -> SemanticConflict {
        SemanticConflict {
            conflict_type: ConflictType::MergeConflict,
            affected_nodes: vec!["Widget".into()],
            severity,
            description: "divergent".into(),
        }
    }

    fn resolution_of(severity: Severity) -> Resolution {
        let (action, confidence) = resolution_for(severity);
        Resolution {
            conflict_type: ConflictType::MergeConflict,
            action,
            confidence,
            rationale: String::new(),
            signature: String::new(),
        }
    }

    // ---- Resolution table ----

    #[test]
    fn resolution_table() {
        assert_eq!(resolution_for(Severity::Critical), (ResolutionAction::Manual, 0.1));
        assert_eq!(resolution_for(Severity::High), (ResolutionAction::SemiAutomatic, 0.6));
        assert_eq!(resolution_for(Severity::Medium), (ResolutionAction::Automatic, 0.8));
        assert_eq!(resolution_for(Severity::Low), (ResolutionAction::Automatic, 0.9));
    }

    // ---- Decision table ----

    #[test]
    fn no_conflicts_auto_merges() {
        assert_eq!(decide(&[], &[], 0.8, 20), MergeDecision::AutoMerge);
    }

    #[test]
    fn critical_conflict_rejects_regardless_of_confidence() {
        let conflicts = vec![conflict(Severity::Critical), conflict(Severity::Low)];
        let resolutions = vec![resolution_of(Severity::Critical), resolution_of(Severity::Low)];
        assert_eq!(
            decide(&conflicts, &resolutions, 0.0, 20),
            MergeDecision::RejectMerge
        );
    }

    #[test]
    fn confident_resolutions_auto_merge() {
        let conflicts = vec![conflict(Severity::Medium)];
        let resolutions = vec![resolution_of(Severity::Medium)];
        assert_eq!(
            decide(&conflicts, &resolutions, 0.8, 20),
            MergeDecision::AutoMerge
        );
    }

    #[test]
    fn low_confidence_needs_a_human() {
        let conflicts = vec![conflict(Severity::Medium)];
        let resolutions = vec![resolution_of(Severity::Medium)];
        assert_eq!(
            decide(&conflicts, &resolutions, 0.9, 20),
            MergeDecision::ManualResolution
        );
    }

    #[test]
    fn conflict_overload_defers() {
        let conflicts: Vec<_> = (0..4).map(|_| conflict(Severity::Medium)).collect();
        let resolutions: Vec<_> = (0..4).map(|_| resolution_of(Severity::Medium)).collect();
        assert_eq!(
            decide(&conflicts, &resolutions, 0.9, 3),
            MergeDecision::DeferMerge
        );
    }

    // ---- Time estimate ----

    #[test]
    fn resolution_time_sums_severity_charges() {
        let conflicts = vec![
            conflict(Severity::Critical),
            conflict(Severity::High),
            conflict(Severity::Medium),
            conflict(Severity::Low),
        ];
        // 30 + 120 + 60 + 30 + 15 = 255 minutes
        assert_eq!(
            estimated_resolution_time(&conflicts),
            Duration::from_secs(255 * 60)
        );
    }

    #[test]
    fn empty_conflicts_still_cost_the_base() {
        assert_eq!(estimated_resolution_time(&[]), Duration::from_secs(30 * 60));
    }

    // ---- Risk tables ----

    #[test]
    fn data_integrity_risk_table() {
        assert_eq!(data_integrity_risk(&[conflict(Severity::Critical)]), RiskLevel::High);
        let many: Vec<_> = (0..6).map(|_| conflict(Severity::Low)).collect();
        assert_eq!(data_integrity_risk(&many), RiskLevel::Medium);
        assert_eq!(data_integrity_risk(&[conflict(Severity::High)]), RiskLevel::Low);
    }

    #[test]
    fn performance_risk_table() {
        assert_eq!(performance_risk(51), RiskLevel::High);
        assert_eq!(performance_risk(21), RiskLevel::Medium);
        assert_eq!(performance_risk(20), RiskLevel::Low);
        assert_eq!(performance_risk(0), RiskLevel::Low);
    }

    // ---- Strategy recommendation ----

    #[test]
    fn clean_merges_keep_the_proposed_strategy() {
        assert_eq!(
            recommend_strategy(MergeStrategy::FastForward, &[]),
            MergeStrategy::FastForward
        );
        assert_eq!(
            recommend_strategy(MergeStrategy::Squash, &[conflict(Severity::Low)]),
            MergeStrategy::ThreeWay
        );
    }

    #[test]
    fn signatures_distinguish_conflicts() {
        let a = conflict(Severity::Low);
        let mut b = conflict(Severity::Low);
        b.description = "different".into();
        assert_ne!(conflict_signature(&a), conflict_signature(&b));
        assert_eq!(conflict_signature(&a), conflict_signature(&conflict(Severity::Low)));
    }
}
