//! The merge validation orchestrator.
//!
//! `validate_merge` is fail-closed: every required step either succeeds or
//! aborts the whole call. Dependency analysis is the one advisory input —
//! it degrades internally but never silently drops a required signal.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use sema_analyze::DependencyAnalyzer;
use sema_diff::{ConflictResolver, DiffEngine, SnapshotSource};
use sema_graph::QueryContext;
use sema_types::{
    Conflict, ConflictType, CoreConfig, MergeDecision, MergeStrategy, SemanticConflict,
};

use crate::error::ValidateResult;
use crate::resolution::{
    conflict_signature, data_integrity_risk, decide, estimated_resolution_time, performance_risk,
    recommend_strategy, resolution_for, ImpactAnalysis, Resolution, RiskAssessment,
};
use crate::rules::{RuleContext, RuleRegistry};

/// The automated disposition of a proposed merge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MergeValidationResult {
    pub can_auto_merge: bool,
    pub decision: MergeDecision,
    /// Deduplicated conflicts, in detection order.
    pub conflicts: Vec<SemanticConflict>,
    /// One resolution per conflict, deduplicated by signature.
    pub resolutions: Vec<Resolution>,
    pub impact: ImpactAnalysis,
    pub recommended_strategy: MergeStrategy,
    pub risk: RiskAssessment,
}

/// Orchestrates diffing, rule evaluation, conflict detection, and
/// dependency analysis into a merge decision.
pub struct MergeValidationService {
    snapshots: Arc<dyn SnapshotSource>,
    analyzer: Arc<DependencyAnalyzer>,
    registry: RuleRegistry,
    diff_engine: DiffEngine,
    resolver: ConflictResolver,
    config: CoreConfig,
}

impl MergeValidationService {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        analyzer: Arc<DependencyAnalyzer>,
        registry: RuleRegistry,
        config: CoreConfig,
    ) -> Self {
        Self {
            snapshots,
            analyzer,
            registry,
            diff_engine: DiffEngine::new(),
            resolver: ConflictResolver::new(),
            config,
        }
    }

    /// Validate merging `source` into `target` over the common `base`.
    pub async fn validate_merge(
        &self,
        source: &str,
        target: &str,
        base: &str,
        strategy: MergeStrategy,
        ctx: &QueryContext,
    ) -> ValidateResult<MergeValidationResult> {
        // (1) Branch-scoped change sets for both sides, against the base.
        let base_snapshot = self.snapshots.load_snapshot(base, ctx).await?;
        let source_snapshot = self.snapshots.load_snapshot(source, ctx).await?;
        let target_snapshot = self.snapshots.load_snapshot(target, ctx).await?;

        let source_diff = self.diff_engine.calculate_diff(&base_snapshot, &source_snapshot);
        let target_diff = self.diff_engine.calculate_diff(&base_snapshot, &target_snapshot);

        // (2) Rule evaluation per side, collecting breaking changes.
        let mut conflicts = Vec::new();
        conflicts.extend(self.registry.evaluate_diff(
            &source_diff,
            &RuleContext {
                branch: source.to_string(),
                base: base.to_string(),
            },
        ));
        conflicts.extend(self.registry.evaluate_diff(
            &target_diff,
            &RuleContext {
                branch: target.to_string(),
                base: base.to_string(),
            },
        ));

        // (3) Entities changed differently on both sides.
        for conflict in self.resolver.detect(&source_diff, &target_diff) {
            conflicts.push(merge_conflict(conflict));
        }

        // Advisory: dependency cycles in the current graph. Fails open
        // inside the analyzer; only cancellation aborts here.
        conflicts.extend(self.analyzer.detect_circular_dependencies(ctx).await?);

        // (4) Deduplicate by signature, preserving detection order.
        let conflicts = dedup_by_signature(conflicts);

        // (5) One resolution per conflict, by severity.
        let resolutions: Vec<Resolution> = conflicts
            .iter()
            .map(|conflict| {
                let (action, confidence) = resolution_for(conflict.severity);
                Resolution {
                    conflict_type: conflict.conflict_type,
                    action,
                    confidence,
                    rationale: format!("{} conflict: {}", conflict.severity, conflict.description),
                    signature: conflict_signature(conflict),
                }
            })
            .collect();

        // (6) Decision per the auto-merge invariant.
        let decision = decide(
            &conflicts,
            &resolutions,
            self.config.thresholds.auto_resolve_confidence,
            self.config.thresholds.max_merge_conflicts,
        );

        // (7) Impact analysis.
        let affected: BTreeSet<&str> = conflicts
            .iter()
            .flat_map(|c| c.affected_nodes.iter().map(String::as_str))
            .collect();
        let mut severity_histogram = BTreeMap::new();
        for conflict in &conflicts {
            *severity_histogram.entry(conflict.severity).or_insert(0) += 1;
        }
        let impact = ImpactAnalysis {
            affected_entities: affected.len(),
            severity_histogram,
            estimated_resolution: estimated_resolution_time(&conflicts),
        };

        // (8) Risk assessment.
        let risk = RiskAssessment {
            data_integrity: data_integrity_risk(&conflicts),
            performance: performance_risk(impact.affected_entities),
        };

        let recommended_strategy = recommend_strategy(strategy, &conflicts);
        info!(
            %source, %target, %base, %decision,
            conflicts = conflicts.len(),
            "merge validated"
        );

        Ok(MergeValidationResult {
            can_auto_merge: decision == MergeDecision::AutoMerge,
            decision,
            conflicts,
            resolutions,
            impact,
            recommended_strategy,
            risk,
        })
    }
}

/// Lift a structural conflict into a semantic merge conflict, keeping the
/// resolver's criticality classification.
fn merge_conflict(conflict: Conflict) -> SemanticConflict {
    SemanticConflict {
        conflict_type: ConflictType::MergeConflict,
        affected_nodes: conflict.entities,
        severity: conflict.severity,
        description: conflict.description,
    }
}

fn dedup_by_signature(conflicts: Vec<SemanticConflict>) -> Vec<SemanticConflict> {
    let mut seen = HashSet::new();
    conflicts
        .into_iter()
        .filter(|c| seen.insert(conflict_signature(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::{ResolutionAction, RiskLevel};
    use sema_diff::InMemorySnapshotSource;
    use sema_graph::InMemoryGraphStore;
    use sema_traverse::TraversalEngine;
    use sema_types::{BranchSnapshot, GraphEdge, SchemaEntity, Severity};
    use serde_json::json;
    use std::time::Duration;

    struct Fixture {
        snapshots: Arc<InMemorySnapshotSource>,
        store: Arc<InMemoryGraphStore>,
        config: CoreConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                snapshots: Arc::new(InMemorySnapshotSource::new()),
                store: Arc::new(InMemoryGraphStore::new()),
                config: CoreConfig::default(),
            }
        }

        fn snapshot(&self, branch: &str, entities: &[(&str, serde_json::Value)]) {
            let mut snap = BranchSnapshot::empty(branch);
            for (id, content) in entities {
                snap.insert(SchemaEntity::new("object_type", *id, content.clone()));
            }
            self.snapshots.insert(snap);
        }

        fn service(&self) -> MergeValidationService {
            let engine = Arc::new(TraversalEngine::new(self.store.clone(), self.config.clone()));
            let analyzer = Arc::new(DependencyAnalyzer::new(engine, self.config.clone()));
            MergeValidationService::new(
                self.snapshots.clone(),
                analyzer,
                RuleRegistry::with_defaults(),
                self.config.clone(),
            )
        }
    }

    async fn validate(fixture: &Fixture) -> MergeValidationResult {
        fixture
            .service()
            .validate_merge(
                "feature/x",
                "main",
                "base",
                MergeStrategy::ThreeWay,
                &QueryContext::unbounded(),
            )
            .await
            .unwrap()
    }

    // ---- Auto merge ----

    #[tokio::test]
    async fn zero_conflicts_auto_merges() {
        let fixture = Fixture::new();
        let widget = [("Widget", json!({"desc": "a"}))];
        fixture.snapshot("base", &widget);
        fixture.snapshot("feature/x", &[("Widget", json!({"desc": "a"})), ("New", json!({}))]);
        fixture.snapshot("main", &widget);

        let result = validate(&fixture).await;
        assert!(result.can_auto_merge);
        assert_eq!(result.decision, MergeDecision::AutoMerge);
        assert!(result.conflicts.is_empty());
        assert_eq!(result.recommended_strategy, MergeStrategy::ThreeWay);
        assert_eq!(result.risk.data_integrity, RiskLevel::Low);
    }

    // ---- The end-to-end Widget scenario ----

    #[tokio::test]
    async fn divergent_widget_needs_manual_resolution_at_high_threshold() {
        let mut fixture = Fixture::new();
        fixture.config.thresholds.auto_resolve_confidence = 0.9;
        fixture.snapshot("base", &[("Widget", json!({"desc": "a"}))]);
        fixture.snapshot("feature/x", &[("Widget", json!({"desc": "b"}))]);
        fixture.snapshot("main", &[("Widget", json!({"desc": "c"}))]);

        let result = validate(&fixture).await;

        // Exactly one conflict, for Widget, at medium severity.
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].conflict_type, ConflictType::MergeConflict);
        assert_eq!(result.conflicts[0].affected_nodes, vec!["Widget"]);
        assert_eq!(result.conflicts[0].severity, Severity::Medium);

        // Medium resolves automatically at 0.8, below the 0.9 threshold.
        assert_eq!(result.resolutions.len(), 1);
        assert_eq!(result.resolutions[0].action, ResolutionAction::Automatic);
        assert!((result.resolutions[0].confidence - 0.8).abs() < 1e-9);
        assert_eq!(result.decision, MergeDecision::ManualResolution);
        assert!(!result.can_auto_merge);
    }

    #[tokio::test]
    async fn divergent_widget_auto_merges_at_default_threshold() {
        let fixture = Fixture::new();
        fixture.snapshot("base", &[("Widget", json!({"desc": "a"}))]);
        fixture.snapshot("feature/x", &[("Widget", json!({"desc": "b"}))]);
        fixture.snapshot("main", &[("Widget", json!({"desc": "c"}))]);

        // Default threshold is 0.8; medium confidence 0.8 meets it.
        let result = validate(&fixture).await;
        assert_eq!(result.decision, MergeDecision::AutoMerge);
    }

    // ---- Rejection ----

    #[tokio::test]
    async fn critical_conflict_rejects_the_merge() {
        let fixture = Fixture::new();
        fixture.snapshot("base", &[("Widget", json!({"primary_key": "a", "desc": "x"}))]);
        fixture.snapshot("feature/x", &[("Widget", json!({"primary_key": "b", "desc": "x"}))]);
        fixture.snapshot("main", &[("Widget", json!({"primary_key": "a", "desc": "y"}))]);

        let result = validate(&fixture).await;
        assert_eq!(result.decision, MergeDecision::RejectMerge);
        assert!(!result.can_auto_merge);
        assert!(result
            .conflicts
            .iter()
            .any(|c| c.severity == Severity::Critical));
        assert_eq!(result.risk.data_integrity, RiskLevel::High);
    }

    // ---- Deferral ----

    #[tokio::test]
    async fn conflict_overload_defers_the_merge() {
        let mut fixture = Fixture::new();
        fixture.config.thresholds.auto_resolve_confidence = 0.9;
        fixture.config.thresholds.max_merge_conflicts = 2;

        let base: Vec<(&str, serde_json::Value)> = vec![
            ("E1", json!({"v": 0})),
            ("E2", json!({"v": 0})),
            ("E3", json!({"v": 0})),
        ];
        fixture.snapshot("base", &base);
        fixture.snapshot(
            "feature/x",
            &[("E1", json!({"v": 1})), ("E2", json!({"v": 1})), ("E3", json!({"v": 1}))],
        );
        fixture.snapshot(
            "main",
            &[("E1", json!({"v": 2})), ("E2", json!({"v": 2})), ("E3", json!({"v": 2}))],
        );

        let result = validate(&fixture).await;
        assert_eq!(result.conflicts.len(), 3);
        assert_eq!(result.decision, MergeDecision::DeferMerge);
    }

    // ---- Deduplication ----

    #[tokio::test]
    async fn identical_conflicts_from_both_sides_dedup() {
        let fixture = Fixture::new();
        fixture.snapshot("base", &[("Gadget", json!({"v": 0})), ("Widget", json!({"v": 0}))]);
        // Both sides remove Gadget: the deletion rule fires once per side
        // with an identical signature.
        fixture.snapshot("feature/x", &[("Widget", json!({"v": 0}))]);
        fixture.snapshot("main", &[("Widget", json!({"v": 0}))]);

        let result = validate(&fixture).await;
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.resolutions.len(), 1);
    }

    // ---- Dependency analysis input ----

    #[tokio::test]
    async fn dependency_cycles_surface_as_conflicts() {
        let fixture = Fixture::new();
        let widget = [("Widget", json!({"v": 0}))];
        fixture.snapshot("base", &widget);
        fixture.snapshot("feature/x", &widget);
        fixture.snapshot("main", &widget);
        fixture.store.add_edge(GraphEdge::new("A", "B", "depends_on"));
        fixture.store.add_edge(GraphEdge::new("B", "A", "depends_on"));

        let result = validate(&fixture).await;
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(
            result.conflicts[0].conflict_type,
            ConflictType::CircularDependency
        );
        // High resolves semi-automatically at 0.6, below the 0.8 default.
        assert_eq!(result.decision, MergeDecision::ManualResolution);
    }

    // ---- Impact & risk ----

    #[tokio::test]
    async fn impact_analysis_counts_and_times() {
        let mut fixture = Fixture::new();
        fixture.config.thresholds.auto_resolve_confidence = 0.9;
        fixture.snapshot("base", &[("Widget", json!({"desc": "a"}))]);
        fixture.snapshot("feature/x", &[("Widget", json!({"desc": "b"}))]);
        fixture.snapshot("main", &[("Widget", json!({"desc": "c"}))]);

        let result = validate(&fixture).await;
        assert_eq!(result.impact.affected_entities, 1);
        assert_eq!(result.impact.severity_histogram[&Severity::Medium], 1);
        // 30 base + 30 for one medium conflict.
        assert_eq!(
            result.impact.estimated_resolution,
            Duration::from_secs(60 * 60)
        );
        assert_eq!(result.risk.performance, RiskLevel::Low);
    }

    // ---- Failure policy ----

    #[tokio::test]
    async fn missing_snapshot_fails_closed() {
        let fixture = Fixture::new();
        fixture.snapshot("feature/x", &[("Widget", json!({}))]);
        fixture.snapshot("main", &[("Widget", json!({}))]);
        // No base snapshot registered.

        let err = fixture
            .service()
            .validate_merge(
                "feature/x",
                "main",
                "base",
                MergeStrategy::ThreeWay,
                &QueryContext::unbounded(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), sema_types::ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn cancellation_aborts_validation() {
        let fixture = Fixture::new();
        let ctx = QueryContext::unbounded();
        ctx.cancel();

        let err = fixture
            .service()
            .validate_merge("feature/x", "main", "base", MergeStrategy::ThreeWay, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), sema_types::ErrorKind::Cancelled);
    }
}
