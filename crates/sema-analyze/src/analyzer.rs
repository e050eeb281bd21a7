//! The dependency analyzer.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::warn;

use sema_graph::QueryContext;
use sema_traverse::{TraversalEngine, TraverseResult};
use sema_types::{
    ConflictType, CoreConfig, DependencyPath, Direction, ErrorKind, SemanticConflict,
    TraversalQuery,
};

use crate::cycles::{cycle_severity, find_cycles};
use crate::report::{ChangeType, ImpactReport};

/// Change-impact analysis, cycle detection, critical-path and orphan
/// detection, built entirely on [`TraversalEngine`].
pub struct DependencyAnalyzer {
    engine: Arc<TraversalEngine>,
    config: CoreConfig,
}

impl DependencyAnalyzer {
    pub fn new(engine: Arc<TraversalEngine>, config: CoreConfig) -> Self {
        Self { engine, config }
    }

    /// Analyze what a change to `entity` affects downstream.
    ///
    /// Direct dependents come from a single one-hop inbound lookup; the
    /// transitive set flattens the intermediate nodes of every path from a
    /// direct dependent toward the entity. Advisory: sub-call failures
    /// degrade to partial results.
    pub async fn analyze_change_impact(
        &self,
        entity: &str,
        change_type: ChangeType,
        ctx: &QueryContext,
    ) -> TraverseResult<ImpactReport> {
        let mut report = ImpactReport {
            entity: entity.to_string(),
            ..Default::default()
        };

        let query = TraversalQuery {
            start_nodes: vec![entity.to_string()],
            relations: Vec::new(),
            direction: Direction::Inbound,
            max_depth: 1,
            limit: None,
            filters: BTreeMap::new(),
            include_metadata: true,
        };
        let direct = fail_open(
            self.engine.traverse(&query, ctx).await,
            "direct dependent lookup",
        )?;

        let mut direct_ids = BTreeSet::new();
        let mut critical = BTreeSet::new();
        if let Some(result) = direct {
            for node in &result.nodes {
                direct_ids.insert(node.id.clone());
                let is_critical = node
                    .properties
                    .get("critical")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                if is_critical {
                    critical.insert(node.id.clone());
                }
            }
        }

        // Transitive dependents: intermediate nodes of paths from each
        // direct dependent toward the entity. Per-dependent failures are
        // tolerated without cancelling the siblings.
        let mut transitive = BTreeSet::new();
        let max_depth = self.config.thresholds.max_traversal_depth;
        for dependent in &direct_ids {
            let paths = fail_open(
                self.engine
                    .find_dependency_paths(dependent, entity, max_depth, ctx)
                    .await,
                "transitive dependent lookup",
            )?;
            for path in paths.unwrap_or_default() {
                for node in path.nodes.iter().skip(1).take(path.nodes.len().saturating_sub(2)) {
                    if node != entity && !direct_ids.contains(node) {
                        transitive.insert(node.clone());
                    }
                }
            }
        }

        report.direct_dependents = direct_ids.into_iter().collect();
        report.transitive_dependents = transitive.into_iter().collect();
        report.critical_services = critical.into_iter().collect();

        if report.affected_count() > self.config.thresholds.high_impact_changes {
            report.recommendations.push(format!(
                "high-impact change: {} dependents affected; use a phased rollout",
                report.affected_count()
            ));
        }
        if change_type == ChangeType::Deletion {
            report.recommendations.push(format!(
                "deleting {entity} is a breaking change for all dependents"
            ));
            report
                .recommendations
                .push("provide a deprecation path before removal".to_string());
        }

        Ok(report)
    }

    /// One [`SemanticConflict`] per detected dependency cycle.
    ///
    /// Severity increases as cycle length decreases.
    pub async fn detect_circular_dependencies(
        &self,
        ctx: &QueryContext,
    ) -> TraverseResult<Vec<SemanticConflict>> {
        let edges = fail_open(
            self.engine.collect_edges(&[], ctx).await,
            "edge snapshot for cycle detection",
        )?;
        let Some(edges) = edges else {
            return Ok(Vec::new());
        };

        let conflicts = find_cycles(&edges)
            .into_iter()
            .map(|cycle| {
                let severity = cycle_severity(cycle.len());
                let description = format!("circular dependency: {}", render_cycle(&cycle));
                SemanticConflict {
                    conflict_type: ConflictType::CircularDependency,
                    affected_nodes: cycle,
                    severity,
                    description,
                }
            })
            .collect();
        Ok(conflicts)
    }

    /// Dependency paths between hub nodes, truncated to `max_paths`.
    ///
    /// Hubs are nodes whose combined in+out degree reaches the configured
    /// threshold. A path is marked critical when its hop count is within
    /// the configured critical-path budget.
    pub async fn find_critical_paths(
        &self,
        max_paths: usize,
        ctx: &QueryContext,
    ) -> TraverseResult<Vec<DependencyPath>> {
        let degrees = fail_open(
            self.engine.degree_snapshot(ctx).await,
            "degree snapshot for critical paths",
        )?;
        let Some(degrees) = degrees else {
            return Ok(Vec::new());
        };

        let high_degree = self.config.thresholds.high_degree as u64;
        let hubs: Vec<String> = degrees
            .iter()
            .filter(|d| d.total() >= high_degree)
            .map(|d| d.node.id.clone())
            .collect();

        let hop_budget = self.config.thresholds.critical_path_hops;
        let max_depth = self.config.thresholds.max_traversal_depth;
        let mut paths = Vec::new();
        'pairs: for from in &hubs {
            for to in &hubs {
                if from == to {
                    continue;
                }
                let found = fail_open(
                    self.engine.find_dependency_paths(from, to, max_depth, ctx).await,
                    "hub pair path search",
                )?;
                for mut path in found.unwrap_or_default() {
                    path.is_critical = path.hops() <= hop_budget;
                    paths.push(path);
                    if paths.len() >= max_paths {
                        break 'pairs;
                    }
                }
            }
        }
        Ok(paths)
    }

    /// Entities outside the system namespace with no relations at all.
    pub async fn analyze_orphaned_entities(
        &self,
        ctx: &QueryContext,
    ) -> TraverseResult<Vec<SemanticConflict>> {
        let degrees = fail_open(
            self.engine.degree_snapshot(ctx).await,
            "degree snapshot for orphan detection",
        )?;
        let Some(degrees) = degrees else {
            return Ok(Vec::new());
        };

        let conflicts = degrees
            .iter()
            .filter(|d| d.total() == 0 && !self.config.is_system_entity(&d.node.id))
            .map(|d| SemanticConflict {
                conflict_type: ConflictType::OrphanedNode,
                affected_nodes: vec![d.node.id.clone()],
                severity: sema_types::Severity::Low,
                description: format!("entity {} has no inbound or outbound relations", d.node.id),
            })
            .collect();
        Ok(conflicts)
    }
}

/// Advisory failure policy: cancellation and timeouts surface, everything
/// else degrades to `None` with a warning.
fn fail_open<T>(
    result: TraverseResult<T>,
    what: &str,
) -> TraverseResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if matches!(err.kind(), ErrorKind::Cancelled | ErrorKind::Timeout) => Err(err),
        Err(err) => {
            warn!(%err, "{what} failed, continuing with partial results");
            Ok(None)
        }
    }
}

fn render_cycle(cycle: &[String]) -> String {
    let mut rendered = cycle.join(" -> ");
    if let Some(first) = cycle.first() {
        rendered.push_str(" -> ");
        rendered.push_str(first);
    }
    rendered
}
