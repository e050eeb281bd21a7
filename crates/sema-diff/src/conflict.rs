//! Cross-branch conflict detection.
//!
//! Given the source-vs-base and target-vs-base diffs, finds entities both
//! sides changed to different resulting values. Severity derives from entity
//! criticality: changes touching identifier or type fields are High, other
//! divergences Medium.

use std::collections::HashMap;

use sema_types::{
    BranchDiff, ChangeKind, Conflict, ConflictKind, DiffEntry, MergeStrategy, Severity,
};

/// Field names whose change makes a divergence critical to merge.
const DEFAULT_CRITICAL_FIELDS: &[&str] = &["id", "primary_key", "type", "key_fields"];

/// Detects irreconcilable overlaps between two change sets.
#[derive(Clone, Debug)]
pub struct ConflictResolver {
    critical_fields: Vec<String>,
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self {
            critical_fields: DEFAULT_CRITICAL_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ConflictResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the field names treated as critical.
    pub fn with_critical_fields(fields: Vec<String>) -> Self {
        Self {
            critical_fields: fields,
        }
    }

    /// Find entities changed on both sides whose resulting values differ.
    ///
    /// Both diffs must be computed against the same base snapshot. Renames
    /// are joined on the original id, everything else on the entity id.
    pub fn detect(&self, source_vs_base: &BranchDiff, target_vs_base: &BranchDiff) -> Vec<Conflict> {
        let target_by_id: HashMap<&str, &DiffEntry> = target_vs_base
            .entries
            .iter()
            .map(|e| (e.entity_id.as_str(), e))
            .collect();
        let target_by_origin: HashMap<&str, &DiffEntry> = target_vs_base
            .entries
            .iter()
            .filter_map(|e| e.renamed_from.as_deref().map(|from| (from, e)))
            .collect();

        let mut conflicts = Vec::new();
        for source_entry in &source_vs_base.entries {
            let target_entry = match source_entry.renamed_from.as_deref() {
                Some(from) => target_by_origin.get(from),
                None => target_by_id.get(source_entry.entity_id.as_str()),
            };
            let Some(target_entry) = target_entry else {
                continue;
            };
            if let Some(conflict) = self.classify(source_entry, target_entry) {
                conflicts.push(conflict);
            }
        }
        conflicts
    }

    fn classify(&self, source: &DiffEntry, target: &DiffEntry) -> Option<Conflict> {
        match (source.kind, target.kind) {
            // Both sides landed on the same value under the same id: no
            // conflict.
            _ if source.new_value == target.new_value
                && source.kind == target.kind
                && source.entity_id == target.entity_id =>
            {
                None
            }

            (ChangeKind::Removed, ChangeKind::Removed) => None,

            (ChangeKind::Removed, _) | (_, ChangeKind::Removed) => Some(Conflict {
                kind: ConflictKind::DeleteModify,
                severity: Severity::High,
                entities: vec![source.entity_id.clone()],
                description: format!(
                    "entity {} was removed on one branch and changed on the other",
                    source.entity_id
                ),
                suggested: vec![MergeStrategy::Force],
            }),

            (ChangeKind::Renamed, ChangeKind::Renamed)
                if source.entity_id != target.entity_id =>
            {
                Some(Conflict {
                    kind: ConflictKind::RenameCollision,
                    severity: Severity::High,
                    entities: vec![source.entity_id.clone(), target.entity_id.clone()],
                    description: format!(
                        "entity {} was renamed differently on both branches",
                        source.renamed_from.as_deref().unwrap_or("?")
                    ),
                    suggested: vec![MergeStrategy::Force],
                })
            }

            _ => Some(Conflict {
                kind: ConflictKind::DivergentModification,
                severity: self.divergence_severity(source, target),
                entities: vec![source.entity_id.clone()],
                description: format!(
                    "entity {} was modified to different values on both branches",
                    source.entity_id
                ),
                suggested: vec![MergeStrategy::ThreeWay, MergeStrategy::Force],
            }),
        }
    }

    /// High when either side touched an identifier/type field.
    fn divergence_severity(&self, source: &DiffEntry, target: &DiffEntry) -> Severity {
        let touches_critical = source
            .changed_fields
            .iter()
            .chain(target.changed_fields.iter())
            .any(|f| self.critical_fields.contains(f));
        if touches_critical {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}
