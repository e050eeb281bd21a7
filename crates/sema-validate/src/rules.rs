//! Merge rules.
//!
//! Every change entry in a branch's diff is evaluated against the
//! registered rules; rules report breaking changes as semantic conflicts.
//! The registry is supplied by the embedding platform — the built-in rules
//! cover the schema-structural basics.

use sema_types::{BranchDiff, ChangeKind, ConflictType, DiffEntry, SemanticConflict, Severity};

/// Context handed to every rule evaluation.
#[derive(Clone, Debug)]
pub struct RuleContext {
    /// The branch whose changes are being evaluated.
    pub branch: String,
    /// The merge base both sides diverged from.
    pub base: String,
}

/// A single merge rule.
pub trait MergeRule: Send + Sync {
    /// Stable rule identifier, used in conflict descriptions.
    fn id(&self) -> &str;

    /// Evaluate one change entry; each reported conflict is a breaking
    /// change found in it.
    fn evaluate(&self, entry: &DiffEntry, ctx: &RuleContext) -> Vec<SemanticConflict>;
}

/// An ordered collection of merge rules.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn MergeRule>>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the built-in structural rules.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(IdentifierChangeRule));
        registry.register(Box::new(TypeChangeRule));
        registry.register(Box::new(DeletionRule));
        registry
    }

    /// Append a rule; rules run in registration order.
    pub fn register(&mut self, rule: Box<dyn MergeRule>) {
        self.rules.push(rule);
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every entry of a diff against every rule.
    pub fn evaluate_diff(&self, diff: &BranchDiff, ctx: &RuleContext) -> Vec<SemanticConflict> {
        let mut conflicts = Vec::new();
        for entry in &diff.entries {
            for rule in &self.rules {
                conflicts.extend(rule.evaluate(entry, ctx));
            }
        }
        conflicts
    }
}

/// Changing an entity's identifier fields breaks every reference to it.
pub struct IdentifierChangeRule;

impl MergeRule for IdentifierChangeRule {
    fn id(&self) -> &str {
        "identifier-change"
    }

    fn evaluate(&self, entry: &DiffEntry, _ctx: &RuleContext) -> Vec<SemanticConflict> {
        const IDENTIFIER_FIELDS: &[&str] = &["id", "primary_key", "key_fields"];

        if entry.kind != ChangeKind::Modified {
            return Vec::new();
        }
        let touched: Vec<&str> = entry
            .changed_fields
            .iter()
            .map(String::as_str)
            .filter(|f| IDENTIFIER_FIELDS.contains(f))
            .collect();
        if touched.is_empty() {
            return Vec::new();
        }

        vec![SemanticConflict {
            conflict_type: ConflictType::ConstraintViolation,
            affected_nodes: vec![entry.entity_id.clone()],
            severity: Severity::Critical,
            description: format!(
                "[{}] {} changes identifier field(s): {}",
                self.id(),
                entry.entity_id,
                touched.join(", "),
            ),
        }]
    }
}

/// Changing a declared type narrows or breaks existing data.
pub struct TypeChangeRule;

impl MergeRule for TypeChangeRule {
    fn id(&self) -> &str {
        "type-change"
    }

    fn evaluate(&self, entry: &DiffEntry, _ctx: &RuleContext) -> Vec<SemanticConflict> {
        if entry.kind != ChangeKind::Modified
            || !entry.changed_fields.iter().any(|f| f == "type")
        {
            return Vec::new();
        }

        vec![SemanticConflict {
            conflict_type: ConflictType::ConstraintViolation,
            affected_nodes: vec![entry.entity_id.clone()],
            severity: Severity::High,
            description: format!(
                "[{}] {} changes its declared type",
                self.id(),
                entry.entity_id,
            ),
        }]
    }
}

/// Removing an entity breaks its dependents.
pub struct DeletionRule;

impl MergeRule for DeletionRule {
    fn id(&self) -> &str {
        "entity-deletion"
    }

    fn evaluate(&self, entry: &DiffEntry, _ctx: &RuleContext) -> Vec<SemanticConflict> {
        if entry.kind != ChangeKind::Removed {
            return Vec::new();
        }

        vec![SemanticConflict {
            conflict_type: ConflictType::Inconsistency,
            affected_nodes: vec![entry.entity_id.clone()],
            severity: Severity::High,
            description: format!(
                "[{}] {} is removed; dependents of it will break",
                self.id(),
                entry.entity_id,
            ),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn ctx() -> RuleContext {
        RuleContext {
            branch: "feature/x".into(),
            base: "main".into(),
        }
    }

    fn modified(id: &str, changed: &[&str]) -> DiffEntry {
        let mut entry = DiffEntry::new(
            "object_type",
            id,
            ChangeKind::Modified,
            Some(json!({})),
            Some(json!({})),
        );
        entry.changed_fields = changed.iter().map(|s| s.to_string()).collect();
        entry
    }

    #[test]
    fn identifier_change_is_critical() {
        let conflicts =
            IdentifierChangeRule.evaluate(&modified("Widget", &["primary_key"]), &ctx());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].severity, Severity::Critical);
        assert!(conflicts[0].description.contains("identifier-change"));
    }

    #[test]
    fn plain_field_change_passes_identifier_rule() {
        let conflicts = IdentifierChangeRule.evaluate(&modified("Widget", &["desc"]), &ctx());
        assert!(conflicts.is_empty());
    }

    #[test]
    fn type_change_is_high() {
        let conflicts = TypeChangeRule.evaluate(&modified("Widget", &["type"]), &ctx());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].severity, Severity::High);
    }

    #[test]
    fn deletion_rule_fires_on_removals_only() {
        let removed = DiffEntry::new(
            "object_type",
            "Widget",
            ChangeKind::Removed,
            Some(json!({})),
            None,
        );
        assert_eq!(DeletionRule.evaluate(&removed, &ctx()).len(), 1);
        assert!(DeletionRule.evaluate(&modified("Widget", &["v"]), &ctx()).is_empty());
    }

    #[test]
    fn registry_runs_every_rule_over_every_entry() {
        let registry = RuleRegistry::with_defaults();
        assert_eq!(registry.len(), 3);

        let diff = BranchDiff {
            from: "main".into(),
            to: "feature/x".into(),
            computed_at: Utc::now(),
            entries: vec![
                modified("Widget", &["type"]),
                DiffEntry::new("object_type", "Gadget", ChangeKind::Removed, Some(json!({})), None),
            ],
            conflicts: Vec::new(),
        };

        let conflicts = registry.evaluate_diff(&diff, &ctx());
        assert_eq!(conflicts.len(), 2);
    }

    #[test]
    fn custom_rule_integration() {
        struct FlagEverything;
        impl MergeRule for FlagEverything {
            fn id(&self) -> &str {
                "flag-everything"
            }
            fn evaluate(&self, entry: &DiffEntry, _ctx: &RuleContext) -> Vec<SemanticConflict> {
                vec![SemanticConflict {
                    conflict_type: ConflictType::Inconsistency,
                    affected_nodes: vec![entry.entity_id.clone()],
                    severity: Severity::Low,
                    description: "flagged".into(),
                }]
            }
        }

        let mut registry = RuleRegistry::new();
        registry.register(Box::new(FlagEverything));

        let diff = BranchDiff {
            from: "main".into(),
            to: "feature/x".into(),
            computed_at: Utc::now(),
            entries: vec![modified("Widget", &["v"])],
            conflicts: Vec::new(),
        };
        assert_eq!(registry.evaluate_diff(&diff, &ctx()).len(), 1);
    }
}
