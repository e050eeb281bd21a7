//! Structural diff between two branch snapshots.
//!
//! The walk is a sorted merge over the entity ids present in either
//! snapshot (`BTreeMap` iteration is sorted, so the walk is linear after
//! the O(E log E) snapshot construction). Entities present in both are
//! classified by content-hash comparison; modified entries are further
//! field-diffed over their top-level keys. A final pass matches removed and
//! added entries with identical content into renames.

use chrono::Utc;

use sema_types::{BranchDiff, BranchSnapshot, ChangeKind, DiffEntry, SchemaEntity};

/// Computes structural diffs between two snapshots.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiffEngine;

impl DiffEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute the ordered change set from `from` to `to`.
    ///
    /// The result carries no conflicts; conflict detection is a separate
    /// pass over two diffs against a common base
    /// (see [`ConflictResolver`](crate::conflict::ConflictResolver)).
    pub fn calculate_diff(&self, from: &BranchSnapshot, to: &BranchSnapshot) -> BranchDiff {
        let mut entries = Vec::new();

        let mut old_iter = from.entities.values().peekable();
        let mut new_iter = to.entities.values().peekable();

        loop {
            match (old_iter.peek(), new_iter.peek()) {
                (Some(old), Some(new)) => match old.id.cmp(&new.id) {
                    std::cmp::Ordering::Less => {
                        entries.push(removed_entry(old));
                        old_iter.next();
                    }
                    std::cmp::Ordering::Greater => {
                        entries.push(added_entry(new));
                        new_iter.next();
                    }
                    std::cmp::Ordering::Equal => {
                        if old.content_hash() != new.content_hash() {
                            entries.push(modified_entry(old, new));
                        }
                        old_iter.next();
                        new_iter.next();
                    }
                },
                (Some(old), None) => {
                    entries.push(removed_entry(old));
                    old_iter.next();
                }
                (None, Some(new)) => {
                    entries.push(added_entry(new));
                    new_iter.next();
                }
                (None, None) => break,
            }
        }

        let entries = detect_renames(entries);

        BranchDiff {
            from: from.branch.clone(),
            to: to.branch.clone(),
            computed_at: Utc::now(),
            entries,
            conflicts: Vec::new(),
        }
    }
}

fn added_entry(entity: &SchemaEntity) -> DiffEntry {
    DiffEntry::new(
        entity.entity_type.clone(),
        entity.id.clone(),
        ChangeKind::Added,
        None,
        Some(entity.content.clone()),
    )
}

fn removed_entry(entity: &SchemaEntity) -> DiffEntry {
    DiffEntry::new(
        entity.entity_type.clone(),
        entity.id.clone(),
        ChangeKind::Removed,
        Some(entity.content.clone()),
        None,
    )
}

fn modified_entry(old: &SchemaEntity, new: &SchemaEntity) -> DiffEntry {
    let mut entry = DiffEntry::new(
        new.entity_type.clone(),
        new.id.clone(),
        ChangeKind::Modified,
        Some(old.content.clone()),
        Some(new.content.clone()),
    );
    entry.changed_fields = changed_fields(&old.content, &new.content);
    entry
}

/// Top-level fields that differ between two content values, sorted.
///
/// Non-object content is treated as a single opaque `"value"` field.
fn changed_fields(old: &serde_json::Value, new: &serde_json::Value) -> Vec<String> {
    use serde_json::Value;

    let (Value::Object(old_map), Value::Object(new_map)) = (old, new) else {
        return vec!["value".to_string()];
    };

    let mut fields: Vec<String> = Vec::new();
    for (key, old_val) in old_map {
        match new_map.get(key) {
            Some(new_val) if new_val == old_val => {}
            _ => fields.push(key.clone()),
        }
    }
    for key in new_map.keys() {
        if !old_map.contains_key(key) {
            fields.push(key.clone());
        }
    }
    fields.sort();
    fields
}

/// Match removed and added entries with identical content into renames.
///
/// Each removed entry pairs with at most one added entry; unmatched entries
/// stay as-is. The resulting list is re-sorted by entity id so the diff
/// remains ordered.
fn detect_renames(entries: Vec<DiffEntry>) -> Vec<DiffEntry> {
    let mut kept: Vec<DiffEntry> = Vec::with_capacity(entries.len());
    let mut removed: Vec<DiffEntry> = Vec::new();
    let mut added: Vec<DiffEntry> = Vec::new();

    for entry in entries {
        match entry.kind {
            ChangeKind::Removed => removed.push(entry),
            ChangeKind::Added => added.push(entry),
            _ => kept.push(entry),
        }
    }

    let mut matched_adds = vec![false; added.len()];
    for old in removed {
        let candidate = added.iter().enumerate().find(|(i, new)| {
            !matched_adds[*i]
                && new.entity_type == old.entity_type
                && new.new_value == old.old_value
        });
        match candidate {
            Some((i, _)) => {
                matched_adds[i] = true;
                let new = &added[i];
                let mut entry = DiffEntry::new(
                    new.entity_type.clone(),
                    new.entity_id.clone(),
                    ChangeKind::Renamed,
                    old.old_value.clone(),
                    new.new_value.clone(),
                );
                entry.renamed_from = Some(old.entity_id.clone());
                kept.push(entry);
            }
            None => kept.push(old),
        }
    }
    for (i, entry) in added.into_iter().enumerate() {
        if !matched_adds[i] {
            kept.push(entry);
        }
    }

    kept.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
    kept
}
