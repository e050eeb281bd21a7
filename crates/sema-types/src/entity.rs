//! Schema entities and branch snapshots.
//!
//! A snapshot captures the full entity set of a branch at one instant. It is
//! the unit the diff engine operates on — diffs are computed between exactly
//! two snapshots, never incrementally.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single versioned schema entity (object type, field, constraint, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntity {
    /// Entity classification, e.g. `"object_type"` or `"relation_type"`.
    pub entity_type: String,
    /// Stable entity identifier, unique within a snapshot.
    pub id: String,
    /// The entity's content as structured JSON.
    pub content: serde_json::Value,
}

impl SchemaEntity {
    pub fn new(
        entity_type: impl Into<String>,
        id: impl Into<String>,
        content: serde_json::Value,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
            content,
        }
    }

    /// BLAKE3 hash of the canonical JSON encoding of the content.
    ///
    /// Two entities with semantically equal content always hash equal:
    /// `serde_json` maps are ordered, so encoding is canonical.
    pub fn content_hash(&self) -> String {
        let bytes = serde_json::to_vec(&self.content).unwrap_or_default();
        let mut hasher = blake3::Hasher::new();
        hasher.update(&bytes);
        hex::encode(hasher.finalize().as_bytes())
    }

    /// Top-level field names of the content, when it is an object.
    pub fn field_names(&self) -> Vec<String> {
        match &self.content {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// The full entity set of a branch at one instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchSnapshot {
    /// The branch this snapshot was taken from.
    pub branch: String,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// All entities keyed by entity id. `BTreeMap` keeps iteration sorted,
    /// which the diff engine's merge walk relies on.
    pub entities: BTreeMap<String, SchemaEntity>,
}

impl BranchSnapshot {
    /// Create an empty snapshot for a branch.
    pub fn empty(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            taken_at: Utc::now(),
            entities: BTreeMap::new(),
        }
    }

    /// Insert an entity, replacing any previous entity with the same id.
    pub fn insert(&mut self, entity: SchemaEntity) {
        self.entities.insert(entity.id.clone(), entity);
    }

    /// Number of entities in the snapshot.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the snapshot holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
