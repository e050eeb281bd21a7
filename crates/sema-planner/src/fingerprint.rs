//! Query canonicalization and fingerprints.
//!
//! Two queries that differ only in list ordering produce the same
//! fingerprint: start nodes and relations are sorted and deduplicated, and
//! the filter map is ordered by construction (`BTreeMap`). The fingerprint
//! is the BLAKE3 hash of the canonical JSON encoding.

use sema_types::TraversalQuery;

/// Canonical JSON representation of a query.
fn canonicalize(query: &TraversalQuery) -> serde_json::Value {
    let mut nodes = query.start_nodes.clone();
    nodes.sort();
    nodes.dedup();
    let mut relations = query.relations.clone();
    relations.sort();
    relations.dedup();

    serde_json::json!({
        "nodes": nodes,
        "relations": relations,
        "direction": query.direction.to_string(),
        "depth": query.max_depth,
        "limit": query.limit,
        "filters": query.filters,
        "metadata": query.include_metadata,
    })
}

/// Stable fingerprint of a canonicalized query, hex-encoded.
pub fn fingerprint(query: &TraversalQuery) -> String {
    let canonical = canonicalize(query);
    let bytes = serde_json::to_vec(&canonical).unwrap_or_default();
    let mut hasher = blake3::Hasher::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize().as_bytes())
}
