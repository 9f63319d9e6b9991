use dashmap::DashMap;

use crate::model::{Edge, NodeName, Relation};

// ─────────────────────────────────────────────
// AdjEntry
// ─────────────────────────────────────────────

/// One entry in an adjacency list: (neighbor key, relation).
///
/// Edges carry no synthetic id — (source, target, relation) is unique — so
/// an entry is fully identified by its neighbor and relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjEntry {
    pub neighbor: NodeName,
    pub relation: Relation,
}

// ─────────────────────────────────────────────
// AdjacencyIndex
// ─────────────────────────────────────────────

/// Bidirectional adjacency index over the edge set.
///
/// Backed by `DashMap` (sharded locking, no global lock), mutated through
/// `&self`. This is an index, never a source of truth: the [`Graph`]
/// guarantees each directed edge is registered at most once and keeps the
/// index in lock-step with its edge set.
///
/// [`Graph`]: crate::graph::Graph
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    /// source key → [(target key, relation)]
    outgoing: DashMap<NodeName, Vec<AdjEntry>>,
    /// target key → [(source key, relation)]
    incoming: DashMap<NodeName, Vec<AdjEntry>>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutations ──────────────────────────────────────

    /// Register an edge in both direction maps.
    pub fn add_edge(&self, edge: &Edge) {
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(AdjEntry { neighbor: edge.target.clone(), relation: edge.relation });

        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .push(AdjEntry { neighbor: edge.source.clone(), relation: edge.relation });
    }

    /// Drop the entries of one directed edge from both maps.
    pub fn remove_edge(&self, edge: &Edge) {
        if let Some(mut out) = self.outgoing.get_mut(&edge.source) {
            out.retain(|e| !(e.neighbor == edge.target && e.relation == edge.relation));
        }
        if let Some(mut inc) = self.incoming.get_mut(&edge.target) {
            inc.retain(|e| !(e.neighbor == edge.source && e.relation == edge.relation));
        }
    }

    /// Drop every entry touching a node, in both maps and on both sides.
    pub fn remove_node(&self, key: &NodeName) {
        if let Some((_, out_entries)) = self.outgoing.remove(key) {
            for entry in &out_entries {
                if let Some(mut inc) = self.incoming.get_mut(&entry.neighbor) {
                    inc.retain(|e| e.neighbor != *key);
                }
            }
        }
        if let Some((_, in_entries)) = self.incoming.remove(key) {
            for entry in &in_entries {
                if let Some(mut out) = self.outgoing.get_mut(&entry.neighbor) {
                    out.retain(|e| e.neighbor != *key);
                }
            }
        }
    }

    // ── Queries ────────────────────────────────────────

    /// Outgoing neighbor keys reached over one specific relation.
    pub fn neighbors_out_by(&self, key: &NodeName, relation: Relation) -> Vec<NodeName> {
        self.outgoing
            .get(key)
            .map(|v| {
                v.iter()
                    .filter(|e| e.relation == relation)
                    .map(|e| e.neighbor.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Full outgoing adjacency entries (snapshot).
    pub fn entries_out(&self, key: &NodeName) -> Vec<AdjEntry> {
        self.outgoing.get(key).map(|v| v.clone()).unwrap_or_default()
    }

    /// Full incoming adjacency entries (snapshot).
    pub fn entries_in(&self, key: &NodeName) -> Vec<AdjEntry> {
        self.incoming.get(key).map(|v| v.clone()).unwrap_or_default()
    }

    /// Outgoing degree of a node.
    pub fn degree_out(&self, key: &NodeName) -> usize {
        self.outgoing.get(key).map(|v| v.len()).unwrap_or(0)
    }

    /// Incoming degree of a node.
    pub fn degree_in(&self, key: &NodeName) -> usize {
        self.incoming.get(key).map(|v| v.len()).unwrap_or(0)
    }

    /// Number of registered directed edges (an edge and its inverse count
    /// as two).
    pub fn edge_count(&self) -> usize {
        self.outgoing.iter().map(|kv| kv.value().len()).sum()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.outgoing.clear();
        self.incoming.clear();
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
