use std::collections::HashMap;

use crate::model::{Node, NodeName};

// ─────────────────────────────────────────────
// NameRegistry
// ─────────────────────────────────────────────

/// The owning node arena, keyed by interned lowercase name.
///
/// Global name uniqueness is enforced here: a name backs at most one node,
/// case-insensitively and regardless of node kind. Everything else in the
/// crate refers to nodes by [`NodeName`] and resolves them through this map.
/// A failed `register` leaves the arena untouched.
#[derive(Debug, Default)]
pub struct NameRegistry {
    nodes: HashMap<NodeName, Node>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under its identity key.
    /// Returns false (no mutation) if the key is already taken.
    pub fn register(&mut self, node: Node) -> bool {
        let key = node.key();
        if self.nodes.contains_key(&key) {
            return false;
        }
        self.nodes.insert(key, node);
        true
    }

    /// Case-insensitive lookup by raw spelling.
    pub fn lookup(&self, name: &str) -> Option<&Node> {
        self.nodes.get(&NodeName::new(name))
    }

    pub fn get(&self, key: &NodeName) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: &NodeName) -> bool {
        self.nodes.contains_key(key)
    }

    /// Remove by key, handing the owned node back to the caller.
    pub fn remove(&mut self, key: &NodeName) -> Option<Node> {
        self.nodes.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
