use std::collections::HashSet;

use crate::adjacency::AdjacencyIndex;
use crate::model::{Edge, Node, NodeName, Relation};
use crate::registry::NameRegistry;

// ─────────────────────────────────────────────
// Graph
// ─────────────────────────────────────────────

/// The primary coordinator for a catalog graph.
///
/// Maintains three subsystems and keeps them consistent:
/// - [`NameRegistry`]   — owning node arena, keyed by case-folded name
/// - edge set           — every stored directed edge, inverses included
/// - [`AdjacencyIndex`] — per-node outgoing/incoming entry lists
///
/// ## Write protocol
/// 1. Validate against the registry (endpoints present, relation permitted).
/// 2. Update the edge set.
/// 3. Update the adjacency index in lock-step.
///
/// ## Invariants
/// - An edge is stored iff its inverse is stored; add and remove always move
///   the pair together.
/// - A node left without incident edges *by a removal* is deregistered
///   (cascading isolation cleanup). A node added with no edges stays until a
///   removal touches it.
///
/// Mutators return `bool`; ordinary rejection is never an error value.
#[derive(Debug, Default)]
pub struct Graph {
    registry:  NameRegistry,
    edges:     HashSet<Edge>,
    adjacency: AdjacencyIndex,
}

impl Graph {
    // ── Construction ───────────────────────────────────

    pub fn new() -> Self {
        Self::default()
    }

    // ── Node operations ────────────────────────────────

    /// Register a node. False if the name is already taken, compared
    /// case-insensitively and regardless of kind or product id.
    pub fn add_node(&mut self, node: Node) -> bool {
        self.registry.register(node)
    }

    /// Remove a node together with every incident edge, then deregister any
    /// neighbor the removal left without edges.
    ///
    /// False if the key is not registered.
    pub fn remove_node(&mut self, key: &NodeName) -> bool {
        if !self.registry.contains(key) {
            return false;
        }

        let mut incident: Vec<Edge> = Vec::new();
        for entry in self.adjacency.entries_out(key) {
            incident.push(Edge::new(key.clone(), entry.neighbor, entry.relation));
        }
        for entry in self.adjacency.entries_in(key) {
            incident.push(Edge::new(entry.neighbor, key.clone(), entry.relation));
        }

        let mut touched: HashSet<NodeName> = HashSet::new();
        for edge in &incident {
            self.edges.remove(edge);
            if edge.source != *key {
                touched.insert(edge.source.clone());
            }
            if edge.target != *key {
                touched.insert(edge.target.clone());
            }
        }

        self.adjacency.remove_node(key);
        self.registry.remove(key);

        for neighbor in touched {
            self.drop_if_isolated(&neighbor);
        }
        true
    }

    // ── Edge operations ────────────────────────────────

    /// Insert a directed edge together with its inverse.
    ///
    /// False when an endpoint is unregistered, the relation's endpoint rule
    /// rejects the resolved node kinds, or the edge is already stored. A
    /// successful insert stores exactly two directed edges.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        let permitted = match (self.registry.get(&edge.source), self.registry.get(&edge.target)) {
            (Some(src), Some(tgt)) => edge.relation.permits(src, tgt),
            _ => return false,
        };
        if !permitted || self.edges.contains(&edge) {
            return false;
        }

        let inverse = edge.inverse();
        if self.edges.insert(edge.clone()) {
            self.adjacency.add_edge(&edge);
        }
        if self.edges.insert(inverse.clone()) {
            self.adjacency.add_edge(&inverse);
        }
        true
    }

    /// Remove a directed edge and its inverse, then deregister any endpoint
    /// the removal left without edges.
    ///
    /// False if the edge is not stored.
    pub fn remove_edge(&mut self, edge: &Edge) -> bool {
        if !self.edges.remove(edge) {
            return false;
        }
        self.adjacency.remove_edge(edge);

        let inverse = edge.inverse();
        if self.edges.remove(&inverse) {
            self.adjacency.remove_edge(&inverse);
        }

        self.drop_if_isolated(&edge.source);
        self.drop_if_isolated(&edge.target);
        true
    }

    fn drop_if_isolated(&mut self, key: &NodeName) {
        if self.adjacency.degree_out(key) == 0 && self.adjacency.degree_in(key) == 0 {
            self.registry.remove(key);
        }
    }

    // ── Accessors ──────────────────────────────────────

    /// Node behind a key.
    pub fn node(&self, key: &NodeName) -> Option<&Node> {
        self.registry.get(key)
    }

    /// Case-insensitive lookup by raw name.
    pub fn lookup(&self, name: &str) -> Option<&Node> {
        self.registry.lookup(name)
    }

    pub fn contains_node(&self, key: &NodeName) -> bool {
        self.registry.contains(key)
    }

    /// All nodes, unordered.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.registry.iter()
    }

    /// All products, unordered.
    pub fn products(&self) -> impl Iterator<Item = &Node> {
        self.registry.iter().filter(|n| n.is_product())
    }

    /// All categories, unordered.
    pub fn categories(&self) -> impl Iterator<Item = &Node> {
        self.registry.iter().filter(|n| n.is_category())
    }

    /// Product carrying a given id, if any.
    pub fn product_by_id(&self, id: u64) -> Option<&Node> {
        self.products().find(|n| n.product_id() == Some(id))
    }

    /// All stored directed edges, unordered. An edge and its inverse are two
    /// entries.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Outgoing edges of a node (snapshot).
    pub fn outgoing(&self, key: &NodeName) -> Vec<Edge> {
        self.adjacency
            .entries_out(key)
            .into_iter()
            .map(|e| Edge::new(key.clone(), e.neighbor, e.relation))
            .collect()
    }

    /// Incoming edges of a node (snapshot).
    pub fn incoming(&self, key: &NodeName) -> Vec<Edge> {
        self.adjacency
            .entries_in(key)
            .into_iter()
            .map(|e| Edge::new(e.neighbor, key.clone(), e.relation))
            .collect()
    }

    /// Outgoing neighbor keys over one relation.
    pub fn outgoing_by(&self, key: &NodeName, relation: Relation) -> Vec<NodeName> {
        self.adjacency.neighbors_out_by(key, relation)
    }

    /// Incoming neighbor keys over one relation.
    pub fn incoming_by(&self, key: &NodeName, relation: Relation) -> Vec<NodeName> {
        self.adjacency
            .entries_in(key)
            .into_iter()
            .filter(|e| e.relation == relation)
            .map(|e| e.neighbor)
            .collect()
    }

    // ── Stats ──────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of stored directed edges (inverses counted).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Drop all nodes, edges and index entries.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.edges.clear();
        self.adjacency.clear();
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> NodeName {
        NodeName::new(s)
    }

    fn edge(src: &str, rel: Relation, tgt: &str) -> Edge {
        Edge::new(key(src), key(tgt), rel)
    }

    /// shoes ─contains→ boot(1), shoes ─contains→ sandal(2)
    fn shoe_shop() -> Graph {
        let mut g = Graph::new();
        assert!(g.add_node(Node::category("Shoes")));
        assert!(g.add_node(Node::product("Boot", 1)));
        assert!(g.add_node(Node::product("Sandal", 2)));
        assert!(g.add_edge(edge("shoes", Relation::Contains, "boot")));
        assert!(g.add_edge(edge("shoes", Relation::Contains, "sandal")));
        g
    }

    #[test]
    fn add_node_rejects_case_insensitive_duplicate() {
        let mut g = Graph::new();
        assert!(g.add_node(Node::category("Shoes")));
        assert!(!g.add_node(Node::category("SHOES")));
        assert!(!g.add_node(Node::product("shoes", 9)));
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn add_edge_stores_inverse() {
        let g = shoe_shop();
        let mut stored: Vec<String> = g.edges().map(|e| e.to_string()).collect();
        stored.sort();

        assert_eq!(g.edge_count(), 4);
        assert!(stored.contains(&"shoes-[contains]->boot".to_string()));
        assert!(stored.contains(&"boot-[contained-in]->shoes".to_string()));
    }

    #[test]
    fn add_edge_rejects_unknown_endpoint() {
        let mut g = Graph::new();
        g.add_node(Node::category("Shoes"));
        assert!(!g.add_edge(edge("shoes", Relation::Contains, "boot")));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn add_edge_rejects_endpoint_rule_violation() {
        let mut g = Graph::new();
        g.add_node(Node::category("Shoes"));
        g.add_node(Node::product("Boot", 1));

        // contains requires a category source
        assert!(!g.add_edge(edge("boot", Relation::Contains, "shoes")));
        // part-of requires products on both ends
        assert!(!g.add_edge(edge("shoes", Relation::PartOf, "boot")));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn add_edge_rejects_duplicate() {
        let mut g = shoe_shop();
        assert!(!g.add_edge(edge("shoes", Relation::Contains, "boot")));
        // the stored inverse blocks a fresh insert of the same pair too
        assert!(!g.add_edge(edge("boot", Relation::ContainedIn, "shoes")));
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn remove_edge_removes_inverse_too() {
        let mut g = shoe_shop();
        assert!(g.remove_edge(&edge("shoes", Relation::Contains, "boot")));

        assert_eq!(g.edge_count(), 2);
        assert!(!g.edges().any(|e| e.target == key("boot")));
        assert!(!g.edges().any(|e| e.source == key("boot")));
    }

    #[test]
    fn remove_edge_missing_is_false() {
        let mut g = shoe_shop();
        assert!(!g.remove_edge(&edge("boot", Relation::SuccessorOf, "sandal")));
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn remove_edge_cleans_up_isolated_endpoints() {
        let mut g = shoe_shop();
        g.remove_edge(&edge("shoes", Relation::Contains, "boot"));

        // boot lost its only connection; shoes still holds sandal
        assert!(!g.contains_node(&key("boot")));
        assert!(g.contains_node(&key("shoes")));
        assert!(g.contains_node(&key("sandal")));
    }

    #[test]
    fn remove_last_edge_drops_both_endpoints() {
        let mut g = Graph::new();
        g.add_node(Node::product("Boot", 1));
        g.add_node(Node::product("Sneaker", 2));
        g.add_edge(edge("boot", Relation::SuccessorOf, "sneaker"));

        g.remove_edge(&edge("boot", Relation::SuccessorOf, "sneaker"));
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn remove_node_removes_incident_edges() {
        let mut g = shoe_shop();
        assert!(g.remove_node(&key("shoes")));

        assert!(!g.edges().any(|e| e.source == key("shoes") || e.target == key("shoes")));
    }

    #[test]
    fn remove_node_cascades_isolation_cleanup() {
        let mut g = shoe_shop();
        g.remove_node(&key("shoes"));

        // boot and sandal had no other connections
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn remove_node_missing_is_false() {
        let mut g = shoe_shop();
        assert!(!g.remove_node(&key("slipper")));
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn bare_node_survives_removals_elsewhere() {
        let mut g = shoe_shop();
        g.add_node(Node::category("Clothing"));
        g.remove_edge(&edge("shoes", Relation::Contains, "boot"));

        // clothing never had edges, so the cleanup does not touch it
        assert!(g.contains_node(&key("clothing")));
    }

    #[test]
    fn self_loop_keeps_edge_and_inverse_distinct() {
        let mut g = Graph::new();
        g.add_node(Node::product("Boot", 1));
        assert!(g.add_edge(edge("boot", Relation::PartOf, "boot")));
        assert_eq!(g.edge_count(), 2);

        g.remove_edge(&edge("boot", Relation::PartOf, "boot"));
        assert!(g.is_empty());
    }

    #[test]
    fn product_by_id_finds_product() {
        let g = shoe_shop();
        assert_eq!(g.product_by_id(2).map(Node::name), Some("Sandal"));
        assert!(g.product_by_id(42).is_none());
    }

    #[test]
    fn outgoing_filtered_by_relation() {
        let g = shoe_shop();
        let mut out = g.outgoing_by(&key("shoes"), Relation::Contains);
        out.sort();
        assert_eq!(out, vec![key("boot"), key("sandal")]);
        assert!(g.outgoing_by(&key("shoes"), Relation::HasPart).is_empty());
    }

    #[test]
    fn incoming_mirrors_outgoing() {
        let g = shoe_shop();
        assert_eq!(g.incoming_by(&key("boot"), Relation::Contains), vec![key("shoes")]);
        assert_eq!(g.outgoing(&key("boot")).len(), 1);
        assert_eq!(g.incoming(&key("boot")).len(), 1);
    }

    #[test]
    fn clear_empties_everything() {
        let mut g = shoe_shop();
        g.clear();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(g.lookup("shoes").is_none());
    }

    #[test]
    fn random_edge_batches_keep_inverse_symmetry() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let mut g = Graph::new();
        for i in 0..12u64 {
            g.add_node(Node::product(format!("p{i}"), i));
        }

        let relations = [
            Relation::PartOf,
            Relation::HasPart,
            Relation::SuccessorOf,
            Relation::PredecessorOf,
        ];
        let mut added: Vec<Edge> = Vec::new();
        for _ in 0..60 {
            let a = rng.gen_range(0..12u64);
            let b = rng.gen_range(0..12u64);
            let relation = relations[rng.gen_range(0..relations.len())];
            let e = edge(&format!("p{a}"), relation, &format!("p{b}"));
            if g.add_edge(e.clone()) {
                added.push(e);
            }
        }

        assert_eq!(g.edge_count(), added.len() * 2);
        for e in g.edges() {
            assert!(g.contains_edge(&e.inverse()), "missing inverse of {e}");
        }

        for e in added.iter().step_by(2) {
            g.remove_edge(e);
        }
        for e in g.edges() {
            assert!(g.contains_edge(&e.inverse()), "missing inverse of {e}");
        }
    }
}
