use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// NodeName
// ─────────────────────────────────────────────

/// Interned identity key of a node: the lowercase form of its name.
///
/// All membership questions — registry, adjacency, edge endpoints, result
/// sets — are answered on `NodeName`, never on raw spellings. Ordering is
/// plain string ordering and drives every sorted listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeName(String);

impl NodeName {
    /// Intern a raw spelling. Invariant: the stored form is lowercase.
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────
// Relation
// ─────────────────────────────────────────────

/// The six relationship kinds. Declaration order is the export rank
/// (CONTAINS=0 … PREDECESSOR-OF=5) used by every sorted edge listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relation {
    Contains,
    ContainedIn,
    PartOf,
    HasPart,
    SuccessorOf,
    PredecessorOf,
}

impl Relation {
    pub const ALL: [Relation; 6] = [
        Relation::Contains,
        Relation::ContainedIn,
        Relation::PartOf,
        Relation::HasPart,
        Relation::SuccessorOf,
        Relation::PredecessorOf,
    ];

    /// Fixed inverse pairing: CONTAINS↔CONTAINED-IN, PART-OF↔HAS-PART,
    /// SUCCESSOR-OF↔PREDECESSOR-OF.
    pub fn inverse(self) -> Relation {
        match self {
            Relation::Contains      => Relation::ContainedIn,
            Relation::ContainedIn   => Relation::Contains,
            Relation::PartOf        => Relation::HasPart,
            Relation::HasPart       => Relation::PartOf,
            Relation::SuccessorOf   => Relation::PredecessorOf,
            Relation::PredecessorOf => Relation::SuccessorOf,
        }
    }

    /// Text keyword as it appears in database files and commands.
    pub fn keyword(self) -> &'static str {
        match self {
            Relation::Contains      => "contains",
            Relation::ContainedIn   => "contained-in",
            Relation::PartOf        => "part-of",
            Relation::HasPart       => "has-part",
            Relation::SuccessorOf   => "successor-of",
            Relation::PredecessorOf => "predecessor-of",
        }
    }

    /// Case-insensitive keyword lookup.
    pub fn parse(s: &str) -> Option<Relation> {
        Relation::ALL
            .into_iter()
            .find(|r| r.keyword().eq_ignore_ascii_case(s))
    }

    /// Export rank (sort key of the DOT/edge listings).
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Endpoint compatibility: CONTAINS needs a Category source, CONTAINED-IN
    /// a Category target, the remaining four need Products on both ends.
    pub fn permits(self, source: &Node, target: &Node) -> bool {
        match self {
            Relation::Contains    => source.is_category(),
            Relation::ContainedIn => target.is_category(),
            Relation::PartOf
            | Relation::HasPart
            | Relation::SuccessorOf
            | Relation::PredecessorOf => source.is_product() && target.is_product(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ─────────────────────────────────────────────
// Node
// ─────────────────────────────────────────────

/// What a node is: a bare category, or a product carrying its integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Category,
    Product { id: u64 },
}

/// A vertex of the product graph.
///
/// Identity is the case-insensitive name ALONE: equality and hashing go
/// through [`Node::key`], so two products with the same name and different
/// ids compare equal. Id and kind mismatches are surfaced by validation at
/// the ingestion boundary, not by the identity relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    name: String,
    kind: NodeKind,
}

impl Node {
    pub fn category(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: NodeKind::Category }
    }

    pub fn product(name: impl Into<String>, id: u64) -> Self {
        Self { name: name.into(), kind: NodeKind::Product { id } }
    }

    /// Spelling as first seen. Display always lowercases.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity key (lowercase name).
    #[inline]
    pub fn key(&self) -> NodeName {
        NodeName::new(&self.name)
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn is_product(&self) -> bool {
        matches!(self.kind, NodeKind::Product { .. })
    }

    #[inline]
    pub fn is_category(&self) -> bool {
        matches!(self.kind, NodeKind::Category)
    }

    pub fn product_id(&self) -> Option<u64> {
        match self.kind {
            NodeKind::Product { id } => Some(id),
            NodeKind::Category       => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Node {
    /// Categories print as the lowercase name, products as `name:id`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Category       => write!(f, "{}", self.key()),
            NodeKind::Product { id } => write!(f, "{}:{}", self.key(), id),
        }
    }
}

// ─────────────────────────────────────────────
// Edge
// ─────────────────────────────────────────────

/// A directed, typed edge. Endpoints are keys into the node arena, not node
/// references — the graph resolves them on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source:   NodeName,
    pub target:   NodeName,
    pub relation: Relation,
}

impl Edge {
    pub fn new(source: NodeName, target: NodeName, relation: Relation) -> Self {
        Self { source, target, relation }
    }

    /// The paired edge: swapped endpoints, inverse relation. Every stored
    /// edge has its inverse stored alongside it.
    pub fn inverse(&self) -> Edge {
        Edge {
            source:   self.target.clone(),
            target:   self.source.clone(),
            relation: self.relation.inverse(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-[{}]->{}", self.source, self.relation, self.target)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
