// ─────────────────────────────────────────────
// Recommendation query AST
// ─────────────────────────────────────────────

use std::fmt;

/// Base traversal strategy of a final term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `S1` — products sharing a category with the reference.
    Sibling,
    /// `S2` — transitive successors of the reference.
    Successor,
    /// `S3` — transitive predecessors of the reference.
    Predecessor,
}

impl Strategy {
    /// Canonical query-text token.
    pub fn token(self) -> &'static str {
        match self {
            Strategy::Sibling     => "S1",
            Strategy::Successor   => "S2",
            Strategy::Predecessor => "S3",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A strategy applied to one reference product id, e.g. `S1 5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Final {
    pub strategy:   Strategy,
    pub product_id: u64,
}

/// A parsed recommendation query.
///
/// Immutable once built. `Display` re-serializes to the canonical text form;
/// parsing that text yields a structurally equal term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Final(Final),
    Intersection(Box<Term>, Box<Term>),
    Union(Box<Term>, Box<Term>),
}

impl Term {
    pub fn final_term(strategy: Strategy, product_id: u64) -> Term {
        Term::Final(Final { strategy, product_id })
    }

    pub fn intersection(left: Term, right: Term) -> Term {
        Term::Intersection(Box::new(left), Box::new(right))
    }

    pub fn union(left: Term, right: Term) -> Term {
        Term::Union(Box::new(left), Box::new(right))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Final(t)           => write!(f, "{} {}", t.strategy, t.product_id),
            Term::Intersection(l, r) => write!(f, "INTERSECTION({l}, {r})"),
            Term::Union(l, r)        => write!(f, "UNION({l}, {r})"),
        }
    }
}
