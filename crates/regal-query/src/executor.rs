//! Strategy evaluation over a catalog graph.
//!
//! A parsed [`Term`] compiles into a [`Plan`] whose leaves carry their own
//! reference product id; composites never share or inherit one. Evaluation
//! is a pure pass over the graph and cannot fail: an id bound to no product
//! evaluates to the empty set.

use std::collections::HashSet;

use regal_graph::{Graph, Node, NodeName, Relation};

use crate::ast::{Strategy, Term};

// ─────────────────────────────────────────────
// Plan
// ─────────────────────────────────────────────

/// A strategy leaf bound to its own reference product id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyWithId {
    pub strategy:   Strategy,
    pub product_id: u64,
}

/// Compiled form of a [`Term`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Strategy(StrategyWithId),
    Intersection(Box<Plan>, Box<Plan>),
    Union(Box<Plan>, Box<Plan>),
}

impl Plan {
    /// Compile a term; each leaf keeps the id written next to it.
    pub fn compile(term: &Term) -> Plan {
        match term {
            Term::Final(t) => Plan::Strategy(StrategyWithId {
                strategy:   t.strategy,
                product_id: t.product_id,
            }),
            Term::Intersection(l, r) => {
                Plan::Intersection(Box::new(Plan::compile(l)), Box::new(Plan::compile(r)))
            }
            Term::Union(l, r) => {
                Plan::Union(Box::new(Plan::compile(l)), Box::new(Plan::compile(r)))
            }
        }
    }

    /// Evaluate against a graph, yielding the keys of recommended products.
    pub fn evaluate(&self, graph: &Graph) -> HashSet<NodeName> {
        match self {
            Plan::Strategy(leaf) => evaluate_leaf(*leaf, graph),
            Plan::Intersection(left, right) => {
                let l = left.evaluate(graph);
                let r = right.evaluate(graph);
                l.intersection(&r).cloned().collect()
            }
            Plan::Union(left, right) => {
                let mut l = left.evaluate(graph);
                l.extend(right.evaluate(graph));
                l
            }
        }
    }
}

/// Compile and evaluate in one call.
pub fn recommend(term: &Term, graph: &Graph) -> HashSet<NodeName> {
    Plan::compile(term).evaluate(graph)
}

// ─────────────────────────────────────────────
// Strategies
// ─────────────────────────────────────────────

fn evaluate_leaf(leaf: StrategyWithId, graph: &Graph) -> HashSet<NodeName> {
    let Some(reference) = graph.product_by_id(leaf.product_id) else {
        return HashSet::new();
    };
    let start = reference.key();
    match leaf.strategy {
        Strategy::Sibling     => siblings(graph, &start),
        Strategy::Successor   => transitive(graph, &start, Relation::PredecessorOf),
        Strategy::Predecessor => transitive(graph, &start, Relation::SuccessorOf),
    }
}

/// Products sharing a category with the start product, start excluded.
///
/// One hop out over CONTAINED-IN, one hop back over CONTAINS; category
/// membership is not chased transitively.
fn siblings(graph: &Graph, start: &NodeName) -> HashSet<NodeName> {
    let mut found = HashSet::new();
    for category in graph.outgoing_by(start, Relation::ContainedIn) {
        for member in graph.outgoing_by(&category, Relation::Contains) {
            if member != *start && is_product(graph, &member) {
                found.insert(member);
            }
        }
    }
    found
}

/// Transitive closure over one outgoing relation, product targets only.
///
/// The visited set guards against cycles and keeps the start node out of
/// the result.
fn transitive(graph: &Graph, start: &NodeName, relation: Relation) -> HashSet<NodeName> {
    let mut found = HashSet::new();
    let mut visited = HashSet::new();
    visited.insert(start.clone());

    let mut stack = vec![start.clone()];
    while let Some(current) = stack.pop() {
        for next in graph.outgoing_by(&current, relation) {
            if !is_product(graph, &next) {
                continue;
            }
            if visited.insert(next.clone()) {
                found.insert(next.clone());
                stack.push(next);
            }
        }
    }
    found
}

fn is_product(graph: &Graph, key: &NodeName) -> bool {
    graph.node(key).map(Node::is_product).unwrap_or(false)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use regal_graph::load_database;

    fn graph_from(text: &str) -> Graph {
        let mut g = Graph::new();
        let report = load_database(&mut g, text).unwrap();
        assert_eq!(report.rejected, 0, "{:?}", report.messages);
        g
    }

    fn eval(query: &str, graph: &Graph) -> Vec<String> {
        let term = parse(query).unwrap();
        let mut names: Vec<String> = recommend(&term, graph)
            .into_iter()
            .map(|key| key.as_str().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn sibling_strategy_excludes_the_reference() {
        let g = graph_from("Shoes contains Boot(id=1)\nShoes contains Sandal(id=2)");
        assert_eq!(eval("S1 1", &g), vec!["sandal"]);
        assert_eq!(eval("S1 2", &g), vec!["boot"]);
    }

    #[test]
    fn sibling_strategy_is_single_hop() {
        // parka sits one category deeper and must not surface; the winter
        // category itself is filtered out of the result
        let g = graph_from(
            "Shoes contains Boot(id=1)\n\
             Shoes contains Sandal(id=2)\n\
             Shoes contains Winter\n\
             Winter contains Parka(id=3)",
        );
        assert_eq!(eval("S1 1", &g), vec!["sandal"]);
    }

    #[test]
    fn sibling_strategy_unions_all_categories() {
        let g = graph_from(
            "Shoes contains Boot(id=1)\n\
             Shoes contains Sandal(id=2)\n\
             Hiking contains Boot(id=1)\n\
             Hiking contains Pole(id=3)",
        );
        assert_eq!(eval("S1 1", &g), vec!["pole", "sandal"]);
    }

    #[test]
    fn successor_strategy_follows_predecessor_edges() {
        // boot succeeds sneaker, so sneaker's successors include boot
        let g = graph_from("Boot(id=1) successor-of Sneaker(id=2)");
        assert_eq!(eval("S2 2", &g), vec!["boot"]);
        assert_eq!(eval("S2 1", &g), Vec::<String>::new());
    }

    #[test]
    fn successor_strategy_is_transitive() {
        let g = graph_from(
            "Boot2(id=3) successor-of Boot1(id=2)\n\
             Boot1(id=2) successor-of Boot0(id=1)",
        );
        assert_eq!(eval("S2 1", &g), vec!["boot1", "boot2"]);
    }

    #[test]
    fn predecessor_strategy_mirrors_successor() {
        let g = graph_from(
            "Boot2(id=3) successor-of Boot1(id=2)\n\
             Boot1(id=2) successor-of Boot0(id=1)",
        );
        assert_eq!(eval("S3 3", &g), vec!["boot0", "boot1"]);
        assert_eq!(eval("S3 1", &g), Vec::<String>::new());
    }

    #[test]
    fn transitive_strategies_survive_cycles() {
        let g = graph_from(
            "A(id=1) successor-of B(id=2)\n\
             B(id=2) successor-of A(id=1)",
        );
        assert_eq!(eval("S2 1", &g), vec!["b"]);
        assert_eq!(eval("S3 1", &g), vec!["b"]);
    }

    #[test]
    fn missing_reference_yields_empty_set() {
        let g = graph_from("Shoes contains Boot(id=1)");
        assert_eq!(eval("S1 99", &g), Vec::<String>::new());
        assert_eq!(eval("UNION(S1 99, S2 99)", &g), Vec::<String>::new());
    }

    #[test]
    fn intersection_is_exact() {
        let g = graph_from(
            "Shoes contains Boot(id=1)\n\
             Shoes contains Sandal(id=2)\n\
             Shoes contains Slipper(id=3)\n\
             Beach contains Sandal(id=2)\n\
             Beach contains Flipflop(id=4)",
        );
        // S1 1 = {sandal, slipper}; S1 2 = {boot, slipper, flipflop}
        assert_eq!(eval("INTERSECTION(S1 1, S1 2)", &g), vec!["slipper"]);
    }

    #[test]
    fn union_is_exact() {
        let g = graph_from(
            "Shoes contains Boot(id=1)\n\
             Shoes contains Sandal(id=2)\n\
             Boot(id=1) successor-of OldBoot(id=3)",
        );
        // S1 1 = {sandal}; S2 3 = {boot}
        assert_eq!(eval("UNION(S1 1, S2 3)", &g), vec!["boot", "sandal"]);
    }

    #[test]
    fn combinators_are_idempotent() {
        let g = graph_from("Shoes contains Boot(id=1)\nShoes contains Sandal(id=2)");
        let base = eval("S1 1", &g);
        assert_eq!(eval("INTERSECTION(S1 1, S1 1)", &g), base);
        assert_eq!(eval("UNION(S1 1, S1 1)", &g), base);
    }

    #[test]
    fn each_leaf_uses_its_own_reference() {
        let g = graph_from("Boot(id=1) successor-of Sneaker(id=2)");
        // S2 2 = {boot}, S3 1 = {sneaker}; a shared id could produce neither
        assert_eq!(eval("UNION(S2 2, S3 1)", &g), vec!["boot", "sneaker"]);
    }

    #[test]
    fn compile_preserves_term_shape() {
        let term = parse("INTERSECTION(S1 1, UNION(S2 2, S3 3))").unwrap();
        let plan = Plan::compile(&term);
        assert_eq!(
            plan,
            Plan::Intersection(
                Box::new(Plan::Strategy(StrategyWithId {
                    strategy:   Strategy::Sibling,
                    product_id: 1,
                })),
                Box::new(Plan::Union(
                    Box::new(Plan::Strategy(StrategyWithId {
                        strategy:   Strategy::Successor,
                        product_id: 2,
                    })),
                    Box::new(Plan::Strategy(StrategyWithId {
                        strategy:   Strategy::Predecessor,
                        product_id: 3,
                    })),
                )),
            )
        );
    }
}
