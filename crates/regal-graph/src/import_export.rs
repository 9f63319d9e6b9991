//! Flat-file ingestion and DOT export.
//!
//! The database format is one `subject predicate object` statement per line
//! (see `triple.pest`). Loading is a full reload: a product id bound to two
//! different names anywhere in the file rejects the whole file before the
//! previous graph is touched; every other problem rejects only its line.

use std::io::Write;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::error::GraphError;
use crate::graph::Graph;
use crate::model::{Edge, Node, Relation};

// ── Pest parser derive ─────────────────────────────────────

#[derive(Parser)]
#[grammar = "src/triple.pest"]
pub struct TripleParser;

// ── Statement ──────────────────────────────────────────────

/// One parsed `subject predicate object` line, not yet applied to a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub subject:  Node,
    pub relation: Relation,
    pub object:   Node,
}

/// Parse a single statement line.
pub fn parse_statement(line: &str) -> Result<Statement, GraphError> {
    let reject = || GraphError::InvalidStatement(line.trim().to_string());

    let mut pairs = TripleParser::parse(Rule::statement, line).map_err(|_| reject())?;
    let statement = pairs.next().ok_or_else(reject)?;
    let mut inner = statement.into_inner();

    let subject = parse_node_spec(inner.next().ok_or_else(reject)?, line)?;
    let relation = inner
        .next()
        .and_then(|p| Relation::parse(p.as_str()))
        .ok_or_else(reject)?;
    let object = parse_node_spec(inner.next().ok_or_else(reject)?, line)?;

    Ok(Statement { subject, relation, object })
}

fn parse_node_spec(pair: Pair<Rule>, line: &str) -> Result<Node, GraphError> {
    let reject = || GraphError::InvalidStatement(line.trim().to_string());

    let spec = pair.into_inner().next().ok_or_else(reject)?;
    match spec.as_rule() {
        Rule::name => Ok(Node::category(spec.as_str())),
        Rule::product_spec => {
            let mut parts = spec.into_inner();
            let name = parts.next().ok_or_else(reject)?.as_str();
            // u64 overflow rejects the line like any other malformed spec
            let id: u64 = parts
                .next()
                .ok_or_else(reject)?
                .as_str()
                .parse()
                .map_err(|_| reject())?;
            Ok(Node::product(name, id))
        }
        _ => Err(reject()),
    }
}

// ── Load ───────────────────────────────────────────────────

/// Result of a full database load.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub edges_added: usize,
    pub rejected:    usize,
    pub messages:    Vec<String>,
}

/// Replace the graph's contents with the statements in `text`.
///
/// Statements commit in file order. Rejected lines are skipped and reported
/// in [`LoadReport::messages`] with their line number. The one whole-file
/// failure is a product id claimed by two different names: that returns
/// `Err(IdConflict)` and leaves the previous graph untouched.
pub fn load_database(graph: &mut Graph, text: &str) -> Result<LoadReport, GraphError> {
    let mut lines: Vec<(usize, Result<Statement, GraphError>)> = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        lines.push((idx + 1, parse_statement(raw)));
    }

    // Pre-scan ids across the whole file before touching the graph.
    let mut claimed: Vec<(u64, Node)> = Vec::new();
    for (_, parsed) in &lines {
        let Ok(statement) = parsed else { continue };
        for node in [&statement.subject, &statement.object] {
            let Some(id) = node.product_id() else { continue };
            match claimed.iter().find(|(c, _)| *c == id) {
                Some((_, first)) if first.key() != node.key() => {
                    return Err(GraphError::IdConflict { id, existing: first.key() });
                }
                Some(_) => {}
                None => claimed.push((id, node.clone())),
            }
        }
    }

    graph.clear();
    let mut report = LoadReport::default();
    for (line_no, parsed) in lines {
        let applied = parsed.and_then(|statement| apply_statement(graph, &statement));
        match applied {
            Ok(()) => report.edges_added += 1,
            Err(e) => {
                report.rejected += 1;
                report.messages.push(format!("line {line_no}: {e}"));
            }
        }
    }
    Ok(report)
}

/// Parse and apply one statement against the live graph (the REPL `add`
/// path). Missing endpoint nodes are created; the edge and its inverse are
/// stored.
pub fn add_statement(graph: &mut Graph, line: &str) -> Result<(), GraphError> {
    let statement = parse_statement(line)?;
    apply_statement(graph, &statement)
}

/// Validate a statement fully, then commit it. No partial state on error.
fn apply_statement(graph: &mut Graph, statement: &Statement) -> Result<(), GraphError> {
    let subject = &statement.subject;
    let object = &statement.object;

    // A self-referential line must agree with itself on kind and id.
    if subject.key() == object.key() && subject.kind() != object.kind() {
        return Err(GraphError::NodeConflict(subject.key()));
    }
    check_spec(graph, subject)?;
    check_spec(graph, object)?;

    if !statement.relation.permits(subject, object) {
        return Err(GraphError::InvalidRelationship {
            subject:  subject.key(),
            object:   object.key(),
            relation: statement.relation,
        });
    }

    let edge = Edge::new(subject.key(), object.key(), statement.relation);
    if graph.contains_edge(&edge) {
        return Err(GraphError::DuplicateEdge(edge));
    }

    graph.add_node(subject.clone());
    graph.add_node(object.clone());
    graph.add_edge(edge);
    Ok(())
}

/// A node spec must either match the registered node of that name exactly
/// or, when the name is new, claim a product id nobody else holds.
fn check_spec(graph: &Graph, spec: &Node) -> Result<(), GraphError> {
    match graph.node(&spec.key()) {
        Some(existing) if existing.kind() == spec.kind() => Ok(()),
        Some(_) => Err(GraphError::NodeConflict(spec.key())),
        None => {
            if let Some(id) = spec.product_id() {
                if let Some(holder) = graph.product_by_id(id) {
                    return Err(GraphError::IdConflict { id, existing: holder.key() });
                }
            }
            Ok(())
        }
    }
}

// ── Export ─────────────────────────────────────────────────

/// Write the graph in DOT format. Returns the number of edge lines written.
///
/// Edges sort by (source, target, relation rank), categories by name; labels
/// are the relation keyword with its hyphens removed. No trailing newline
/// after the closing brace.
pub fn export_dot<W: Write>(graph: &Graph, writer: &mut W) -> Result<usize, GraphError> {
    writeln!(writer, "digraph {{")?;

    let mut edges: Vec<&Edge> = graph.edges().collect();
    edges.sort_by(|a, b| {
        (&a.source, &a.target, a.relation.rank()).cmp(&(&b.source, &b.target, b.relation.rank()))
    });
    for edge in &edges {
        let label = edge.relation.keyword().replace('-', "");
        writeln!(writer, "  {} -> {} [label={}]", edge.source, edge.target, label)?;
    }

    let mut categories: Vec<&Node> = graph.categories().collect();
    categories.sort_by_key(|n| n.key());
    for category in categories {
        writeln!(writer, "  {} [shape=box]", category.key())?;
    }

    write!(writer, "}}")?;
    Ok(edges.len())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
