//! Command dispatch for the interactive shell.
//!
//! One input line is one command; the first word (lowercased) selects it.
//! Handlers write their output to the supplied writer and report every
//! rejection as an `Error: <reason>` line — the loop itself never aborts on
//! a bad command.

use std::io::{self, Write};

use tracing::{info, warn};

use regal_graph::{
    add_statement, export_dot, load_database, Edge, Graph, GraphError, Node, NodeName, Relation,
};

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Execute one command line against the graph.
pub fn handle_command<W: Write>(
    graph: &mut Graph,
    input: &str,
    out: &mut W,
) -> io::Result<Outcome> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Outcome::Continue);
    }
    let (head, rest) = split_word(trimmed);

    match head.to_lowercase().as_str() {
        "load" => {
            let (keyword, path) = split_word(rest);
            if keyword.eq_ignore_ascii_case("database") && !path.is_empty() {
                load(graph, path, out)?;
            } else {
                writeln!(out, "Error: unknown command: {trimmed}")?;
            }
        }
        "add" => {
            if let Err(e) = add_statement(graph, rest) {
                writeln!(out, "Error: {e}")?;
            }
        }
        "remove" => remove(graph, rest, out)?,
        "nodes" => nodes(graph, out)?,
        "edges" => edges(graph, out)?,
        "recommend" => recommend(graph, rest, out)?,
        "export" => export(graph, out)?,
        "quit" => return Ok(Outcome::Quit),
        _ => writeln!(out, "Error: unknown command: {trimmed}")?,
    }
    Ok(Outcome::Continue)
}

/// First whitespace-delimited word and the trimmed remainder.
fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

// ── Handlers ───────────────────────────────────────────────

/// Echo the file verbatim, then replace the graph with its contents.
/// Problems are reported after the echo, one line each.
fn load<W: Write>(graph: &mut Graph, path: &str, out: &mut W) -> io::Result<()> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            writeln!(out, "Error: {}", GraphError::Io(e))?;
            return Ok(());
        }
    };
    for line in text.lines() {
        writeln!(out, "{line}")?;
    }

    match load_database(graph, &text) {
        Ok(report) => {
            info!(
                path     = %path,
                nodes    = graph.node_count(),
                edges    = report.edges_added,
                rejected = report.rejected,
                "database loaded"
            );
            for message in &report.messages {
                warn!(%message, "statement rejected");
                writeln!(out, "Error: {message}")?;
            }
        }
        Err(e) => {
            warn!(path = %path, error = %e, "database load failed");
            writeln!(out, "Error: {e}")?;
        }
    }
    Ok(())
}

/// Resolve both endpoints and the predicate, then remove the exact outgoing
/// edge. Operands written as `name(id=N)` specs resolve by their name part.
/// The stored inverse and any isolated endpoint go with it.
fn remove<W: Write>(graph: &mut Graph, rest: &str, out: &mut W) -> io::Result<()> {
    let words: Vec<&str> = rest.split_whitespace().collect();
    let (subject, predicate, object) = match words.as_slice() {
        [s, p, o] => (spec_name(s), *p, spec_name(o)),
        _ => {
            writeln!(out, "Error: {}", GraphError::InvalidStatement(rest.to_string()))?;
            return Ok(());
        }
    };

    let Some(source) = graph.lookup(subject) else {
        writeln!(out, "Error: {}", GraphError::NodeNotFound(NodeName::new(subject)))?;
        return Ok(());
    };
    let source = source.key();
    let Some(target) = graph.lookup(object) else {
        writeln!(out, "Error: {}", GraphError::NodeNotFound(NodeName::new(object)))?;
        return Ok(());
    };
    let target = target.key();
    let Some(relation) = Relation::parse(predicate) else {
        writeln!(out, "Error: {}", GraphError::InvalidStatement(rest.to_string()))?;
        return Ok(());
    };

    let edge = Edge::new(source, target, relation);
    if !graph.remove_edge(&edge) {
        writeln!(out, "Error: {}", GraphError::EdgeNotFound(edge))?;
    }
    Ok(())
}

/// Lookup name of a removal operand: an id clause, if present, is ignored.
fn spec_name(word: &str) -> &str {
    match word.find('(') {
        Some(i) => &word[..i],
        None => word,
    }
}

/// All nodes on one line, sorted by key; an empty graph prints an empty line.
fn nodes<W: Write>(graph: &Graph, out: &mut W) -> io::Result<()> {
    let mut all: Vec<&Node> = graph.nodes().collect();
    all.sort_by_key(|n| n.key());
    let line = all.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" ");
    writeln!(out, "{line}")
}

/// One edge per line, sorted by (source, target, relation rank); endpoints
/// print their node display forms, so products carry their id. An empty
/// graph prints nothing.
fn edges<W: Write>(graph: &Graph, out: &mut W) -> io::Result<()> {
    let mut all: Vec<&Edge> = graph.edges().collect();
    all.sort_by(|a, b| {
        (&a.source, &a.target, a.relation.rank()).cmp(&(&b.source, &b.target, b.relation.rank()))
    });
    for edge in all {
        writeln!(
            out,
            "{}-[{}]->{}",
            endpoint_display(graph, &edge.source),
            edge.relation,
            endpoint_display(graph, &edge.target)
        )?;
    }
    Ok(())
}

/// Display form of an edge endpoint (`name:id` for products).
fn endpoint_display(graph: &Graph, key: &NodeName) -> String {
    graph
        .node(key)
        .map(|n| n.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Parse and evaluate a query term; print matches sorted by key. An empty
/// result prints an empty line — a missing reference product is not an error.
fn recommend<W: Write>(graph: &Graph, rest: &str, out: &mut W) -> io::Result<()> {
    let term = match regal_query::parse(rest) {
        Ok(term) => term,
        Err(e) => {
            writeln!(out, "Error: {e}")?;
            return Ok(());
        }
    };

    let mut keys: Vec<NodeName> = regal_query::recommend(&term, graph).into_iter().collect();
    keys.sort();
    let line = keys
        .iter()
        .filter_map(|key| graph.node(key))
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{line}")
}

fn export<W: Write>(graph: &Graph, out: &mut W) -> io::Result<()> {
    let mut buf = Vec::new();
    match export_dot(graph, &mut buf) {
        Ok(_) => writeln!(out, "{}", String::from_utf8_lossy(&buf)),
        Err(e) => writeln!(out, "Error: {e}"),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
