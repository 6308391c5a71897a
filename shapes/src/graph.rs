//! Thin convenience layer over the in-memory graph.
//!
//! All lookups return owned terms so callers never fight the borrow
//! checker while mutating the graph mid-traversal. The graphs involved are
//! small (one shapes document), so the copies are irrelevant.

use sophia::api::prelude::*;
use sophia::api::term::matcher::Any;
use sophia::api::term::SimpleTerm;
use sophia::inmem::graph::FastGraph;
use sophia::inmem::index::TermIndexFullError;
use sophia::turtle::parser::{nt, turtle};
use sophia::turtle::serializer::turtle::TurtleSerializer;

use crate::error::ShapeError;

/// Unwraps a result whose error cannot occur for the small graphs we build.
fn ok<T>(result: Result<T, TermIndexFullError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => unreachable!("term index full: {err}"),
    }
}

/// Copies a borrowed term into an owned one.
fn owned(term: &SimpleTerm<'_>) -> SimpleTerm<'static> {
    term.into_term()
}

/// Parses a Turtle document into a graph.
///
/// # Errors
///
/// Returns [`ShapeError::Parse`] when the document is not valid Turtle.
pub fn parse_turtle(source: &str) -> Result<FastGraph, ShapeError> {
    turtle::parse_str(source)
        .collect_triples()
        .map_err(|e| ShapeError::Parse(e.to_string()))
}

/// Parses an N-Triples document into a graph.
///
/// # Errors
///
/// Returns [`ShapeError::Parse`] when the document is not valid N-Triples.
pub fn parse_ntriples(source: &str) -> Result<FastGraph, ShapeError> {
    nt::parse_str(source)
        .collect_triples()
        .map_err(|e| ShapeError::Parse(e.to_string()))
}

/// Serializes a graph as Turtle.
///
/// # Errors
///
/// Returns [`ShapeError::Serialize`] when the graph contains terms the
/// Turtle syntax cannot express.
pub fn serialize_turtle(graph: &FastGraph) -> Result<String, ShapeError> {
    let mut serializer = TurtleSerializer::new_stringifier();
    serializer
        .serialize_graph(graph)
        .map_err(|e| ShapeError::Serialize(e.to_string()))?;
    Ok(serializer.as_str().to_string())
}

/// Returns every subject of `(?, predicate, object)`.
#[must_use]
pub fn subjects_with(
    graph: &FastGraph,
    predicate: &SimpleTerm<'_>,
    object: &SimpleTerm<'_>,
) -> Vec<SimpleTerm<'static>> {
    graph
        .triples_matching(Any, [predicate], [object])
        .map(ok)
        .map(|t| owned(t.s()))
        .collect()
}

/// Returns every object of `(subject, predicate, ?)`.
#[must_use]
pub fn objects(
    graph: &FastGraph,
    subject: &SimpleTerm<'_>,
    predicate: &SimpleTerm<'_>,
) -> Vec<SimpleTerm<'static>> {
    graph
        .triples_matching([subject], [predicate], Any)
        .map(ok)
        .map(|t| owned(t.o()))
        .collect()
}

/// Returns the first object of `(subject, predicate, ?)`, if any.
#[must_use]
pub fn value(
    graph: &FastGraph,
    subject: &SimpleTerm<'_>,
    predicate: &SimpleTerm<'_>,
) -> Option<SimpleTerm<'static>> {
    graph
        .triples_matching([subject], [predicate], Any)
        .map(ok)
        .map(|t| owned(t.o()))
        .next()
}

/// Returns every `(predicate, object)` pair attached to `subject`.
#[must_use]
pub fn predicate_objects(
    graph: &FastGraph,
    subject: &SimpleTerm<'_>,
) -> Vec<(SimpleTerm<'static>, SimpleTerm<'static>)> {
    graph
        .triples_matching([subject], Any, Any)
        .map(ok)
        .map(|t| (owned(t.p()), owned(t.o())))
        .collect()
}

/// Returns all triples of the graph as owned terms.
#[must_use]
pub fn all_triples(
    graph: &FastGraph,
) -> Vec<(SimpleTerm<'static>, SimpleTerm<'static>, SimpleTerm<'static>)> {
    graph
        .triples()
        .map(ok)
        .map(|t| (owned(t.s()), owned(t.p()), owned(t.o())))
        .collect()
}

/// Reports whether `(?, predicate, object)` is present.
#[must_use]
pub fn has_subject(
    graph: &FastGraph,
    predicate: &SimpleTerm<'_>,
    object: &SimpleTerm<'_>,
) -> bool {
    graph
        .triples_matching(Any, [predicate], [object])
        .next()
        .is_some()
}

/// Reports whether the exact triple is present.
#[must_use]
pub fn has_triple(
    graph: &FastGraph,
    subject: &SimpleTerm<'_>,
    predicate: &SimpleTerm<'_>,
    object: &SimpleTerm<'_>,
) -> bool {
    graph
        .triples_matching([subject], [predicate], [object])
        .next()
        .is_some()
}

/// Inserts a triple, ignoring the already-present indicator.
pub fn insert(
    graph: &mut FastGraph,
    subject: &SimpleTerm<'_>,
    predicate: &SimpleTerm<'_>,
    object: &SimpleTerm<'_>,
) {
    ok(graph.insert(subject, predicate, object));
}

/// Returns the text carried by a term: the IRI of an IRI term, the lexical
/// form of a literal, or the label of a blank node.
#[must_use]
pub fn term_text(term: &SimpleTerm<'_>) -> String {
    match term {
        SimpleTerm::Iri(iri) => iri.as_str().to_string(),
        SimpleTerm::LiteralDatatype(lexical, _) | SimpleTerm::LiteralLanguage(lexical, _) => {
            lexical.to_string()
        }
        SimpleTerm::BlankNode(id) => id.as_str().to_string(),
        _ => String::new(),
    }
}

/// Walks an RDF collection from `head`, returning the text of each member.
#[must_use]
pub fn collection_texts(graph: &FastGraph, head: &SimpleTerm<'_>) -> Vec<String> {
    let first = crate::vocab::rdf("first");
    let rest = crate::vocab::rdf("rest");
    let nil = crate::vocab::rdf("nil");

    let mut members = Vec::new();
    let mut node = owned(head);
    while !Term::eq(&node, &nil) {
        match value(graph, &node, &first) {
            Some(member) => members.push(term_text(&member)),
            None => break,
        }
        match value(graph, &node, &rest) {
            Some(next) => node = next,
            None => break,
        }
    }
    members
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::vocab;

    const LIST_DOC: &str = r#"
@prefix ex: <http://example.org/ex#> .
ex:subject ex:options ( "Steve" "Terrence" ) .
"#;

    #[test]
    fn collection_in_order() {
        let graph = parse_turtle(LIST_DOC).expect("fixture parses");
        let head = value(
            &graph,
            &vocab::iri("http://example.org/ex#subject"),
            &vocab::iri("http://example.org/ex#options"),
        )
        .expect("list head present");
        assert_eq!(collection_texts(&graph, &head), vec!["Steve", "Terrence"]);
    }

    #[test]
    fn turtle_round_trip() {
        let graph = parse_turtle(LIST_DOC).expect("fixture parses");
        let text = serialize_turtle(&graph).expect("serializes");
        let reparsed = parse_turtle(&text).expect("reparses");
        assert_eq!(all_triples(&reparsed).len(), all_triples(&graph).len());
    }
}
