//! Binds submitted form fields into a result graph, guided by the map.
//!
//! Field names follow the contract shared with the renderer and the
//! client script: every entry of a property is named `{id}-{copy}` with
//! `copy` counting from zero, node-kind radios are named
//! `NodeKind {entry}`, unchecked-checkbox markers `Unchecked {entry}`,
//! and fields nested under a blank-node entry append `:{local}` for each
//! level. The copy loop for a property stops at the first copy that
//! yields no value, so gaps end the iteration.

use std::collections::HashMap;

use sophia::api::prelude::*;
use sophia::api::term::{BnodeId, SimpleTerm};
use sophia::inmem::graph::FastGraph;
use uuid::Uuid;

use shaclform_shapes::rdfmap::{Placeholder, ROOT_PLACEHOLDER};
use shaclform_shapes::{graph, vocab, NodeKind};

use crate::error::ConvertError;

/// Characters an IRI entry must not contain.
const INVALID_IRI_CHARS: &str = "<>\" {}|\\^`";

/// Converts form submissions into RDF, one root node per submission.
#[derive(Debug)]
pub struct Form2Rdf {
    map: FastGraph,
    base_iri: String,
}

impl Form2Rdf {
    /// Parses the map graph from Turtle.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidMap`] when the Turtle does not parse.
    pub fn new(map_turtle: &str, base_iri: impl Into<String>) -> Result<Self, ConvertError> {
        let map =
            graph::parse_turtle(map_turtle).map_err(|e| ConvertError::InvalidMap(e.to_string()))?;
        Ok(Form2Rdf {
            map,
            base_iri: base_iri.into(),
        })
    }

    /// Wraps an already-parsed map graph.
    #[must_use]
    pub fn from_graph(map: FastGraph, base_iri: impl Into<String>) -> Self {
        Form2Rdf {
            map,
            base_iri: base_iri.into(),
        }
    }

    /// Converts one submission into a result graph.
    ///
    /// The root node is minted as `{base_iri}{uuid}` and typed with the
    /// map's root class; every mapped property is then searched for
    /// entries among the submitted fields.
    ///
    /// # Errors
    ///
    /// Fails when the map carries no typed root, when a map object is not
    /// a placeholder, when a node-kind selection is not permitted, or when
    /// an IRI entry is malformed.
    pub fn convert(
        &self,
        fields: &HashMap<String, String>,
    ) -> Result<FastGraph, ConvertError> {
        let root_placeholder = vocab::iri(ROOT_PLACEHOLDER);
        let rdf_type = vocab::rdf("type");
        let class = graph::value(&self.map, &root_placeholder, &rdf_type)
            .ok_or(ConvertError::MissingRoot)?;

        let mut binding = Binding {
            map: &self.map,
            fields,
            result: FastGraph::new(),
            next_blank: 0,
        };
        let root = vocab::iri(&format!("{}{}", self.base_iri, Uuid::new_v4()));
        graph::insert(&mut binding.result, &root, &rdf_type, &class);

        for (predicate, object) in graph::predicate_objects(&self.map, &root_placeholder) {
            if Term::eq(&predicate, &rdf_type) {
                continue;
            }
            let placeholder = parse_placeholder(&object)?;
            let base = placeholder.id.clone();
            binding.bind_property(&root, &predicate, &placeholder, &base)?;
        }
        Ok(binding.result)
    }

    /// Converts one submission and serializes the result as Turtle.
    ///
    /// # Errors
    ///
    /// Propagates [`convert`](Self::convert) failures and serialization
    /// errors.
    pub fn convert_turtle(
        &self,
        fields: &HashMap<String, String>,
    ) -> Result<String, ConvertError> {
        let result = self.convert(fields)?;
        graph::serialize_turtle(&result).map_err(|e| ConvertError::Serialize(e.to_string()))
    }
}

fn parse_placeholder(term: &SimpleTerm<'_>) -> Result<Placeholder, ConvertError> {
    let SimpleTerm::Iri(iri) = term else {
        return Err(ConvertError::InvalidMap(format!(
            "map object is not an IRI: {}",
            graph::term_text(term)
        )));
    };
    Placeholder::parse(iri.as_str()).ok_or_else(|| {
        ConvertError::InvalidMap(format!("map object is not a placeholder: {}", iri.as_str()))
    })
}

/// One conversion in progress.
struct Binding<'a> {
    map: &'a FastGraph,
    fields: &'a HashMap<String, String>,
    result: FastGraph,
    next_blank: u32,
}

impl Binding<'_> {
    /// A submitted field value, with empty strings treated as absent.
    fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Iterates entry copies until one yields no value; reports whether
    /// any copy did.
    fn bind_property(
        &mut self,
        subject: &SimpleTerm<'_>,
        predicate: &SimpleTerm<'_>,
        placeholder: &Placeholder,
        base_id: &str,
    ) -> Result<bool, ConvertError> {
        let mut copy = 0u32;
        let mut found_any = false;
        loop {
            let entry = format!("{base_id}-{copy}");
            if !self.bind_entry(subject, predicate, placeholder, &entry)? {
                break;
            }
            found_any = true;
            copy += 1;
        }
        Ok(found_any)
    }

    /// Binds one entry, resolving the node-kind selection first.
    fn bind_entry(
        &mut self,
        subject: &SimpleTerm<'_>,
        predicate: &SimpleTerm<'_>,
        placeholder: &Placeholder,
        entry: &str,
    ) -> Result<bool, ConvertError> {
        let declared = placeholder.node_kind;
        let kind = match self.value(&format!("NodeKind {entry}")) {
            Some(selection) => NodeKind::from_short_name(selection)
                .filter(|selected| declared.allows(*selected))
                .ok_or_else(|| ConvertError::InvalidNodeKind {
                    entry: entry.to_string(),
                    selection: selection.to_string(),
                })?,
            // Without a selection, a choice kind contributes nothing; a
            // fixed kind needs no choice.
            None if declared.is_choice() => return Ok(false),
            None => declared,
        };
        match kind {
            NodeKind::Literal => self.bind_literal(subject, predicate, placeholder, entry),
            NodeKind::Iri => self.bind_iri(subject, predicate, entry),
            NodeKind::BlankNode => self.bind_blank_node(subject, predicate, placeholder, entry),
            // allows() only yields concrete kinds.
            _ => Ok(false),
        }
    }

    fn bind_literal(
        &mut self,
        subject: &SimpleTerm<'_>,
        predicate: &SimpleTerm<'_>,
        placeholder: &Placeholder,
        entry: &str,
    ) -> Result<bool, ConvertError> {
        if placeholder.datatype.as_deref() == Some(vocab::XSD_BOOLEAN) {
            // Unchecked checkboxes are not submitted; the client script
            // submits an `Unchecked {entry}` marker in their place.
            let lexical = if self.value(entry).is_some() {
                "true"
            } else if self.value(&format!("Unchecked {entry}")).is_some() {
                "false"
            } else {
                return Ok(false);
            };
            let literal = vocab::literal(lexical, vocab::XSD_BOOLEAN);
            graph::insert(&mut self.result, subject, predicate, &literal);
            return Ok(true);
        }
        match self.value(entry) {
            Some(value) => {
                let datatype = placeholder.datatype.as_deref().unwrap_or(vocab::XSD_STRING);
                let literal = vocab::literal(value, datatype);
                graph::insert(&mut self.result, subject, predicate, &literal);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn bind_iri(
        &mut self,
        subject: &SimpleTerm<'_>,
        predicate: &SimpleTerm<'_>,
        entry: &str,
    ) -> Result<bool, ConvertError> {
        let Some(value) = self.value(entry) else {
            return Ok(false);
        };
        let trimmed = if value.starts_with('<') {
            value.trim_matches(|c| c == '<' || c == '>')
        } else {
            value
        };
        if trimmed.chars().any(|c| INVALID_IRI_CHARS.contains(c)) {
            return Err(ConvertError::InvalidIri(trimmed.to_string()));
        }
        let object = vocab::iri(trimmed);
        graph::insert(&mut self.result, subject, predicate, &object);
        Ok(true)
    }

    /// Binds a blank-node entry: nested map properties are searched under
    /// `{entry}:{local}`, and the node is only attached when at least one
    /// nested entry was found.
    fn bind_blank_node(
        &mut self,
        subject: &SimpleTerm<'_>,
        predicate: &SimpleTerm<'_>,
        placeholder: &Placeholder,
        entry: &str,
    ) -> Result<bool, ConvertError> {
        let label = format!("b{}", self.next_blank);
        self.next_blank += 1;
        let node = SimpleTerm::BlankNode(BnodeId::new_unchecked(label.into()));

        let placeholder_term = vocab::iri(&placeholder.to_iri());
        let mut found = false;
        for (nested_predicate, nested_object) in
            graph::predicate_objects(self.map, &placeholder_term)
        {
            let nested = parse_placeholder(&nested_object)?;
            let local = nested.id.rsplit(':').next().unwrap_or(&nested.id);
            let base = format!("{entry}:{local}");
            if self.bind_property(&node, &nested_predicate, &nested, &base)? {
                found = true;
            }
        }
        if found {
            graph::insert(&mut self.result, subject, predicate, &node);
        }
        Ok(found)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    const BASE: &str = "http://example.org/ex#";

    const LITERAL_MAP: &str = r#"
<urn:x-shaclform:root>
    a <http://schema.org/Person> ;
    <http://schema.org/givenName>
        <urn:x-shaclform:placeholder:Literal:0?dt=http://www.w3.org/2001/XMLSchema#string> .
"#;

    const BOOLEAN_MAP: &str = r#"
<urn:x-shaclform:root>
    a <http://schema.org/Person> ;
    <http://example.org/ex#likesDogs>
        <urn:x-shaclform:placeholder:Literal:0?dt=http://www.w3.org/2001/XMLSchema#boolean> .
"#;

    const IRI_MAP: &str = r#"
<urn:x-shaclform:root>
    a <http://schema.org/Person> ;
    <http://schema.org/knows> <urn:x-shaclform:placeholder:IRI:0> .
"#;

    const CHOICE_MAP: &str = r#"
<urn:x-shaclform:root>
    a <http://schema.org/Person> ;
    <http://schema.org/identifier> <urn:x-shaclform:placeholder:IRIOrLiteral:0> .
"#;

    const NESTED_MAP: &str = r#"
<urn:x-shaclform:root>
    a <http://schema.org/Person> ;
    <http://schema.org/address> <urn:x-shaclform:placeholder:BlankNode:0> .
<urn:x-shaclform:placeholder:BlankNode:0>
    <http://schema.org/streetAddress>
        <urn:x-shaclform:placeholder:Literal:0:0?dt=http://www.w3.org/2001/XMLSchema#string> .
"#;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn convert(map: &str, pairs: &[(&str, &str)]) -> FastGraph {
        Form2Rdf::new(map, BASE)
            .expect("map parses")
            .convert(&fields(pairs))
            .expect("conversion succeeds")
    }

    fn root_of(result: &FastGraph) -> SimpleTerm<'static> {
        let subjects = graph::subjects_with(
            result,
            &vocab::rdf("type"),
            &vocab::iri("http://schema.org/Person"),
        );
        assert_eq!(subjects.len(), 1, "exactly one typed root");
        subjects[0].clone()
    }

    fn objects_of(result: &FastGraph, predicate: &str) -> Vec<SimpleTerm<'static>> {
        graph::objects(result, &root_of(result), &vocab::iri(predicate))
    }

    #[test]
    fn root_is_minted_under_the_base_iri() {
        let result = convert(LITERAL_MAP, &[]);
        let root = root_of(&result);
        assert!(graph::term_text(&root).starts_with(BASE));
    }

    #[test]
    fn literal_entry_is_bound() {
        let result = convert(LITERAL_MAP, &[("0-0", "Steve")]);
        let objects = objects_of(&result, "http://schema.org/givenName");
        assert_eq!(
            objects,
            vec![vocab::literal("Steve", vocab::XSD_STRING)]
        );
    }

    #[test]
    fn every_copy_is_bound() {
        let result = convert(LITERAL_MAP, &[("0-0", "Steve"), ("0-1", "Terrence")]);
        assert_eq!(objects_of(&result, "http://schema.org/givenName").len(), 2);
    }

    #[test]
    fn a_gap_ends_the_copy_loop() {
        let result = convert(LITERAL_MAP, &[("0-0", "Steve"), ("0-2", "Terrence")]);
        assert_eq!(objects_of(&result, "http://schema.org/givenName").len(), 1);
    }

    #[test]
    fn empty_values_bind_nothing() {
        let result = convert(LITERAL_MAP, &[("0-0", "")]);
        assert!(objects_of(&result, "http://schema.org/givenName").is_empty());
    }

    #[test]
    fn checked_checkbox_binds_true() {
        let result = convert(BOOLEAN_MAP, &[("0-0", "on")]);
        assert_eq!(
            objects_of(&result, "http://example.org/ex#likesDogs"),
            vec![vocab::literal("true", vocab::XSD_BOOLEAN)]
        );
    }

    #[test]
    fn unchecked_marker_binds_false() {
        let result = convert(BOOLEAN_MAP, &[("Unchecked 0-0", "on")]);
        assert_eq!(
            objects_of(&result, "http://example.org/ex#likesDogs"),
            vec![vocab::literal("false", vocab::XSD_BOOLEAN)]
        );
    }

    #[test]
    fn absent_checkbox_binds_nothing() {
        let result = convert(BOOLEAN_MAP, &[]);
        assert!(objects_of(&result, "http://example.org/ex#likesDogs").is_empty());
    }

    #[test]
    fn iri_entry_is_bound_with_brackets_stripped() {
        let result = convert(IRI_MAP, &[("0-0", "<http://example.org/other>")]);
        assert_eq!(
            objects_of(&result, "http://schema.org/knows"),
            vec![vocab::iri("http://example.org/other")]
        );
    }

    #[test]
    fn malformed_iri_is_rejected() {
        let converter = Form2Rdf::new(IRI_MAP, BASE).expect("map parses");
        let result = converter.convert(&fields(&[("0-0", "http://example.org/has space")]));
        assert!(matches!(result, Err(ConvertError::InvalidIri(_))));
    }

    #[test]
    fn choice_kind_follows_the_selection() {
        let result = convert(
            CHOICE_MAP,
            &[("NodeKind 0-0", "Literal"), ("0-0", "12345")],
        );
        assert_eq!(
            objects_of(&result, "http://schema.org/identifier"),
            vec![vocab::literal("12345", vocab::XSD_STRING)]
        );
    }

    #[test]
    fn choice_kind_without_selection_binds_nothing() {
        let result = convert(CHOICE_MAP, &[("0-0", "12345")]);
        assert!(objects_of(&result, "http://schema.org/identifier").is_empty());
    }

    #[test]
    fn forbidden_selection_is_rejected() {
        let converter = Form2Rdf::new(CHOICE_MAP, BASE).expect("map parses");
        let result =
            converter.convert(&fields(&[("NodeKind 0-0", "BlankNode"), ("0-0", "x")]));
        assert!(matches!(result, Err(ConvertError::InvalidNodeKind { .. })));
    }

    #[test]
    fn nested_entries_attach_through_a_blank_node() {
        let result = convert(NESTED_MAP, &[("0-0:0-0", "Main Street 1")]);
        let addresses = objects_of(&result, "http://schema.org/address");
        assert_eq!(addresses.len(), 1);
        assert!(matches!(addresses[0], SimpleTerm::BlankNode(_)));
        let streets = graph::objects(
            &result,
            &addresses[0],
            &vocab::iri("http://schema.org/streetAddress"),
        );
        assert_eq!(
            streets,
            vec![vocab::literal("Main Street 1", vocab::XSD_STRING)]
        );
    }

    #[test]
    fn empty_blank_node_is_not_attached() {
        let result = convert(NESTED_MAP, &[]);
        assert!(objects_of(&result, "http://schema.org/address").is_empty());
    }

    #[test]
    fn map_without_root_is_rejected() {
        let converter = Form2Rdf::new("", BASE).expect("empty map parses");
        assert!(matches!(
            converter.convert(&HashMap::new()),
            Err(ConvertError::MissingRoot)
        ));
    }

    #[test]
    fn result_serializes_as_turtle() {
        let converter = Form2Rdf::new(LITERAL_MAP, BASE).expect("map parses");
        let turtle = converter
            .convert_turtle(&fields(&[("0-0", "Steve")]))
            .expect("serializes");
        assert!(turtle.contains("Steve"));
    }
}
