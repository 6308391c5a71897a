//! The RDF map: the intermediate graph linking form fields to triples.
//!
//! The map mirrors the result graph's structure, with placeholder IRIs
//! standing in for values the user has not entered yet. Each placeholder
//! encodes the property's node kind, its identifier, and optionally its
//! datatype, so submission handling needs nothing but the map and the
//! submitted fields.

use sophia::inmem::graph::FastGraph;

use crate::error::ShapeError;
use crate::graph;
use crate::model::{FormProperty, FormShape, NodeKind};
use crate::vocab;

/// Placeholder standing in for the node the form creates.
pub const ROOT_PLACEHOLDER: &str = "urn:x-shaclform:root";

/// Prefix of per-property value placeholders.
pub const PLACEHOLDER_PREFIX: &str = "urn:x-shaclform:placeholder:";

/// The payload carried by a value placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The property's effective node kind.
    pub node_kind: NodeKind,
    /// The property identifier, in its textual form (e.g. `2:0`).
    pub id: String,
    /// The property's datatype IRI, if constrained.
    pub datatype: Option<String>,
}

impl Placeholder {
    /// Encodes the placeholder as an IRI:
    /// `urn:x-shaclform:placeholder:{kind}:{id}`, with `?dt={datatype}`
    /// appended when a datatype is present.
    #[must_use]
    pub fn to_iri(&self) -> String {
        let mut iri = format!("{PLACEHOLDER_PREFIX}{}:{}", self.node_kind.short_name(), self.id);
        if let Some(datatype) = &self.datatype {
            iri.push_str("?dt=");
            iri.push_str(datatype);
        }
        iri
    }

    /// Decodes a placeholder IRI; `None` when `iri` is not a value
    /// placeholder of this scheme.
    #[must_use]
    pub fn parse(iri: &str) -> Option<Self> {
        let payload = iri.strip_prefix(PLACEHOLDER_PREFIX)?;
        let (payload, datatype) = match payload.split_once("?dt=") {
            Some((payload, datatype)) => (payload, Some(datatype.to_string())),
            None => (payload, None),
        };
        let (kind, id) = payload.split_once(':')?;
        Some(Placeholder {
            node_kind: NodeKind::from_short_name(kind)?,
            id: id.to_string(),
            datatype,
        })
    }
}

/// Builds the map graph for a laid-out shape.
///
/// # Errors
///
/// Returns [`ShapeError::UnassignedId`] when a property carries no
/// identifier, i.e. [`crate::layout::finalize`] was not run.
pub fn build_map(shape: &FormShape) -> Result<FastGraph, ShapeError> {
    let mut map = FastGraph::new();
    let root = vocab::iri(ROOT_PLACEHOLDER);
    graph::insert(
        &mut map,
        &root,
        &vocab::rdf("type"),
        &vocab::iri(&shape.target_class),
    );
    for property in shape.top_level() {
        add_property(&mut map, &root, property)?;
    }
    Ok(map)
}

/// Builds the map and serializes it as Turtle.
///
/// # Errors
///
/// Propagates [`build_map`] failures and serialization errors.
pub fn map_turtle(shape: &FormShape) -> Result<String, ShapeError> {
    graph::serialize_turtle(&build_map(shape)?)
}

fn add_property(
    map: &mut FastGraph,
    subject: &sophia::api::term::SimpleTerm<'_>,
    property: &FormProperty,
) -> Result<(), ShapeError> {
    let id = property
        .id
        .as_ref()
        .ok_or_else(|| ShapeError::UnassignedId(property.name.clone()))?;
    let placeholder = Placeholder {
        node_kind: property.effective_node_kind(),
        id: id.to_string(),
        datatype: property.datatype.clone(),
    };
    let object = vocab::iri(&placeholder.to_iri());
    graph::insert(map, subject, &vocab::iri(&property.path), &object);
    for nested in &property.properties {
        add_property(map, &object, nested)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::layout;
    use crate::reader::ShapeReader;

    const MAP_SHAPE: &str = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix schema: <http://schema.org/> .
@prefix ex: <http://example.org/ex#> .

ex:PersonShape
    a sh:NodeShape ;
    sh:targetClass schema:Person ;
    sh:property [
        sh:path schema:givenName ;
        sh:order 0 ;
    ] ;
    sh:property [
        sh:path schema:birthDate ;
        sh:order 1 ;
        sh:nodeKind sh:Literal ;
        sh:datatype xsd:date ;
    ] ;
    sh:property [
        sh:path schema:address ;
        sh:order 2 ;
        sh:property [ sh:path schema:streetAddress ] ;
    ] .
"#;

    fn mapped_shape() -> FastGraph {
        let mut reader = ShapeReader::from_turtle(MAP_SHAPE).expect("fixture parses");
        let mut shape = reader
            .read_shape()
            .expect("fixture reads")
            .expect("fixture contains a shape");
        layout::finalize(&mut shape);
        build_map(&shape).expect("map builds")
    }

    #[test]
    fn root_is_typed_with_the_target_class() {
        let map = mapped_shape();
        assert!(graph::has_triple(
            &map,
            &vocab::iri(ROOT_PLACEHOLDER),
            &vocab::rdf("type"),
            &vocab::iri("http://schema.org/Person"),
        ));
    }

    #[test]
    fn placeholders_carry_kind_and_id() {
        let map = mapped_shape();
        assert!(graph::has_triple(
            &map,
            &vocab::iri(ROOT_PLACEHOLDER),
            &vocab::iri("http://schema.org/givenName"),
            &vocab::iri("urn:x-shaclform:placeholder:IRIOrLiteral:0"),
        ));
    }

    #[test]
    fn placeholders_carry_the_datatype() {
        let map = mapped_shape();
        assert!(graph::has_triple(
            &map,
            &vocab::iri(ROOT_PLACEHOLDER),
            &vocab::iri("http://schema.org/birthDate"),
            &vocab::iri(
                "urn:x-shaclform:placeholder:Literal:1?dt=http://www.w3.org/2001/XMLSchema#date"
            ),
        ));
    }

    #[test]
    fn nested_properties_hang_off_the_parent_placeholder() {
        let map = mapped_shape();
        assert!(graph::has_triple(
            &map,
            &vocab::iri("urn:x-shaclform:placeholder:BlankNodeOrIRI:2"),
            &vocab::iri("http://schema.org/streetAddress"),
            &vocab::iri("urn:x-shaclform:placeholder:IRIOrLiteral:2:0"),
        ));
    }

    #[test]
    fn unlaid_out_shape_is_rejected() {
        let mut reader = ShapeReader::from_turtle(MAP_SHAPE).expect("fixture parses");
        let shape = reader
            .read_shape()
            .expect("fixture reads")
            .expect("fixture contains a shape");
        assert!(matches!(
            build_map(&shape),
            Err(ShapeError::UnassignedId(_))
        ));
    }

    #[test]
    fn placeholder_iri_round_trip() {
        let placeholder = Placeholder {
            node_kind: NodeKind::Literal,
            id: "2:0".to_string(),
            datatype: Some("http://www.w3.org/2001/XMLSchema#date".to_string()),
        };
        assert_eq!(Placeholder::parse(&placeholder.to_iri()), Some(placeholder));
    }

    #[test]
    fn foreign_iris_are_not_placeholders() {
        assert_eq!(Placeholder::parse("http://schema.org/Person"), None);
        assert_eq!(Placeholder::parse(ROOT_PLACEHOLDER), None);
    }
}
