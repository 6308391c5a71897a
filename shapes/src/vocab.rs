//! Vocabulary IRI constants and term construction helpers.
//!
//! Only the handful of SHACL/RDF terms the reader actually queries are
//! declared here; constraint predicates are matched by local name (see
//! [`local_name`]), so they need no constants of their own.

use sophia::api::term::{IriRef, SimpleTerm};

/// SHACL vocabulary namespace.
pub const SH: &str = "http://www.w3.org/ns/shacl#";
/// RDF syntax namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDF Schema namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// XML Schema datatypes namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// `xsd:boolean`, the datatype that switches a field to checkbox semantics.
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
/// `xsd:string`, the default literal datatype.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Builds an owned IRI term from any IRI string.
///
/// The IRIs handled here come either from a parsed graph (already valid)
/// or from the fixed vocabularies above, so no re-validation is done.
#[must_use]
pub fn iri(value: &str) -> SimpleTerm<'static> {
    SimpleTerm::Iri(IriRef::new_unchecked(value.to_string().into()))
}

/// Builds a term in the SHACL namespace (e.g. `sh("NodeShape")`).
#[must_use]
pub fn sh(local: &str) -> SimpleTerm<'static> {
    iri(&format!("{SH}{local}"))
}

/// Builds a term in the RDF namespace.
#[must_use]
pub fn rdf(local: &str) -> SimpleTerm<'static> {
    iri(&format!("{RDF}{local}"))
}

/// Builds a term in the RDFS namespace.
#[must_use]
pub fn rdfs(local: &str) -> SimpleTerm<'static> {
    iri(&format!("{RDFS}{local}"))
}

/// Builds a typed literal term.
#[must_use]
pub fn literal(lexical: &str, datatype: &str) -> SimpleTerm<'static> {
    SimpleTerm::LiteralDatatype(
        lexical.to_string().into(),
        IriRef::new_unchecked(datatype.to_string().into()),
    )
}

/// Extracts the local name of an IRI: the segment after the last `#` or `/`.
///
/// Returns the whole input when it contains neither separator.
#[must_use]
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_slash() {
        assert_eq!(local_name("http://schema.org/Person"), "Person");
    }

    #[test]
    fn local_name_hash() {
        assert_eq!(local_name("http://example.org/ex#gpa"), "gpa");
    }

    #[test]
    fn local_name_plain() {
        assert_eq!(local_name("gpa"), "gpa");
    }
}
