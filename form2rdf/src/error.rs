//! Error type for submission conversion.

use std::convert::Infallible;

use thiserror::Error;

/// Everything that can go wrong between a form submission and a result
/// graph.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The map graph could not be parsed, or contains objects that are not
    /// placeholders.
    #[error("invalid RDF map: {0}")]
    InvalidMap(String),

    /// The map graph carries no typed root placeholder.
    #[error("RDF map has no typed root placeholder")]
    MissingRoot,

    /// The submission selected a node kind the property does not permit,
    /// or one that is not a node kind at all.
    #[error("not valid nodeKind: {selection}")]
    InvalidNodeKind {
        /// The entry the selection belongs to.
        entry: String,
        /// The submitted selection.
        selection: String,
    },

    /// An IRI entry contains characters an IRI cannot carry.
    #[error("invalid IRI: {0}")]
    InvalidIri(String),

    /// The result graph could not be serialized.
    #[error("cannot serialize RDF: {0}")]
    Serialize(String),
}

impl From<Infallible> for ConvertError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
