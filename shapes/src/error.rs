//! Error type for shape reading and map building.

use std::convert::Infallible;

use thiserror::Error;

/// Everything that can go wrong between a shapes document and a finished
/// form description.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The shapes document could not be parsed as RDF.
    #[error("cannot parse shapes document: {0}")]
    Parse(String),

    /// The shapes file could not be read.
    #[error("cannot read shapes file {path}")]
    Io {
        /// The offending path.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Node shapes exist but every one is referenced through `sh:node`,
    /// so no root shape can be chosen.
    #[error("cyclic sh:node references: no root node shape found")]
    CyclicNodeReferences,

    /// The root shape names no target class, explicitly or implicitly.
    #[error("a target class must be specified for shape {0}")]
    MissingTargetClass(String),

    /// A property shape carries no `sh:path`.
    #[error("every property must have a path associated with it: {0}")]
    MissingPath(String),

    /// A property references a `sh:PropertyGroup` that is not declared.
    #[error("property {property} references group {group} which does not exist")]
    UnknownGroup {
        /// The property shape.
        property: String,
        /// The missing group IRI.
        group: String,
    },

    /// A constraint that must be an integer carried something else.
    #[error("{constraint} value must be an integer: \"{value}\"")]
    IntegerConstraint {
        /// Constraint name (e.g. `minCount`).
        constraint: String,
        /// The offending lexical value.
        value: String,
    },

    /// A constraint that must be numeric carried something else.
    #[error("{constraint} value must be numeric: \"{value}\"")]
    NumericConstraint {
        /// Constraint name (e.g. `minInclusive`).
        constraint: String,
        /// The offending lexical value.
        value: String,
    },

    /// A property reached map building or rendering without an ID, i.e.
    /// the layout pass was skipped.
    #[error("property \"{0}\" has no assigned ID; run the layout pass first")]
    UnassignedId(String),

    /// The graph could not be serialized.
    #[error("cannot serialize RDF: {0}")]
    Serialize(String),
}

impl From<Infallible> for ShapeError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
