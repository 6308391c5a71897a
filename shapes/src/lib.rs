//! SHACL shapes turned into typed form descriptions.
//!
//! The `shaclform-shapes` crate reads a SHACL shapes graph (Turtle or
//! N-Triples), extracts the root node shape into a [`FormShape`] tree,
//! lays the tree out for rendering (ordering, identifier assignment,
//! paired-constraint linking), and builds the RDF map that later turns a
//! form submission back into triples.
//!
//! # Entry Point
//!
//! ```
//! # fn main() -> Result<(), shaclform_shapes::ShapeError> {
//! let mut reader = shaclform_shapes::ShapeReader::from_turtle(r#"
//!     @prefix sh: <http://www.w3.org/ns/shacl#> .
//!     <http://example.org/PersonShape> a sh:NodeShape ;
//!         sh:targetClass <http://schema.org/Person> .
//! "#)?;
//! let mut shape = reader.read_shape()?.expect("one node shape");
//! shaclform_shapes::layout::finalize(&mut shape);
//! assert_eq!(shape.form_name(), "Person");
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod graph;
pub mod layout;
pub mod model;
pub mod rdfmap;
pub mod reader;
pub mod vocab;

pub use error::ShapeError;
pub use model::{
    FormProperty, FormShape, NodeKind, PairConstraint, PropertyGroup, PropertyId, ShapeWarning,
};
pub use rdfmap::{Placeholder, PLACEHOLDER_PREFIX, ROOT_PLACEHOLDER};
pub use reader::ShapeReader;
