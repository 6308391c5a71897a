//! Form submissions turned back into RDF.
//!
//! The `shaclform-form2rdf` crate takes the map graph produced alongside a
//! generated form and binds submitted field values into a fresh result
//! graph: one minted, typed root node per submission, literal and IRI
//! entries attached directly, blank-node entries recursing through the
//! map's nested placeholders.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod convert;
pub mod error;

pub use convert::Form2Rdf;
pub use error::ConvertError;
