//! Web server for generated SHACL forms.
//!
//! The `shaclform-server` crate serves a rendered form page and its
//! client script, and converts `POST` submissions into RDF through the
//! form's map graph, replying with the result Turtle.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod routes;
pub mod state;

pub use routes::{router, serve};
pub use state::AppState;
