//! HTML form rendering for laid-out SHACL shapes.
//!
//! The `shaclform-render` crate turns a [`shaclform_shapes::FormShape`]
//! into an HTML page: a serializable view model decides the widgets and
//! attributes, Handlebars templates place them, and a bundled client
//! script drives entry management and validation in the browser.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod render;
pub mod view;

pub use render::{FormRenderer, RenderError, WEBFORM_JS};
pub use view::FormView;
