//! Shared state of the form server.

use shaclform_form2rdf::{ConvertError, Form2Rdf};

/// Everything a request handler needs: the rendered form page and the
/// submission converter built from the map graph.
#[derive(Debug)]
pub struct AppState {
    /// The rendered form page, served as-is.
    pub form_html: String,
    /// Converts submissions into result graphs.
    pub converter: Form2Rdf,
}

impl AppState {
    /// Builds the state from a rendered form and its map graph.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidMap`] when the map Turtle does not
    /// parse.
    pub fn new(
        form_html: String,
        map_turtle: &str,
        base_iri: impl Into<String>,
    ) -> Result<Self, ConvertError> {
        Ok(AppState {
            form_html,
            converter: Form2Rdf::new(map_turtle, base_iri)?,
        })
    }
}
