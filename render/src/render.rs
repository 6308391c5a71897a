//! Handlebars rendering of the form view.

use handlebars::Handlebars;
use thiserror::Error;

use shaclform_shapes::{FormShape, ShapeError};

use crate::view::FormView;

/// The client-side form script, shipped as a static asset.
pub const WEBFORM_JS: &str = include_str!("../assets/webform.js");

const FORM_TEMPLATE: &str = include_str!("../templates/form.hbs");
const FIELD_TEMPLATE: &str = include_str!("../templates/field.hbs");
const OPTION_TEMPLATE: &str = include_str!("../templates/option.hbs");

/// Everything that can go wrong while rendering a form.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A built-in template failed to compile.
    #[error("cannot compile form template: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// The template engine rejected the view.
    #[error("cannot render form: {0}")]
    Render(#[from] handlebars::RenderError),

    /// The shape could not be turned into a view.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Renders laid-out shapes into HTML forms.
#[derive(Debug)]
pub struct FormRenderer {
    registry: Handlebars<'static>,
}

impl FormRenderer {
    /// Compiles the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] when a template fails to compile,
    /// which only happens if the built-in templates are broken.
    pub fn new() -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.register_template_string("form", FORM_TEMPLATE)?;
        registry.register_template_string("field", FIELD_TEMPLATE)?;
        registry.register_template_string("option", OPTION_TEMPLATE)?;
        Ok(FormRenderer { registry })
    }

    /// Renders an already-built view.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Render`] when the template engine fails.
    pub fn render(&self, view: &FormView) -> Result<String, RenderError> {
        Ok(self.registry.render("form", view)?)
    }

    /// Builds the view for a laid-out shape and renders it.
    ///
    /// # Errors
    ///
    /// Fails when the shape was not laid out or when rendering fails.
    pub fn render_shape(&self, shape: &FormShape) -> Result<String, RenderError> {
        self.render(&FormView::from_shape(shape)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use shaclform_shapes::{layout, ShapeReader};

    const RENDER_SHAPE: &str = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix schema: <http://schema.org/> .
@prefix ex: <http://example.org/ex#> .

ex:PersonShape
    a sh:NodeShape ;
    sh:targetClass schema:Person ;
    sh:property [
        sh:path schema:givenName ;
        sh:name "Given name" ;
        sh:order 0 ;
        sh:nodeKind sh:Literal ;
        sh:minCount 1 ;
        sh:group ex:NameGroup ;
    ] ;
    sh:property [
        sh:path ex:likesDogs ;
        sh:order 1 ;
        sh:nodeKind sh:Literal ;
        sh:datatype xsd:boolean ;
    ] ;
    sh:property [
        sh:path schema:address ;
        sh:order 2 ;
        sh:property [ sh:path schema:streetAddress ; sh:nodeKind sh:Literal ] ;
    ] .

ex:NameGroup
    a sh:PropertyGroup ;
    rdfs:label "Name" ;
    sh:order 0 .
"#;

    fn rendered() -> String {
        let mut reader = ShapeReader::from_turtle(RENDER_SHAPE).expect("fixture parses");
        let mut shape = reader
            .read_shape()
            .expect("fixture reads")
            .expect("fixture contains a shape");
        layout::finalize(&mut shape);
        FormRenderer::new()
            .expect("templates compile")
            .render_shape(&shape)
            .expect("form renders")
    }

    #[test]
    fn form_and_title_are_present() {
        let html = rendered();
        assert!(html.contains("<form id=\"shacl-form\""));
        assert!(html.contains("<title>Person</title>"));
    }

    #[test]
    fn groups_render_as_fieldsets() {
        let html = rendered();
        assert!(html.contains("<legend>Name</legend>"));
    }

    #[test]
    fn fields_are_named_by_property_id() {
        let html = rendered();
        assert!(html.contains("name=\"0\""));
        assert!(html.contains("data-root-id=\"0\""));
        assert!(html.contains("data-min-entries=\"1\""));
    }

    #[test]
    fn checkboxes_carry_their_unchecked_partner() {
        let html = rendered();
        assert!(html.contains("type=\"checkbox\" name=\"1\""));
        assert!(html.contains("name=\"Unchecked 1\""));
    }

    #[test]
    fn choice_properties_render_node_kind_radios() {
        let html = rendered();
        assert!(html.contains("name=\"NodeKind 2\""));
        assert!(html.contains("nodeKindOption-BlankNode"));
        assert!(html.contains("nodeKindOption-IRI"));
    }

    #[test]
    fn nested_fields_use_compound_ids() {
        let html = rendered();
        assert!(html.contains("name=\"2:0\""));
    }

    #[test]
    fn template_inputs_start_disabled() {
        let html = rendered();
        assert!(html.contains("class=\"template\" hidden"));
        assert!(html.contains("disabled"));
    }
}
