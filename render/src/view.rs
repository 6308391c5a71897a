//! Serializable view model consumed by the form templates.
//!
//! Widget selection happens here, not in the templates: every field view
//! carries the input type, select options, validation attributes, and
//! pair-constraint references already resolved, so the templates only
//! place values.

use serde::Serialize;

use shaclform_shapes::{vocab, FormProperty, FormShape, NodeKind, PairConstraint, ShapeError};

/// Datatypes rendered as `<input type="number">`.
const NUMBER_DATATYPES: [&str; 4] = [
    "http://www.w3.org/2001/XMLSchema#integer",
    "http://www.w3.org/2001/XMLSchema#float",
    "http://www.w3.org/2001/XMLSchema#double",
    "http://www.w3.org/2001/XMLSchema#decimal",
];

const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
const XSD_TIME: &str = "http://www.w3.org/2001/XMLSchema#time";
const FOAF_MBOX: &str = "http://xmlns.com/foaf/0.1/mbox";
const FOAF_PHONE: &str = "http://xmlns.com/foaf/0.1/phone";

/// The whole form.
#[derive(Debug, Serialize)]
pub struct FormView {
    /// Human-readable form title.
    pub form_name: String,
    /// The target class the form creates instances of.
    pub target_class: String,
    /// Grouped fields, one fieldset per group.
    pub groups: Vec<GroupView>,
    /// Ungrouped fields.
    pub fields: Vec<FieldView>,
}

/// One `sh:PropertyGroup` fieldset.
#[derive(Debug, Serialize)]
pub struct GroupView {
    /// The fieldset legend.
    pub label: String,
    /// The group's fields.
    pub fields: Vec<FieldView>,
}

/// One property of the form.
#[derive(Debug, Serialize)]
pub struct FieldView {
    /// The property identifier; also the value field name.
    pub id: String,
    /// Display label.
    pub label: String,
    /// `sh:description`, shown next to the label.
    pub description: Option<String>,
    /// `sh:minCount` — entries added on load, remove-button floor.
    pub min_entries: Option<u32>,
    /// `sh:maxCount` — add-button ceiling.
    pub max_entries: Option<u32>,
    /// Whether the user picks the node kind per entry.
    pub choice: bool,
    /// One block per concrete node kind the property permits.
    pub options: Vec<NodeOptionView>,
}

/// One concrete node-kind block inside a field.
#[derive(Debug, Serialize)]
pub struct NodeOptionView {
    /// Short node-kind name; also the radio value.
    pub kind: &'static str,
    /// Whether this option nests further fields instead of an input.
    pub blank: bool,
    /// The input widget (IRI and literal options).
    pub input: Option<InputView>,
    /// Nested fields (blank-node options).
    pub fields: Vec<FieldView>,
}

/// A single input widget with all attributes precomputed.
#[derive(Debug, Serialize)]
pub struct InputView {
    /// Field name (the property identifier).
    pub name: String,
    /// Label repeated for validation messages.
    pub data_label: String,
    /// `<input type=...>`.
    pub input_type: &'static str,
    /// Checkbox semantics (boolean literals).
    pub checkbox: bool,
    /// Prefilled value (`sh:defaultValue` or `sh:hasValue`).
    pub value: Option<String>,
    /// Whether the value is fixed (`sh:hasValue`).
    pub readonly: bool,
    /// `sh:in` choices; a non-empty list renders a select.
    pub select: Vec<SelectOptionView>,
    /// `sh:pattern`.
    pub pattern: Option<String>,
    /// `sh:flags`.
    pub flags: Option<String>,
    /// Lower numeric bound.
    pub min: Option<String>,
    /// Upper numeric bound.
    pub max: Option<String>,
    /// `sh:minLength`.
    pub min_length: Option<u32>,
    /// `sh:maxLength`.
    pub max_length: Option<u32>,
    /// Partner identifier for `sh:equals`.
    pub equals: Option<String>,
    /// Partner identifier for `sh:disjoint`.
    pub disjoint: Option<String>,
    /// Partner identifier for `sh:lessThan`.
    pub less_than: Option<String>,
    /// Partner identifier for `sh:lessThanOrEquals`.
    pub less_than_or_equals: Option<String>,
}

/// One option of a `sh:in` select.
#[derive(Debug, Serialize)]
pub struct SelectOptionView {
    /// The permitted value.
    pub value: String,
    /// Preselected when it matches the default value.
    pub selected: bool,
}

impl FormView {
    /// Builds the view model for a laid-out shape.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::UnassignedId`] when a property carries no
    /// identifier, i.e. the layout pass was not run.
    pub fn from_shape(shape: &FormShape) -> Result<Self, ShapeError> {
        let mut groups = Vec::with_capacity(shape.groups.len());
        for group in &shape.groups {
            groups.push(GroupView {
                label: group
                    .label
                    .clone()
                    .unwrap_or_else(|| vocab::local_name(&group.iri).to_string()),
                fields: fields_of(&group.properties)?,
            });
        }
        Ok(FormView {
            form_name: shape.form_name().to_string(),
            target_class: shape.target_class.clone(),
            groups,
            fields: fields_of(&shape.properties)?,
        })
    }
}

fn fields_of(properties: &[FormProperty]) -> Result<Vec<FieldView>, ShapeError> {
    properties.iter().map(FieldView::from_property).collect()
}

impl FieldView {
    /// Builds the view of one property and its nested fields.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::UnassignedId`] when the property carries no
    /// identifier.
    pub fn from_property(property: &FormProperty) -> Result<Self, ShapeError> {
        let id = property
            .id
            .as_ref()
            .ok_or_else(|| ShapeError::UnassignedId(property.name.clone()))?
            .to_string();
        let kind = property.effective_node_kind();
        let mut options = Vec::new();
        for concrete in kind.options() {
            options.push(NodeOptionView::new(property, &id, *concrete)?);
        }
        Ok(FieldView {
            id,
            label: property.name.clone(),
            description: property.description.clone(),
            min_entries: property.min_count,
            max_entries: property.max_count,
            choice: kind.is_choice(),
            options,
        })
    }
}

impl NodeOptionView {
    fn new(property: &FormProperty, id: &str, concrete: NodeKind) -> Result<Self, ShapeError> {
        let blank = concrete == NodeKind::BlankNode;
        Ok(NodeOptionView {
            kind: concrete.short_name(),
            blank,
            input: if blank {
                None
            } else {
                Some(InputView::new(property, id, concrete))
            },
            fields: if blank {
                fields_of(&property.properties)?
            } else {
                Vec::new()
            },
        })
    }
}

impl InputView {
    fn new(property: &FormProperty, id: &str, concrete: NodeKind) -> Self {
        let value = property
            .has_value
            .clone()
            .or_else(|| property.default_value.clone());
        let select = property
            .in_values
            .iter()
            .map(|permitted| SelectOptionView {
                selected: value.as_deref() == Some(permitted.as_str()),
                value: permitted.clone(),
            })
            .collect();
        InputView {
            name: id.to_string(),
            data_label: property.name.clone(),
            input_type: input_type(property, concrete),
            checkbox: is_checkbox(property, concrete),
            value,
            readonly: property.has_value.is_some(),
            select,
            pattern: property.pattern.clone(),
            flags: property.flags.clone(),
            min: property.min.map(format_bound),
            max: property.max.map(format_bound),
            min_length: property.min_length,
            max_length: property.max_length,
            equals: partner(&property.equals),
            disjoint: partner(&property.disjoint),
            less_than: partner(&property.less_than),
            less_than_or_equals: partner(&property.less_than_or_equals),
        }
    }
}

fn partner(constraint: &Option<PairConstraint>) -> Option<String> {
    constraint
        .as_ref()
        .and_then(|c| c.target.as_ref())
        .map(ToString::to_string)
}

fn is_checkbox(property: &FormProperty, concrete: NodeKind) -> bool {
    concrete == NodeKind::Literal && property.datatype.as_deref() == Some(vocab::XSD_BOOLEAN)
}

/// Picks the HTML input type from the datatype, falling back to
/// well-known predicates for email and phone fields.
fn input_type(property: &FormProperty, concrete: NodeKind) -> &'static str {
    if concrete == NodeKind::Iri {
        return "text";
    }
    match property.datatype.as_deref() {
        Some(vocab::XSD_BOOLEAN) => "checkbox",
        Some(XSD_DATE) => "date",
        Some(XSD_TIME) => "time",
        Some(datatype) if NUMBER_DATATYPES.contains(&datatype) => "number",
        _ => match property.path.as_str() {
            FOAF_MBOX => "email",
            FOAF_PHONE => "tel",
            _ => "text",
        },
    }
}

/// Formats a numeric bound, dropping the fraction when it is whole.
#[allow(clippy::cast_possible_truncation)]
fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        format!("{bound}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use shaclform_shapes::{layout, ShapeReader};

    const VIEW_SHAPE: &str = r#"
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
        sh:nodeKind sh:Literal ;
        sh:in ( "Steve" "Terrence" ) ;
        sh:defaultValue "Steve" ;
    ] ;
    sh:property [
        sh:path ex:likesDogs ;
        sh:order 1 ;
        sh:nodeKind sh:Literal ;
        sh:datatype xsd:boolean ;
    ] ;
    sh:property [
        sh:path ex:gpa ;
        sh:order 2 ;
        sh:nodeKind sh:Literal ;
        sh:datatype xsd:decimal ;
        sh:minInclusive 1 ;
        sh:maxInclusive 7 ;
        sh:lessThan ex:goalGpa ;
    ] ;
    sh:property [
        sh:path ex:goalGpa ;
        sh:order 3 ;
        sh:nodeKind sh:Literal ;
        sh:datatype xsd:decimal ;
    ] ;
    sh:property [
        sh:path schema:address ;
        sh:order 4 ;
        sh:minCount 1 ;
        sh:property [ sh:path schema:streetAddress ; sh:nodeKind sh:Literal ] ;
    ] .
"#;

    fn view() -> FormView {
        let mut reader = ShapeReader::from_turtle(VIEW_SHAPE).expect("fixture parses");
        let mut shape = reader
            .read_shape()
            .expect("fixture reads")
            .expect("fixture contains a shape");
        layout::finalize(&mut shape);
        FormView::from_shape(&shape).expect("view builds")
    }

    fn input_of(view: &FormView, index: usize) -> &InputView {
        view.fields[index].options[0]
            .input
            .as_ref()
            .expect("option has an input")
    }

    #[test]
    fn select_carries_the_preselected_default() {
        let view = view();
        let input = input_of(&view, 0);
        assert_eq!(input.select.len(), 2);
        assert!(input.select[0].selected);
        assert!(!input.select[1].selected);
    }

    #[test]
    fn boolean_literals_render_as_checkboxes() {
        let view = view();
        let input = input_of(&view, 1);
        assert!(input.checkbox);
        assert_eq!(input.input_type, "checkbox");
    }

    #[test]
    fn numeric_bounds_become_min_max_attributes() {
        let view = view();
        let input = input_of(&view, 2);
        assert_eq!(input.input_type, "number");
        assert_eq!(input.min.as_deref(), Some("1"));
        assert_eq!(input.max.as_deref(), Some("7"));
    }

    #[test]
    fn pair_constraints_reference_the_partner_id() {
        let view = view();
        assert_eq!(input_of(&view, 2).less_than.as_deref(), Some("3"));
        assert_eq!(input_of(&view, 2).equals, None);
    }

    #[test]
    fn choice_kinds_offer_one_option_per_constituent() {
        let view = view();
        let address = &view.fields[4];
        assert!(address.choice);
        assert_eq!(address.min_entries, Some(1));
        let kinds: Vec<_> = address.options.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec!["BlankNode", "IRI"]);
        assert_eq!(address.options[0].fields.len(), 1);
        assert_eq!(address.options[0].fields[0].id, "4:0");
        assert!(address.options[1].fields.is_empty());
    }
}
