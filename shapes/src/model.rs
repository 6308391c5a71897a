//! Typed model of a form-generating SHACL shape.
//!
//! The reader produces a [`FormShape`] tree; the layout pass then sorts it,
//! assigns [`PropertyId`]s, and links paired constraints. Rendering and
//! submission handling both navigate this tree (directly, or through the
//! RDF map built from it).

use std::fmt;

use serde::{Serialize, Serializer};

use crate::vocab::{local_name, SH};

/// The six SHACL node kinds.
///
/// The node kind decides which input widgets an entry offers: a concrete
/// kind renders one widget, a choice kind renders a radio selection between
/// its constituents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// `sh:BlankNode` — nested input fields only.
    BlankNode,
    /// `sh:IRI` — a single IRI input.
    Iri,
    /// `sh:Literal` — a single literal input.
    Literal,
    /// `sh:BlankNodeOrIRI` — user chooses between nested fields and an IRI.
    BlankNodeOrIri,
    /// `sh:BlankNodeOrLiteral` — user chooses between nested fields and a literal.
    BlankNodeOrLiteral,
    /// `sh:IRIOrLiteral` — user chooses between an IRI and a literal.
    IriOrLiteral,
}

impl NodeKind {
    /// The short name used in field names, placeholders, and submissions.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            NodeKind::BlankNode => "BlankNode",
            NodeKind::Iri => "IRI",
            NodeKind::Literal => "Literal",
            NodeKind::BlankNodeOrIri => "BlankNodeOrIRI",
            NodeKind::BlankNodeOrLiteral => "BlankNodeOrLiteral",
            NodeKind::IriOrLiteral => "IRIOrLiteral",
        }
    }

    /// The full SHACL IRI of this node kind.
    #[must_use]
    pub fn iri(self) -> String {
        format!("{SH}{}", self.short_name())
    }

    /// Parses a node kind from its full SHACL IRI.
    #[must_use]
    pub fn from_iri(iri: &str) -> Option<Self> {
        Self::from_short_name(iri.strip_prefix(SH)?)
    }

    /// Parses a node kind from its short name.
    #[must_use]
    pub fn from_short_name(name: &str) -> Option<Self> {
        match name {
            "BlankNode" => Some(NodeKind::BlankNode),
            "IRI" => Some(NodeKind::Iri),
            "Literal" => Some(NodeKind::Literal),
            "BlankNodeOrIRI" => Some(NodeKind::BlankNodeOrIri),
            "BlankNodeOrLiteral" => Some(NodeKind::BlankNodeOrLiteral),
            "IRIOrLiteral" => Some(NodeKind::IriOrLiteral),
            _ => None,
        }
    }

    /// Whether this kind requires the user to pick between constituents.
    #[must_use]
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            NodeKind::BlankNodeOrIri | NodeKind::BlankNodeOrLiteral | NodeKind::IriOrLiteral
        )
    }

    /// The concrete kinds an entry of this kind may take.
    #[must_use]
    pub fn options(self) -> &'static [NodeKind] {
        match self {
            NodeKind::BlankNode => &[NodeKind::BlankNode],
            NodeKind::Iri => &[NodeKind::Iri],
            NodeKind::Literal => &[NodeKind::Literal],
            NodeKind::BlankNodeOrIri => &[NodeKind::BlankNode, NodeKind::Iri],
            NodeKind::BlankNodeOrLiteral => &[NodeKind::BlankNode, NodeKind::Literal],
            NodeKind::IriOrLiteral => &[NodeKind::Iri, NodeKind::Literal],
        }
    }

    /// Whether a submitted concrete kind is permitted under this kind.
    #[must_use]
    pub fn allows(self, concrete: NodeKind) -> bool {
        self.options().contains(&concrete)
    }

    /// Whether entries of this kind may carry nested input fields.
    #[must_use]
    pub fn accepts_blank_node(self) -> bool {
        self.allows(NodeKind::BlankNode)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Compound positional identifier of a property.
///
/// Top-level properties receive sequential numbers across grouped-then-
/// ungrouped order (`0`, `1`, …); nested properties append their index
/// under the parent (`3:0`, `3:0:1`). The textual form is what appears in
/// field names and map placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyId(Vec<u32>);

impl PropertyId {
    /// A top-level identifier.
    #[must_use]
    pub fn root(index: u32) -> Self {
        PropertyId(vec![index])
    }

    /// The identifier of the `index`-th child under `self`.
    #[must_use]
    pub fn child(&self, index: u32) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        PropertyId(segments)
    }

    /// The final segment: the property's index among its siblings.
    #[must_use]
    pub fn local(&self) -> u32 {
        self.0.last().copied().unwrap_or(0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                f.write_str(":")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for PropertyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A paired-property constraint (`sh:equals`, `sh:disjoint`, `sh:lessThan`,
/// `sh:lessThanOrEquals`).
///
/// The reader records the partner's path; the layout pass resolves it to
/// the partner's [`PropertyId`] when a property with that path exists
/// anywhere in the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairConstraint {
    /// The partner property's `sh:path`.
    pub path: String,
    /// The partner's identifier, once linked.
    pub target: Option<PropertyId>,
}

impl PairConstraint {
    /// A constraint that has not been linked yet.
    #[must_use]
    pub fn unlinked(path: String) -> Self {
        PairConstraint { path, target: None }
    }
}

/// One property of the shape: a single form field (or, for blank-node
/// properties, a nested block of fields).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FormProperty {
    /// Positional identifier; assigned by the layout pass.
    pub id: Option<PropertyId>,
    /// `sh:path` — the predicate submitted values are stored under.
    pub path: String,
    /// `sh:name`, falling back to the path's local name.
    pub name: String,
    /// `sh:description`.
    pub description: Option<String>,
    /// `sh:order`; unordered properties sort last.
    pub order: Option<f64>,
    /// Effective node kind after inference and validation.
    pub node_kind: Option<NodeKind>,
    /// `sh:datatype` IRI.
    pub datatype: Option<String>,
    /// `sh:minCount`.
    pub min_count: Option<u32>,
    /// `sh:maxCount`.
    pub max_count: Option<u32>,
    /// Lower bound, consolidated from `sh:minInclusive`/`sh:minExclusive`.
    pub min: Option<f64>,
    /// Upper bound, consolidated from `sh:maxInclusive`/`sh:maxExclusive`.
    pub max: Option<f64>,
    /// `sh:minLength`.
    pub min_length: Option<u32>,
    /// `sh:maxLength`.
    pub max_length: Option<u32>,
    /// `sh:pattern`.
    pub pattern: Option<String>,
    /// `sh:flags` for the pattern.
    pub flags: Option<String>,
    /// `sh:in` — permitted values, rendered as a selection.
    pub in_values: Vec<String>,
    /// `sh:languageIn` — permitted language tags.
    pub language_in: Vec<String>,
    /// `sh:defaultValue`.
    pub default_value: Option<String>,
    /// `sh:hasValue` — fixes the field to one value.
    pub has_value: Option<String>,
    /// `sh:equals`.
    pub equals: Option<PairConstraint>,
    /// `sh:disjoint`.
    pub disjoint: Option<PairConstraint>,
    /// `sh:lessThan`.
    pub less_than: Option<PairConstraint>,
    /// `sh:lessThanOrEquals`.
    pub less_than_or_equals: Option<PairConstraint>,
    /// Nested `sh:property` shapes.
    pub properties: Vec<FormProperty>,
}

impl FormProperty {
    /// The effective node kind.
    ///
    /// The reader always sets one; a freshly constructed property defaults
    /// to [`NodeKind::IriOrLiteral`].
    #[must_use]
    pub fn effective_node_kind(&self) -> NodeKind {
        self.node_kind.unwrap_or(NodeKind::IriOrLiteral)
    }

    /// Walks this property and its descendants, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a FormProperty)) {
        visit(self);
        for nested in &self.properties {
            nested.walk(visit);
        }
    }
}

/// A `sh:PropertyGroup` and the properties assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyGroup {
    /// The group's IRI.
    pub iri: String,
    /// `rdfs:label`.
    pub label: Option<String>,
    /// `sh:order`; unordered groups sort last.
    pub order: Option<f64>,
    /// Properties referencing this group via `sh:group`.
    pub properties: Vec<FormProperty>,
}

/// The root node shape, decomposed for form generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormShape {
    /// `sh:targetClass` (or the shape itself for implicit class targets).
    pub target_class: String,
    /// `sh:closed`.
    pub closed: bool,
    /// `sh:ignoredProperties` paths (closed shapes only).
    pub ignored_properties: Vec<String>,
    /// Grouped properties, in group order after layout.
    pub groups: Vec<PropertyGroup>,
    /// Ungrouped properties.
    pub properties: Vec<FormProperty>,
}

impl FormShape {
    /// A human-readable form name: the local name of the target class.
    #[must_use]
    pub fn form_name(&self) -> &str {
        let name = local_name(&self.target_class);
        if name.is_empty() {
            "Entry"
        } else {
            name
        }
    }

    /// Walks every property in the shape — grouped first, then ungrouped,
    /// each depth first. This is the canonical traversal order used for ID
    /// assignment and pair linking.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a FormProperty)) {
        for group in &self.groups {
            for property in &group.properties {
                property.walk(visit);
            }
        }
        for property in &self.properties {
            property.walk(visit);
        }
    }

    /// Iterates over all top-level properties, grouped first.
    pub fn top_level(&self) -> impl Iterator<Item = &FormProperty> {
        self.groups
            .iter()
            .flat_map(|g| g.properties.iter())
            .chain(self.properties.iter())
    }
}

/// A non-fatal problem found while reading a shape.
///
/// The reader collects these instead of logging so that callers decide how
/// to surface them (the binaries log them through `tracing`).
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeWarning {
    /// `sh:nodeKind` carried a value outside the six SHACL node kinds.
    InvalidNodeKind {
        /// Property name.
        property: String,
        /// The value found in the shape.
        given: String,
        /// The inferred replacement.
        replacement: NodeKind,
    },
    /// `sh:nodeKind` was a choice kind although `sh:hasValue` fixes the value.
    NodeKindIncompatibleWithHasValue {
        /// Property name.
        property: String,
        /// The declared choice kind.
        given: NodeKind,
        /// The concrete kind it was narrowed to.
        replacement: NodeKind,
    },
    /// A blank-node-accepting kind was declared without nested properties.
    MissingNestedProperties {
        /// Property name.
        property: String,
        /// The declared node kind.
        node_kind: NodeKind,
    },
    /// Nested properties were declared under a kind that cannot use them.
    IgnoredNestedProperties {
        /// Property name.
        property: String,
        /// The declared node kind.
        node_kind: NodeKind,
    },
}

impl fmt::Display for ShapeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeWarning::InvalidNodeKind {
                property,
                given,
                replacement,
            } => write!(
                f,
                "property \"{property}\" has constraint sh:nodeKind with invalid value \
                 \"{given}\"; replacing with \"{}\"",
                replacement.iri()
            ),
            ShapeWarning::NodeKindIncompatibleWithHasValue {
                property,
                given,
                replacement,
            } => write!(
                f,
                "property \"{property}\" has constraint sh:nodeKind with value \"{}\" which \
                 is incompatible with constraint sh:hasValue; replacing with \"{}\"",
                given.iri(),
                replacement.iri()
            ),
            ShapeWarning::MissingNestedProperties {
                property,
                node_kind,
            } => {
                if node_kind.is_choice() {
                    write!(
                        f,
                        "property \"{property}\" has constraint sh:nodeKind with value \"{}\" \
                         but no property shapes are provided; if the user selects the blank \
                         node option, this property will have no input fields",
                        node_kind.iri()
                    )
                } else {
                    write!(
                        f,
                        "property \"{property}\" has constraint sh:nodeKind with value \
                         \"sh:BlankNode\" but no property shapes are provided; this property \
                         will have no input fields"
                    )
                }
            }
            ShapeWarning::IgnoredNestedProperties {
                property,
                node_kind,
            } => write!(
                f,
                "property \"{property}\" has constraint sh:nodeKind with value \"{}\"; the \
                 property shapes provided in this property will be ignored",
                node_kind.iri()
            ),
        }
    }
}
