//! Reads a form description out of a SHACL shapes graph.
//!
//! The only shapes of interest are node shapes: they carry the properties
//! and constraints of the node the form will create. Property shapes are
//! read recursively through `sh:property`; `sh:node` references are
//! flattened into their referent, both at the root and inside property
//! shapes. Constraints are matched by the local name of their predicate,
//! so `sh:name` and any other vocabulary's `name` read the same way the
//! original shapes intend.

use std::path::Path;

use sophia::api::prelude::*;
use sophia::api::term::SimpleTerm;
use sophia::inmem::graph::FastGraph;

use crate::error::ShapeError;
use crate::graph;
use crate::model::{FormProperty, FormShape, NodeKind, PairConstraint, PropertyGroup, ShapeWarning};
use crate::vocab;

/// Reads shapes graphs and accumulates non-fatal warnings.
#[derive(Debug)]
pub struct ShapeReader {
    graph: FastGraph,
    warnings: Vec<ShapeWarning>,
}

impl ShapeReader {
    /// Parses a Turtle document.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::Parse`] when the document is not valid Turtle.
    pub fn from_turtle(source: &str) -> Result<Self, ShapeError> {
        Ok(ShapeReader {
            graph: graph::parse_turtle(source)?,
            warnings: Vec::new(),
        })
    }

    /// Parses an N-Triples document.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::Parse`] when the document is not valid N-Triples.
    pub fn from_ntriples(source: &str) -> Result<Self, ShapeError> {
        Ok(ShapeReader {
            graph: graph::parse_ntriples(source)?,
            warnings: Vec::new(),
        })
    }

    /// Reads a shapes file, choosing the parser by extension (`.nt` for
    /// N-Triples, Turtle otherwise).
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::Io`] when the file cannot be read and
    /// [`ShapeError::Parse`] when its content does not parse.
    pub fn from_path(path: &Path) -> Result<Self, ShapeError> {
        let source = std::fs::read_to_string(path).map_err(|source| ShapeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "nt") {
            Self::from_ntriples(&source)
        } else {
            Self::from_turtle(&source)
        }
    }

    /// The warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[ShapeWarning] {
        &self.warnings
    }

    /// Extracts the root node shape, or `None` when the graph declares no
    /// node shape at all.
    ///
    /// The root is the node shape that is not the object of any `sh:node`
    /// triple; shapes referenced through `sh:node` are constraint
    /// fragments, not form roots.
    ///
    /// # Errors
    ///
    /// Fails when every node shape is a `sh:node` referent (a cycle), when
    /// the root has no target class, when a property lacks `sh:path` or
    /// references an undeclared group, or when a numeric constraint does
    /// not parse.
    pub fn read_shape(&mut self) -> Result<Option<FormShape>, ShapeError> {
        let rdf_type = vocab::rdf("type");
        let sh_node = vocab::sh("node");

        let shape_iris =
            graph::subjects_with(&self.graph, &rdf_type, &vocab::sh("NodeShape"));
        if shape_iris.is_empty() {
            return Ok(None);
        }
        let root = shape_iris
            .iter()
            .find(|candidate| !graph::has_subject(&self.graph, &sh_node, candidate))
            .cloned()
            .ok_or(ShapeError::CyclicNodeReferences)?;

        // Fold sh:node referents of the root into the root itself, at all
        // depths; referents inside property shapes are handled per property.
        for node in graph::objects(&self.graph, &root, &sh_node) {
            self.merge_node(&root, &node);
        }

        let target_class = self.read_target_class(&root)?;
        let closed = graph::value(&self.graph, &root, &vocab::sh("closed"))
            .is_some_and(|flag| graph::term_text(&flag) == "true");
        let ignored_properties = if closed {
            graph::value(&self.graph, &root, &vocab::sh("ignoredProperties"))
                .map(|head| graph::collection_texts(&self.graph, &head))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let mut groups = self.read_groups()?;
        let mut ungrouped = Vec::new();

        let sh_group = vocab::sh("group");
        for property_iri in graph::objects(&self.graph, &root, &vocab::sh("property")) {
            let property = self.read_property(&property_iri)?;
            match graph::value(&self.graph, &property_iri, &sh_group) {
                Some(group_ref) => {
                    let group_iri = graph::term_text(&group_ref);
                    let group = groups
                        .iter_mut()
                        .find(|g| g.iri == group_iri)
                        .ok_or_else(|| ShapeError::UnknownGroup {
                            property: graph::term_text(&property_iri),
                            group: group_iri.clone(),
                        })?;
                    group.properties.push(property);
                }
                None => ungrouped.push(property),
            }
        }

        Ok(Some(FormShape {
            target_class,
            closed,
            ignored_properties,
            groups,
            properties: ungrouped,
        }))
    }

    /// Copies everything attached to `node` onto `root`, recursing through
    /// nested `sh:node` links.
    fn merge_node(&mut self, root: &SimpleTerm<'static>, node: &SimpleTerm<'static>) {
        let sh_node = vocab::sh("node");
        for (predicate, object) in graph::predicate_objects(&self.graph, node) {
            if Term::eq(&predicate, &sh_node) {
                self.merge_node(root, &object);
            }
            graph::insert(&mut self.graph, root, &predicate, &object);
        }
    }

    /// Determines the target class: implicit (the shape is itself an
    /// `rdfs:Class`) or explicit via `sh:targetClass`.
    fn read_target_class(&self, root: &SimpleTerm<'static>) -> Result<String, ShapeError> {
        if graph::has_triple(&self.graph, root, &vocab::rdf("type"), &vocab::rdfs("Class")) {
            return Ok(graph::term_text(root));
        }
        graph::value(&self.graph, root, &vocab::sh("targetClass"))
            .map(|class| graph::term_text(&class))
            .ok_or_else(|| ShapeError::MissingTargetClass(graph::term_text(root)))
    }

    /// Reads every declared `sh:PropertyGroup`.
    fn read_groups(&self) -> Result<Vec<PropertyGroup>, ShapeError> {
        let mut groups = Vec::new();
        for iri in graph::subjects_with(
            &self.graph,
            &vocab::rdf("type"),
            &vocab::sh("PropertyGroup"),
        ) {
            let label = graph::value(&self.graph, &iri, &vocab::rdfs("label"))
                .map(|term| graph::term_text(&term));
            let order = graph::value(&self.graph, &iri, &vocab::sh("order"))
                .map(|term| parse_numeric("order", &term))
                .transpose()?;
            groups.push(PropertyGroup {
                iri: graph::term_text(&iri),
                label,
                order,
                properties: Vec::new(),
            });
        }
        Ok(groups)
    }

    /// Reads a single property shape, recursing into nested `sh:property`
    /// shapes and flattening `sh:node` references one level deep.
    fn read_property(
        &mut self,
        iri: &SimpleTerm<'static>,
    ) -> Result<FormProperty, ShapeError> {
        let mut pairs = graph::predicate_objects(&self.graph, iri);
        for (predicate, object) in pairs.clone() {
            if vocab::local_name(&graph::term_text(&predicate)) == "node" {
                pairs.extend(graph::predicate_objects(&self.graph, &object));
            }
        }

        let mut property = FormProperty::default();
        let mut path = None;
        let mut declared_name = None;
        let mut node_kind_raw = None;

        for (predicate, object) in pairs {
            let predicate_iri = graph::term_text(&predicate);
            let text = || graph::term_text(&object);
            match vocab::local_name(&predicate_iri) {
                "path" => path = Some(text()),
                "name" => declared_name = Some(text()),
                "description" => property.description = Some(text()),
                "order" => property.order = Some(parse_numeric("order", &object)?),
                "datatype" => property.datatype = Some(text()),
                "nodeKind" => node_kind_raw = Some(text()),
                "minCount" => property.min_count = Some(parse_integer("minCount", &object)?),
                "maxCount" => property.max_count = Some(parse_integer("maxCount", &object)?),
                "minLength" => property.min_length = Some(parse_integer("minLength", &object)?),
                "maxLength" => property.max_length = Some(parse_integer("maxLength", &object)?),
                "minInclusive" => {
                    property.min = Some(parse_numeric("minInclusive", &object)?);
                }
                "minExclusive" => {
                    property.min = Some(parse_numeric("minExclusive", &object)? + 1.0);
                }
                "maxInclusive" => {
                    property.max = Some(parse_numeric("maxInclusive", &object)?);
                }
                "maxExclusive" => {
                    property.max = Some(parse_numeric("maxExclusive", &object)? - 1.0);
                }
                "pattern" => property.pattern = Some(text()),
                "flags" => property.flags = Some(text()),
                "in" => property.in_values = graph::collection_texts(&self.graph, &object),
                "languageIn" => {
                    property.language_in = graph::collection_texts(&self.graph, &object);
                }
                "defaultValue" => property.default_value = Some(text()),
                "hasValue" => property.has_value = Some(text()),
                "equals" => property.equals = Some(PairConstraint::unlinked(text())),
                "disjoint" => property.disjoint = Some(PairConstraint::unlinked(text())),
                "lessThan" => property.less_than = Some(PairConstraint::unlinked(text())),
                "lessThanOrEquals" => {
                    property.less_than_or_equals = Some(PairConstraint::unlinked(text()));
                }
                "property" => property.properties.push(self.read_property(&object)?),
                _ => {}
            }
        }

        property.path = path.ok_or_else(|| ShapeError::MissingPath(graph::term_text(iri)))?;
        property.name =
            declared_name.unwrap_or_else(|| vocab::local_name(&property.path).to_string());
        property.node_kind = Some(self.resolve_node_kind(&property, node_kind_raw));
        Ok(property)
    }

    /// Infers or validates the node kind, recording at most one warning
    /// (later findings supersede earlier ones, matching the precedence of
    /// the checks).
    fn resolve_node_kind(
        &mut self,
        property: &FormProperty,
        declared: Option<String>,
    ) -> NodeKind {
        let has_nested = !property.properties.is_empty();
        let inferred = if property.has_value.is_some() {
            NodeKind::Literal
        } else if has_nested {
            NodeKind::BlankNodeOrIri
        } else {
            NodeKind::IriOrLiteral
        };

        let Some(raw) = declared else {
            return inferred;
        };

        let mut warning = None;
        let resolved = match NodeKind::from_iri(&raw) {
            None => {
                warning = Some(ShapeWarning::InvalidNodeKind {
                    property: property.name.clone(),
                    given: raw,
                    replacement: inferred,
                });
                inferred
            }
            Some(kind) => {
                let mut kind = kind;
                if property.has_value.is_some() && kind.is_choice() {
                    let narrowed = if kind == NodeKind::BlankNodeOrIri {
                        NodeKind::Iri
                    } else {
                        NodeKind::Literal
                    };
                    warning = Some(ShapeWarning::NodeKindIncompatibleWithHasValue {
                        property: property.name.clone(),
                        given: kind,
                        replacement: narrowed,
                    });
                    kind = narrowed;
                }
                if kind.accepts_blank_node() && !has_nested {
                    warning = Some(ShapeWarning::MissingNestedProperties {
                        property: property.name.clone(),
                        node_kind: kind,
                    });
                } else if !kind.accepts_blank_node() && has_nested {
                    warning = Some(ShapeWarning::IgnoredNestedProperties {
                        property: property.name.clone(),
                        node_kind: kind,
                    });
                }
                kind
            }
        };
        if let Some(warning) = warning {
            self.warnings.push(warning);
        }
        resolved
    }
}

/// Parses an integer-valued constraint.
fn parse_integer(constraint: &str, term: &SimpleTerm<'_>) -> Result<u32, ShapeError> {
    let value = graph::term_text(term);
    value
        .parse()
        .map_err(|_| ShapeError::IntegerConstraint {
            constraint: constraint.to_string(),
            value,
        })
}

/// Parses a numeric constraint.
fn parse_numeric(constraint: &str, term: &SimpleTerm<'_>) -> Result<f64, ShapeError> {
    let value = graph::term_text(term);
    value
        .parse()
        .map_err(|_| ShapeError::NumericConstraint {
            constraint: constraint.to_string(),
            value,
        })
}
