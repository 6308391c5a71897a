//! Form layout: ordering, identifier assignment, and pair linking.
//!
//! The reader produces properties in graph order, which is meaningless.
//! This pass puts the tree into its final, renderable order and stamps
//! every property with the positional [`PropertyId`] that field names,
//! map placeholders, and submissions all share.

use std::cmp::Ordering;

use crate::model::{FormProperty, FormShape, NodeKind, PairConstraint, PropertyId};
use crate::vocab;

/// Finalizes a freshly read shape: appends ignored-property fields for
/// closed shapes, sorts everything by `sh:order`, assigns identifiers,
/// and links paired constraints.
pub fn finalize(shape: &mut FormShape) {
    if shape.closed {
        for path in shape.ignored_properties.clone() {
            let name = vocab::local_name(&path).to_string();
            shape.properties.push(FormProperty {
                path,
                name,
                node_kind: Some(NodeKind::IriOrLiteral),
                ..FormProperty::default()
            });
        }
    }

    shape.groups.sort_by(|a, b| compare_orders(a.order, b.order));
    for group in &mut shape.groups {
        sort_properties(&mut group.properties);
    }
    sort_properties(&mut shape.properties);

    let mut next = 0;
    for group in &mut shape.groups {
        for property in &mut group.properties {
            assign_ids(property, PropertyId::root(next));
            next += 1;
        }
    }
    for property in &mut shape.properties {
        assign_ids(property, PropertyId::root(next));
        next += 1;
    }

    let index = path_index(shape);
    for group in &mut shape.groups {
        for property in &mut group.properties {
            link_pairs(property, &index);
        }
    }
    for property in &mut shape.properties {
        link_pairs(property, &index);
    }
}

/// Ordered properties come first, by their order; unordered properties
/// keep their relative positions at the end.
fn compare_orders(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sort_properties(properties: &mut [FormProperty]) {
    properties.sort_by(|a, b| compare_orders(a.order, b.order));
    for property in properties {
        sort_properties(&mut property.properties);
    }
}

fn assign_ids(property: &mut FormProperty, id: PropertyId) {
    for (index, nested) in property.properties.iter_mut().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        assign_ids(nested, id.child(index as u32));
    }
    property.id = Some(id);
}

/// Builds the path lookup used for pair linking, in canonical traversal
/// order so the first declaration of a path wins.
fn path_index(shape: &FormShape) -> Vec<(String, PropertyId)> {
    let mut index = Vec::new();
    shape.walk(&mut |property| {
        if let Some(id) = &property.id {
            index.push((property.path.clone(), id.clone()));
        }
    });
    index
}

fn lookup(index: &[(String, PropertyId)], path: &str) -> Option<PropertyId> {
    index
        .iter()
        .find(|(candidate, _)| candidate == path)
        .map(|(_, id)| id.clone())
}

fn link_pair(constraint: &mut Option<PairConstraint>, index: &[(String, PropertyId)]) {
    if let Some(constraint) = constraint {
        constraint.target = lookup(index, &constraint.path);
    }
}

fn link_pairs(property: &mut FormProperty, index: &[(String, PropertyId)]) {
    link_pair(&mut property.equals, index);
    link_pair(&mut property.disjoint, index);
    link_pair(&mut property.less_than, index);
    link_pair(&mut property.less_than_or_equals, index);
    for nested in &mut property.properties {
        link_pairs(nested, index);
    }
}
