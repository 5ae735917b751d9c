//! Relationship-constraint inference during decode.
//!
//! The forward blob carries `isComposite` and `reverseAttributeName` as
//! computed at write time. Decode does not trust the composite flag's
//! classification blindly: it re-derives the reciprocal side by scanning
//! the referenced type's stored attributes for a back-pointer at
//! (current type, current attribute).

use crate::codec::{stored_attribute_blobs, AttributeBlob};
use crate::error::Error;
use crate::graph::{TypeGraph, VertexId};
use typegraph_model::{
    element_type_name, is_builtin_type, is_map_type, AttributeConstraint, TypeCategory,
};

/// Re-derive the relationship constraints of one stored attribute.
pub(crate) fn infer_constraints<G: TypeGraph>(
    graph: &G,
    owner_name: &str,
    blob: &AttributeBlob,
) -> Result<Vec<AttributeConstraint>, Error> {
    let mut constraints = Vec::new();

    let reverse = blob.reverse_name();
    if !blob.is_composite && reverse.is_empty() {
        return Ok(constraints);
    }

    let element = element_type_name(&blob.data_type);
    if is_builtin_type(&element) {
        return Ok(constraints);
    }

    // The rejection must fire whether or not a vertex exists for the map
    // name.
    if is_map_type(&element) {
        return Err(Error::UnsupportedConstraint {
            type_name: owner_name.to_owned(),
            attribute: blob.name.clone(),
            data_type: blob.data_type.clone(),
        });
    }

    let Some(referenced) = graph.find_vertex_by_name(&element) else {
        return Ok(constraints);
    };
    if !is_referenceable_vertex(graph, referenced) {
        return Ok(constraints);
    }

    let ref_attribute = find_back_pointer(graph, referenced, &element, owner_name, &blob.name)?;

    if blob.is_composite {
        match ref_attribute {
            Some(name) => constraints.push(AttributeConstraint::mapped_from_ref(name)),
            None => constraints.push(AttributeConstraint::foreign_key()),
        }
    }

    if !reverse.is_empty() {
        constraints.push(AttributeConstraint::foreign_key_cascade());
    }

    Ok(constraints)
}

/// First stored attribute on the referenced type whose data type is the
/// current type and whose declared reverse attribute is the current
/// attribute, in the referenced type's declared order.
fn find_back_pointer<G: TypeGraph>(
    graph: &G,
    referenced: VertexId,
    referenced_name: &str,
    owner_name: &str,
    attribute_name: &str,
) -> Result<Option<String>, Error> {
    let blobs = stored_attribute_blobs(graph, referenced, referenced_name)?;
    Ok(blobs
        .into_iter()
        .find(|b| b.data_type == owner_name && b.reverse_name() == attribute_name)
        .map(|b| b.name))
}

fn is_referenceable_vertex<G: TypeGraph>(graph: &G, vertex: VertexId) -> bool {
    graph
        .vertex_category(vertex)
        .is_some_and(TypeCategory::is_referenceable)
}
