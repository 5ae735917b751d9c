//! Reference-edge materialization for struct definitions.
//!
//! Every non-built-in type name appearing in an attribute's declared type
//! becomes a labeled edge from the owning type's vertex to the referenced
//! type's vertex, so type-dependency queries can traverse the graph
//! without re-parsing attribute blobs.

use crate::error::Error;
use crate::graph::{TypeGraph, VertexId};
use typegraph_model::{referenced_type_names, StructDef};

/// Label of the reference edge created for `(type, attribute)`.
pub fn reference_edge_label(type_name: &str, attribute: &str) -> String {
    format!("__type.{type_name}.{attribute}")
}

/// Resolve the full reference-edge set of a definition.
///
/// Every referenced type is resolved before any edge is created, so a
/// missing reference fails the operation with the graph untouched.
pub(crate) fn resolve_reference_edges<G: TypeGraph>(
    graph: &G,
    def: &StructDef,
) -> Result<Vec<(String, VertexId)>, Error> {
    let mut edges = Vec::new();
    for attribute in &def.attributes {
        for referenced in referenced_type_names(&attribute.type_name) {
            let target = graph
                .find_vertex_by_name(&referenced)
                .ok_or(Error::UnknownReferencedType(referenced))?;
            edges.push((reference_edge_label(&def.name, &attribute.name), target));
        }
    }
    Ok(edges)
}

/// Create the resolved edges; repeated application converges to the same
/// edge set.
pub(crate) fn apply_reference_edges<G: TypeGraph>(
    graph: &G,
    owner: VertexId,
    edges: &[(String, VertexId)],
) {
    for (label, target) in edges {
        graph.get_or_create_edge(owner, *target, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryTypeGraph;
    use typegraph_model::{AttributeDef, TypeCategory};

    #[test]
    fn test_resolve_collects_nested_references() {
        let graph = MemoryTypeGraph::new();
        let owner = graph.create_vertex("Owner", TypeCategory::Struct, None);
        let address = graph.create_vertex("Address", TypeCategory::Struct, None);
        let tag = graph.create_vertex("Tag", TypeCategory::Struct, None);

        let def = StructDef::new("Owner")
            .with_attribute(AttributeDef::new("name", "string"))
            .with_attribute(AttributeDef::new("addresses", "array<Address>"))
            .with_attribute(AttributeDef::new("tags", "map<string,Tag>"));

        let edges = resolve_reference_edges(&graph, &def).unwrap();
        assert_eq!(edges.len(), 2);

        apply_reference_edges(&graph, owner, &edges);
        assert!(graph.has_edge(owner, address, &reference_edge_label("Owner", "addresses")));
        assert!(graph.has_edge(owner, tag, &reference_edge_label("Owner", "tags")));
    }

    #[test]
    fn test_missing_reference_fails_before_any_edge() {
        let graph = MemoryTypeGraph::new();
        let owner = graph.create_vertex("Owner", TypeCategory::Struct, None);
        graph.create_vertex("Address", TypeCategory::Struct, None);

        let def = StructDef::new("Owner")
            .with_attribute(AttributeDef::new("address", "Address"))
            .with_attribute(AttributeDef::new("phantom", "Phantom"));

        let err = resolve_reference_edges(&graph, &def).unwrap_err();
        assert_eq!(err, Error::UnknownReferencedType("Phantom".to_owned()));
        assert!(graph.out_edges(owner).is_empty());
    }

    #[test]
    fn test_repeated_application_is_idempotent() {
        let graph = MemoryTypeGraph::new();
        let owner = graph.create_vertex("Owner", TypeCategory::Struct, None);
        graph.create_vertex("Address", TypeCategory::Struct, None);

        let def = StructDef::new("Owner")
            .with_attribute(AttributeDef::new("address", "Address"));

        let edges = resolve_reference_edges(&graph, &def).unwrap();
        apply_reference_edges(&graph, owner, &edges);
        apply_reference_edges(&graph, owner, &edges);

        assert_eq!(graph.out_edges(owner).len(), 1);
    }
}
