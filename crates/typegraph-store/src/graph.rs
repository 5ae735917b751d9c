//! Graph-storage collaborator contract and an in-memory implementation.
//!
//! The store persists each struct definition as one vertex and each type
//! reference as one labeled edge. Durability, indexing, and transactional
//! isolation are the implementation's concern; the store performs no
//! locking or retries of its own.

use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use typegraph_model::TypeCategory;
use uuid::Uuid;

/// Opaque handle to a vertex in the type graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(u64);

/// Property-graph operations consumed by the struct-definition store.
pub trait TypeGraph {
    /// Find a type vertex by its type name.
    fn find_vertex_by_name(&self, name: &str) -> Option<VertexId>;

    /// Find a type vertex by its guid.
    fn find_vertex_by_guid(&self, guid: &str) -> Option<VertexId>;

    /// All vertices tagged with the given category.
    fn vertices_by_category(&self, category: TypeCategory) -> Vec<VertexId>;

    /// Create a type vertex; a fresh guid is assigned when `guid` is
    /// `None`.
    fn create_vertex(&self, name: &str, category: TypeCategory, guid: Option<&str>) -> VertexId;

    /// Remove a vertex and every edge touching it.
    fn delete_vertex(&self, vertex: VertexId);

    /// Remove all outgoing edges of a vertex.
    fn delete_out_edges(&self, vertex: VertexId);

    /// Create the labeled edge if it does not already exist.
    fn get_or_create_edge(&self, from: VertexId, to: VertexId, label: &str);

    /// The type name stored on a vertex.
    fn vertex_name(&self, vertex: VertexId) -> Option<String>;

    /// The guid stored on a vertex.
    fn vertex_guid(&self, vertex: VertexId) -> Option<String>;

    /// The category tag stored on a vertex.
    fn vertex_category(&self, vertex: VertexId) -> Option<TypeCategory>;

    /// Whether the vertex carries the given category tag.
    fn is_vertex_of_category(&self, vertex: VertexId, category: TypeCategory) -> bool {
        self.vertex_category(vertex) == Some(category)
    }

    /// Read a string-valued property.
    fn string_property(&self, vertex: VertexId, key: &str) -> Option<String>;

    /// Write a string-valued property, overwriting any previous value.
    fn set_string_property(&self, vertex: VertexId, key: &str, value: &str);

    /// Remove a string-valued property.
    fn remove_string_property(&self, vertex: VertexId, key: &str);

    /// Read a string-list-valued property.
    fn string_list_property(&self, vertex: VertexId, key: &str) -> Option<Vec<String>>;

    /// Write a string-list-valued property, overwriting any previous
    /// value.
    fn set_string_list_property(&self, vertex: VertexId, key: &str, values: &[String]);
}

struct VertexData {
    name: String,
    guid: String,
    category: TypeCategory,
    string_props: HashMap<String, String>,
    list_props: HashMap<String, Vec<String>>,
    out_edges: BTreeSet<(String, VertexId)>,
}

#[derive(Default)]
struct GraphInner {
    next_id: u64,
    vertices: HashMap<VertexId, VertexData>,
    by_name: HashMap<String, VertexId>,
    by_guid: HashMap<String, VertexId>,
}

/// In-memory type graph for tests and embedded use.
#[derive(Default)]
pub struct MemoryTypeGraph {
    inner: RwLock<GraphInner>,
}

impl MemoryTypeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.inner.read().vertices.len()
    }

    /// `(label, target)` pairs of the vertex's outgoing edges, in label
    /// order.
    pub fn out_edges(&self, vertex: VertexId) -> Vec<(String, VertexId)> {
        self.inner
            .read()
            .vertices
            .get(&vertex)
            .map(|v| v.out_edges.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether the labeled edge exists.
    pub fn has_edge(&self, from: VertexId, to: VertexId, label: &str) -> bool {
        self.inner
            .read()
            .vertices
            .get(&from)
            .is_some_and(|v| v.out_edges.contains(&(label.to_owned(), to)))
    }
}

impl TypeGraph for MemoryTypeGraph {
    fn find_vertex_by_name(&self, name: &str) -> Option<VertexId> {
        self.inner.read().by_name.get(name).copied()
    }

    fn find_vertex_by_guid(&self, guid: &str) -> Option<VertexId> {
        self.inner.read().by_guid.get(guid).copied()
    }

    fn vertices_by_category(&self, category: TypeCategory) -> Vec<VertexId> {
        let inner = self.inner.read();
        let mut vertices: Vec<VertexId> = inner
            .vertices
            .iter()
            .filter(|(_, data)| data.category == category)
            .map(|(id, _)| *id)
            .collect();
        vertices.sort();
        vertices
    }

    fn create_vertex(&self, name: &str, category: TypeCategory, guid: Option<&str>) -> VertexId {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let id = VertexId(inner.next_id);
        let guid = guid
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        inner.by_name.insert(name.to_owned(), id);
        inner.by_guid.insert(guid.clone(), id);
        inner.vertices.insert(
            id,
            VertexData {
                name: name.to_owned(),
                guid,
                category,
                string_props: HashMap::new(),
                list_props: HashMap::new(),
                out_edges: BTreeSet::new(),
            },
        );
        id
    }

    fn delete_vertex(&self, vertex: VertexId) {
        let mut inner = self.inner.write();
        if let Some(data) = inner.vertices.remove(&vertex) {
            inner.by_name.remove(&data.name);
            inner.by_guid.remove(&data.guid);
        }
        for data in inner.vertices.values_mut() {
            data.out_edges.retain(|(_, target)| *target != vertex);
        }
    }

    fn delete_out_edges(&self, vertex: VertexId) {
        let mut inner = self.inner.write();
        if let Some(data) = inner.vertices.get_mut(&vertex) {
            data.out_edges.clear();
        }
    }

    fn get_or_create_edge(&self, from: VertexId, to: VertexId, label: &str) {
        let mut inner = self.inner.write();
        if let Some(data) = inner.vertices.get_mut(&from) {
            data.out_edges.insert((label.to_owned(), to));
        }
    }

    fn vertex_name(&self, vertex: VertexId) -> Option<String> {
        self.inner.read().vertices.get(&vertex).map(|v| v.name.clone())
    }

    fn vertex_guid(&self, vertex: VertexId) -> Option<String> {
        self.inner.read().vertices.get(&vertex).map(|v| v.guid.clone())
    }

    fn vertex_category(&self, vertex: VertexId) -> Option<TypeCategory> {
        self.inner.read().vertices.get(&vertex).map(|v| v.category)
    }

    fn string_property(&self, vertex: VertexId, key: &str) -> Option<String> {
        self.inner
            .read()
            .vertices
            .get(&vertex)
            .and_then(|v| v.string_props.get(key).cloned())
    }

    fn set_string_property(&self, vertex: VertexId, key: &str, value: &str) {
        let mut inner = self.inner.write();
        if let Some(data) = inner.vertices.get_mut(&vertex) {
            data.string_props.insert(key.to_owned(), value.to_owned());
        }
    }

    fn remove_string_property(&self, vertex: VertexId, key: &str) {
        let mut inner = self.inner.write();
        if let Some(data) = inner.vertices.get_mut(&vertex) {
            data.string_props.remove(key);
        }
    }

    fn string_list_property(&self, vertex: VertexId, key: &str) -> Option<Vec<String>> {
        self.inner
            .read()
            .vertices
            .get(&vertex)
            .and_then(|v| v.list_props.get(key).cloned())
    }

    fn set_string_list_property(&self, vertex: VertexId, key: &str, values: &[String]) {
        let mut inner = self.inner.write();
        if let Some(data) = inner.vertices.get_mut(&vertex) {
            data.list_props.insert(key.to_owned(), values.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_find() {
        let graph = MemoryTypeGraph::new();
        let vertex = graph.create_vertex("Person", TypeCategory::Struct, None);

        assert_eq!(graph.find_vertex_by_name("Person"), Some(vertex));
        assert_eq!(graph.vertex_name(vertex), Some("Person".to_owned()));
        assert!(graph.is_vertex_of_category(vertex, TypeCategory::Struct));
        assert!(!graph.is_vertex_of_category(vertex, TypeCategory::Entity));

        let guid = graph.vertex_guid(vertex).unwrap();
        assert_eq!(graph.find_vertex_by_guid(&guid), Some(vertex));
    }

    #[test]
    fn test_explicit_guid_is_kept() {
        let graph = MemoryTypeGraph::new();
        let vertex = graph.create_vertex("Person", TypeCategory::Struct, Some("g-1"));

        assert_eq!(graph.vertex_guid(vertex), Some("g-1".to_owned()));
        assert_eq!(graph.find_vertex_by_guid("g-1"), Some(vertex));
    }

    #[test]
    fn test_edge_creation_is_idempotent() {
        let graph = MemoryTypeGraph::new();
        let a = graph.create_vertex("A", TypeCategory::Struct, None);
        let b = graph.create_vertex("B", TypeCategory::Struct, None);

        graph.get_or_create_edge(a, b, "__type.A.b");
        graph.get_or_create_edge(a, b, "__type.A.b");

        assert_eq!(graph.out_edges(a).len(), 1);
        assert!(graph.has_edge(a, b, "__type.A.b"));
    }

    #[test]
    fn test_delete_vertex_removes_inbound_edges() {
        let graph = MemoryTypeGraph::new();
        let a = graph.create_vertex("A", TypeCategory::Struct, None);
        let b = graph.create_vertex("B", TypeCategory::Struct, None);
        graph.get_or_create_edge(a, b, "__type.A.b");

        graph.delete_vertex(b);

        assert_eq!(graph.vertex_count(), 1);
        assert!(graph.find_vertex_by_name("B").is_none());
        assert!(graph.out_edges(a).is_empty());
    }

    #[test]
    fn test_properties_roundtrip() {
        let graph = MemoryTypeGraph::new();
        let vertex = graph.create_vertex("Person", TypeCategory::Struct, None);

        graph.set_string_property(vertex, "k", "v");
        assert_eq!(graph.string_property(vertex, "k"), Some("v".to_owned()));

        graph.set_string_property(vertex, "k", "v2");
        assert_eq!(graph.string_property(vertex, "k"), Some("v2".to_owned()));

        graph.remove_string_property(vertex, "k");
        assert_eq!(graph.string_property(vertex, "k"), None);

        graph.set_string_list_property(vertex, "l", &["a".to_owned(), "b".to_owned()]);
        assert_eq!(
            graph.string_list_property(vertex, "l"),
            Some(vec!["a".to_owned(), "b".to_owned()])
        );
    }

    #[test]
    fn test_vertices_by_category() {
        let graph = MemoryTypeGraph::new();
        graph.create_vertex("A", TypeCategory::Struct, None);
        graph.create_vertex("B", TypeCategory::Entity, None);
        graph.create_vertex("C", TypeCategory::Struct, None);

        assert_eq!(graph.vertices_by_category(TypeCategory::Struct).len(), 2);
        assert_eq!(graph.vertices_by_category(TypeCategory::Entity).len(), 1);
        assert!(graph.vertices_by_category(TypeCategory::Enum).is_empty());
    }
}
