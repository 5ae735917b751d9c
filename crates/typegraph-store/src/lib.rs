//! Typegraph store - graph-backed persistence for struct type
//! definitions.
//!
//! Struct definitions are persisted as vertices in a property graph: one
//! vertex per type, one JSON property per attribute, and one labeled edge
//! per referenced type. On read, attribute properties are decoded back
//! into definitions and relationship constraints (foreign key, composite
//! ownership, cascade delete) are re-derived by cross-referencing the
//! referenced type's stored attributes.
//!
//! # Modules
//!
//! - [`store`] - The struct-definition store and its operations
//! - [`graph`] - Graph-storage collaborator trait and in-memory implementation
//! - [`registry`] - Type-registry collaborator trait and in-memory implementation
//! - [`search`] - Parameter-based search filtering
//! - [`error`] - Store error types
//!
//! # Example
//!
//! ```
//! use typegraph_model::{AttributeDef, StructDef};
//! use typegraph_store::{MemoryTypeGraph, MemoryTypeRegistry, StructDefStore};
//!
//! let graph = MemoryTypeGraph::new();
//! let mut registry = MemoryTypeRegistry::new();
//!
//! let person = StructDef::new("Person")
//!     .with_attribute(AttributeDef::new("name", "string"))
//!     .with_attribute(AttributeDef::optional("age", "int"));
//! registry.register_struct(person.clone());
//!
//! let store = StructDefStore::new(&graph, &registry);
//! let created = store.create(&person, None).unwrap();
//! assert!(created.guid.is_some());
//! ```

pub mod error;
pub mod graph;
pub mod registry;
pub mod resolver;
pub mod search;
pub mod store;

mod codec;
mod infer;

pub use error::Error;
pub use graph::{MemoryTypeGraph, TypeGraph, VertexId};
pub use registry::{MemoryTypeRegistry, TypeRegistry};
pub use resolver::reference_edge_label;
pub use search::SearchFilter;
pub use store::StructDefStore;
