//! Type-registry collaborator contract and an in-memory implementation.
//!
//! The registry is the authority on which names denote registered types
//! and what category each carries. The store consults it before every
//! create and update, and the encode path reads resolved definitions from
//! it for the reverse-attribute lookup.

use std::collections::HashMap;
use typegraph_model::{StructDef, TypeCategory};

/// Type-name classification consumed by the struct-definition store.
pub trait TypeRegistry {
    /// Category of the registered type, if the name is known.
    fn category(&self, name: &str) -> Option<TypeCategory>;

    /// Category of the registered type, if the guid is known.
    fn category_by_guid(&self, guid: &str) -> Option<TypeCategory>;

    /// Fully-resolved definition backing a struct- or entity-category
    /// name.
    fn resolved_struct(&self, name: &str) -> Option<&StructDef>;

    /// Whether the name denotes a registered type whose instances can be
    /// the target of a relationship constraint.
    fn is_referenceable(&self, name: &str) -> bool {
        self.category(name)
            .is_some_and(TypeCategory::is_referenceable)
    }
}

/// In-memory type registry for tests and embedded use.
#[derive(Default)]
pub struct MemoryTypeRegistry {
    categories: HashMap<String, TypeCategory>,
    guids: HashMap<String, String>,
    structs: HashMap<String, StructDef>,
}

impl MemoryTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name with a bare category and no resolved definition.
    pub fn register(&mut self, name: impl Into<String>, category: TypeCategory) {
        self.categories.insert(name.into(), category);
    }

    /// Register a struct-category type with its resolved definition.
    pub fn register_struct(&mut self, def: StructDef) {
        self.register_resolved(def, TypeCategory::Struct);
    }

    /// Register an entity-category type with its resolved definition.
    pub fn register_entity(&mut self, def: StructDef) {
        self.register_resolved(def, TypeCategory::Entity);
    }

    fn register_resolved(&mut self, def: StructDef, category: TypeCategory) {
        if let Some(guid) = &def.guid {
            self.guids.insert(guid.clone(), def.name.clone());
        }
        self.categories.insert(def.name.clone(), category);
        self.structs.insert(def.name.clone(), def);
    }
}

impl TypeRegistry for MemoryTypeRegistry {
    fn category(&self, name: &str) -> Option<TypeCategory> {
        self.categories.get(name).copied()
    }

    fn category_by_guid(&self, guid: &str) -> Option<TypeCategory> {
        self.guids.get(guid).and_then(|name| self.category(name))
    }

    fn resolved_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }
}
