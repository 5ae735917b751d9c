//! Typegraph model - struct type-definition value objects.
//!
//! This crate defines the shared value objects of the typegraph catalog:
//! struct definitions, attribute definitions, relationship constraints,
//! and the declared-type-name grammar (`array<X>` / `map<K,V>` nesting,
//! built-in primitive names, referenced-name extraction).
//!
//! # Modules
//!
//! - [`typedef`] - Struct and attribute definitions with their constraints
//! - [`types`] - Type categories and the declared-type-name grammar

pub mod typedef;
pub mod types;

pub use typedef::{
    AttributeConstraint, AttributeDef, Cardinality, DeleteBehavior, StructDef, StructDefs,
};
pub use types::{
    element_type_name, is_array_type, is_builtin_type, is_map_type, referenced_type_names,
    DeclaredType, TypeCategory,
};
