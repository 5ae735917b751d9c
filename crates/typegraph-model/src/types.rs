//! Type categories and the declared-type-name grammar.
//!
//! Attribute types are declared as plain names: a built-in primitive
//! (`string`, `long`, ...), a user-defined type name, or the container
//! forms `array<X>` and `map<K,V>`, which may nest.

use serde::{Deserialize, Serialize};

/// Built-in primitive type names.
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    "boolean",
    "byte",
    "short",
    "int",
    "long",
    "float",
    "double",
    "biginteger",
    "bigdecimal",
    "string",
    "date",
];

const ARRAY_PREFIX: &str = "array<";
const MAP_PREFIX: &str = "map<";

/// Category tag carried by every registered type and type vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCategory {
    /// Built-in primitive type.
    Primitive,
    /// Enumeration type.
    Enum,
    /// Array container type.
    Array,
    /// Map container type.
    Map,
    /// Struct type (named attribute bundle, no independent identity).
    Struct,
    /// Entity type (instances have independent identity and lifecycle).
    Entity,
}

impl TypeCategory {
    /// Whether instances of this category can be the target of a
    /// relationship constraint.
    pub fn is_referenceable(self) -> bool {
        matches!(self, TypeCategory::Struct | TypeCategory::Entity)
    }
}

/// Parsed form of a declared attribute type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// A built-in primitive.
    Builtin(String),
    /// A user-defined type name.
    Named(String),
    /// `array<element>`.
    Array(Box<DeclaredType>),
    /// `map<key, value>`.
    Map(Box<DeclaredType>, Box<DeclaredType>),
}

impl DeclaredType {
    /// Parse a declared type name. Unparseable container syntax falls back
    /// to a user-defined name, matching how unknown names are treated.
    pub fn parse(name: &str) -> DeclaredType {
        let name = name.trim();

        if let Some(inner) = strip_container(name, ARRAY_PREFIX) {
            return DeclaredType::Array(Box::new(DeclaredType::parse(inner)));
        }

        if let Some(inner) = strip_container(name, MAP_PREFIX) {
            if let Some((key, value)) = split_top_level(inner) {
                return DeclaredType::Map(
                    Box::new(DeclaredType::parse(key)),
                    Box::new(DeclaredType::parse(value)),
                );
            }
        }

        if is_builtin_type(name) {
            DeclaredType::Builtin(name.to_owned())
        } else {
            DeclaredType::Named(name.to_owned())
        }
    }

    /// Whether this is a map, at any nesting level reachable by unwrapping
    /// arrays.
    pub fn is_map(&self) -> bool {
        match self {
            DeclaredType::Map(_, _) => true,
            DeclaredType::Array(inner) => inner.is_map(),
            _ => false,
        }
    }

    fn collect_named(&self, out: &mut Vec<String>) {
        match self {
            DeclaredType::Builtin(_) => {}
            DeclaredType::Named(name) => {
                if !out.iter().any(|n| n == name) {
                    out.push(name.clone());
                }
            }
            DeclaredType::Array(inner) => inner.collect_named(out),
            DeclaredType::Map(key, value) => {
                key.collect_named(out);
                value.collect_named(out);
            }
        }
    }
}

/// Whether the name denotes a built-in primitive.
pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPE_NAMES.contains(&name)
}

/// Whether the name uses the `array<...>` container form.
pub fn is_array_type(name: &str) -> bool {
    strip_container(name.trim(), ARRAY_PREFIX).is_some()
}

/// Whether the name uses the `map<...>` container form.
pub fn is_map_type(name: &str) -> bool {
    strip_container(name.trim(), MAP_PREFIX).is_some()
}

/// The element type name, unwrapping one level of array if present.
pub fn element_type_name(name: &str) -> String {
    let name = name.trim();
    match strip_container(name, ARRAY_PREFIX) {
        Some(inner) => inner.trim().to_owned(),
        None => name.to_owned(),
    }
}

/// User-defined type names referenced anywhere in the declared type, in
/// first-appearance order with duplicates removed.
pub fn referenced_type_names(name: &str) -> Vec<String> {
    let mut names = Vec::new();
    DeclaredType::parse(name).collect_named(&mut names);
    names
}

fn strip_container<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix)?.strip_suffix('>')
}

/// Split a `map<...>` body at its top-level comma.
fn split_top_level(body: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (idx, ch) in body.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return Some((&body[..idx], &body[idx + 1..])),
            _ => {}
        }
    }
    None
}
