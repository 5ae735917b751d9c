//! Struct type-definition value objects.

use crate::types::element_type_name;
use serde::{Deserialize, Serialize};

/// How many values an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// At most one value.
    Single,
    /// Ordered values, duplicates allowed.
    List,
    /// Unordered values, no duplicates.
    Set,
}

/// Delete propagation for a foreign-key reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteBehavior {
    /// Deleting the referenced side has no effect on this side.
    NoAction,
    /// Deleting the referenced side's owner deletes this side.
    Cascade,
}

/// A relationship constraint attached to an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeConstraint {
    /// Reference to another type.
    ForeignKey {
        /// Delete propagation from the referenced side.
        on_delete: DeleteBehavior,
    },
    /// Values are owned by the named attribute on the referenced type
    /// rather than stored independently.
    MappedFromRef {
        /// Attribute on the referenced type that owns this one.
        ref_attribute: String,
    },
}

impl AttributeConstraint {
    /// A plain foreign-key reference.
    pub fn foreign_key() -> Self {
        AttributeConstraint::ForeignKey {
            on_delete: DeleteBehavior::NoAction,
        }
    }

    /// A foreign key whose referencing side is deleted with the referenced
    /// side's owner.
    pub fn foreign_key_cascade() -> Self {
        AttributeConstraint::ForeignKey {
            on_delete: DeleteBehavior::Cascade,
        }
    }

    /// A mapped-from-ref constraint owned by `ref_attribute` on the
    /// referenced type.
    pub fn mapped_from_ref(ref_attribute: impl Into<String>) -> Self {
        AttributeConstraint::MappedFromRef {
            ref_attribute: ref_attribute.into(),
        }
    }

    /// Check if this is a foreign-key constraint.
    pub fn is_foreign_key(&self) -> bool {
        matches!(self, AttributeConstraint::ForeignKey { .. })
    }

    /// Check if this is a mapped-from-ref constraint.
    pub fn is_mapped_from_ref(&self) -> bool {
        matches!(self, AttributeConstraint::MappedFromRef { .. })
    }

    /// The owning reverse attribute, for mapped-from-ref constraints.
    pub fn ref_attribute(&self) -> Option<&str> {
        match self {
            AttributeConstraint::MappedFromRef { ref_attribute } => Some(ref_attribute),
            AttributeConstraint::ForeignKey { .. } => None,
        }
    }
}

/// An attribute definition within a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDef {
    /// Attribute name (unique within the owning struct).
    pub name: String,
    /// Declared type name: a primitive, `array<X>`, `map<K,V>`, or a
    /// user-defined type name.
    pub type_name: String,
    /// Whether values must be unique across instances.
    pub is_unique: bool,
    /// Whether the attribute should be indexed.
    pub is_indexable: bool,
    /// Whether the attribute may be absent.
    pub is_optional: bool,
    /// Minimum occurrence count.
    pub values_min_count: u32,
    /// Maximum occurrence count.
    pub values_max_count: u32,
    /// Value cardinality.
    pub cardinality: Cardinality,
    /// Relationship constraints.
    pub constraints: Vec<AttributeConstraint>,
}

impl AttributeDef {
    /// Create a required single-valued attribute.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_unique: false,
            is_indexable: false,
            is_optional: false,
            values_min_count: 1,
            values_max_count: 1,
            cardinality: Cardinality::Single,
            constraints: Vec::new(),
        }
    }

    /// Create an optional single-valued attribute.
    pub fn optional(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let mut attribute = Self::new(name, type_name);
        attribute.is_optional = true;
        attribute.values_min_count = 0;
        attribute
    }

    /// Mark values as unique.
    pub fn with_unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Mark as indexed.
    pub fn with_index(mut self) -> Self {
        self.is_indexable = true;
        self
    }

    /// Set the occurrence bounds; a zero minimum makes the attribute
    /// optional.
    pub fn with_occurs(mut self, min: u32, max: u32) -> Self {
        self.values_min_count = min;
        self.values_max_count = max;
        self.is_optional = min == 0;
        self
    }

    /// Set the cardinality.
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Attach a relationship constraint.
    pub fn with_constraint(mut self, constraint: AttributeConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Whether any foreign-key constraint is declared.
    pub fn is_foreign_key(&self) -> bool {
        self.constraints.iter().any(AttributeConstraint::is_foreign_key)
    }

    /// Whether a mapped-from-ref constraint is declared.
    pub fn is_mapped_from_ref(&self) -> bool {
        self.constraints
            .iter()
            .any(AttributeConstraint::is_mapped_from_ref)
    }

    /// The reverse attribute named by a declared mapped-from-ref
    /// constraint.
    pub fn mapped_from_ref_target(&self) -> Option<&str> {
        self.constraints.iter().find_map(AttributeConstraint::ref_attribute)
    }
}

/// A struct type definition: a named, ordered bundle of attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructDef {
    /// Type name (unique in the catalog).
    pub name: String,
    /// Immutable identifier, assigned at vertex creation when absent.
    pub guid: Option<String>,
    /// Human-readable description.
    pub description: Option<String>,
    /// Attribute definitions, in display/serialization order.
    pub attributes: Vec<AttributeDef>,
}

impl StructDef {
    /// Create an empty struct definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: None,
            description: None,
            attributes: Vec::new(),
        }
    }

    /// Set the guid.
    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an attribute; an existing attribute with the same name is
    /// replaced in place, keeping names unique.
    pub fn with_attribute(mut self, attribute: AttributeDef) -> Self {
        match self.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
        self
    }

    /// Add multiple attributes.
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = AttributeDef>) -> Self {
        for attribute in attributes {
            self = self.with_attribute(attribute);
        }
        self
    }

    /// Get an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check whether an attribute exists.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Attribute names in declared order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Name of this type's attribute whose values map from
    /// `ref_attribute` on `ref_type`, i.e. the reverse side of a
    /// mapped-from-ref relationship.
    pub fn mapped_from_ref_attribute(&self, ref_type: &str, ref_attribute: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| {
                element_type_name(&a.type_name) == ref_type
                    && a.mapped_from_ref_target() == Some(ref_attribute)
            })
            .map(|a| a.name.as_str())
    }
}

/// Collection wrapper returned by search operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructDefs {
    /// The matching definitions.
    pub list: Vec<StructDef>,
}

impl StructDefs {
    /// Wrap a list of definitions.
    pub fn new(list: Vec<StructDef>) -> Self {
        Self { list }
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Iterate over the definitions.
    pub fn iter(&self) -> impl Iterator<Item = &StructDef> {
        self.list.iter()
    }
}
