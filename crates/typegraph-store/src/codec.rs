//! Attribute codec: one attribute definition to one JSON vertex property
//! and back.
//!
//! The persisted shape is kept wire-compatible with data written by
//! earlier releases of the catalog: the attribute is one JSON document
//! with camelCase keys, and its `multiplicity` is a nested JSON document
//! carried as a string.

use crate::error::Error;
use crate::graph::{TypeGraph, VertexId};
use crate::infer::infer_constraints;
use crate::registry::TypeRegistry;
use serde::{Deserialize, Serialize};
use typegraph_model::{
    element_type_name, is_builtin_type, AttributeDef, Cardinality, StructDef,
};

/// Vertex property holding the type description.
pub(crate) const DESCRIPTION_KEY: &str = "__type.description";

/// Vertex property holding the ordered attribute-name list of a type.
pub(crate) fn attribute_list_key(type_name: &str) -> String {
    format!("__type.{type_name}")
}

/// Vertex property holding one attribute's persisted definition.
pub(crate) fn attribute_key(type_name: &str, attribute: &str) -> String {
    format!("__type.{type_name}.{attribute}")
}

/// Persisted form of one attribute definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AttributeBlob {
    pub(crate) name: String,
    #[serde(rename = "dataType")]
    pub(crate) data_type: String,
    #[serde(rename = "isUnique")]
    pub(crate) is_unique: bool,
    #[serde(rename = "isIndexable")]
    pub(crate) is_indexable: bool,
    #[serde(rename = "isComposite")]
    pub(crate) is_composite: bool,
    #[serde(rename = "reverseAttributeName", default)]
    pub(crate) reverse_attribute_name: Option<String>,
    /// Nested JSON document, kept as a string for wire compatibility.
    pub(crate) multiplicity: String,
}

/// Persisted form of an attribute's occurrence bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MultiplicityBlob {
    #[serde(default)]
    lower: Option<i64>,
    #[serde(default)]
    upper: Option<i64>,
    #[serde(rename = "isUnique", default)]
    is_unique: Option<bool>,
}

impl AttributeBlob {
    /// The declared reverse attribute name, blank-insensitive.
    pub(crate) fn reverse_name(&self) -> &str {
        self.reverse_attribute_name.as_deref().unwrap_or("")
    }
}

/// Encode one attribute of `owner` to its persisted JSON form.
///
/// The relationship flags are derived here, from the writer's
/// perspective: an attribute is a foreign key when it declares one or
/// when its element type is a referenceable user-defined type, and the
/// reverse attribute name is resolved by scanning the referenced type's
/// resolved definition for a mapped-from-ref back-pointer at
/// `(owner, attribute)`.
pub(crate) fn encode_attribute<R: TypeRegistry>(
    attribute: &AttributeDef,
    owner: &StructDef,
    registry: &R,
) -> Result<String, Error> {
    let element = element_type_name(&attribute.type_name);
    let is_mapped_from_ref = attribute.is_mapped_from_ref();
    let is_foreign_key = attribute.is_foreign_key()
        || (!is_builtin_type(&element) && registry.is_referenceable(&element));

    let mut reverse_attribute_name = None;
    if is_foreign_key {
        if let Some(referenced) = registry.resolved_struct(&element) {
            reverse_attribute_name = referenced
                .mapped_from_ref_attribute(&owner.name, &attribute.name)
                .map(str::to_owned);
        }
    }

    let is_composite = is_mapped_from_ref
        || (is_foreign_key && reverse_attribute_name.as_deref().unwrap_or("").is_empty());

    let multiplicity = MultiplicityBlob {
        lower: Some(i64::from(attribute.values_min_count)),
        upper: Some(i64::from(attribute.values_max_count)),
        is_unique: Some(attribute.cardinality == Cardinality::Set),
    };

    let blob = AttributeBlob {
        name: attribute.name.clone(),
        data_type: attribute.type_name.clone(),
        is_unique: attribute.is_unique,
        is_indexable: attribute.is_indexable,
        is_composite,
        reverse_attribute_name,
        multiplicity: to_json(&multiplicity)?,
    };

    to_json(&blob)
}

/// Decode one stored attribute of the type named `owner_name`,
/// re-deriving its relationship constraints against the graph.
pub(crate) fn decode_attribute<G: TypeGraph>(
    graph: &G,
    owner_name: &str,
    blob_json: &str,
) -> Result<AttributeDef, Error> {
    let blob: AttributeBlob = from_json(blob_json, owner_name)?;
    decode_attribute_blob(graph, owner_name, &blob)
}

/// Decode an already-parsed attribute blob.
pub(crate) fn decode_attribute_blob<G: TypeGraph>(
    graph: &G,
    owner_name: &str,
    blob: &AttributeBlob,
) -> Result<AttributeDef, Error> {
    let constraints = infer_constraints(graph, owner_name, blob)?;

    let multiplicity: MultiplicityBlob = from_json(&blob.multiplicity, owner_name)?;

    let (is_optional, values_min_count) = match multiplicity.lower {
        Some(lower) if lower > 0 => (false, lower as u32),
        _ => (true, 0),
    };

    let (cardinality, values_max_count) = match multiplicity.upper {
        Some(upper) if upper >= 2 => {
            let cardinality = if multiplicity.is_unique.unwrap_or(false) {
                Cardinality::Set
            } else {
                Cardinality::List
            };
            (cardinality, upper as u32)
        }
        _ => (Cardinality::Single, 1),
    };

    Ok(AttributeDef {
        name: blob.name.clone(),
        type_name: blob.data_type.clone(),
        is_unique: blob.is_unique,
        is_indexable: blob.is_indexable,
        is_optional,
        values_min_count,
        values_max_count,
        cardinality,
        constraints,
    })
}

/// Ordered attribute blobs stored on a type vertex.
///
/// This is the lookup shared by the whole-definition read path and the
/// decode-side back-pointer scan. A name present in the stored list
/// without its blob property is a decode error, never a skip.
pub(crate) fn stored_attribute_blobs<G: TypeGraph>(
    graph: &G,
    vertex: VertexId,
    type_name: &str,
) -> Result<Vec<AttributeBlob>, Error> {
    let names = graph
        .string_list_property(vertex, &attribute_list_key(type_name))
        .unwrap_or_default();

    let mut blobs = Vec::with_capacity(names.len());
    for attr_name in &names {
        let json = graph
            .string_property(vertex, &attribute_key(type_name, attr_name))
            .ok_or_else(|| Error::Decode {
                type_name: type_name.to_owned(),
                reason: format!("no stored definition for listed attribute {attr_name}"),
            })?;
        blobs.push(from_json(&json, type_name)?);
    }
    Ok(blobs)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string(value).map_err(|e| Error::Serialization(e.to_string()))
}

fn from_json<'a, T: Deserialize<'a>>(json: &'a str, type_name: &str) -> Result<T, Error> {
    serde_json::from_str(json).map_err(|e| Error::Decode {
        type_name: type_name.to_owned(),
        reason: e.to_string(),
    })
}
