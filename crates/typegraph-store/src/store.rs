//! Graph-backed store for struct type definitions.
//!
//! Each definition is persisted as one struct-category vertex carrying an
//! ordered attribute-name list plus one JSON property per attribute, and
//! one labeled edge per referenced type. Create and delete are two-phase
//! so a caller can prepare a whole bundle of definitions before
//! committing any of them.

use crate::codec::{
    attribute_key, attribute_list_key, decode_attribute_blob, encode_attribute,
    stored_attribute_blobs, DESCRIPTION_KEY,
};
use crate::error::Error;
use crate::graph::{TypeGraph, VertexId};
use crate::registry::TypeRegistry;
use crate::resolver::{apply_reference_edges, resolve_reference_edges};
use crate::search::SearchFilter;
use tracing::debug;
use typegraph_model::{StructDef, StructDefs, TypeCategory};

/// Store for struct-category type definitions.
pub struct StructDefStore<'a, G, R> {
    graph: &'a G,
    registry: &'a R,
}

impl<'a, G: TypeGraph, R: TypeRegistry> StructDefStore<'a, G, R> {
    /// Create a store over the given collaborators.
    pub fn new(graph: &'a G, registry: &'a R) -> Self {
        Self { graph, registry }
    }

    /// Validate preconditions and create the type vertex with its
    /// attribute properties. Reference edges are not created yet; see
    /// [`Self::create`].
    pub fn prepare_create(&self, def: &StructDef) -> Result<VertexId, Error> {
        debug!(name = %def.name, "preparing struct definition create");

        self.ensure_struct_category(&def.name)?;

        if self.graph.find_vertex_by_name(&def.name).is_some() {
            return Err(Error::TypeAlreadyExists(def.name.clone()));
        }

        let vertex = self
            .graph
            .create_vertex(&def.name, TypeCategory::Struct, def.guid.as_deref());
        self.write_attribute_properties(def, vertex)?;

        Ok(vertex)
    }

    /// Create a definition, finishing a prepared vertex when one is
    /// given, and return the stored definition re-read through the codec.
    pub fn create(&self, def: &StructDef, prepared: Option<VertexId>) -> Result<StructDef, Error> {
        let vertex = match prepared {
            Some(vertex) => vertex,
            None => self.prepare_create(def)?,
        };

        let edges = resolve_reference_edges(self.graph, def)?;
        apply_reference_edges(self.graph, vertex, &edges);

        debug!(name = %def.name, edges = edges.len(), "struct definition created");
        self.to_struct_def(vertex)
    }

    /// All stored struct definitions.
    pub fn get_all(&self) -> Result<Vec<StructDef>, Error> {
        let mut defs = Vec::new();
        for vertex in self.graph.vertices_by_category(TypeCategory::Struct) {
            defs.push(self.to_struct_def(vertex)?);
        }
        Ok(defs)
    }

    /// Look up a definition by name.
    pub fn get_by_name(&self, name: &str) -> Result<StructDef, Error> {
        let vertex = self.find_struct_vertex_by_name(name)?;
        self.to_struct_def(vertex)
    }

    /// Look up a definition by guid.
    pub fn get_by_guid(&self, guid: &str) -> Result<StructDef, Error> {
        let vertex = self.find_struct_vertex_by_guid(guid)?;
        self.to_struct_def(vertex)
    }

    /// Update by name when the definition carries one, else by guid.
    pub fn update(&self, def: &StructDef) -> Result<StructDef, Error> {
        if !def.name.is_empty() {
            self.update_by_name(&def.name, def)
        } else {
            self.update_by_guid(def.guid.as_deref().unwrap_or(""), def)
        }
    }

    /// Overwrite the definition stored under `name`.
    pub fn update_by_name(&self, name: &str, def: &StructDef) -> Result<StructDef, Error> {
        debug!(%name, "updating struct definition");

        self.ensure_struct_category(&def.name)?;
        let vertex = self.find_struct_vertex_by_name(name)?;

        self.write_attribute_properties(def, vertex)?;
        self.refresh_reference_edges(def, vertex)?;

        self.to_struct_def(vertex)
    }

    /// Overwrite the definition stored under `guid`.
    pub fn update_by_guid(&self, guid: &str, def: &StructDef) -> Result<StructDef, Error> {
        debug!(%guid, "updating struct definition");

        match self.registry.category_by_guid(guid) {
            Some(TypeCategory::Struct) => {}
            _ => return Err(Error::NotAStructType(def.name.clone())),
        }
        let vertex = self.find_struct_vertex_by_guid(guid)?;

        self.write_attribute_properties(def, vertex)?;
        self.refresh_reference_edges(def, vertex)?;

        self.to_struct_def(vertex)
    }

    /// Locate the vertex by name and sever its outgoing edges. This is
    /// the irreversible half of delete.
    pub fn prepare_delete_by_name(&self, name: &str) -> Result<VertexId, Error> {
        debug!(%name, "preparing struct definition delete");

        let vertex = self.find_struct_vertex_by_name(name)?;
        self.graph.delete_out_edges(vertex);
        Ok(vertex)
    }

    /// Remove the definition stored under `name`, finishing a prepared
    /// deletion when one is given.
    pub fn delete_by_name(&self, name: &str, prepared: Option<VertexId>) -> Result<(), Error> {
        let vertex = match prepared {
            Some(vertex) => vertex,
            None => self.prepare_delete_by_name(name)?,
        };

        self.graph.delete_vertex(vertex);
        debug!(%name, "struct definition deleted");
        Ok(())
    }

    /// Locate the vertex by guid and sever its outgoing edges.
    pub fn prepare_delete_by_guid(&self, guid: &str) -> Result<VertexId, Error> {
        debug!(%guid, "preparing struct definition delete");

        let vertex = self.find_struct_vertex_by_guid(guid)?;
        self.graph.delete_out_edges(vertex);
        Ok(vertex)
    }

    /// Remove the definition stored under `guid`.
    pub fn delete_by_guid(&self, guid: &str, prepared: Option<VertexId>) -> Result<(), Error> {
        let vertex = match prepared {
            Some(vertex) => vertex,
            None => self.prepare_delete_by_guid(guid)?,
        };

        self.graph.delete_vertex(vertex);
        debug!(%guid, "struct definition deleted");
        Ok(())
    }

    /// Decode all struct definitions and keep those matching the filter.
    pub fn search(&self, filter: &SearchFilter) -> Result<StructDefs, Error> {
        let mut defs = self.get_all()?;
        defs.retain(|def| filter.matches(def));
        Ok(StructDefs::new(defs))
    }

    fn ensure_struct_category(&self, name: &str) -> Result<(), Error> {
        match self.registry.category(name) {
            Some(TypeCategory::Struct) => Ok(()),
            _ => Err(Error::NotAStructType(name.to_owned())),
        }
    }

    fn find_struct_vertex_by_name(&self, name: &str) -> Result<VertexId, Error> {
        self.graph
            .find_vertex_by_name(name)
            .filter(|v| self.graph.is_vertex_of_category(*v, TypeCategory::Struct))
            .ok_or_else(|| Error::NotFound {
                key: "name",
                value: name.to_owned(),
            })
    }

    fn find_struct_vertex_by_guid(&self, guid: &str) -> Result<VertexId, Error> {
        self.graph
            .find_vertex_by_guid(guid)
            .filter(|v| self.graph.is_vertex_of_category(*v, TypeCategory::Struct))
            .ok_or_else(|| Error::NotFound {
                key: "guid",
                value: guid.to_owned(),
            })
    }

    /// Write the attribute-name list and per-attribute blob properties,
    /// removing blobs of attributes no longer present so the list and the
    /// blob set stay consistent.
    fn write_attribute_properties(&self, def: &StructDef, vertex: VertexId) -> Result<(), Error> {
        if let Some(description) = &def.description {
            self.graph
                .set_string_property(vertex, DESCRIPTION_KEY, description);
        }

        let list_key = attribute_list_key(&def.name);
        let previous = self
            .graph
            .string_list_property(vertex, &list_key)
            .unwrap_or_default();

        let mut names = Vec::with_capacity(def.attributes.len());
        for attribute in &def.attributes {
            let blob = encode_attribute(attribute, def, self.registry)?;
            self.graph
                .set_string_property(vertex, &attribute_key(&def.name, &attribute.name), &blob);
            names.push(attribute.name.clone());
        }

        for stale in previous.iter().filter(|n| !names.contains(n)) {
            self.graph
                .remove_string_property(vertex, &attribute_key(&def.name, stale));
        }

        self.graph.set_string_list_property(vertex, &list_key, &names);
        Ok(())
    }

    /// Batch-validate the new reference set, then replace the vertex's
    /// outgoing edges with it. A failed validation leaves the existing
    /// edges untouched.
    fn refresh_reference_edges(&self, def: &StructDef, vertex: VertexId) -> Result<(), Error> {
        let edges = resolve_reference_edges(self.graph, def)?;
        self.graph.delete_out_edges(vertex);
        apply_reference_edges(self.graph, vertex, &edges);
        Ok(())
    }

    /// Rebuild the in-memory definition from a vertex.
    fn to_struct_def(&self, vertex: VertexId) -> Result<StructDef, Error> {
        let name = self.graph.vertex_name(vertex).ok_or_else(|| Error::Decode {
            type_name: String::new(),
            reason: "vertex carries no type name".to_owned(),
        })?;

        let mut attributes = Vec::new();
        for blob in stored_attribute_blobs(self.graph, vertex, &name)? {
            attributes.push(decode_attribute_blob(self.graph, &name, &blob)?);
        }

        Ok(StructDef {
            guid: self.graph.vertex_guid(vertex),
            description: self.graph.string_property(vertex, DESCRIPTION_KEY),
            name,
            attributes,
        })
    }
}
