//! Model schemas
//!
//! A `ModelSchema` binds a model name to its ordered field declarations and
//! the backend collection holding its records. Schemas are built once at
//! model-definition time and immutable thereafter.
//!
//! Declared field names are what application code sees; storage names are
//! what backends see. When a field is not remapped the two coincide.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Declared value type of a field
///
/// Carried as declaration metadata; backends store JSON values as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 text
    String,
    /// Integer or float
    Number,
    /// True / false
    Boolean,
    /// Ordered list of values
    Array,
    /// Nested document
    Object,
}

/// One field declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Name application code uses
    pub name: String,
    /// Name the backend stores the field under
    pub storage_name: String,
    /// Declared value type
    pub ty: FieldType,
}

/// Immutable schema for one model
#[derive(Debug, Clone)]
pub struct ModelSchema {
    name: String,
    collection: String,
    fields: Vec<FieldDef>,
    by_name: HashMap<String, usize>,
    by_storage: HashMap<String, usize>,
}

impl ModelSchema {
    /// Start building a schema for the named model
    ///
    /// A `connector/` prefix on the model name is stripped, so
    /// `appc.mongo/super_city` declares the model `super_city`.
    pub fn builder(model_name: &str) -> ModelSchemaBuilder {
        let name = model_name
            .rsplit('/')
            .next()
            .unwrap_or(model_name)
            .to_string();
        ModelSchemaBuilder {
            name,
            collection: None,
            fields: Vec::new(),
        }
    }

    /// Model name (connector prefix stripped)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backend collection holding this model's records
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by its declared name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Storage name for a declared field, or `UnknownField`
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` when the schema does not declare `name`.
    pub fn storage_name(&self, name: &str) -> Result<&str> {
        self.field(name)
            .map(|f| f.storage_name.as_str())
            .ok_or_else(|| Error::unknown_field(&self.name, name))
    }

    /// Declared name for a storage field, when one is declared
    pub fn declared_name(&self, storage_name: &str) -> Option<&str> {
        self.by_storage
            .get(storage_name)
            .map(|&i| self.fields[i].name.as_str())
    }
}

/// Builder for [`ModelSchema`]
#[derive(Debug)]
pub struct ModelSchemaBuilder {
    name: String,
    collection: Option<String>,
    fields: Vec<FieldDef>,
}

impl ModelSchemaBuilder {
    /// Override the backend collection (defaults to the model name)
    #[must_use]
    pub fn collection(mut self, collection: &str) -> Self {
        self.collection = Some(collection.to_string());
        self
    }

    /// Declare a field stored under its declared name
    #[must_use]
    pub fn field(self, name: &str, ty: FieldType) -> Self {
        self.field_mapped(name, name, ty)
    }

    /// Declare a field stored under a different name
    #[must_use]
    pub fn field_mapped(mut self, name: &str, storage_name: &str, ty: FieldType) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
            storage_name: storage_name.to_string(),
            ty,
        });
        self
    }

    /// Finish the schema
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` when a declared or storage name collides, or
    /// when a field claims the reserved name `id`.
    pub fn build(self) -> Result<ModelSchema> {
        let mut by_name = HashMap::with_capacity(self.fields.len());
        let mut by_storage = HashMap::with_capacity(self.fields.len());

        for (i, field) in self.fields.iter().enumerate() {
            if field.name == "id" || field.storage_name == crate::key::ID_FIELD {
                return Err(Error::InvalidQuery(format!(
                    "field name '{}' is reserved for the primary key",
                    field.name
                )));
            }
            if by_name.insert(field.name.clone(), i).is_some() {
                return Err(Error::InvalidQuery(format!(
                    "duplicate field '{}' on model '{}'",
                    field.name, self.name
                )));
            }
            if by_storage.insert(field.storage_name.clone(), i).is_some() {
                return Err(Error::InvalidQuery(format!(
                    "duplicate storage field '{}' on model '{}'",
                    field.storage_name, self.name
                )));
            }
        }

        Ok(ModelSchema {
            collection: self.collection.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            fields: self.fields,
            by_name,
            by_storage,
        })
    }
}
