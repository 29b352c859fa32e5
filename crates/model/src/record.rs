//! Record instances
//!
//! A `Record` is one in-memory projection of a stored document, keyed by
//! declared field names. Mutation goes through [`Record::set`], which checks
//! the schema and marks the field dirty; `Model::save` then persists only
//! the dirty fields.
//!
//! The primary key slot holds a raw string, validated per operation rather
//! than at assignment time. That keeps the malformed-key contract honest:
//! a record can carry a nonsense key, and the keyed operation that touches
//! it is the one that rejects it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use burrow_core::{Document, ModelSchema, RecordId, Result, Value};

/// One in-memory, possibly-dirty projection of a stored record
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<ModelSchema>,
    key: Option<String>,
    fields: BTreeMap<String, Value>,
    dirty: BTreeSet<String>,
}

impl Record {
    /// Build a record from a backend read
    ///
    /// Storage names map back to declared names; storage fields the schema
    /// does not declare are dropped. The dirty set starts empty.
    pub(crate) fn materialize(schema: Arc<ModelSchema>, id: RecordId, doc: Document) -> Self {
        let fields = doc
            .into_iter()
            .filter_map(|(storage, value)| {
                schema
                    .declared_name(&storage)
                    .map(|declared| (declared.to_string(), value))
            })
            .collect();
        Self {
            schema,
            key: Some(id.to_string()),
            fields,
            dirty: BTreeSet::new(),
        }
    }

    /// The raw primary key, if the record is attached
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Overwrite the primary key
    ///
    /// No validation happens here; keyed operations validate on use.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }

    /// Detach the record from storage (used after a successful delete)
    pub(crate) fn clear_key(&mut self) {
        self.key = None;
    }

    /// Read a field by declared name
    ///
    /// Absent fields (never set, or excluded by a projection) read as
    /// `None`, not as null.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Read a string field by declared name
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Write a field by declared name, marking it dirty
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` when the schema does not declare `field`.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let declared = self.schema.field(field).ok_or_else(|| {
            burrow_core::Error::unknown_field(self.schema.name(), field)
        })?;
        self.fields.insert(declared.name.clone(), value.into());
        self.dirty.insert(declared.name.clone());
        Ok(())
    }

    /// Whether any field awaits persistence
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Declared-name view of all present fields
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// The dirty field names, in declared-name form
    pub(crate) fn dirty_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.dirty
            .iter()
            .filter_map(|name| self.fields.get(name).map(|v| (name.as_str(), v)))
    }

    /// Forget dirtiness after a successful save
    pub(crate) fn mark_clean(&mut self) {
        self.dirty.clear();
    }
}
