//! The Model facade
//!
//! `Model` is a stateless facade: it holds the schema and an
//! `Arc<dyn StorageBackend>`, nothing else. Every operation translates its
//! declared-name inputs, issues exactly one backend call (bulk create being
//! the sequential exception), and materializes the results back into
//! [`Record`]s.
//!
//! ## Key validation order
//!
//! Keyed operations validate the primary key before touching the backend:
//! a malformed key fails with `InvalidKey` naming the operation; a
//! well-formed key that matches nothing is a successful empty result.

use std::sync::Arc;

use tracing::debug;

use burrow_core::{
    BackendError, Document, Error, Filter, FindOneAndUpdateOptions, ModelSchema, Operation,
    RecordId, Result, StorageBackend, Update, Value,
};

use crate::query::{FieldValues, FindAndModifyOptions, Query, UpdateSpec};
use crate::record::Record;
use crate::translate::{self, TranslatedQuery};

/// A named, schema-bound accessor for one class of persisted record
#[derive(Clone)]
pub struct Model {
    schema: Arc<ModelSchema>,
    backend: Arc<dyn StorageBackend>,
}

impl Model {
    /// Bind a schema to a storage backend
    ///
    /// The backend handle is passed explicitly; there is no ambient global
    /// connector state.
    pub fn new(schema: ModelSchema, backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            schema: Arc::new(schema),
            backend,
        }
    }

    /// The model's schema
    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    fn collection(&self) -> &str {
        self.schema.collection()
    }

    fn materialize(&self, (id, doc): (RecordId, Document)) -> Record {
        Record::materialize(Arc::clone(&self.schema), id, doc)
    }

    /// Parse a raw key for the named operation
    fn parse_key(&self, raw: &str, operation: Operation) -> Result<RecordId> {
        RecordId::parse(raw).map_err(|_| Error::invalid_key(operation, raw))
    }

    /// Persist one record, assigning a primary key
    pub async fn create(&self, values: FieldValues) -> Result<Record> {
        let doc = translate::to_storage_doc(&self.schema, &values)?;
        let id = self.backend.insert_one(self.collection(), doc.clone()).await?;
        debug!(model = self.schema.name(), %id, "created record");
        Ok(self.materialize((id, doc)))
    }

    /// Persist an ordered sequence of records
    ///
    /// Inserts run in order; the first failure is reported and records
    /// created before it remain persisted.
    pub async fn create_many(&self, items: Vec<FieldValues>) -> Result<Vec<Record>> {
        let docs = items
            .iter()
            .map(|values| translate::to_storage_doc(&self.schema, values))
            .collect::<Result<Vec<_>>>()?;
        let ids = self.backend.insert_many(self.collection(), docs.clone()).await?;
        debug!(
            model = self.schema.name(),
            count = ids.len(),
            "created records"
        );
        Ok(ids
            .into_iter()
            .zip(docs)
            .map(|pair| self.materialize(pair))
            .collect())
    }

    /// Find one record by primary key
    ///
    /// A well-formed key matching nothing yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `InvalidKey` (operation `Find One`) when the key is malformed.
    pub async fn find_by_id(&self, raw: &str) -> Result<Option<Record>> {
        let id = self.parse_key(raw, Operation::FindOne)?;
        let found = self
            .backend
            .find_one(self.collection(), &Filter::by_id(id))
            .await?;
        Ok(found.map(|pair| self.materialize(pair)))
    }

    /// All records of the model, in storage order
    pub async fn find_all(&self) -> Result<Vec<Record>> {
        self.query(&Query::new()).await
    }

    /// Execute a query descriptor
    ///
    /// Alias for [`Model::query`]; both accept the full descriptor.
    pub async fn find(&self, query: &Query) -> Result<Vec<Record>> {
        self.query(query).await
    }

    /// Execute a query descriptor: ordered, windowed, projected
    pub async fn query(&self, query: &Query) -> Result<Vec<Record>> {
        let TranslatedQuery {
            filter,
            sort,
            window,
            projection,
        } = translate::translate(&self.schema, query, Operation::Query)?;
        let found = self
            .backend
            .find_many(
                self.collection(),
                &filter,
                &sort,
                window,
                projection.as_ref(),
            )
            .await?;
        debug!(
            model = self.schema.name(),
            matched = found.len(),
            "query executed"
        );
        Ok(found.into_iter().map(|pair| self.materialize(pair)).collect())
    }

    /// First record matching a query descriptor
    pub async fn find_one(&self, query: &Query) -> Result<Option<Record>> {
        let mut query = query.clone();
        query.limit = Some(1);
        query.page = None;
        query.per_page = None;
        Ok(self.query(&query).await?.into_iter().next())
    }

    /// Update-or-insert by key
    ///
    /// With no key, behaves as [`Model::create`]. With a key, atomically
    /// replaces the record's fields, inserting it under that key when
    /// absent; the key never changes.
    pub async fn upsert(&self, key: Option<&str>, values: FieldValues) -> Result<Record> {
        let Some(raw) = key else {
            return self.create(values).await;
        };
        let id = self.parse_key(raw, Operation::Upsert)?;
        let doc = translate::to_storage_doc(&self.schema, &values)?;
        let result = self
            .backend
            .find_one_and_update(
                self.collection(),
                &Filter::by_id(id),
                &[],
                &Update::Replace(doc),
                FindOneAndUpdateOptions {
                    upsert: true,
                    return_new: true,
                },
            )
            .await?
            .ok_or_else(|| BackendError::new("upsert produced no document"))?;
        debug!(model = self.schema.name(), %id, "upserted record");
        Ok(self.materialize(result))
    }

    /// Persist a record's dirty fields
    ///
    /// Writes only what changed since the record was read; a clean record
    /// is a no-op. A well-formed key matching nothing is also a no-op.
    ///
    /// # Errors
    ///
    /// `InvalidKey` (operation `Save One`) when the record's key is
    /// malformed or unset.
    pub async fn save(&self, record: &mut Record) -> Result<()> {
        if !record.is_dirty() {
            return Ok(());
        }
        let raw = record
            .key()
            .ok_or_else(|| Error::invalid_key(Operation::SaveOne, "(unset)"))?;
        let id = self.parse_key(raw, Operation::SaveOne)?;

        let mut doc = Document::new();
        for (field, value) in record.dirty_fields() {
            let storage = self.schema.storage_name(field)?.to_string();
            doc.insert(storage, value.clone());
        }

        self.backend
            .update_one(self.collection(), &Filter::by_id(id), &Update::Set(doc))
            .await?;
        record.mark_clean();
        debug!(model = self.schema.name(), %id, "saved record");
        Ok(())
    }

    /// Delete a record by its primary key
    ///
    /// Returns whether a record was removed. A well-formed key matching
    /// nothing is a silent no-op (`Ok(false)`); on success the record
    /// detaches (its key clears).
    ///
    /// # Errors
    ///
    /// `InvalidKey` (operation `Delete One`) when the record's key is
    /// malformed or unset.
    pub async fn delete(&self, record: &mut Record) -> Result<bool> {
        let raw = record
            .key()
            .ok_or_else(|| Error::invalid_key(Operation::DeleteOne, "(unset)"))?;
        let id = self.parse_key(raw, Operation::DeleteOne)?;

        let deleted = self
            .backend
            .delete_one(self.collection(), &Filter::by_id(id))
            .await?;
        if deleted {
            record.clear_key();
            debug!(model = self.schema.name(), %id, "deleted record");
        }
        Ok(deleted)
    }

    /// Remove every record of the model, returning how many were removed
    pub async fn delete_all(&self) -> Result<u64> {
        let removed = self
            .backend
            .delete_many(self.collection(), &Filter::all())
            .await?;
        debug!(model = self.schema.name(), removed, "deleted all records");
        Ok(removed)
    }

    /// Unique values of one declared field across matching records
    ///
    /// Each value appears exactly once; order is unspecified.
    pub async fn distinct(&self, field: &str, query: &Query) -> Result<Vec<Value>> {
        let storage = translate::storage_field(&self.schema, field)?;
        let filter = translate::translate_where(&self.schema, query, Operation::Distinct)?;
        self.backend
            .distinct(self.collection(), &storage, &filter)
            .await
    }

    /// Number of records matching an optional query
    pub async fn count(&self, query: Option<&Query>) -> Result<u64> {
        let filter = match query {
            Some(query) => translate::translate_where(&self.schema, query, Operation::Count)?,
            None => Filter::all(),
        };
        self.backend.count(self.collection(), &filter).await
    }

    /// Atomically locate one record and apply an update to it
    ///
    /// The query's `where` selects the record and its `order` picks which
    /// match wins. Find and mutate happen as one indivisible backend call.
    ///
    /// - no match, `upsert` unset: `Ok(None)`, never an error
    /// - no match, `upsert` set: a record is created merging the where
    ///   equality fields with the update's fields, and returned
    /// - match: the pre-update record is returned, or the post-update one
    ///   when `new` is set; the key is unchanged either way
    pub async fn find_and_modify(
        &self,
        query: &Query,
        update: UpdateSpec,
        options: FindAndModifyOptions,
    ) -> Result<Option<Record>> {
        let TranslatedQuery { filter, sort, .. } =
            translate::translate(&self.schema, query, Operation::FindAndModify)?;
        let update = translate::translate_update(&self.schema, &update)?;

        let result = self
            .backend
            .find_one_and_update(
                self.collection(),
                &filter,
                &sort,
                &update,
                FindOneAndUpdateOptions {
                    upsert: options.upsert,
                    return_new: options.new,
                },
            )
            .await?;
        debug!(
            model = self.schema.name(),
            matched = result.is_some(),
            "find_and_modify executed"
        );
        Ok(result.map(|pair| self.materialize(pair)))
    }
}
