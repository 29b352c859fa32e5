//! Storage backend abstraction
//!
//! This module defines the narrow operation set the model facade consumes.
//! Implementations own persistence entirely; the facade never sees anything
//! beyond `(RecordId, Document)` pairs and counts.
//!
//! Thread safety: backends are shared behind `Arc<dyn StorageBackend>` and
//! must tolerate concurrent calls (requires Send + Sync).

use async_trait::async_trait;

use crate::document::{Document, Value};
use crate::error::Result;
use crate::filter::{Filter, Projection, SortKey, Update, Window};
use crate::key::RecordId;

/// Options for [`StorageBackend::find_one_and_update`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FindOneAndUpdateOptions {
    /// Insert a new record when nothing matches
    pub upsert: bool,
    /// Return the post-update document instead of the pre-update one
    pub return_new: bool,
}

/// The async operation set a storage backend implements
///
/// Every operation reports success or failure; reads report the matched
/// document(s) or absence. `find_one_and_update` is the one operation that
/// must be indivisible: no concurrent write may interleave between its
/// locate and mutate steps.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Insert one document, assigning a fresh primary key
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<RecordId>;

    /// Insert documents in order
    ///
    /// Stops at the first failure; documents inserted before the failure
    /// remain (no rollback).
    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<Vec<RecordId>>;

    /// First record matching the filter, in storage order
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<(RecordId, Document)>>;

    /// All records matching the filter, sorted, windowed, and projected
    ///
    /// Sorting is deterministic: ties fall back to storage order.
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &[SortKey],
        window: Window,
        projection: Option<&Projection>,
    ) -> Result<Vec<(RecordId, Document)>>;

    /// Apply an update to the first matching record
    ///
    /// Returns true when a record matched.
    async fn update_one(&self, collection: &str, filter: &Filter, update: &Update)
        -> Result<bool>;

    /// Delete the first matching record
    ///
    /// Returns true when a record was deleted. Matching nothing is a
    /// successful no-op.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool>;

    /// Delete every matching record, returning how many were removed
    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Atomically locate one record and apply an update to it
    ///
    /// With `upsert` set and no match, inserts a record merging the filter's
    /// equality clauses with the update's fields. Returns the pre-update
    /// document, or the post-update one when `return_new` is set; `None`
    /// when nothing matched and `upsert` is unset.
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &[SortKey],
        update: &Update,
        options: FindOneAndUpdateOptions,
    ) -> Result<Option<(RecordId, Document)>>;

    /// Unique values of one storage field across matching records
    ///
    /// Each value appears exactly once; order is unspecified. Records
    /// lacking the field contribute nothing.
    async fn distinct(&self, collection: &str, field: &str, filter: &Filter)
        -> Result<Vec<Value>>;

    /// Number of records matching the filter
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64>;
}
