//! MemoryBackend: in-process reference storage backend
//!
//! This module implements the `StorageBackend` trait using:
//! - `HashMap<collection, Vec<Row>>` behind a `parking_lot::RwLock`
//! - insertion-ordered rows with stable sorting, so ties between equal sort
//!   keys always resolve to storage order
//! - compiled `regex` predicates for like-pattern conditions
//!
//! # Design Notes
//!
//! - **Atomicity**: `find_one_and_update` runs locate + mutate (or the upsert
//!   insert) under a single write lock; no other writer can interleave.
//! - **Filters compile once per call**: like-patterns become `Regex` values
//!   before any row is visited; a pattern that fails to build is a
//!   `BackendError`, not a silent non-match.
//! - **Projection is applied last**, after sorting and windowing, so sort
//!   keys need not survive into the returned documents.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use tracing::debug;

use burrow_core::{
    compare_values, BackendError, Condition, Direction, Document, Filter,
    FindOneAndUpdateOptions, Projection, RecordId, Result, SortKey, StorageBackend, Update,
    Value, Window, ID_FIELD,
};

/// One stored record: key plus body
#[derive(Debug, Clone)]
struct Row {
    id: RecordId,
    doc: Document,
}

/// In-memory storage backend
///
/// Rows keep insertion order per collection. All trait operations take the
/// lock once; nothing is cached between calls.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }
}

/// A filter with like-patterns compiled to regexes
struct CompiledFilter {
    id: Option<RecordId>,
    clauses: Vec<(String, CompiledCondition)>,
}

enum CompiledCondition {
    Eq(Value),
    Like(Regex),
}

impl CompiledFilter {
    fn compile(filter: &Filter) -> Result<Self> {
        let mut clauses = Vec::with_capacity(filter.clauses.len());
        for (field, condition) in &filter.clauses {
            let compiled = match condition {
                Condition::Eq(value) => CompiledCondition::Eq(value.clone()),
                Condition::Like(pattern) => {
                    let regex = Regex::new(pattern.regex()).map_err(|e| {
                        BackendError::with_source(
                            format!("bad like pattern '{}'", pattern.source()),
                            e,
                        )
                    })?;
                    CompiledCondition::Like(regex)
                }
            };
            clauses.push((field.clone(), compiled));
        }
        Ok(Self {
            id: filter.id,
            clauses,
        })
    }

    fn matches(&self, row: &Row) -> bool {
        if let Some(id) = self.id {
            if row.id != id {
                return false;
            }
        }
        self.clauses.iter().all(|(field, condition)| {
            let value = if field == ID_FIELD {
                Some(Value::String(row.id.to_string()))
            } else {
                row.doc.get(field).cloned()
            };
            match (condition, value) {
                (CompiledCondition::Eq(expected), Some(actual)) => *expected == actual,
                (CompiledCondition::Like(regex), Some(Value::String(s))) => regex.is_match(&s),
                _ => false,
            }
        })
    }
}

/// Stable sort of row indices by the given sort keys
///
/// A missing sort field orders as JSON null; `ID_FIELD` compares the key
/// itself. The sort is stable, so rows equal under every key keep storage
/// order.
fn sort_rows(rows: &[Row], indices: &mut [usize], sort: &[SortKey]) {
    if sort.is_empty() {
        return;
    }
    indices.sort_by(|&a, &b| {
        for key in sort {
            let ord = if key.field == ID_FIELD {
                rows[a].id.cmp(&rows[b].id)
            } else {
                let left = rows[a].doc.get(&key.field).unwrap_or(&Value::Null);
                let right = rows[b].doc.get(&key.field).unwrap_or(&Value::Null);
                compare_values(left, right)
            };
            let ord = match key.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });
}

fn apply_update(doc: &mut Document, update: &Update) {
    match update {
        Update::Replace(replacement) => *doc = replacement.clone(),
        Update::Set(fields) => {
            for (name, value) in fields {
                doc.insert(name.clone(), value.clone());
            }
        }
    }
}

/// Compose the document inserted by an upserting `find_one_and_update`
///
/// Starts from the filter's equality clauses and merges the update's fields
/// over them; the update wins on overlap.
fn upsert_document(filter: &Filter, update: &Update) -> Document {
    let mut doc: Document = filter
        .clauses
        .iter()
        .filter(|(field, _)| field != ID_FIELD)
        .filter_map(|(field, condition)| match condition {
            Condition::Eq(value) => Some((field.clone(), value.clone())),
            Condition::Like(_) => None,
        })
        .collect();
    match update {
        Update::Replace(fields) | Update::Set(fields) => {
            for (name, value) in fields {
                doc.insert(name.clone(), value.clone());
            }
        }
    }
    doc
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<RecordId> {
        let id = RecordId::generate();
        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Row { id, doc });
        debug!(collection, %id, "inserted record");
        Ok(id)
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<Vec<RecordId>> {
        // Sequential, first failure reported; inserts so far remain.
        let mut ids = Vec::with_capacity(docs.len());
        for doc in docs {
            ids.push(self.insert_one(collection, doc).await?);
        }
        Ok(ids)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<(RecordId, Document)>> {
        let compiled = CompiledFilter::compile(filter)?;
        let collections = self.collections.read();
        let Some(rows) = collections.get(collection) else {
            return Ok(None);
        };
        Ok(rows
            .iter()
            .find(|row| compiled.matches(row))
            .map(|row| (row.id, row.doc.clone())))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &[SortKey],
        window: Window,
        projection: Option<&Projection>,
    ) -> Result<Vec<(RecordId, Document)>> {
        let compiled = CompiledFilter::compile(filter)?;
        let collections = self.collections.read();
        let Some(rows) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<usize> = (0..rows.len())
            .filter(|&i| compiled.matches(&rows[i]))
            .collect();
        sort_rows(rows, &mut matched, sort);

        let skip = window.skip as usize;
        let take = window.limit.map_or(usize::MAX, |l| l as usize);
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|i| {
                let row = &rows[i];
                let mut doc = row.doc.clone();
                if let Some(projection) = projection {
                    projection.apply(&mut doc);
                }
                (row.id, doc)
            })
            .collect())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> Result<bool> {
        let compiled = CompiledFilter::compile(filter)?;
        let mut collections = self.collections.write();
        let Some(rows) = collections.get_mut(collection) else {
            return Ok(false);
        };
        match rows.iter_mut().find(|row| compiled.matches(row)) {
            Some(row) => {
                apply_update(&mut row.doc, update);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool> {
        let compiled = CompiledFilter::compile(filter)?;
        let mut collections = self.collections.write();
        let Some(rows) = collections.get_mut(collection) else {
            return Ok(false);
        };
        match rows.iter().position(|row| compiled.matches(row)) {
            Some(i) => {
                let row = rows.remove(i);
                debug!(collection, id = %row.id, "deleted record");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let compiled = CompiledFilter::compile(filter)?;
        let mut collections = self.collections.write();
        let Some(rows) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !compiled.matches(row));
        let removed = (before - rows.len()) as u64;
        debug!(collection, removed, "deleted records");
        Ok(removed)
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &[SortKey],
        update: &Update,
        options: FindOneAndUpdateOptions,
    ) -> Result<Option<(RecordId, Document)>> {
        let compiled = CompiledFilter::compile(filter)?;

        // One write lock covers locate and mutate; nothing interleaves.
        let mut collections = self.collections.write();
        let rows = collections.entry(collection.to_string()).or_default();

        let mut matched: Vec<usize> = (0..rows.len())
            .filter(|&i| compiled.matches(&rows[i]))
            .collect();
        sort_rows(rows, &mut matched, sort);

        match matched.first() {
            Some(&i) => {
                let row = &mut rows[i];
                let previous = row.doc.clone();
                apply_update(&mut row.doc, update);
                let returned = if options.return_new {
                    row.doc.clone()
                } else {
                    previous
                };
                Ok(Some((row.id, returned)))
            }
            None if options.upsert => {
                let id = filter.id.unwrap_or_else(RecordId::generate);
                let doc = upsert_document(filter, update);
                rows.push(Row {
                    id,
                    doc: doc.clone(),
                });
                debug!(collection, %id, "upserted record");
                Ok(Some((id, doc)))
            }
            None => Ok(None),
        }
    }

    async fn distinct(
        &self,
        collection: &str,
        field: &str,
        filter: &Filter,
    ) -> Result<Vec<Value>> {
        let compiled = CompiledFilter::compile(filter)?;
        let collections = self.collections.read();
        let Some(rows) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut values: Vec<Value> = Vec::new();
        for row in rows.iter().filter(|row| compiled.matches(row)) {
            let value = if field == ID_FIELD {
                Some(Value::String(row.id.to_string()))
            } else {
                row.doc.get(field).cloned()
            };
            if let Some(value) = value {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        Ok(values)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let compiled = CompiledFilter::compile(filter)?;
        let collections = self.collections.read();
        let Some(rows) = collections.get(collection) else {
            return Ok(0);
        };
        Ok(rows.iter().filter(|row| compiled.matches(row)).count() as u64)
    }
}
