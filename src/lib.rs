//! burrow - embedded record-model layer over pluggable document storage
//!
//! burrow binds declarative model schemas to a narrow async storage
//! interface and exposes the usual record operations on top: create, find,
//! query, upsert, save, delete, findAndModify, distinct, and count.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use burrowdb::{field_values, FieldType, MemoryBackend, Model, ModelSchema, Query};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> burrowdb::Result<()> {
//! let schema = ModelSchema::builder("post")
//!     .collection("Posts")
//!     .field("title", FieldType::String)
//!     .field("content", FieldType::String)
//!     .build()?;
//! let posts = Model::new(schema, Arc::new(MemoryBackend::new()));
//!
//! let record = posts
//!     .create(field_values([("title", "Test"), ("content", "Hello world")]))
//!     .await?;
//!
//! let found = posts
//!     .query(&Query::new().where_like("content", "Hello%"))
//!     .await?;
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].key(), record.key());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Application code talks to a [`Model`], which translates declared field
//! names and declarative queries into the backend-neutral form defined in
//! `burrow-core`, then issues calls through the [`StorageBackend`] trait.
//! The [`MemoryBackend`] is the in-process reference implementation; real
//! drivers implement the same trait outside this workspace.

pub use burrow_backend::MemoryBackend;
pub use burrow_core::{
    compare_values, BackendError, Condition, Direction, Document, Error, FieldDef, FieldType,
    Filter, FindOneAndUpdateOptions, LikePattern, ModelSchema, ModelSchemaBuilder, Operation,
    ParseIdError, Projection, RecordId, Result, SortKey, StorageBackend, Update, Value, Window,
    ID_FIELD,
};
pub use burrow_model::{
    field_values, FieldValues, FindAndModifyOptions, Model, Query, Record, UpdateSpec,
    WhereClause,
};
