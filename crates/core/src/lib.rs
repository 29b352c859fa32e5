//! Core types for burrow
//!
//! This crate defines the shared vocabulary between the model facade and
//! storage backends:
//! - `Error` / `Result`: the crate-wide error surface
//! - `RecordId`: the primary key codec (parse, format, generate)
//! - `Document`: a storage-name keyed JSON document
//! - `Filter` / `SortKey` / `Projection` / `Window` / `Update`: the
//!   backend-neutral translated query types
//! - `StorageBackend`: the narrow async operation set a backend implements
//!
//! Upper layers (the model facade) depend on backends only through these
//! types, so implementations can be swapped without breaking callers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod filter;
pub mod key;
pub mod schema;
pub mod traits;

pub use document::{compare_values, Document, Value};
pub use error::{BackendError, Error, Operation, Result};
pub use filter::{
    Condition, Direction, Filter, LikePattern, Projection, SortKey, Update, Window,
};
pub use key::{ParseIdError, RecordId, ID_FIELD};
pub use schema::{FieldDef, FieldType, ModelSchema, ModelSchemaBuilder};
pub use traits::{FindOneAndUpdateOptions, StorageBackend};
