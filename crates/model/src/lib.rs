//! Record models for burrow
//!
//! This crate composes the core vocabulary into the per-entity facade:
//! - `Query`: the declarative, declared-name query descriptor
//! - the translator lowering queries to backend filters (internal)
//! - `Record`: one in-memory, possibly-dirty projection of a stored record
//! - `Model`: the facade exposing create / find / query / upsert / save /
//!   delete / findAndModify / distinct / count
//!
//! Application code sees declared field names only; backends see storage
//! names only. The translator applies the mapping on every path.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod model;
pub mod query;
pub mod record;

mod translate;

pub use model::Model;
pub use query::{
    field_values, FieldValues, FindAndModifyOptions, Query, UpdateSpec, WhereClause,
};
pub use record::Record;
