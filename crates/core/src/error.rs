//! Error types for burrow
//!
//! This module defines all error kinds used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Absence is not an error
//!
//! A well-formed primary key that matches no stored record is a successful
//! empty result (`Ok(None)` / `Ok(false)`), never an error. Only malformed
//! input and backend failures surface here.

use std::fmt;
use thiserror::Error;

/// Result type alias for burrow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Operation labels used in primary-key error messages
///
/// Keyed operations validate the primary key before touching storage and
/// name themselves in the resulting error, e.g.
/// `Invalid primary key for Delete One: bad`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Record creation
    Create,
    /// Single-record lookup by key
    FindOne,
    /// Declarative query execution
    Query,
    /// Persisting dirty fields of a record
    SaveOne,
    /// Single-record deletion by key
    DeleteOne,
    /// Update-or-insert by key
    Upsert,
    /// Atomic locate-and-mutate
    FindAndModify,
    /// Unique value enumeration
    Distinct,
    /// Matching record count
    Count,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Create => "Create",
            Self::FindOne => "Find One",
            Self::Query => "Query",
            Self::SaveOne => "Save One",
            Self::DeleteOne => "Delete One",
            Self::Upsert => "Upsert",
            Self::FindAndModify => "Find And Modify",
            Self::Distinct => "Distinct",
            Self::Count => "Count",
        };
        f.write_str(label)
    }
}

/// Error types for the record-model layer
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed query descriptor (conflicting options, bad direction, ...)
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Reference to a field the model schema does not declare
    #[error("unknown field '{field}' on model '{model}'")]
    UnknownField {
        /// Model name
        model: String,
        /// Offending declared field name
        field: String,
    },

    /// Malformed primary key, rejected before reaching storage
    #[error("Invalid primary key for {operation}: {key}")]
    InvalidKey {
        /// The operation that validated the key
        operation: Operation,
        /// The raw key as supplied by the caller
        key: String,
    },

    /// Failure reported by the storage backend, cause preserved
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl Error {
    /// Construct an `InvalidKey` error for the given operation
    pub fn invalid_key(operation: Operation, key: impl Into<String>) -> Self {
        Self::InvalidKey {
            operation,
            key: key.into(),
        }
    }

    /// Construct an `UnknownField` error
    pub fn unknown_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            model: model.into(),
            field: field.into(),
        }
    }
}

/// A storage backend failure
///
/// Backends report failures through this wrapper so the facade can add
/// context without losing the underlying cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BackendError {
    /// Human-readable failure description
    pub message: String,
    /// Underlying cause, when one exists
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BackendError {
    /// Construct a backend error from a message alone
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Construct a backend error wrapping an underlying cause
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
