//! Storage backends for burrow
//!
//! This crate ships the reference `StorageBackend` implementation:
//! - `MemoryBackend`: an in-process, insertion-ordered document store guarded
//!   by `parking_lot::RwLock`
//!
//! Real drivers live outside this workspace; they implement
//! `burrow_core::StorageBackend` and plug into the model facade unchanged.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;

pub use memory::MemoryBackend;
