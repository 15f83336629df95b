//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract the note store persists through.
//! - Isolate SQLite and JSON details from the note store.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`InvalidKey`, `InvalidData`) in
//!   addition to DB transport errors.

pub mod kv_repo;
pub mod note_list_repo;
