//! Notes domain model.
//!
//! # Responsibility
//! - Define the note record persisted as one element of the note list.
//! - Define patch and draft shapes used by edit and input flows.
//!
//! # Invariants
//! - A note has no identifier; its position in the list is its only handle.

pub mod note;
