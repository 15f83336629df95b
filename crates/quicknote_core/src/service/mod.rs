//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate reducer transitions and persistence into use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod note_store;
