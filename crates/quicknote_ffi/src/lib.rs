//! Flutter bridge for QuickNote core.

pub mod api;
