//! Core domain logic for QuickNote.
//! This crate is the single source of truth for note list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod reducer;
pub mod repo;
pub mod service;

pub use config::{ConfigError, NotesConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{is_blank_note, Note, NoteDraft, NotePatch};
pub use persist::write_behind::WriteBehindStore;
pub use reducer::{reduce, NoteAction};
pub use repo::kv_repo::{KvStore, RepoError, RepoResult, SqliteKvStore};
pub use repo::note_list_repo::{load_note_list, save_note_list, NOTES_KEY};
pub use service::note_store::NoteStore;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Converts a boundary-supplied signed index into a list position.
///
/// Negative values have no position and map to `None`.
pub fn index_from_i64(index: i64) -> Option<usize> {
    usize::try_from(index).ok()
}

#[cfg(test)]
mod tests {
    use super::{core_version, index_from_i64, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn negative_index_has_no_position() {
        assert_eq!(index_from_i64(-1), None);
        assert_eq!(index_from_i64(3), Some(3));
    }
}
