//! Note list codec over a key-value slot.
//!
//! # Responsibility
//! - Encode the full note list as one JSON array under `NOTES_KEY`.
//! - Decode it back, distinguishing "never written" from "corrupt".
//!
//! # Invariants
//! - The list is always written wholesale; there is no incremental update.
//! - Element order in storage equals list order.

use crate::model::note::Note;
use crate::repo::kv_repo::{KvStore, RepoError, RepoResult};

/// Storage key holding the serialized note list.
pub const NOTES_KEY: &str = "notes";

/// Loads the persisted note list.
///
/// Returns `Ok(None)` when nothing was persisted yet.
///
/// # Errors
/// - `RepoError::InvalidData` when the stored value is not a JSON array of
///   note objects.
/// - Any error returned by the underlying store.
pub fn load_note_list<S: KvStore + ?Sized>(store: &S) -> RepoResult<Option<Vec<Note>>> {
    let Some(raw) = store.get(NOTES_KEY)? else {
        return Ok(None);
    };

    serde_json::from_str::<Vec<Note>>(&raw)
        .map(Some)
        .map_err(|err| RepoError::InvalidData(format!("`{NOTES_KEY}` is not a note list: {err}")))
}

/// Replaces the persisted note list with `notes`.
pub fn save_note_list<S: KvStore + ?Sized>(store: &S, notes: &[Note]) -> RepoResult<()> {
    let encoded = serde_json::to_string(notes).map_err(|err| {
        RepoError::InvalidData(format!("failed to encode `{NOTES_KEY}`: {err}"))
    })?;
    store.set(NOTES_KEY, &encoded)
}
