//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note list actions to Dart via FRB as sync calls.
//! - Hold one process-wide note session with write-behind persistence.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every mutation returns the full list after the action.
//! - Negative indices are out of range and never reach the store.

use log::{info, warn};
use quicknote_core::db::open_db;
use quicknote_core::{
    core_version as core_version_inner, index_from_i64, init_logging as init_logging_inner,
    ping as ping_inner, Note, NoteDraft, NotePatch, NoteStore, NotesConfig, SqliteKvStore,
    WriteBehindStore,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

type SessionStore = NoteStore<WriteBehindStore<SqliteKvStore>>;

struct NotesSession {
    db_path: PathBuf,
    store: SessionStore,
}

static SESSION: Mutex<Option<NotesSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One note as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub title: String,
    pub content: String,
}

/// List response envelope returned by every note call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    /// Whether the call reached an open session.
    pub ok: bool,
    /// Whether the requested action changed or was applied to the list.
    pub applied: bool,
    /// Full list after the call, in display order.
    pub items: Vec<NoteItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Draft response for the edit-via-delete flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraftResponse {
    /// Prefilled inputs; `None` when the index was out of range.
    pub draft: Option<NoteItem>,
    /// List after the note was removed.
    pub notes: NotesResponse,
}

/// Opens (or switches) the note session at `db_path`.
///
/// An empty `db_path` resolves `QUICKNOTE_DB_PATH` or the temp-dir default.
/// Reopening the active path keeps the current session. When opening a new
/// path fails, the previous session stays active.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_open(db_path: String) -> NotesResponse {
    let path = resolve_db_path(db_path.as_str());

    let mut session = lock_session();
    if let Some(active) = session.as_ref() {
        if active.db_path == path {
            return NotesResponse::success(&active.store, true, "Session already open.");
        }
    }

    match open_session(path) {
        Ok(opened) => {
            let response = NotesResponse::success(&opened.store, true, "Session opened.");
            // Replaced session drains its queued writes on drop.
            *session = Some(opened);
            response
        }
        Err(message) => {
            let kept = session.as_ref().map(|active| active.db_path.display().to_string());
            warn!(
                "event=ffi_session_open module=ffi status=error kept_previous={} error={message}",
                kept.is_some()
            );
            match kept {
                Some(kept) => NotesResponse::failure(format!("{message}; still using `{kept}`")),
                None => NotesResponse::failure(message),
            }
        }
    }
}

/// Returns the current list.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NotesResponse {
    with_session(|store| NotesResponse::success(store, true, "OK."))
}

/// Adds a note; blank title and content are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_add(title: String, content: String) -> NotesResponse {
    with_session(|store| {
        if store.add(title, content) {
            NotesResponse::success(store, true, "Note added.")
        } else {
            NotesResponse::success(store, false, "Title and content are both empty.")
        }
    })
}

/// Deletes the note at `index`; out of range leaves the list unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete(index: i64) -> NotesResponse {
    with_session(|store| match index_from_i64(index) {
        Some(position) => {
            let applied = position < store.len();
            store.delete(position);
            NotesResponse::success(store, applied, delete_message(applied))
        }
        None => NotesResponse::success(store, false, delete_message(false)),
    })
}

/// Merges provided fields into the note at `index`.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_edit(index: i64, title: Option<String>, content: Option<String>) -> NotesResponse {
    with_session(|store| match index_from_i64(index) {
        Some(position) => {
            let applied = position < store.len();
            store.edit(position, NotePatch { title, content });
            NotesResponse::success(store, applied, edit_message(applied))
        }
        None => NotesResponse::success(store, false, edit_message(false)),
    })
}

/// Removes the note at `index` and returns its fields to prefill the inputs.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_take_for_edit(index: i64) -> NoteDraftResponse {
    let mut draft = None;
    let notes = with_session(|store| {
        draft = index_from_i64(index).and_then(|position| store.take_for_edit(position));
        let applied = draft.is_some();
        NotesResponse::success(store, applied, delete_message(applied))
    });
    NoteDraftResponse {
        draft: draft.map(NoteItem::from),
        notes,
    }
}

/// Blocks until queued writes of the active session have landed.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_flush() -> NotesResponse {
    with_session(|store| {
        store.store().flush();
        NotesResponse::success(store, true, "Flushed.")
    })
}

/// Closes the active session, draining queued writes.
///
/// Returns `false` when no session was open.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_close() -> bool {
    let closed = lock_session().take();
    match closed {
        Some(session) => {
            info!(
                "event=ffi_session_close module=ffi status=ok count={}",
                session.store.len()
            );
            drop(session);
            true
        }
        None => false,
    }
}

impl NotesResponse {
    fn success(store: &SessionStore, applied: bool, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            applied,
            items: store.notes().iter().cloned().map(NoteItem::from).collect(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            applied: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

impl From<Note> for NoteItem {
    fn from(note: Note) -> Self {
        Self {
            title: note.title,
            content: note.content,
        }
    }
}

impl From<NoteDraft> for NoteItem {
    fn from(draft: NoteDraft) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
        }
    }
}

fn delete_message(applied: bool) -> &'static str {
    if applied {
        "Note deleted."
    } else {
        "Index out of range; nothing deleted."
    }
}

fn edit_message(applied: bool) -> &'static str {
    if applied {
        "Note updated."
    } else {
        "Index out of range; nothing updated."
    }
}

fn lock_session() -> MutexGuard<'static, Option<NotesSession>> {
    SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

fn resolve_db_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NotesConfig::from_env().db_path
    } else {
        PathBuf::from(trimmed)
    }
}

fn open_session(db_path: PathBuf) -> Result<NotesSession, String> {
    let conn = open_db(&db_path).map_err(|err| format!("notes DB open failed: {err}"))?;
    let kv = SqliteKvStore::try_new(conn).map_err(|err| format!("notes store init failed: {err}"))?;
    let write_behind =
        WriteBehindStore::spawn(kv).map_err(|err| format!("notes writer init failed: {err}"))?;
    let store = NoteStore::init(write_behind);
    info!(
        "event=ffi_session_open module=ffi status=ok count={}",
        store.len()
    );
    Ok(NotesSession { db_path, store })
}

fn with_session(f: impl FnOnce(&mut SessionStore) -> NotesResponse) -> NotesResponse {
    let mut session = lock_session();
    if session.is_none() {
        match open_session(resolve_db_path("")) {
            Ok(opened) => *session = Some(opened),
            Err(message) => {
                warn!("event=ffi_session_open module=ffi status=error error={message}");
                return NotesResponse::failure(message);
            }
        }
    }
    match session.as_mut() {
        Some(active) => f(&mut active.store),
        None => NotesResponse::failure("notes session unavailable"),
    }
}
