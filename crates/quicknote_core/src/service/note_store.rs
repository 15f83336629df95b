//! Note store use-case service.
//!
//! # Responsibility
//! - Own the in-memory note list and apply add/delete/edit transitions.
//! - Mirror the full list to the key-value slot after every dispatched action.
//! - Restore the list at startup, recovering to empty on missing/corrupt data.
//!
//! # Invariants
//! - In-memory state is updated before persistence and is never rolled back.
//! - Persist failures are logged and absorbed; callers never see them.
//! - Blank add input is rejected before dispatch and does not persist.
//! - Log events carry counts and indices only, never note text.

use crate::model::note::{Note, NoteDraft, NotePatch};
use crate::reducer::{reduce, NoteAction};
use crate::repo::kv_repo::KvStore;
use crate::repo::note_list_repo::{load_note_list, save_note_list};
use log::{debug, error, info, warn};

/// Ordered note list bound to a persistence backend.
pub struct NoteStore<S: KvStore> {
    store: S,
    notes: Vec<Note>,
}

impl<S: KvStore> NoteStore<S> {
    /// Restores the persisted list from `store`.
    ///
    /// Never fails: an absent, unreadable or unparsable slot yields an empty
    /// list and a `warn` event.
    pub fn init(store: S) -> Self {
        let notes = match load_note_list(&store) {
            Ok(Some(notes)) => {
                info!(
                    "event=notes_restore module=store status=ok count={}",
                    notes.len()
                );
                notes
            }
            Ok(None) => {
                info!("event=notes_restore module=store status=empty");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=notes_restore module=store status=recovered error_code=restore_failed error={err}"
                );
                Vec::new()
            }
        };

        Self { store, notes }
    }

    /// Current list in display order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Appends a note unless both fields are blank after trimming.
    ///
    /// Stored values keep their original whitespace. Returns whether the note
    /// was accepted.
    pub fn add(&mut self, title: impl Into<String>, content: impl Into<String>) -> bool {
        let note = Note::new(title, content);
        if note.is_blank() {
            debug!("event=notes_add module=store status=rejected reason=blank");
            return false;
        }
        self.dispatch(NoteAction::Add(note));
        true
    }

    /// Removes the note at `index`; out-of-range indices change nothing.
    pub fn delete(&mut self, index: usize) -> &[Note] {
        self.dispatch(NoteAction::Delete { index })
    }

    /// Merges `patch` into the note at `index`; out of range changes nothing.
    pub fn edit(&mut self, index: usize, patch: NotePatch) -> &[Note] {
        self.dispatch(NoteAction::Edit { index, patch })
    }

    /// Applies `action` and persists the resulting list.
    ///
    /// `NoteAction::Add` passed here skips the blank-input guard of `add`.
    pub fn dispatch(&mut self, action: NoteAction) -> &[Note] {
        let label = action.label();
        let before = self.notes.len();
        self.notes = reduce(&self.notes, action);
        debug!(
            "event=notes_dispatch module=store status=ok action={label} count_before={before} count_after={}",
            self.notes.len()
        );
        self.persist();
        &self.notes
    }

    /// Submits a draft as a new note, clearing it when accepted.
    pub fn submit_draft(&mut self, draft: &mut NoteDraft) -> bool {
        let accepted = self.add(draft.title.clone(), draft.content.clone());
        if accepted {
            draft.clear();
        }
        accepted
    }

    /// Copies the note at `index` into a draft and removes it from the list.
    ///
    /// Re-submitting the draft appends it at the end, so the note does not
    /// keep its original position. Returns `None` for out-of-range indices
    /// without touching the list or storage.
    pub fn take_for_edit(&mut self, index: usize) -> Option<NoteDraft> {
        let draft = NoteDraft::from(self.notes.get(index)?.clone());
        self.delete(index);
        Some(draft)
    }

    /// Writes the full list to storage, logging and absorbing failures.
    pub fn persist(&self) {
        match save_note_list(&self.store, &self.notes) {
            Ok(()) => debug!(
                "event=notes_persist module=store status=ok count={}",
                self.notes.len()
            ),
            Err(err) => error!(
                "event=notes_persist module=store status=error count={} error={err}",
                self.notes.len()
            ),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
