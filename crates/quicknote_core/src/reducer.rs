//! Pure note list transitions.
//!
//! # Responsibility
//! - Map `(current list, action)` to the next list without side effects.
//!
//! # Invariants
//! - `reduce` is total: out-of-range indices yield an equal list, never an error.
//! - Relative order of untouched notes is preserved by every action.
//! - Blank-input rejection is a caller guard, not a reducer rule.

use crate::model::note::{Note, NotePatch};

/// Mutation applied to the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteAction {
    /// Append a note at the end.
    Add(Note),
    /// Remove the note at `index`.
    Delete { index: usize },
    /// Merge `patch` into the note at `index`.
    Edit { index: usize, patch: NotePatch },
}

impl NoteAction {
    /// Stable action label used in log events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Delete { .. } => "delete",
            Self::Edit { .. } => "edit",
        }
    }
}

/// Returns the list that results from applying `action` to `notes`.
pub fn reduce(notes: &[Note], action: NoteAction) -> Vec<Note> {
    match action {
        NoteAction::Add(note) => {
            let mut next = Vec::with_capacity(notes.len() + 1);
            next.extend_from_slice(notes);
            next.push(note);
            next
        }
        NoteAction::Delete { index } => notes
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, note)| note.clone())
            .collect(),
        NoteAction::Edit { index, patch } => {
            let mut next = notes.to_vec();
            if let Some(note) = next.get_mut(index) {
                note.apply_patch(patch);
            }
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{reduce, NoteAction};
    use crate::model::note::{Note, NotePatch};

    fn sample() -> Vec<Note> {
        vec![
            Note::new("a", "1"),
            Note::new("b", "2"),
            Note::new("c", "3"),
        ]
    }

    #[test]
    fn add_appends_at_end() {
        let next = reduce(&sample(), NoteAction::Add(Note::new("d", "4")));
        assert_eq!(next.len(), 4);
        assert_eq!(next.last(), Some(&Note::new("d", "4")));
        assert_eq!(&next[..3], sample().as_slice());
    }

    #[test]
    fn add_does_not_filter_blank_notes() {
        let next = reduce(&[], NoteAction::Add(Note::default()));
        assert_eq!(next, vec![Note::default()]);
    }

    #[test]
    fn delete_removes_only_target_and_keeps_order() {
        let next = reduce(&sample(), NoteAction::Delete { index: 1 });
        assert_eq!(next, vec![Note::new("a", "1"), Note::new("c", "3")]);
    }

    #[test]
    fn delete_out_of_range_is_noop() {
        assert_eq!(reduce(&sample(), NoteAction::Delete { index: 3 }), sample());
        assert_eq!(
            reduce(&sample(), NoteAction::Delete { index: usize::MAX }),
            sample()
        );
    }

    #[test]
    fn edit_merges_patch_in_place() {
        let next = reduce(
            &sample(),
            NoteAction::Edit {
                index: 2,
                patch: NotePatch::content("three"),
            },
        );
        assert_eq!(next[2], Note::new("c", "three"));
        assert_eq!(&next[..2], &sample()[..2]);
    }

    #[test]
    fn edit_out_of_range_is_noop() {
        let next = reduce(
            &sample(),
            NoteAction::Edit {
                index: 10,
                patch: NotePatch::title("X"),
            },
        );
        assert_eq!(next, sample());
    }
}
