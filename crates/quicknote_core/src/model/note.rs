//! Note domain model.
//!
//! # Responsibility
//! - Define the `{title, content}` record stored in the note list.
//! - Provide merge semantics for partial edits.
//!
//! # Invariants
//! - Titles and contents are stored exactly as given (never trimmed).
//! - Decoding tolerates missing fields (empty string) and unknown fields.

use serde::{Deserialize, Serialize};

/// One title/content pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Returns whether both fields are empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        is_blank_note(&self.title, &self.content)
    }

    /// Overwrites fields present in `patch`; absent fields keep their value.
    pub fn apply_patch(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
    }
}

/// Partial update for an existing note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(content.into()),
        }
    }
}

/// In-progress title/content inputs waiting to be submitted as a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }

    pub fn is_blank(&self) -> bool {
        is_blank_note(&self.title, &self.content)
    }
}

impl From<Note> for NoteDraft {
    fn from(note: Note) -> Self {
        Self {
            title: note.title,
            content: note.content,
        }
    }
}

/// Returns whether a note with these fields should be rejected on add.
pub fn is_blank_note(title: &str, content: &str) -> bool {
    title.trim().is_empty() && content.trim().is_empty()
}
