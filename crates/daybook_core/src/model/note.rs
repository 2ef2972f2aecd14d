//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its creation defaults.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `created_at` is epoch milliseconds and never changes after creation.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a journal note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Title assigned to freshly created notes before the user renames them.
pub const DEFAULT_NOTE_TITLE: &str = "New Note";

/// Persisted journal note header.
///
/// Block content is stored separately and loaded per editing session; the
/// record here is what the journal list renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Stable global ID used for navigation and block ownership.
    pub id: NoteId,
    /// User-visible title; searched by substring in the journal list.
    pub title: String,
    /// Creation instant in epoch milliseconds. List order is newest first.
    pub created_at: i64,
    /// Favourite flag toggled from the journal list.
    pub is_bookmarked: bool,
}

impl NoteRecord {
    /// Creates a new note with a generated stable ID and creation defaults.
    ///
    /// Defaults: title `"New Note"`, `created_at = now`, not bookmarked.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a new note with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(id: NoteId) -> Self {
        Self {
            id,
            title: DEFAULT_NOTE_TITLE.to_string(),
            created_at: now_epoch_ms(),
            is_bookmarked: false,
        }
    }

    /// Flips the bookmark flag in place.
    pub fn toggle_bookmark(&mut self) {
        self.is_bookmarked = !self.is_bookmarked;
    }
}

impl Default for NoteRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
