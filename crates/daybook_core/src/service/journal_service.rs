//! Journal list use-case service.
//!
//! # Responsibility
//! - Provide note create/list/rename/bookmark/delete APIs for the journal.
//! - Keep mutation semantics write-then-read-back so callers always see
//!   persisted state.
//!
//! # Invariants
//! - Every mutation commits synchronously before returning.
//! - A failed commit surfaces as a recoverable error, never a crash.
//! - Note list is always sorted by `created_at DESC, uuid ASC`.

use crate::model::note::{NoteId, NoteRecord};
use crate::repo::note_repo::{NoteListQuery, NoteRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for journal use-cases.
#[derive(Debug)]
pub enum JournalServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for JournalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for JournalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for JournalServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Journal service facade over repository implementations.
pub struct JournalService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> JournalService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a note with creation defaults and persists it immediately.
    ///
    /// # Contract
    /// - `title = "New Note"`, `created_at = now`, not bookmarked.
    /// - Returns the persisted record for navigation into the editor.
    pub fn create_note(&self) -> Result<NoteRecord, JournalServiceError> {
        let note = NoteRecord::new();
        let id = self.repo.create_note(&note)?;
        info!("event=note_create module=journal status=ok note_id={id}");
        self.repo
            .get_note(id)?
            .ok_or(JournalServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Gets one note by stable ID.
    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<NoteRecord>> {
        self.repo.get_note(id)
    }

    /// Lists notes newest-first, restricted by a case-sensitive title
    /// substring when `filter` is non-empty.
    pub fn list_notes(&self, filter: &str) -> Result<Vec<NoteRecord>, JournalServiceError> {
        let query = NoteListQuery::with_filter(filter);
        Ok(self.repo.list_notes(&query)?)
    }

    /// Replaces the title of one note and returns the persisted record.
    pub fn rename_note(
        &self,
        id: NoteId,
        title: impl Into<String>,
    ) -> Result<NoteRecord, JournalServiceError> {
        let title = title.into();
        self.repo.rename_note(id, title.as_str())?;
        info!("event=note_rename module=journal status=ok note_id={id}");
        self.repo
            .get_note(id)?
            .ok_or(JournalServiceError::InconsistentState(
                "renamed note not found in read-back",
            ))
    }

    /// Flips the bookmark flag of one note and returns the persisted record.
    pub fn toggle_bookmark(&self, id: NoteId) -> Result<NoteRecord, JournalServiceError> {
        let current = self
            .repo
            .get_note(id)?
            .ok_or(JournalServiceError::NoteNotFound(id))?;
        self.repo.set_bookmark(id, !current.is_bookmarked)?;
        info!(
            "event=note_bookmark module=journal status=ok note_id={id} bookmarked={}",
            !current.is_bookmarked
        );
        self.repo
            .get_note(id)?
            .ok_or(JournalServiceError::InconsistentState(
                "bookmarked note not found in read-back",
            ))
    }

    /// Deletes one note together with its content blocks.
    pub fn delete_note(&self, id: NoteId) -> Result<(), JournalServiceError> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=journal status=ok note_id={id}");
        Ok(())
    }
}
