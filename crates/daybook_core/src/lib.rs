//! Core domain logic for Daybook, a journaling application.
//! This crate is the single source of truth for business invariants.

pub mod acquire;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use acquire::{acquire_into, AcquireError, ImageSource, SourceKind};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::block::{ContentBlock, ImageRef};
pub use model::note::{NoteId, NoteRecord, DEFAULT_NOTE_TITLE};
pub use repo::block_repo::{BlockRepository, SqliteBlockRepository};
pub use repo::note_repo::{NoteListQuery, NoteRepository, SqliteNoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::editor::{
    preview_text, EditorError, EditorSession, PersistenceMode, IMAGE_PREVIEW_LIMIT,
    TEXT_PREVIEW_LIMIT,
};
pub use service::journal_service::{JournalService, JournalServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
