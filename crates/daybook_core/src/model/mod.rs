//! Domain model for journal entries and their content.
//!
//! # Responsibility
//! - Define the canonical note and content-block shapes used by core logic.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Content blocks carry no independent persisted identity; they are
//!   addressed by position within their owning note.

pub mod block;
pub mod note;
