//! Per-note editing session: block sequence and expansion state.
//!
//! # Responsibility
//! - Own the ordered block sequence and its per-block expansion flags for
//!   one editing session.
//! - Provide append/edit/toggle operations with defensive index checks.
//!
//! # Invariants
//! - `blocks.len() == expanded.len()` at every observable point; a block and
//!   its flag are allocated in the same operation, never via a deferred
//!   side effect.
//! - Failed operations leave the sequence unmodified.
//! - Expansion state lives only for the session; it is never persisted.

use crate::model::block::{ContentBlock, ImageRef};
use crate::model::note::NoteId;
use crate::repo::block_repo::BlockRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Character budget for collapsed text previews.
pub const TEXT_PREVIEW_LIMIT: usize = 100;

/// Maximum images shown in a collapsed image-block preview grid.
pub const IMAGE_PREVIEW_LIMIT: usize = 4;

/// Editor error for block access and persistence.
#[derive(Debug)]
pub enum EditorError {
    /// Block index is past the end of the sequence.
    IndexOutOfRange { index: usize, len: usize },
    /// Block at the index has the wrong variant for the operation.
    TypeMismatch {
        index: usize,
        expected: &'static str,
    },
    /// Persistence-layer failure during load/save.
    Repo(RepoError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "block index {index} out of range for {len} blocks")
            }
            Self::TypeMismatch { index, expected } => {
                write!(f, "block at index {index} is not a {expected} block")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EditorError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Controls whether `save` writes block content back to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceMode {
    /// Block content survives the session (default).
    #[default]
    Durable,
    /// Compatibility mode: block content lives only for the session and
    /// `save` writes nothing.
    DraftOnly,
}

/// Editing session for one note's block sequence.
///
/// The session is single-threaded UI state; callers serialize mutations,
/// including image-acquisition results handed back from pickers.
pub struct EditorSession {
    note_id: NoteId,
    blocks: Vec<ContentBlock>,
    expanded: Vec<bool>,
    mode: PersistenceMode,
}

impl EditorSession {
    /// Opens a durable session, loading any persisted blocks for the note.
    ///
    /// Loaded blocks start collapsed. A note with no blocks is seeded with
    /// one empty text block so the editor never opens blank.
    pub fn open<R: BlockRepository>(repo: &R, note_id: NoteId) -> Result<Self, EditorError> {
        Self::open_with_mode(repo, note_id, PersistenceMode::Durable)
    }

    /// Opens a session with an explicit persistence mode.
    pub fn open_with_mode<R: BlockRepository>(
        repo: &R,
        note_id: NoteId,
        mode: PersistenceMode,
    ) -> Result<Self, EditorError> {
        let blocks = repo.load_blocks(note_id)?;
        let expanded = vec![false; blocks.len()];
        let mut session = Self {
            note_id,
            blocks,
            expanded,
            mode,
        };

        if session.blocks.is_empty() {
            session.append_text_block();
        }

        Ok(session)
    }

    pub fn note_id(&self) -> NoteId {
        self.note_id
    }

    pub fn mode(&self) -> PersistenceMode {
        self.mode
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Expansion flags, index-aligned with [`Self::blocks`].
    pub fn expansion_flags(&self) -> &[bool] {
        &self.expanded
    }

    /// Appends an empty text block and returns its index.
    ///
    /// New text blocks start expanded so the user sees what they just added.
    pub fn append_text_block(&mut self) -> usize {
        self.blocks.push(ContentBlock::text(""));
        self.expanded.push(true);
        self.blocks.len() - 1
    }

    /// Appends an image block holding one image and returns its index.
    ///
    /// New image blocks start collapsed; the preview grid already shows
    /// their content.
    pub fn append_image_block(&mut self, image: ImageRef) -> usize {
        self.blocks.push(ContentBlock::single_image(image));
        self.expanded.push(false);
        self.blocks.len() - 1
    }

    /// Replaces the body of the text block at `index`.
    pub fn edit_text_block(
        &mut self,
        index: usize,
        body: impl Into<String>,
    ) -> Result<(), EditorError> {
        match self.block_mut(index)? {
            ContentBlock::Text { body: current } => {
                *current = body.into();
                Ok(())
            }
            ContentBlock::Images { .. } => Err(EditorError::TypeMismatch {
                index,
                expected: "text",
            }),
        }
    }

    /// Appends one image to the image block at `index`.
    pub fn append_image(&mut self, index: usize, image: ImageRef) -> Result<(), EditorError> {
        match self.block_mut(index)? {
            ContentBlock::Images { items } => {
                items.push(image);
                Ok(())
            }
            ContentBlock::Text { .. } => Err(EditorError::TypeMismatch {
                index,
                expected: "images",
            }),
        }
    }

    /// Flips the expansion flag of the block at `index` and returns the new
    /// state. Other blocks are unaffected; any number may be expanded.
    pub fn toggle_expansion(&mut self, index: usize) -> Result<bool, EditorError> {
        let len = self.expanded.len();
        let flag = self
            .expanded
            .get_mut(index)
            .ok_or(EditorError::IndexOutOfRange { index, len })?;
        *flag = !*flag;
        Ok(*flag)
    }

    /// Returns whether the block at `index` is expanded.
    pub fn is_expanded(&self, index: usize) -> Result<bool, EditorError> {
        self.expanded
            .get(index)
            .copied()
            .ok_or(EditorError::IndexOutOfRange {
                index,
                len: self.expanded.len(),
            })
    }

    /// Applies an image-acquisition result to the session.
    ///
    /// `None` models a dismissed picker and is a no-op; `Some` appends a new
    /// image block and returns its index.
    pub fn resolve_acquisition(&mut self, resolved: Option<ImageRef>) -> Option<usize> {
        resolved.map(|image| self.append_image_block(image))
    }

    /// Bounded prefix of the image block at `index` for the preview grid.
    pub fn preview_images(&self, index: usize, limit: usize) -> Result<&[ImageRef], EditorError> {
        match self.block(index)? {
            ContentBlock::Images { items } => Ok(&items[..items.len().min(limit)]),
            ContentBlock::Text { .. } => Err(EditorError::TypeMismatch {
                index,
                expected: "images",
            }),
        }
    }

    /// Persists the block sequence, unless the session is draft-only.
    pub fn save<R: BlockRepository>(&self, repo: &mut R) -> Result<(), EditorError> {
        if self.mode == PersistenceMode::DraftOnly {
            info!(
                "event=editor_save module=editor status=skipped mode=draft_only note_id={}",
                self.note_id
            );
            return Ok(());
        }

        repo.replace_blocks(self.note_id, &self.blocks)?;
        info!(
            "event=editor_save module=editor status=ok note_id={} blocks={}",
            self.note_id,
            self.blocks.len()
        );
        Ok(())
    }

    fn block(&self, index: usize) -> Result<&ContentBlock, EditorError> {
        let len = self.blocks.len();
        self.blocks
            .get(index)
            .ok_or(EditorError::IndexOutOfRange { index, len })
    }

    fn block_mut(&mut self, index: usize) -> Result<&mut ContentBlock, EditorError> {
        let len = self.blocks.len();
        self.blocks
            .get_mut(index)
            .ok_or(EditorError::IndexOutOfRange { index, len })
    }
}

/// Length-bounded rendering of a text block body.
///
/// Returns `body` unchanged when it holds at most `limit` characters,
/// otherwise exactly the first `limit` characters followed by `"..."`.
/// Pure function; counts characters, not bytes.
pub fn preview_text(body: &str, limit: usize) -> String {
    if body.chars().count() <= limit {
        return body.to_string();
    }

    let mut preview: String = body.chars().take(limit).collect();
    preview.push_str("...");
    preview
}
