//! Image acquisition boundary.
//!
//! # Responsibility
//! - Model the platform's library picker and camera capture as a trait the
//!   core can consume without owning either implementation.
//! - Feed acquisition results into an editing session.
//!
//! # Invariants
//! - Cancellation (user dismisses without picking) is `Ok(None)`, never an
//!   error, and must leave the session untouched.
//! - A resolved image is appended in one operation; the caller serializes
//!   acquisitions with other session mutations.

use crate::model::block::ImageRef;
use crate::service::editor::EditorSession;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Which platform capability produced (or failed to produce) an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Photo-library picker.
    Library,
    /// Live camera capture.
    Camera,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Library => "library",
            Self::Camera => "camera",
        }
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acquisition failure reported by a platform image provider.
#[derive(Debug)]
pub struct AcquireError {
    pub kind: SourceKind,
    pub message: String,
}

impl Display for AcquireError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} image source failed: {}", self.kind, self.message)
    }
}

impl Error for AcquireError {}

/// One-shot image provider backed by the platform.
///
/// Implementations block until the user picks, captures, or dismisses;
/// `Ok(None)` models dismissal.
pub trait ImageSource {
    fn kind(&self) -> SourceKind;
    fn request_image(&mut self) -> Result<Option<ImageRef>, AcquireError>;
}

/// Requests one image and appends it to the session when resolved.
///
/// Returns the new block index, or `None` when the user cancelled.
pub fn acquire_into(
    session: &mut EditorSession,
    source: &mut dyn ImageSource,
) -> Result<Option<usize>, AcquireError> {
    let kind = source.kind();
    let resolved = source.request_image()?;

    match session.resolve_acquisition(resolved) {
        Some(index) => {
            info!(
                "event=image_acquire module=acquire status=ok kind={kind} note_id={} block_index={index}",
                session.note_id()
            );
            Ok(Some(index))
        }
        None => {
            info!(
                "event=image_acquire module=acquire status=cancelled kind={kind} note_id={}",
                session.note_id()
            );
            Ok(None)
        }
    }
}
