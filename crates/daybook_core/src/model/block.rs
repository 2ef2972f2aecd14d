//! Content-block domain model.
//!
//! # Responsibility
//! - Define the tagged union of note content units (text or image set).
//!
//! # Invariants
//! - A block is either text or images, never both.
//! - Image blocks keep their items in insertion order.

use serde::{Deserialize, Serialize};

/// Opaque reference to a picked or captured image.
///
/// The core never decodes pixels; it stores whatever URI the platform's
/// image provider hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub uri: String,
}

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// One unit of note content.
///
/// Blocks are addressed by position in the owning note's ordered sequence;
/// there is no per-block persisted identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Free-form text.
    Text { body: String },
    /// Ordered set of images, grown by in-place append.
    Images { items: Vec<ImageRef> },
}

impl ContentBlock {
    /// Creates a text block.
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text { body: body.into() }
    }

    /// Creates an image block holding a single image.
    pub fn single_image(image: ImageRef) -> Self {
        Self::Images { items: vec![image] }
    }

    /// Creates an image block from an existing item list.
    pub fn images(items: Vec<ImageRef>) -> Self {
        Self::Images { items }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    pub fn is_images(&self) -> bool {
        matches!(self, Self::Images { .. })
    }

    /// Storage discriminator for the block kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Images { .. } => "images",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentBlock, ImageRef};

    #[test]
    fn constructors_set_expected_variants() {
        assert!(ContentBlock::text("hello").is_text());
        assert!(ContentBlock::single_image(ImageRef::new("a.jpg")).is_images());
    }

    #[test]
    fn kind_name_matches_storage_discriminator() {
        assert_eq!(ContentBlock::text("x").kind_name(), "text");
        assert_eq!(ContentBlock::images(Vec::new()).kind_name(), "images");
    }
}
