// SPDX-License-Identifier: MPL-2.0
//! Catalog item types.

use super::image::ImageRef;
use std::fmt;

// =============================================================================
// ItemId
// =============================================================================

/// Opaque, externally generated identifier of a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the identifier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ItemId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A cataloged physical object.
///
/// Items are owned by the catalog store. Views hold read-only snapshots;
/// metadata edits go through the metadata editor and are reconciled by
/// re-fetching the catalog, never by patching an entry in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Unique identifier.
    pub id: ItemId,
    /// Human-readable name (the backend falls back to the id).
    pub display_name: String,
    /// First stored image, if the item has any.
    pub preview_image: Option<ImageRef>,
    /// Free-text metadata.
    pub meta_text: String,
    /// Creation time in seconds since the Unix epoch, when reported.
    pub created_at: Option<f64>,
}

impl Item {
    /// Creates an item with no preview, no metadata and no creation time.
    pub fn new(id: impl Into<ItemId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            preview_image: None,
            meta_text: String::new(),
            created_at: None,
        }
    }

    /// Sets the metadata text.
    #[must_use]
    pub fn with_meta_text(mut self, meta_text: impl Into<String>) -> Self {
        self.meta_text = meta_text.into();
        self
    }

    /// Sets the preview image.
    #[must_use]
    pub fn with_preview(mut self, preview: ImageRef) -> Self {
        self.preview_image = Some(preview);
        self
    }
}
