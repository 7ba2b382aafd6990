// SPDX-License-Identifier: MPL-2.0
//! Similarity search results.

use super::image::ImageRef;
use super::item::ItemId;

/// One item ranked against a query image. Lower distance means closer.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    /// Matched item.
    pub item_id: ItemId,
    /// Item name, when the backend knows it.
    pub item_name: Option<String>,
    /// Embedding distance to the query image.
    pub distance: f64,
    /// Preview of the matched image, if available.
    pub preview_image: Option<ImageRef>,
}

impl SimilarityMatch {
    /// Returns the name to show: the item name, or the id when unnamed.
    #[must_use]
    pub fn label(&self) -> &str {
        self.item_name.as_deref().unwrap_or(self.item_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_falls_back_to_id() {
        let hit = SimilarityMatch {
            item_id: ItemId::new("x9"),
            item_name: None,
            distance: 0.25,
            preview_image: None,
        };
        assert_eq!(hit.label(), "x9");
    }
}
