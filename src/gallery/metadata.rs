// SPDX-License-Identifier: MPL-2.0
//! Free-text metadata editor for the open item.

use crate::application::port::ApiResult;
use crate::domain::{Item, ItemId};

/// A metadata save waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub item_id: ItemId,
    pub text: String,
}

/// Editable copy of one item's `meta_text`.
///
/// The text is only re-initialized when the open item changes identity, so
/// catalog refreshes never clobber what the user is typing.
#[derive(Debug, Default)]
pub struct MetadataEditor {
    item_id: Option<ItemId>,
    text: String,
    saving: bool,
    dirty: bool,
}

impl MetadataEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows the open item. Returns `true` if the text was re-initialized.
    pub fn sync_to(&mut self, item: Option<&Item>) -> bool {
        let next = item.map(|item| &item.id);
        if self.item_id.as_ref() == next {
            return false;
        }
        match item {
            Some(item) => {
                self.item_id = Some(item.id.clone());
                self.text = item.meta_text.clone();
            }
            None => {
                self.item_id = None;
                self.text.clear();
            }
        }
        self.saving = false;
        self.dirty = false;
        true
    }

    /// Replaces the text with the user's edit.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    /// Starts a save of the current text.
    ///
    /// Returns `None` when no item is open or a save is already running.
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if self.saving {
            return None;
        }
        let item_id = self.item_id.clone()?;
        self.saving = true;
        Some(SaveRequest {
            item_id,
            text: self.text.clone(),
        })
    }

    /// Applies a save completion. The text is kept either way.
    ///
    /// Returns `false` if the editor has moved on to another item.
    pub fn apply_save(&mut self, item_id: &ItemId, result: &ApiResult<()>) -> bool {
        if self.item_id.as_ref() != Some(item_id) {
            return false;
        }
        self.saving = false;
        if result.is_ok() {
            self.dirty = false;
        }
        true
    }

    /// Forgets the item and its text.
    pub fn reset(&mut self) {
        self.sync_to(None);
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn item_id(&self) -> Option<&ItemId> {
        self.item_id.as_ref()
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Returns whether the text has edits not yet saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::ApiError;

    #[test]
    fn text_only_resets_on_identity_change() {
        let mut editor = MetadataEditor::new();
        let item = Item::new("a", "A").with_meta_text("steel");
        assert!(editor.sync_to(Some(&item)));
        editor.edit("stainless steel");

        let refreshed = Item::new("a", "A").with_meta_text("steel (server)");
        assert!(!editor.sync_to(Some(&refreshed)));
        assert_eq!(editor.text(), "stainless steel");

        let other = Item::new("b", "B").with_meta_text("brass");
        assert!(editor.sync_to(Some(&other)));
        assert_eq!(editor.text(), "brass");
    }

    #[test]
    fn failed_save_keeps_text() {
        let mut editor = MetadataEditor::new();
        editor.sync_to(Some(&Item::new("a", "A")));
        editor.edit("new text");

        let request = editor.begin_save().expect("save starts");
        assert!(editor.begin_save().is_none());
        assert!(editor.apply_save(&request.item_id, &Err(ApiError::Transport("x".into()))));

        assert!(!editor.is_saving());
        assert!(editor.is_dirty());
        assert_eq!(editor.text(), "new text");
    }

    #[test]
    fn successful_save_only_clears_flags() {
        let mut editor = MetadataEditor::new();
        editor.sync_to(Some(&Item::new("a", "A")));
        editor.edit("saved");

        let request = editor.begin_save().expect("save starts");
        assert_eq!(request.text, "saved");
        editor.apply_save(&request.item_id, &Ok(()));

        assert!(!editor.is_saving());
        assert!(!editor.is_dirty());
        assert_eq!(editor.text(), "saved");
    }

    #[test]
    fn save_without_item_is_refused() {
        let mut editor = MetadataEditor::new();
        assert!(editor.begin_save().is_none());
    }

    #[test]
    fn late_completion_for_previous_item_is_ignored() {
        let mut editor = MetadataEditor::new();
        editor.sync_to(Some(&Item::new("a", "A")));
        let request = editor.begin_save().expect("save starts");

        editor.sync_to(Some(&Item::new("b", "B")));
        assert!(!editor.apply_save(&request.item_id, &Ok(())));
        assert!(!editor.is_saving());
    }
}
