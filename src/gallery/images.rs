// SPDX-License-Identifier: MPL-2.0
//! Image list of the open item.
//!
//! Fetches are tagged with a [`FetchTicket`]. On completion the ticket is
//! checked against the item that is open *now*: results for another item are
//! dropped, and any result for the open item replaces the list wholesale, so
//! the last fetch to complete wins.

use crate::application::port::ApiResult;
use crate::domain::{ImageRef, ItemId};
use std::collections::{HashMap, HashSet};

/// Tag for one in-flight image fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub item_id: ItemId,
    pub seq: u64,
}

/// Tag for one in-flight image deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTicket {
    pub item_id: ItemId,
    /// The reference as it appeared in the list.
    pub image: ImageRef,
    /// The backend's identity key for `image`.
    pub filename: String,
}

/// What a fetch completion did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchApplied {
    /// The list was replaced with this many images.
    Replaced(usize),
    /// The fetch failed and the list was emptied.
    Emptied,
    /// The result belonged to an item that is no longer open.
    Discarded,
}

/// Holds the image references of the open item.
#[derive(Debug, Default)]
pub struct ImageGalleryController {
    item_id: Option<ItemId>,
    images: Vec<ImageRef>,
    in_flight: HashMap<u64, ItemId>,
    deleting: HashSet<ImageRef>,
    next_seq: u64,
}

impl ImageGalleryController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fetch for `item_id`.
    ///
    /// Switching to a different item clears the current list right away;
    /// re-opening the same item keeps it until the new result lands.
    pub fn open(&mut self, item_id: &ItemId) -> FetchTicket {
        if self.item_id.as_ref() != Some(item_id) {
            self.images.clear();
            self.deleting.clear();
            self.item_id = Some(item_id.clone());
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight.insert(seq, item_id.clone());
        FetchTicket {
            item_id: item_id.clone(),
            seq,
        }
    }

    /// Applies a fetch completion.
    pub fn apply_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: ApiResult<Vec<ImageRef>>,
    ) -> FetchApplied {
        self.in_flight.remove(&ticket.seq);

        if self.item_id.as_ref() != Some(&ticket.item_id) {
            log::warn!(
                "discarding images fetched for {} (open: {:?})",
                ticket.item_id,
                self.item_id.as_ref().map(ItemId::as_str)
            );
            return FetchApplied::Discarded;
        }

        match result {
            Ok(images) => {
                self.images = images;
                FetchApplied::Replaced(self.images.len())
            }
            Err(err) => {
                log::warn!("failed to fetch images of {}: {}", ticket.item_id, err);
                self.images.clear();
                FetchApplied::Emptied
            }
        }
    }

    /// Prepares deletion of `image` from `item_id`.
    ///
    /// Returns `None` while a deletion of the same reference is pending.
    pub fn begin_delete(&mut self, item_id: &ItemId, image: &ImageRef) -> Option<DeleteTicket> {
        if !self.deleting.insert(image.clone()) {
            return None;
        }
        Some(DeleteTicket {
            item_id: item_id.clone(),
            image: image.clone(),
            filename: image.filename().to_string(),
        })
    }

    /// Applies a deletion completion. Returns how many entries were removed.
    ///
    /// Only a successful deletion for the open item touches the list, and only
    /// entries equal to the original reference go.
    pub fn apply_delete(&mut self, ticket: &DeleteTicket, result: &ApiResult<()>) -> usize {
        self.deleting.remove(&ticket.image);

        if result.is_err() || self.item_id.as_ref() != Some(&ticket.item_id) {
            return 0;
        }

        let before = self.images.len();
        self.images.retain(|image| image != &ticket.image);
        before - self.images.len()
    }

    /// Forgets the open item and its images.
    pub fn close(&mut self) {
        self.item_id = None;
        self.images.clear();
        self.deleting.clear();
    }

    #[must_use]
    pub fn item_id(&self) -> Option<&ItemId> {
        self.item_id.as_ref()
    }

    #[must_use]
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    /// Returns whether a fetch for the open item is still running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.item_id
            .as_ref()
            .is_some_and(|open| self.in_flight.values().any(|id| id == open))
    }

    #[must_use]
    pub fn is_deleting(&self, image: &ImageRef) -> bool {
        self.deleting.contains(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::ApiError;

    fn refs(values: &[&str]) -> Vec<ImageRef> {
        values.iter().map(|v| ImageRef::new(*v)).collect()
    }

    #[test]
    fn completion_replaces_list_and_clears_loading() {
        let mut gallery = ImageGalleryController::new();
        let ticket = gallery.open(&ItemId::new("a"));
        assert!(gallery.is_loading());

        let applied = gallery.apply_fetch(&ticket, Ok(refs(&["a/1.jpg", "a/2.jpg"])));
        assert_eq!(applied, FetchApplied::Replaced(2));
        assert!(!gallery.is_loading());
    }

    #[test]
    fn result_for_other_item_is_discarded() {
        let mut gallery = ImageGalleryController::new();
        let stale = gallery.open(&ItemId::new("a"));
        let current = gallery.open(&ItemId::new("b"));

        assert_eq!(
            gallery.apply_fetch(&stale, Ok(refs(&["a/1.jpg"]))),
            FetchApplied::Discarded
        );
        assert!(gallery.images().is_empty());
        assert!(gallery.is_loading());

        gallery.apply_fetch(&current, Ok(refs(&["b/1.jpg"])));
        assert_eq!(gallery.images(), refs(&["b/1.jpg"]).as_slice());
    }

    #[test]
    fn last_completion_for_open_item_wins() {
        let mut gallery = ImageGalleryController::new();
        let id = ItemId::new("a");
        let first = gallery.open(&id);
        let second = gallery.open(&id);

        gallery.apply_fetch(&second, Ok(refs(&["a/new.jpg"])));
        gallery.apply_fetch(&first, Ok(refs(&["a/old.jpg"])));

        assert_eq!(gallery.images(), refs(&["a/old.jpg"]).as_slice());
        assert!(!gallery.is_loading());
    }

    #[test]
    fn failed_fetch_empties_list() {
        let mut gallery = ImageGalleryController::new();
        let id = ItemId::new("a");
        let ticket = gallery.open(&id);
        gallery.apply_fetch(&ticket, Ok(refs(&["a/1.jpg"])));

        let ticket = gallery.open(&id);
        let applied = gallery.apply_fetch(&ticket, Err(ApiError::Transport("down".into())));
        assert_eq!(applied, FetchApplied::Emptied);
        assert!(gallery.images().is_empty());
        assert!(!gallery.is_loading());
    }

    #[test]
    fn delete_normalizes_and_removes_original_value() {
        let mut gallery = ImageGalleryController::new();
        let id = ItemId::new("a");
        let ticket = gallery.open(&id);
        let original = ImageRef::new("https://cdn/a/photo.jpg?x=1");
        gallery.apply_fetch(
            &ticket,
            Ok(vec![original.clone(), ImageRef::new("https://cdn/a/other.jpg")]),
        );

        let delete = gallery.begin_delete(&id, &original).expect("ticket");
        assert_eq!(delete.filename, "photo.jpg");
        assert!(gallery.begin_delete(&id, &original).is_none());

        assert_eq!(gallery.apply_delete(&delete, &Ok(())), 1);
        assert_eq!(gallery.images(), refs(&["https://cdn/a/other.jpg"]).as_slice());
        assert!(!gallery.is_deleting(&original));
    }

    #[test]
    fn failed_delete_leaves_list_unchanged() {
        let mut gallery = ImageGalleryController::new();
        let id = ItemId::new("a");
        let ticket = gallery.open(&id);
        gallery.apply_fetch(&ticket, Ok(refs(&["a/1.jpg"])));

        let delete = gallery
            .begin_delete(&id, &ImageRef::new("a/1.jpg"))
            .expect("ticket");
        let removed =
            gallery.apply_delete(&delete, &Err(ApiError::Rejected("File not found".into())));

        assert_eq!(removed, 0);
        assert_eq!(gallery.images().len(), 1);
    }

    #[test]
    fn close_stops_reporting_loading() {
        let mut gallery = ImageGalleryController::new();
        let ticket = gallery.open(&ItemId::new("a"));
        gallery.close();
        assert!(!gallery.is_loading());
        assert_eq!(
            gallery.apply_fetch(&ticket, Ok(refs(&["a/1.jpg"]))),
            FetchApplied::Discarded
        );
    }
}
