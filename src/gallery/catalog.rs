// SPDX-License-Identifier: MPL-2.0
//! Item catalog store.
//!
//! Holds the full item list and the short "recent" list. Both are read-only
//! snapshots of the backend, replaced wholesale on every completed load. A
//! failed load yields an empty list; nothing is retried here.

use crate::application::port::ApiResult;
use crate::domain::{Item, ItemId};

/// One of the two catalog views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogView {
    All,
    Recent,
}

#[derive(Debug, Default)]
struct ViewState {
    items: Vec<Item>,
    loaded: bool,
    pending: usize,
    latest_seq: u64,
    applied_seq: u64,
}

impl ViewState {
    fn begin(&mut self) -> u64 {
        self.pending += 1;
        self.latest_seq += 1;
        self.latest_seq
    }

    /// Returns `false` when an already applied load was issued after `seq`.
    fn apply(&mut self, seq: u64, result: ApiResult<Vec<Item>>, view: CatalogView) -> bool {
        self.pending = self.pending.saturating_sub(1);
        self.loaded = true;

        if seq < self.applied_seq {
            log::warn!("discarding {view:?} catalog load #{seq}, #{} already applied", self.applied_seq);
            return false;
        }
        self.applied_seq = seq;

        match result {
            Ok(items) => self.items = items,
            Err(err) => {
                log::warn!("failed to load {view:?} catalog: {err}");
                self.items.clear();
            }
        }
        true
    }
}

/// Full and recent item lists.
#[derive(Debug, Default)]
pub struct ItemCatalogStore {
    all: ViewState,
    recent: ViewState,
}

impl ItemCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a full load (also used for refresh). Returns its sequence number.
    pub fn begin_load_all(&mut self) -> u64 {
        self.all.begin()
    }

    /// Applies a full load completion.
    ///
    /// Returns `false` if a later-issued load has already been applied, in
    /// which case the list is left alone.
    pub fn apply_load_all(&mut self, seq: u64, result: ApiResult<Vec<Item>>) -> bool {
        self.all.apply(seq, result, CatalogView::All)
    }

    /// Starts a recent-items load. Returns its sequence number.
    pub fn begin_load_recent(&mut self) -> u64 {
        self.recent.begin()
    }

    /// Applies a recent-items load completion.
    pub fn apply_load_recent(&mut self, seq: u64, result: ApiResult<Vec<Item>>) -> bool {
        self.recent.apply(seq, result, CatalogView::Recent)
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.all.items
    }

    #[must_use]
    pub fn recent(&self) -> &[Item] {
        &self.recent.items
    }

    /// Looks an item up in the full list.
    #[must_use]
    pub fn resolve(&self, id: &ItemId) -> Option<&Item> {
        self.all.items.iter().find(|item| &item.id == id)
    }

    /// Returns whether at least one full load has completed.
    #[must_use]
    pub fn has_loaded(&self) -> bool {
        self.all.loaded
    }

    #[must_use]
    pub fn is_loading(&self, view: CatalogView) -> bool {
        match view {
            CatalogView::All => self.all.pending > 0,
            CatalogView::Recent => self.recent.pending > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::ApiError;

    #[test]
    fn load_replaces_and_resolves() {
        let mut store = ItemCatalogStore::new();
        assert!(!store.has_loaded());

        let seq = store.begin_load_all();
        assert!(store.is_loading(CatalogView::All));
        assert!(store.apply_load_all(seq, Ok(vec![Item::new("a", "A"), Item::new("b", "B")])));

        assert!(store.has_loaded());
        assert!(!store.is_loading(CatalogView::All));
        assert_eq!(store.resolve(&ItemId::new("b")).map(|i| i.display_name.as_str()), Some("B"));
        assert!(store.resolve(&ItemId::new("zz")).is_none());
    }

    #[test]
    fn failure_yields_empty_list() {
        let mut store = ItemCatalogStore::new();
        let seq = store.begin_load_all();
        store.apply_load_all(seq, Ok(vec![Item::new("a", "A")]));

        let seq = store.begin_load_all();
        store.apply_load_all(seq, Err(ApiError::Transport("offline".into())));

        assert!(store.items().is_empty());
        assert!(store.has_loaded());
        assert!(!store.is_loading(CatalogView::All));
    }

    #[test]
    fn older_load_does_not_overwrite_newer() {
        let mut store = ItemCatalogStore::new();
        let first = store.begin_load_all();
        let second = store.begin_load_all();

        assert!(store.apply_load_all(second, Ok(vec![Item::new("new", "New")])));
        assert!(!store.apply_load_all(first, Ok(vec![Item::new("old", "Old")])));

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].id.as_str(), "new");
        assert!(!store.is_loading(CatalogView::All));
    }

    #[test]
    fn recent_view_is_independent() {
        let mut store = ItemCatalogStore::new();
        let seq = store.begin_load_recent();
        assert!(store.is_loading(CatalogView::Recent));
        assert!(!store.is_loading(CatalogView::All));

        store.apply_load_recent(seq, Ok(vec![Item::new("r", "R")]));
        assert_eq!(store.recent().len(), 1);
        assert!(store.items().is_empty());
        assert!(!store.has_loaded());
    }
}
