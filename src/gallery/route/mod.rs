// SPDX-License-Identifier: MPL-2.0
//! Address-driven open/closed state of the item detail view.
//!
//! The navigation address is the single source of truth for which item is
//! open. [`RouteModalBinder`] is the only component that encodes or decodes
//! it; everybody else asks the binder.
//!
//! Opening an item is split in two steps. The address first puts the binder
//! in [`RouteState::Open`]; the item is *activated* (its images fetched) only
//! once the catalog resolves the id, and only once per distinct id. A
//! deep link to an unknown id therefore stays open in the address but never
//! becomes visible.

mod codec;
mod history;

pub use codec::{AddressCodec, RouteScheme, ITEM_PARAM};
pub use history::NavigationHistory;

use super::catalog::ItemCatalogStore;
use crate::domain::ItemId;

/// Whether the address carries an item id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RouteState {
    #[default]
    Closed,
    Open(ItemId),
}

/// Effects produced by address transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Effect {
    /// No effect.
    None,
    /// The given item stopped being active; its staged files and images
    /// must be released now.
    Deactivated(ItemId),
}

/// Binds the navigation address to the open item.
#[derive(Debug)]
pub struct RouteModalBinder {
    codec: AddressCodec,
    history: NavigationHistory,
    state: RouteState,
    /// Address to go back to on `close()`.
    closed_address: String,
    activated: Option<ItemId>,
}

impl RouteModalBinder {
    /// Creates a binder whose history starts at `address`.
    pub fn new(scheme: RouteScheme, address: impl Into<String>) -> Self {
        let codec = AddressCodec::new(scheme);
        let history = NavigationHistory::new(address);
        let mut binder = Self {
            codec,
            closed_address: scheme.root().to_string(),
            history,
            state: RouteState::Closed,
            activated: None,
        };
        binder.mount();
        binder
    }

    /// Re-derives the state from the current address.
    ///
    /// Nothing is activated here; call [`reconcile`](Self::reconcile) once
    /// the catalog has loaded.
    pub fn mount(&mut self) {
        let current = self.history.current();
        self.state = match self.codec.decode(current) {
            Some(id) => {
                self.closed_address = self.codec.encode_closed(current);
                RouteState::Open(id)
            }
            None => {
                self.closed_address = current.to_string();
                RouteState::Closed
            }
        };
        self.activated = None;
    }

    /// Opens `id`, writing it into the address.
    pub fn select(&mut self, id: &ItemId) -> Effect {
        if self.selected_id() == Some(id) {
            return Effect::None;
        }
        if self.state == RouteState::Closed {
            self.closed_address = self.history.current().to_string();
        }
        let address = self.codec.encode_open(self.history.current(), id);
        self.history.push(address);
        self.transition(RouteState::Open(id.clone()))
    }

    /// Closes the view, restoring the address it was opened from.
    pub fn close(&mut self) -> Effect {
        if self.state == RouteState::Closed {
            return Effect::None;
        }
        self.history.push(self.closed_address.clone());
        self.transition(RouteState::Closed)
    }

    /// Handles a directly entered address.
    pub fn navigate(&mut self, address: impl Into<String>) -> Effect {
        self.history.push(address);
        self.sync_from_address()
    }

    /// Steps back in history. Returns `None` at the start of history.
    pub fn back(&mut self) -> Option<Effect> {
        self.history.back()?;
        Some(self.sync_from_address())
    }

    /// Steps forward in history. Returns `None` at the end of history.
    pub fn forward(&mut self) -> Option<Effect> {
        self.history.forward()?;
        Some(self.sync_from_address())
    }

    fn sync_from_address(&mut self) -> Effect {
        let current = self.history.current();
        match self.codec.decode(current) {
            Some(id) => {
                if self.state == RouteState::Closed {
                    self.closed_address = self.codec.encode_closed(current);
                }
                self.transition(RouteState::Open(id))
            }
            None => {
                self.closed_address = current.to_string();
                self.transition(RouteState::Closed)
            }
        }
    }

    fn transition(&mut self, next: RouteState) -> Effect {
        if self.state == next {
            return Effect::None;
        }
        log::debug!("route {:?} -> {:?}", self.state, next);
        self.state = next;

        let still_active = matches!(
            (&self.state, &self.activated),
            (RouteState::Open(open), Some(active)) if open == active
        );
        match self.activated.take() {
            Some(active) if !still_active => Effect::Deactivated(active),
            other => {
                self.activated = other;
                Effect::None
            }
        }
    }

    /// Activates the open item if the catalog now resolves it.
    ///
    /// Returns the id to fetch images for, at most once per distinct id.
    pub fn reconcile(&mut self, catalog: &ItemCatalogStore) -> Option<ItemId> {
        let RouteState::Open(id) = &self.state else {
            return None;
        };
        if self.activated.as_ref() == Some(id) || catalog.resolve(id).is_none() {
            return None;
        }
        log::debug!("activating item {id}");
        self.activated = Some(id.clone());
        Some(id.clone())
    }

    /// Returns whether the detail view should be shown.
    #[must_use]
    pub fn is_visible(&self, catalog: &ItemCatalogStore) -> bool {
        match (&self.state, &self.activated) {
            (RouteState::Open(open), Some(active)) => {
                open == active && catalog.resolve(open).is_some()
            }
            _ => false,
        }
    }

    /// Id in the address, resolved or not.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ItemId> {
        match &self.state {
            RouteState::Open(id) => Some(id),
            RouteState::Closed => None,
        }
    }

    /// Id of the item whose images have been requested.
    #[must_use]
    pub fn active_id(&self) -> Option<&ItemId> {
        self.activated.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> &RouteState {
        &self.state
    }

    #[must_use]
    pub fn address(&self) -> &str {
        self.history.current()
    }

    #[must_use]
    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    #[must_use]
    pub fn codec(&self) -> AddressCodec {
        self.codec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;

    fn catalog(ids: &[&str]) -> ItemCatalogStore {
        let mut store = ItemCatalogStore::new();
        let seq = store.begin_load_all();
        store.apply_load_all(seq, Ok(ids.iter().map(|id| Item::new(*id, *id)).collect()));
        store
    }

    #[test]
    fn select_then_close_restores_address() {
        for (scheme, start) in [
            (RouteScheme::Path, "/"),
            (RouteScheme::Query, "/items?tab=2"),
            (RouteScheme::Path, "/?sort=name"),
        ] {
            let mut binder = RouteModalBinder::new(scheme, start);
            let _ = binder.select(&ItemId::new("a"));
            assert_ne!(binder.address(), start);
            let _ = binder.close();
            assert_eq!(binder.address(), start, "{scheme:?}");
        }
    }

    #[test]
    fn deep_link_activates_once_catalog_resolves() {
        let mut binder = RouteModalBinder::new(RouteScheme::Path, "/item/a");
        assert_eq!(binder.selected_id(), Some(&ItemId::new("a")));

        let empty = ItemCatalogStore::new();
        assert_eq!(binder.reconcile(&empty), None);
        assert!(!binder.is_visible(&empty));

        let store = catalog(&["a"]);
        assert_eq!(binder.reconcile(&store), Some(ItemId::new("a")));
        assert_eq!(binder.reconcile(&store), None);
        assert!(binder.is_visible(&store));
    }

    #[test]
    fn deep_link_to_unknown_id_stays_invisible_and_keeps_address() {
        let mut binder = RouteModalBinder::new(RouteScheme::Query, "/items?itemId=ghost");
        let store = catalog(&["a", "b"]);

        assert_eq!(binder.reconcile(&store), None);
        assert!(!binder.is_visible(&store));
        assert_eq!(binder.address(), "/items?itemId=ghost");
    }

    #[test]
    fn deep_link_close_goes_to_closed_shape() {
        let mut binder = RouteModalBinder::new(RouteScheme::Query, "/items?tab=1&itemId=a");
        let _ = binder.close();
        assert_eq!(binder.address(), "/items?tab=1");
    }

    #[test]
    fn back_to_closed_deactivates() {
        let store = catalog(&["a"]);
        let mut binder = RouteModalBinder::new(RouteScheme::Path, "/");
        assert_eq!(binder.select(&ItemId::new("a")), Effect::None);
        binder.reconcile(&store);

        assert_eq!(binder.back(), Some(Effect::Deactivated(ItemId::new("a"))));
        assert_eq!(binder.state(), &RouteState::Closed);
        assert!(!binder.is_visible(&store));

        assert_eq!(binder.forward(), Some(Effect::None));
        assert_eq!(binder.reconcile(&store), Some(ItemId::new("a")));
    }

    #[test]
    fn switching_items_deactivates_previous() {
        let store = catalog(&["a", "b"]);
        let mut binder = RouteModalBinder::new(RouteScheme::Path, "/");
        let _ = binder.select(&ItemId::new("a"));
        binder.reconcile(&store);

        assert_eq!(
            binder.navigate("/item/b"),
            Effect::Deactivated(ItemId::new("a"))
        );
        assert_eq!(binder.reconcile(&store), Some(ItemId::new("b")));
    }

    #[test]
    fn reselecting_open_item_is_a_no_op() {
        let mut binder = RouteModalBinder::new(RouteScheme::Path, "/");
        let _ = binder.select(&ItemId::new("a"));
        let _ = binder.select(&ItemId::new("a"));
        assert_eq!(binder.history().len(), 2);
    }

    #[test]
    fn back_at_start_is_none() {
        let mut binder = RouteModalBinder::new(RouteScheme::Path, "/");
        assert_eq!(binder.back(), None);
    }
}
